// SPDX-License-Identifier: PMPL-1.0-or-later
//! casegate engine
//!
//! Decides what a user may do with a case record and produces the filtered
//! view they are allowed to see. Two regimes are supported side by side:
//! classic per-field ACLs carried by the case-type definition, and
//! path-addressed pointer grants from a permission store. Which one applies
//! is configured per case type.
//!
//! The engine is synchronous and performs no I/O; definitions, grants and
//! explicit case grants are supplied through [`PolicySource`] and
//! [`GrantedCaseLookup`].

pub mod classic;
pub mod classification;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod filter;
pub mod pointer;
pub mod router;
pub mod rules;
pub mod visibility;

pub use classic::{apply_acl_inheritance, ClassicEvaluator};
pub use classification::{apply_classification, classify_audit_events, user_classification};
pub use config::{Concern, EngineConfig, Regime, RegimeConfig};
pub use error::AccessError;
pub use evaluator::PermissionEvaluator;
pub use filter::{filter_case_data, filter_case_details};
pub use pointer::PointerEvaluator;
pub use router::{AuthorizationRouter, PolicySource, RequestContext};
pub use rules::PathKind;
pub use visibility::{AccessLevel, CaseVisibilityGate, GrantedCaseLookup};
