// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//! casegate command-line driver.
//!
//! Loads a JSON fixture (configuration, case-type definitions, pointer
//! grants, explicit case grants, stored cases) into in-memory stores and
//! runs engine operations against it.

pub mod fixture;
pub mod world;

pub use fixture::{CaseUserRow, Fixture, GrantRow};
pub use world::{AccessReport, CreatedCase, World};
