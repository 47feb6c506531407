// SPDX-License-Identifier: PMPL-1.0-or-later
//! The capability both regimes implement.
//!
//! The router picks one implementation per request and then only talks to
//! this trait, so the get/create/start flows are written once.

use casegate_model::{CaseDetails, Document};

use crate::config::Regime;
use crate::filter::map_documents;
use crate::AccessError;

/// Access decisions for one user against one case type.
pub trait PermissionEvaluator: Send + Sync {
    fn regime(&self) -> Regime;

    /// Coarse READ on the case type as a whole.
    fn can_read_case_type(&self) -> bool;

    fn can_read_state(&self, state_id: &str) -> bool;

    /// Case-type, event and field CREATE checks, in that order.
    fn check_create(&self, event_id: &str, data: &Document) -> Result<(), AccessError>;

    /// The readable part of one document.
    fn filter_readable(&self, document: &Document) -> Document;

    /// READ on the case type and on `state_id`.
    fn can_read(&self, state_id: &str) -> bool {
        self.can_read_case_type() && self.can_read_state(state_id)
    }

    /// Filter `data` and `data_classification` with the same rules.
    fn filter_case(&self, details: &CaseDetails) -> CaseDetails {
        map_documents(details, |document| self.filter_readable(document))
    }
}
