// SPDX-License-Identifier: PMPL-1.0-or-later
//! Request flows: get case, create case, start event.
//!
//! Each flow resolves the regime for the case type once, builds the matching
//! [`PermissionEvaluator`], and runs the same steps whichever regime it got.
//! Collaborators (definitions, grants, explicit case grants, persistence) are
//! passed in; the router itself holds only configuration.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use casegate_model::{
    CaseDataContent, CaseDetails, CaseType, GrantTable, ResourceDefinition, RoleSet, SecurityClassification,
    StartEventTrigger,
};

use crate::classic::ClassicEvaluator;
use crate::classification::{apply_classification, user_classification};
use crate::config::{Concern, EngineConfig, Regime, RegimeConfig};
use crate::evaluator::PermissionEvaluator;
use crate::filter::empty_documents;
use crate::pointer::PointerEvaluator;
use crate::visibility::{CaseVisibilityGate, GrantedCaseLookup};
use crate::AccessError;

/// Read-only access to definitions and pointer grants.
pub trait PolicySource {
    /// The case type with ACL inheritance already applied.
    fn case_type(&self, case_type_id: &str) -> Option<Arc<CaseType>>;

    /// Grants for `roles` on `resource`, merged additively across roles.
    fn grants(&self, resource: &ResourceDefinition, roles: &RoleSet) -> GrantTable;
}

/// Who is asking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub user_id: String,
    pub roles: RoleSet,
    #[serde(default)]
    pub user_classifications: BTreeSet<SecurityClassification>,
}

impl RequestContext {
    pub fn new(user_id: impl Into<String>, roles: RoleSet) -> Self {
        Self {
            user_id: user_id.into(),
            roles,
            user_classifications: BTreeSet::new(),
        }
    }

    pub fn with_classifications(
        mut self,
        classifications: impl IntoIterator<Item = SecurityClassification>,
    ) -> Self {
        self.user_classifications.extend(classifications);
        self
    }

    /// The same user acting with extra case roles (e.g. `[CREATOR]`) held on
    /// one case.
    pub fn with_case_roles(&self, case_roles: &RoleSet) -> Self {
        Self {
            roles: self.roles.union(case_roles),
            ..self.clone()
        }
    }

    pub fn classification(&self) -> Option<SecurityClassification> {
        user_classification(self.user_classifications.iter().copied())
    }
}

/// Dispatches each request to the classic or pointer regime.
#[derive(Debug, Clone)]
pub struct AuthorizationRouter {
    regimes: RegimeConfig,
    gate: CaseVisibilityGate,
}

impl AuthorizationRouter {
    pub fn new(config: &EngineConfig) -> Result<Self, AccessError> {
        Ok(Self {
            regimes: config.access_management.clone(),
            gate: CaseVisibilityGate::new(&config.restricted_role_pattern)?,
        })
    }

    pub fn regimes(&self) -> &RegimeConfig {
        &self.regimes
    }

    pub fn gate(&self) -> &CaseVisibilityGate {
        &self.gate
    }

    /// The evaluator for `case_type_id`, chosen by the authorised allow-list.
    ///
    /// Classic evaluation needs the case-type definition; an unknown case
    /// type is reported as not authorised.
    pub fn evaluator(
        &self,
        jurisdiction: &str,
        case_type_id: &str,
        roles: &RoleSet,
        source: &dyn PolicySource,
    ) -> Result<Box<dyn PermissionEvaluator>, AccessError> {
        match self.regimes.regime_for(Concern::Authorised, case_type_id) {
            Regime::Pointer => {
                let resource = ResourceDefinition::case(jurisdiction, case_type_id);
                Ok(Box::new(PointerEvaluator::new(source.grants(&resource, roles))))
            }
            Regime::Classic => source
                .case_type(case_type_id)
                .map(|case_type| Box::new(ClassicEvaluator::new(case_type, roles.clone())) as Box<dyn PermissionEvaluator>)
                .ok_or_else(|| AccessError::CaseTypeNotAuthorised(case_type_id.to_string())),
        }
    }

    /// The case as `ctx` may see it, or `None`.
    ///
    /// Denial at any step is indistinguishable from the case not existing.
    pub fn get_case(
        &self,
        ctx: &RequestContext,
        case: &CaseDetails,
        source: &dyn PolicySource,
        lookup: &dyn GrantedCaseLookup,
    ) -> Option<CaseDetails> {
        let case_type_id = case.case_type_id.as_str();

        let classified = match self.regimes.regime_for(Concern::Classified, case_type_id) {
            Regime::Pointer => case.clone(),
            Regime::Classic => apply_classification(case, ctx.classification())?,
        };

        let evaluator = match self.evaluator(&case.jurisdiction, case_type_id, &ctx.roles, source) {
            Ok(evaluator) => evaluator,
            Err(e) => {
                warn!(case_type = case_type_id, error = %e, "No evaluator for case type");
                return None;
            }
        };
        if !evaluator.can_read(&case.state) {
            debug!(
                case_type = case_type_id,
                state = %case.state,
                regime = %evaluator.regime(),
                roles = %ctx.roles,
                "Read denied"
            );
            return None;
        }
        let filtered = evaluator.filter_case(&classified);

        let user_access = self.regimes.regime_for(Concern::UserAccess, case_type_id);
        if !self.gate.can_access(&filtered, &ctx.user_id, &ctx.roles, lookup) {
            debug!(
                case = case.reference,
                regime = %user_access,
                user = %ctx.user_id,
                "Case not granted to restricted user"
            );
            return None;
        }
        debug!(case = case.reference, regime = %evaluator.regime(), "Read allowed");
        Some(filtered)
    }

    /// Authorize, persist through `persist`, then return what the creator
    /// may read of the stored case.
    ///
    /// `Ok(None)` means the case was created but the creator cannot read the
    /// case type.
    pub fn create_case<P>(
        &self,
        ctx: &RequestContext,
        jurisdiction: &str,
        case_type_id: &str,
        content: Option<&CaseDataContent>,
        source: &dyn PolicySource,
        persist: P,
    ) -> Result<Option<CaseDetails>, AccessError>
    where
        P: FnOnce(&CaseDataContent) -> Result<CaseDetails, AccessError>,
    {
        let content = content.ok_or_else(|| AccessError::InvalidInput("no data provided".to_string()))?;
        let event = content
            .event
            .as_ref()
            .ok_or_else(|| AccessError::InvalidInput("no event provided".to_string()))?;

        let evaluator = self.evaluator(jurisdiction, case_type_id, &ctx.roles, source)?;
        if let Err(e) = evaluator.check_create(&event.event_id, &content.data) {
            warn!(
                case_type = case_type_id,
                event = %event.event_id,
                regime = %evaluator.regime(),
                user = %ctx.user_id,
                error = %e,
                "Create denied"
            );
            return Err(e);
        }

        let created = persist(content)?;
        debug!(case = created.reference, case_type = case_type_id, "Case created");

        if !evaluator.can_read_case_type() {
            return Ok(None);
        }
        Ok(Some(evaluator.filter_case(&created)))
    }

    /// The trigger as the event form should show it.
    ///
    /// Without READ on the case type both documents come back empty rather
    /// than the request being refused.
    pub fn start_event(
        &self,
        ctx: &RequestContext,
        trigger: &StartEventTrigger,
        source: &dyn PolicySource,
    ) -> Result<StartEventTrigger, AccessError> {
        let evaluator = self.evaluator(trigger.jurisdiction_id(), trigger.case_type_id(), &ctx.roles, source)?;

        let case_details = if evaluator.can_read_case_type() {
            evaluator.filter_case(&trigger.case_details)
        } else {
            debug!(
                case_type = trigger.case_type_id(),
                event = %trigger.event_id,
                "No case-type READ; emptying trigger documents"
            );
            empty_documents(&trigger.case_details)
        };

        Ok(StartEventTrigger {
            case_details,
            ..trigger.clone()
        })
    }
}
