// SPDX-License-Identifier: PMPL-1.0-or-later
//! The engine wired to in-memory stores loaded from a fixture.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use casegate_engine::{AccessLevel, AuthorizationRouter, PolicySource, RequestContext};
use casegate_model::{
    CaseAccess, CaseDataContent, CaseDetails, Document, SecurityClassification, StartEventTrigger,
};
use casegate_storage::directory::parse_reference;
use casegate_storage::{
    CaseAccessOperation, CaseDirectory, CaseUserStore, GrantedCaseSet, InMemoryCaseDirectory,
    InMemoryCaseUserStore, PolicyStore, StorageError, CREATOR_ROLE,
};

use crate::fixture::Fixture;

/// A case written by `create_case`, and what its creator may read of it.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedCase {
    pub stored: CaseDetails,
    pub visible: Option<CaseDetails>,
}

/// Result of a visibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessReport {
    pub access_level: AccessLevel,
    pub can_access: bool,
}

pub struct World {
    pub router: AuthorizationRouter,
    pub policy: PolicyStore,
    pub users: Arc<InMemoryCaseUserStore>,
    pub directory: Arc<InMemoryCaseDirectory>,
}

impl World {
    pub async fn from_fixture(fixture: &Fixture) -> anyhow::Result<Self> {
        let config = fixture.engine_config()?;
        let router = AuthorizationRouter::new(&config)?;

        let mut policy = PolicyStore::new();
        for case_type in &fixture.case_types {
            policy.register_case_type(case_type.clone());
        }
        for row in &fixture.grants {
            policy.add_grant(&row.resource(), &row.role, row.grant());
        }

        let users = Arc::new(InMemoryCaseUserStore::new());
        for row in &fixture.case_users {
            users
                .grant_access(row.case_id, &row.user_id, row.reason.as_deref(), &row.case_role)
                .await?;
        }

        let directory = Arc::new(InMemoryCaseDirectory::new());
        for case in &fixture.cases {
            directory.insert(case.clone()).await;
        }

        info!(
            case_types = policy.case_type_count(),
            resources = policy.resource_count(),
            cases = fixture.cases.len(),
            "Fixture loaded"
        );
        Ok(Self {
            router,
            policy,
            users,
            directory,
        })
    }

    pub fn access(&self) -> CaseAccessOperation<InMemoryCaseUserStore, InMemoryCaseDirectory> {
        CaseAccessOperation::new(Arc::clone(&self.users), Arc::clone(&self.directory))
    }

    pub async fn find_case(&self, jurisdiction: &str, reference: &str) -> anyhow::Result<CaseDetails> {
        let parsed = parse_reference(reference)?;
        let case = self
            .directory
            .find_by_reference(jurisdiction, parsed)
            .await?
            .ok_or_else(|| StorageError::CaseNotFound(reference.to_string()))?;
        Ok(case)
    }

    /// `ctx` widened with the case roles the user holds on `case`.
    async fn with_case_roles(&self, ctx: &RequestContext, case: &CaseDetails) -> anyhow::Result<RequestContext> {
        let case_roles = self.users.find_case_roles(case.id, &ctx.user_id).await?;
        Ok(ctx.with_case_roles(&case_roles.into_iter().collect()))
    }

    async fn granted(&self, ctx: &RequestContext) -> anyhow::Result<GrantedCaseSet> {
        Ok(GrantedCaseSet::load(self.users.as_ref(), &[ctx.user_id.as_str()]).await?)
    }

    pub async fn get_case(
        &self,
        ctx: &RequestContext,
        jurisdiction: &str,
        reference: &str,
    ) -> anyhow::Result<Option<CaseDetails>> {
        let case = self.find_case(jurisdiction, reference).await?;
        let ctx = self.with_case_roles(ctx, &case).await?;
        let granted = self.granted(&ctx).await?;
        Ok(self.router.get_case(&ctx, &case, &self.policy, &granted))
    }

    /// Create a case in `state`. The creator is granted `[CREATOR]` on it.
    pub async fn create_case(
        &self,
        ctx: &RequestContext,
        jurisdiction: &str,
        case_type_id: &str,
        state: &str,
        content: Option<&CaseDataContent>,
    ) -> anyhow::Result<CreatedCase> {
        let (id, reference) = self.directory.next_identity().await;
        let classification = self
            .policy
            .case_type(case_type_id)
            .map(|case_type| case_type.security_classification)
            .unwrap_or_default();

        let mut stored = None;
        let visible = self.router.create_case(ctx, jurisdiction, case_type_id, content, &self.policy, |content| {
            let now = Utc::now();
            let case = CaseDetails {
                id,
                reference,
                jurisdiction: jurisdiction.to_string(),
                case_type_id: case_type_id.to_string(),
                state: state.to_string(),
                security_classification: classification,
                created_date: Some(now),
                last_modified: Some(now),
                data: content.data.clone(),
                data_classification: classify_all(&content.data, classification),
            };
            stored = Some(case.clone());
            Ok(case)
        })?;

        let stored = stored.context("case was not persisted")?;
        self.users
            .grant_access(stored.id, &ctx.user_id, None, CREATOR_ROLE)
            .await?;
        self.directory.insert(stored.clone()).await;
        info!(case_id = stored.id, reference = stored.reference, "Case created");
        Ok(CreatedCase { stored, visible })
    }

    pub async fn start_event(
        &self,
        ctx: &RequestContext,
        jurisdiction: &str,
        reference: &str,
        event_id: &str,
        token: Option<String>,
    ) -> anyhow::Result<StartEventTrigger> {
        let case = self.find_case(jurisdiction, reference).await?;
        let ctx = self.with_case_roles(ctx, &case).await?;
        let trigger = StartEventTrigger {
            case_details: case,
            event_id: event_id.to_string(),
            token,
        };
        Ok(self.router.start_event(&ctx, &trigger, &self.policy)?)
    }

    pub async fn can_access(
        &self,
        ctx: &RequestContext,
        jurisdiction: &str,
        reference: &str,
    ) -> anyhow::Result<AccessReport> {
        let case = self.find_case(jurisdiction, reference).await?;
        let granted = self.granted(ctx).await?;
        let gate = self.router.gate();
        Ok(AccessReport {
            access_level: gate.access_level(&ctx.roles),
            can_access: gate.can_access(&case, &ctx.user_id, &ctx.roles, &granted),
        })
    }

    pub async fn grant(&self, jurisdiction: &str, reference: &str, access: &CaseAccess) -> anyhow::Result<Vec<CaseAccess>> {
        let operation = self.access();
        operation.grant_access(jurisdiction, reference, access).await?;
        Ok(operation.find_users_on_case(jurisdiction, reference).await?)
    }

    pub async fn revoke(&self, jurisdiction: &str, reference: &str, user_id: &str) -> anyhow::Result<bool> {
        Ok(self.access().revoke_access(jurisdiction, reference, user_id).await?)
    }
}

/// Every key of a new case classified at the case type's level.
fn classify_all(data: &Document, classification: SecurityClassification) -> Document {
    data.keys()
        .map(|key| (key.clone(), classification.to_string().into()))
        .collect()
}
