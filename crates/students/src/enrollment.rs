//! Enrollment workflow: a strictly ordered four-step remote creation
//! sequence with per-step progress, explicit failure reporting, and
//! backward navigation.
//!
//! State machine:
//!
//! ```text
//! BasicInfo -> Location -> Account -> Role -> Complete
//! ```
//!
//! Linear, backward navigation allowed, no cycles. `Complete` is terminal
//! and only reached after all four remote calls have succeeded in order.
//! The context is an immutable value; [`advance`] and [`go_back`] return a
//! new context and never mutate their input, so a failed step leaves the
//! caller holding the pre-failure state for a retry.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use campusgate_core::{BusinessPartnerId, ErpUserId, LocationId};
use campusgate_forms::{
    validate_account, validate_basic_info, validate_location, validate_role, AccountForm,
    BasicInfoForm, FieldErrors, LocationForm, RoleForm,
};

use crate::gateway::EnrollmentGateway;

/// Position in the enrollment sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStep {
    BasicInfo,
    Location,
    Account,
    Role,
    Complete,
}

impl EnrollmentStep {
    fn next(self) -> EnrollmentStep {
        match self {
            EnrollmentStep::BasicInfo => EnrollmentStep::Location,
            EnrollmentStep::Location => EnrollmentStep::Account,
            EnrollmentStep::Account => EnrollmentStep::Role,
            EnrollmentStep::Role | EnrollmentStep::Complete => EnrollmentStep::Complete,
        }
    }

    fn prev(self) -> EnrollmentStep {
        match self {
            EnrollmentStep::BasicInfo | EnrollmentStep::Location => EnrollmentStep::BasicInfo,
            EnrollmentStep::Account => EnrollmentStep::Location,
            EnrollmentStep::Role => EnrollmentStep::Account,
            EnrollmentStep::Complete => EnrollmentStep::Role,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EnrollmentStep::BasicInfo => "basic_info",
            EnrollmentStep::Location => "location",
            EnrollmentStep::Account => "account",
            EnrollmentStep::Role => "role",
            EnrollmentStep::Complete => "complete",
        }
    }
}

impl core::fmt::Display for EnrollmentStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw input for the step currently being advanced.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepInput {
    BasicInfo(BasicInfoForm),
    Location(LocationForm),
    Account(AccountForm),
    Role(RoleForm),
}

impl StepInput {
    pub fn step(&self) -> EnrollmentStep {
        match self {
            StepInput::BasicInfo(_) => EnrollmentStep::BasicInfo,
            StepInput::Location(_) => EnrollmentStep::Location,
            StepInput::Account(_) => EnrollmentStep::Account,
            StepInput::Role(_) => EnrollmentStep::Role,
        }
    }
}

/// Transient, immutable workflow state: which step is current and which
/// ids earlier steps produced. Each later step needs a predecessor's id as
/// a foreign key, so the context is the single source of those ids.
///
/// Discarded on completion or explicit cancel. Cancelling does **not**
/// delete already-created ERP records; the accumulated ids are exposed via
/// [`EnrollmentContext::created_ids`] so the caller can log what was left
/// behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentContext {
    current: EnrollmentStep,
    business_partner_id: Option<BusinessPartnerId>,
    location_id: Option<LocationId>,
    user_id: Option<ErpUserId>,
    role_assigned: bool,
}

impl EnrollmentContext {
    pub fn new() -> Self {
        Self {
            current: EnrollmentStep::BasicInfo,
            business_partner_id: None,
            location_id: None,
            user_id: None,
            role_assigned: false,
        }
    }

    pub fn current(&self) -> EnrollmentStep {
        self.current
    }

    pub fn business_partner_id(&self) -> Option<BusinessPartnerId> {
        self.business_partner_id
    }

    pub fn location_id(&self) -> Option<LocationId> {
        self.location_id
    }

    pub fn user_id(&self) -> Option<ErpUserId> {
        self.user_id
    }

    pub fn is_complete(&self) -> bool {
        self.current == EnrollmentStep::Complete
    }

    /// Human-readable list of remote records this flow has created so far.
    pub fn created_ids(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(id) = self.business_partner_id {
            out.push(format!("business_partner:{id}"));
        }
        if let Some(id) = self.location_id {
            out.push(format!("location:{id}"));
        }
        if let Some(id) = self.user_id {
            out.push(format!("user:{id}"));
        }
        out
    }

    fn with_business_partner(&self, id: BusinessPartnerId) -> Self {
        Self {
            current: EnrollmentStep::BasicInfo.next(),
            business_partner_id: Some(id),
            ..self.clone()
        }
    }

    fn with_location(&self, id: LocationId) -> Self {
        Self {
            current: EnrollmentStep::Location.next(),
            location_id: Some(id),
            ..self.clone()
        }
    }

    fn with_user(&self, id: ErpUserId) -> Self {
        Self {
            current: EnrollmentStep::Account.next(),
            user_id: Some(id),
            ..self.clone()
        }
    }

    fn with_role_assigned(&self) -> Self {
        Self {
            current: EnrollmentStep::Complete,
            role_assigned: true,
            ..self.clone()
        }
    }

    fn at(&self, step: EnrollmentStep) -> Self {
        Self {
            current: step,
            ..self.clone()
        }
    }
}

impl Default for EnrollmentContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Why an [`advance`] call did not move the workflow forward.
///
/// Every variant is recoverable by user action: fix the input and retry,
/// or retry the failed step once the remote side is healthy again. The
/// failing step is always named so the UI can highlight it.
#[derive(Debug, Error)]
pub enum EnrollmentError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// The step's input failed its schema; no remote call was made.
    #[error("step {step} input invalid: {errors}")]
    Validation {
        step: EnrollmentStep,
        errors: FieldErrors,
    },

    /// The step's remote call failed; context is unchanged and the same
    /// step can be retried without repeating earlier steps.
    #[error("step {step} failed remotely")]
    Remote {
        step: EnrollmentStep,
        #[source]
        source: E,
    },

    /// Input for a step other than the current one.
    #[error("expected input for step {expected}, got {got}")]
    OutOfOrder {
        expected: EnrollmentStep,
        got: EnrollmentStep,
    },

    /// The workflow already reached its terminal state.
    #[error("enrollment already complete")]
    AlreadyComplete,
}

/// Validate the current step's input and run its remote call.
///
/// On success returns a new context with the produced id recorded and the
/// cursor advanced. On any failure the passed-in context is still valid:
/// retrying re-runs only the failed step, reusing ids from steps that
/// already succeeded.
///
/// A step whose remote record already exists (the user navigated back and
/// forward again) is not re-created: the input is re-validated and the
/// existing id is reused, so the sequence stays roll-forward only.
pub async fn advance<G: EnrollmentGateway>(
    gateway: &G,
    context: &EnrollmentContext,
    input: StepInput,
) -> Result<EnrollmentContext, EnrollmentError<G::Error>> {
    if context.is_complete() {
        return Err(EnrollmentError::AlreadyComplete);
    }
    let step = input.step();
    if step != context.current {
        return Err(EnrollmentError::OutOfOrder {
            expected: context.current,
            got: step,
        });
    }

    match input {
        StepInput::BasicInfo(form) => {
            let valid = validate_basic_info(&form)
                .map_err(|errors| EnrollmentError::Validation { step, errors })?;
            if let Some(id) = context.business_partner_id {
                tracing::debug!(%id, "business partner already created, reusing");
                return Ok(context.with_business_partner(id));
            }
            let id = gateway
                .create_business_partner(&valid)
                .await
                .map_err(|source| EnrollmentError::Remote { step, source })?;
            tracing::info!(%id, value = %valid.value, "business partner created");
            Ok(context.with_business_partner(id))
        }
        StepInput::Location(form) => {
            let valid = validate_location(&form)
                .map_err(|errors| EnrollmentError::Validation { step, errors })?;
            let bp = require_id(context.business_partner_id, EnrollmentStep::BasicInfo, step)?;
            if let Some(id) = context.location_id {
                tracing::debug!(%id, "partner location already created, reusing");
                return Ok(context.with_location(id));
            }
            let id = gateway
                .create_partner_location(bp, &valid)
                .await
                .map_err(|source| EnrollmentError::Remote { step, source })?;
            tracing::info!(%id, business_partner = %bp, "partner location created");
            Ok(context.with_location(id))
        }
        StepInput::Account(form) => {
            let valid = validate_account(&form)
                .map_err(|errors| EnrollmentError::Validation { step, errors })?;
            let bp = require_id(context.business_partner_id, EnrollmentStep::BasicInfo, step)?;
            if let Some(id) = context.user_id {
                tracing::debug!(%id, "user already created, reusing");
                return Ok(context.with_user(id));
            }
            let id = gateway
                .create_user(bp, &valid)
                .await
                .map_err(|source| EnrollmentError::Remote { step, source })?;
            tracing::info!(%id, business_partner = %bp, "user account created");
            Ok(context.with_user(id))
        }
        StepInput::Role(form) => {
            let valid = validate_role(&form)
                .map_err(|errors| EnrollmentError::Validation { step, errors })?;
            let user = require_id(context.user_id, EnrollmentStep::Account, step)?;
            if context.role_assigned {
                return Ok(context.with_role_assigned());
            }
            gateway
                .assign_role(user, valid.role_id)
                .await
                .map_err(|source| EnrollmentError::Remote { step, source })?;
            tracing::info!(
                user = %user,
                role = %valid.role_id,
                "role assigned, enrollment complete"
            );
            Ok(context.with_role_assigned())
        }
    }
}

/// Move the cursor one step back without discarding already-created remote
/// records. At the first step this is a no-op; the terminal state has no
/// backward edge either.
pub fn go_back(context: &EnrollmentContext) -> EnrollmentContext {
    if context.is_complete() {
        return context.clone();
    }
    context.at(context.current.prev())
}

fn require_id<T, E>(
    id: Option<T>,
    owner: EnrollmentStep,
    got: EnrollmentStep,
) -> Result<T, EnrollmentError<E>>
where
    E: std::error::Error + Send + Sync + 'static,
{
    id.ok_or(EnrollmentError::OutOfOrder {
        expected: owner,
        got,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::EnrollmentGateway;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use campusgate_core::RoleId;
    use campusgate_forms::{ValidAccount, ValidBasicInfo, ValidLocation};

    #[derive(Debug, Error)]
    #[error("erp unavailable")]
    struct StubError;

    /// Scripted gateway: hands out fixed ids, records every call, and can
    /// be told to fail a specific step.
    #[derive(Default)]
    struct ScriptedGateway {
        fail_at: Option<EnrollmentStep>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl ScriptedGateway {
        fn failing_at(step: EnrollmentStep) -> Self {
            Self {
                fail_at: Some(step),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn check(&self, step: EnrollmentStep, name: &'static str) -> Result<(), StubError> {
            self.calls.lock().unwrap().push(name);
            if self.fail_at == Some(step) {
                Err(StubError)
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl EnrollmentGateway for ScriptedGateway {
        type Error = StubError;

        async fn create_business_partner(
            &self,
            _input: &ValidBasicInfo,
        ) -> Result<BusinessPartnerId, StubError> {
            self.check(EnrollmentStep::BasicInfo, "create_business_partner")?;
            Ok(BusinessPartnerId::from_raw(1001).unwrap())
        }

        async fn create_partner_location(
            &self,
            _bp: BusinessPartnerId,
            _input: &ValidLocation,
        ) -> Result<LocationId, StubError> {
            self.check(EnrollmentStep::Location, "create_partner_location")?;
            Ok(LocationId::from_raw(2001).unwrap())
        }

        async fn create_user(
            &self,
            _bp: BusinessPartnerId,
            _input: &ValidAccount,
        ) -> Result<ErpUserId, StubError> {
            self.check(EnrollmentStep::Account, "create_user")?;
            Ok(ErpUserId::from_raw(3001).unwrap())
        }

        async fn assign_role(&self, _user: ErpUserId, _role: RoleId) -> Result<(), StubError> {
            self.check(EnrollmentStep::Role, "assign_role")
        }
    }

    fn basic_info() -> StepInput {
        StepInput::BasicInfo(BasicInfoForm {
            value: "STU001".to_string(),
            name: "John".to_string(),
            bp_group_id: 1,
            ..BasicInfoForm::default()
        })
    }

    fn location() -> StepInput {
        StepInput::Location(LocationForm::default())
    }

    fn account() -> StepInput {
        StepInput::Account(AccountForm {
            email: Some("john@school.edu".to_string()),
            ..AccountForm::default()
        })
    }

    fn role() -> StepInput {
        StepInput::Role(RoleForm { role_id: 102 })
    }

    #[tokio::test]
    async fn happy_path_runs_all_four_steps_in_order() {
        let gw = ScriptedGateway::default();
        let ctx = EnrollmentContext::new();

        let ctx = advance(&gw, &ctx, basic_info()).await.unwrap();
        assert_eq!(ctx.current(), EnrollmentStep::Location);
        assert_eq!(ctx.business_partner_id().unwrap().get(), 1001);

        let ctx = advance(&gw, &ctx, location()).await.unwrap();
        let ctx = advance(&gw, &ctx, account()).await.unwrap();
        let ctx = advance(&gw, &ctx, role()).await.unwrap();

        assert!(ctx.is_complete());
        assert_eq!(
            gw.calls(),
            vec![
                "create_business_partner",
                "create_partner_location",
                "create_user",
                "assign_role",
            ]
        );
    }

    #[tokio::test]
    async fn validation_failure_makes_no_remote_call() {
        let gw = ScriptedGateway::default();
        let ctx = EnrollmentContext::new();

        let err = advance(
            &gw,
            &ctx,
            StepInput::BasicInfo(BasicInfoForm {
                value: String::new(),
                name: "John".to_string(),
                bp_group_id: 1,
                ..BasicInfoForm::default()
            }),
        )
        .await
        .unwrap_err();

        match err {
            EnrollmentError::Validation { step, errors } => {
                assert_eq!(step, EnrollmentStep::BasicInfo);
                assert!(errors.cites("value"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
        assert!(gw.calls().is_empty());
    }

    #[tokio::test]
    async fn out_of_order_input_is_rejected_without_remote_calls() {
        let gw = ScriptedGateway::default();
        let ctx = EnrollmentContext::new();

        let err = advance(&gw, &ctx, location()).await.unwrap_err();
        match err {
            EnrollmentError::OutOfOrder { expected, got } => {
                assert_eq!(expected, EnrollmentStep::BasicInfo);
                assert_eq!(got, EnrollmentStep::Location);
            }
            other => panic!("expected OutOfOrder, got {other:?}"),
        }
        assert!(gw.calls().is_empty());
    }

    #[tokio::test]
    async fn remote_failure_names_the_step_and_leaves_context_reusable() {
        let gw = ScriptedGateway::failing_at(EnrollmentStep::Location);
        let ctx = EnrollmentContext::new();

        let ctx = advance(&gw, &ctx, basic_info()).await.unwrap();
        let err = advance(&gw, &ctx, location()).await.unwrap_err();
        match err {
            EnrollmentError::Remote { step, .. } => assert_eq!(step, EnrollmentStep::Location),
            other => panic!("expected Remote, got {other:?}"),
        }
        // Caller still holds the pre-failure context.
        assert_eq!(ctx.current(), EnrollmentStep::Location);
        assert!(ctx.business_partner_id().is_some());

        // Retry against a healthy gateway: step 1 is not repeated.
        let gw2 = ScriptedGateway::default();
        let ctx = advance(&gw2, &ctx, location()).await.unwrap();
        assert_eq!(ctx.current(), EnrollmentStep::Account);
        assert_eq!(gw2.calls(), vec!["create_partner_location"]);
    }

    #[tokio::test]
    async fn go_back_keeps_created_ids_and_readvance_reuses_them() {
        let gw = ScriptedGateway::default();
        let ctx = EnrollmentContext::new();

        let ctx = advance(&gw, &ctx, basic_info()).await.unwrap();
        let ctx = go_back(&ctx);
        assert_eq!(ctx.current(), EnrollmentStep::BasicInfo);
        assert!(ctx.business_partner_id().is_some());

        // Advancing again must not create a second business partner.
        let ctx = advance(&gw, &ctx, basic_info()).await.unwrap();
        assert_eq!(ctx.current(), EnrollmentStep::Location);
        assert_eq!(gw.calls(), vec!["create_business_partner"]);
    }

    #[tokio::test]
    async fn go_back_at_first_step_is_a_no_op() {
        let ctx = EnrollmentContext::new();
        assert_eq!(go_back(&ctx), ctx);
    }

    #[tokio::test]
    async fn complete_flow_rejects_further_advances() {
        let gw = ScriptedGateway::default();
        let mut ctx = EnrollmentContext::new();
        for input in [basic_info(), location(), account(), role()] {
            ctx = advance(&gw, &ctx, input).await.unwrap();
        }
        assert!(ctx.is_complete());

        let err = advance(&gw, &ctx, role()).await.unwrap_err();
        assert!(matches!(err, EnrollmentError::AlreadyComplete));
        // Terminal state has no backward edge.
        assert_eq!(go_back(&ctx), ctx);
    }

    #[tokio::test]
    async fn cancel_after_step_two_reports_created_ids_and_calls_stop() {
        let gw = ScriptedGateway::default();
        let ctx = EnrollmentContext::new();

        let ctx = advance(&gw, &ctx, basic_info()).await.unwrap();
        let ctx = advance(&gw, &ctx, location()).await.unwrap();

        // Cancel is dropping the context; nothing further hits the gateway,
        // and the orphaned ids are reported for logging.
        assert_eq!(
            ctx.created_ids(),
            vec!["business_partner:1001".to_string(), "location:2001".to_string()]
        );
        drop(ctx);
        assert_eq!(
            gw.calls(),
            vec!["create_business_partner", "create_partner_location"]
        );
    }
}
