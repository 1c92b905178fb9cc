//! Permission gate for console actions.
//!
//! A mutating action is disabled (`is_read_only = true`) when ANY of:
//! 1. the feature, or the action's sub-feature (`users.update`), is not
//!    enabled for the tenant,
//! 2. the resource's userstore domain is read-only,
//! 3. the granted scopes do not satisfy the feature's requirement.
//!
//! The deny conditions are independent; every one that holds is reported.
//! Unknown inputs deny (fail-closed).

use serde::Serialize;
use storegate_userstore::{resolve_userstore, ReadOnlyResolution, ReadOnlyUserstores};
use uuid::Uuid;

use crate::feature::{FeatureConfig, Operation};
use crate::resource::{ResourceAttributes, SHARED_PROFILES_SUB_FEATURE};
use crate::scopes::GrantedScopes;

/// Decide whether an update on a resource in `resource_domain` is disabled.
///
/// Returns `true` (read-only) if the feature `feature_key` or its `update`
/// sub-feature is disabled, the domain is a read-only userstore, or the
/// granted scopes do not satisfy the feature's `update` requirement.
#[must_use]
pub fn compute_permission(
    resource_domain: &str,
    read_only_userstores: &ReadOnlyUserstores,
    scopes: &GrantedScopes,
    feature_key: &str,
    feature: &FeatureConfig,
) -> bool {
    !feature.is_sub_feature_enabled(&Operation::Update.sub_feature_key(feature_key))
        || read_only_userstores.contains(resource_domain)
        || !scopes.satisfies(feature.required_scopes(Operation::Update))
}

/// The caller's scopes and the gated feature's configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionContext {
    pub scopes: GrantedScopes,
    pub feature: FeatureConfig,
}

impl PermissionContext {
    #[must_use]
    pub fn new(scopes: GrantedScopes, feature: FeatureConfig) -> Self {
        Self { scopes, feature }
    }
}

/// An input the gate waits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateInput {
    ResourceDomain,
    ReadOnlyUserstores,
    PermissionContext,
}

/// Why an action was disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DenyReason {
    FeatureDisabled,
    ActionDisabled { sub_feature: String },
    ReadOnlyUserstore { domain: String },
    MissingScopes { missing: Vec<String> },
    InputUnavailable { input: GateInput },
    IncompleteUserstores { failed: Vec<String> },
    ExternallySourced,
    ReadOnlyResource,
    SharedProfileLocked,
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FeatureDisabled => write!(f, "feature is disabled"),
            Self::ActionDisabled { sub_feature } => write!(f, "{sub_feature} is disabled"),
            Self::ReadOnlyUserstore { domain } => write!(f, "userstore {domain} is read-only"),
            Self::MissingScopes { missing } => {
                write!(f, "missing scopes: {}", missing.join(", "))
            }
            Self::InputUnavailable { input } => write!(f, "{input:?} could not be loaded"),
            Self::IncompleteUserstores { failed } => {
                write!(f, "userstores not classified: {}", failed.join(", "))
            }
            Self::ExternallySourced => write!(f, "resource is sourced from an external connection"),
            Self::ReadOnlyResource => write!(f, "resource is marked read-only"),
            Self::SharedProfileLocked => write!(f, "shared profiles cannot be edited"),
        }
    }
}

/// Everything the gate evaluates. `None` means the input is unavailable.
#[derive(Debug, Clone, Default)]
pub struct PermissionInputs {
    pub operation: Operation,
    /// Feature being gated; enables the per-action sub-feature check.
    pub feature_key: Option<String>,
    pub resource_domain: Option<String>,
    pub read_only_userstores: Option<ReadOnlyResolution>,
    pub context: Option<PermissionContext>,
    pub resource_attributes: Option<ResourceAttributes>,
}

/// Outcome of a gate evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PermissionDecision {
    pub decision_id: Uuid,
    pub operation: Operation,
    pub is_read_only: bool,
    pub reasons: Vec<DenyReason>,
}

impl PermissionDecision {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        !self.is_read_only
    }
}

/// Evaluate every deny condition over possibly incomplete inputs.
#[must_use]
pub fn evaluate(inputs: &PermissionInputs) -> PermissionDecision {
    let mut reasons = Vec::new();
    let mutating = inputs.operation.is_mutating();

    match &inputs.context {
        Some(ctx) => {
            if !ctx.feature.is_enabled() {
                reasons.push(DenyReason::FeatureDisabled);
            } else if let Some(feature_key) = &inputs.feature_key {
                let sub_feature = inputs.operation.sub_feature_key(feature_key);
                if !ctx.feature.is_sub_feature_enabled(&sub_feature) {
                    reasons.push(DenyReason::ActionDisabled { sub_feature });
                }
            }
            let missing = ctx
                .scopes
                .missing(ctx.feature.required_scopes(inputs.operation));
            if !missing.is_empty() {
                reasons.push(DenyReason::MissingScopes { missing });
            }
        }
        None => reasons.push(DenyReason::InputUnavailable {
            input: GateInput::PermissionContext,
        }),
    }

    if mutating {
        match (&inputs.resource_domain, &inputs.read_only_userstores) {
            (Some(domain), Some(resolution)) => {
                if resolution.userstores.contains(domain) {
                    reasons.push(DenyReason::ReadOnlyUserstore {
                        domain: domain.clone(),
                    });
                } else if !resolution.is_complete() {
                    reasons.push(DenyReason::IncompleteUserstores {
                        failed: resolution
                            .failures
                            .iter()
                            .map(|f| f.userstore_name.clone())
                            .collect(),
                    });
                }
            }
            (domain, resolution) => {
                if domain.is_none() {
                    reasons.push(DenyReason::InputUnavailable {
                        input: GateInput::ResourceDomain,
                    });
                }
                if resolution.is_none() {
                    reasons.push(DenyReason::InputUnavailable {
                        input: GateInput::ReadOnlyUserstores,
                    });
                }
            }
        }

        if let Some(attrs) = &inputs.resource_attributes {
            if attrs.is_externally_sourced() {
                reasons.push(DenyReason::ExternallySourced);
            }
            if attrs.is_read_only_user {
                reasons.push(DenyReason::ReadOnlyResource);
            }
            let shared_profiles_enabled = inputs
                .context
                .as_ref()
                .is_some_and(|ctx| {
                    ctx.feature
                        .is_sub_feature_enabled(SHARED_PROFILES_SUB_FEATURE)
                });
            if attrs.is_shared_profile() && !shared_profiles_enabled {
                reasons.push(DenyReason::SharedProfileLocked);
            }
        }
    }

    PermissionDecision {
        decision_id: Uuid::new_v4(),
        operation: inputs.operation,
        is_read_only: !reasons.is_empty(),
        reasons,
    }
}

/// Gate lifecycle for one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GateState {
    Loading,
    Ready { is_read_only: bool },
}

#[derive(Debug, Clone)]
enum Slot<T> {
    Pending,
    Loaded(T),
    Failed,
}

impl<T> Slot<T> {
    fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(v) => Some(v),
            _ => None,
        }
    }
}

/// Holds the gate's inputs for a view and re-evaluates on every change.
///
/// The gate stays [`GateState::Loading`] until every input has either loaded
/// or failed. A failed input leaves the gate ready but read-only.
#[derive(Debug, Clone)]
pub struct PermissionGate {
    operation: Operation,
    feature_key: Option<String>,
    domain: Slot<String>,
    read_only: Slot<ReadOnlyResolution>,
    context: Slot<PermissionContext>,
    resource_attributes: Option<ResourceAttributes>,
    decision: Option<PermissionDecision>,
}

impl Default for PermissionGate {
    fn default() -> Self {
        Self::new(Operation::Update)
    }
}

impl PermissionGate {
    #[must_use]
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            feature_key: None,
            domain: Slot::Pending,
            read_only: Slot::Pending,
            context: Slot::Pending,
            resource_attributes: None,
            decision: None,
        }
    }

    /// Name the gated feature so its per-action sub-feature is checked.
    pub fn set_feature_key(&mut self, feature_key: &str) {
        self.feature_key = Some(feature_key.to_string());
        self.recompute();
    }

    /// Set the resource by its qualified name; the domain is resolved from it.
    pub fn set_resource_name(&mut self, qualified_name: &str) {
        self.set_resource_domain(resolve_userstore(qualified_name));
    }

    pub fn set_resource_domain(&mut self, domain: &str) {
        self.domain = Slot::Loaded(domain.to_string());
        self.recompute();
    }

    pub fn set_read_only_userstores(&mut self, resolution: ReadOnlyResolution) {
        self.read_only = Slot::Loaded(resolution);
        self.recompute();
    }

    pub fn set_permission_context(&mut self, context: PermissionContext) {
        self.context = Slot::Loaded(context);
        self.recompute();
    }

    /// Attach system attributes of the resource. Optional; never blocks readiness.
    pub fn set_resource_attributes(&mut self, attributes: ResourceAttributes) {
        self.resource_attributes = Some(attributes);
        self.recompute();
    }

    /// Record that an input could not be loaded. The gate will deny.
    pub fn mark_failed(&mut self, input: GateInput, error: &str) {
        tracing::warn!(input = ?input, error = %error, "Permission gate input unavailable");
        match input {
            GateInput::ResourceDomain => self.domain = Slot::Failed,
            GateInput::ReadOnlyUserstores => self.read_only = Slot::Failed,
            GateInput::PermissionContext => self.context = Slot::Failed,
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        if self.domain.is_pending() || self.read_only.is_pending() || self.context.is_pending() {
            self.decision = None;
            return;
        }

        let inputs = PermissionInputs {
            operation: self.operation,
            feature_key: self.feature_key.clone(),
            resource_domain: self.domain.loaded().cloned(),
            read_only_userstores: self.read_only.loaded().cloned(),
            context: self.context.loaded().cloned(),
            resource_attributes: self.resource_attributes.clone(),
        };
        let decision = evaluate(&inputs);

        tracing::debug!(
            decision_id = %decision.decision_id,
            operation = ?decision.operation,
            is_read_only = decision.is_read_only,
            reasons = decision.reasons.len(),
            "Permission gate evaluated"
        );
        self.decision = Some(decision);
    }

    #[must_use]
    pub fn state(&self) -> GateState {
        match &self.decision {
            None => GateState::Loading,
            Some(d) => GateState::Ready {
                is_read_only: d.is_read_only,
            },
        }
    }

    /// Read-only unless the gate is ready and allows the action.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.decision.as_ref().map_or(true, |d| d.is_read_only)
    }

    #[must_use]
    pub fn decision(&self) -> Option<&PermissionDecision> {
        self.decision.as_ref()
    }

    #[must_use]
    pub fn read_only_resolution(&self) -> Option<&ReadOnlyResolution> {
        self.read_only.loaded()
    }
}
