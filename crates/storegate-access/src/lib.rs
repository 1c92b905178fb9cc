//! Scope and feature gated permission decisions for console actions.
//!
//! Decides whether a mutating action on a user, group or administrator is
//! enabled for the current caller. See [`gate`] for the decision rule and
//! [`loader`] for gathering its inputs.

pub mod error;
pub mod feature;
pub mod gate;
pub mod loader;
pub mod registry;
pub mod resource;
pub mod scopes;

pub use error::{RegistryError, RegistryResult};
pub use feature::{FeatureConfig, FeatureConfigs, FeatureScopes, Operation};
pub use gate::{
    compute_permission, evaluate, DenyReason, GateInput, GateState, PermissionContext,
    PermissionDecision, PermissionGate, PermissionInputs,
};
pub use loader::{load_permission, PermissionRequest};
pub use registry::{FeatureRegistry, StaticFeatureRegistry};
pub use resource::{ResourceAttributes, SHARED_PROFILES_SUB_FEATURE, SYSTEM_SCHEMA};
pub use scopes::GrantedScopes;
