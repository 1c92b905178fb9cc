//! Loads every permission gate input concurrently.
//!
//! The read-only userstore set, the feature configuration and the granted
//! scopes are fetched together and joined before the gate is evaluated, so
//! the gate never sees a partially loaded read-only set.

use storegate_userstore::{
    resolve_read_only_userstores_with_primary, resolve_userstore_with_primary, UserstoreDirectory,
    UserstoreListItem, PRIMARY_USERSTORE,
};

use crate::feature::Operation;
use crate::gate::{GateInput, PermissionContext, PermissionGate};
use crate::registry::FeatureRegistry;
use crate::resource::ResourceAttributes;

/// What to gate.
#[derive(Debug, Clone)]
pub struct PermissionRequest<'a> {
    pub feature_key: &'a str,
    pub resource_name: &'a str,
    pub operation: Operation,
    /// Name of the deployment's primary userstore.
    pub primary_userstore: &'a str,
    /// Userstore list the caller already holds; skips the listing call.
    pub userstores: Option<&'a [UserstoreListItem]>,
    pub resource_attributes: Option<ResourceAttributes>,
}

impl<'a> PermissionRequest<'a> {
    #[must_use]
    pub fn new(feature_key: &'a str, resource_name: &'a str) -> Self {
        Self {
            feature_key,
            resource_name,
            operation: Operation::default(),
            primary_userstore: PRIMARY_USERSTORE,
            userstores: None,
            resource_attributes: None,
        }
    }

    #[must_use]
    pub fn with_primary_userstore(mut self, primary: &'a str) -> Self {
        self.primary_userstore = primary;
        self
    }

    #[must_use]
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }

    #[must_use]
    pub fn with_userstores(mut self, userstores: &'a [UserstoreListItem]) -> Self {
        self.userstores = Some(userstores);
        self
    }

    #[must_use]
    pub fn with_resource_attributes(mut self, attributes: ResourceAttributes) -> Self {
        self.resource_attributes = Some(attributes);
        self
    }
}

/// Gather all inputs for `request` and return a ready gate.
///
/// Collaborator failures are logged and recorded on the gate as failed
/// inputs, which makes it deny.
pub async fn load_permission<D, R>(
    directory: &D,
    registry: &R,
    request: PermissionRequest<'_>,
) -> PermissionGate
where
    D: UserstoreDirectory + ?Sized,
    R: FeatureRegistry + ?Sized,
{
    let mut gate = PermissionGate::new(request.operation);
    gate.set_feature_key(request.feature_key);
    gate.set_resource_domain(resolve_userstore_with_primary(
        request.resource_name,
        request.primary_userstore,
    ));
    if let Some(attributes) = request.resource_attributes {
        gate.set_resource_attributes(attributes);
    }

    let (read_only, feature, scopes) = tokio::join!(
        resolve_read_only_userstores_with_primary(
            directory,
            request.userstores,
            request.primary_userstore,
        ),
        registry.get_feature_config(request.feature_key),
        registry.get_granted_scopes(),
    );

    match read_only {
        Ok(resolution) => gate.set_read_only_userstores(resolution),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list userstores");
            gate.mark_failed(GateInput::ReadOnlyUserstores, &e.to_string());
        }
    }

    match (feature, scopes) {
        (Ok(feature), Ok(scopes)) => {
            gate.set_permission_context(PermissionContext::new(scopes, feature));
        }
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!(
                feature = %request.feature_key,
                error = %e,
                "Failed to load permission context"
            );
            gate.mark_failed(GateInput::PermissionContext, &e.to_string());
        }
    }

    gate
}
