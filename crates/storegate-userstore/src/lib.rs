//! Userstore domain resolution and read-only userstore discovery.
//!
//! # Modules
//!
//! - [`domain`] - Resolve the owning userstore domain of a qualified name
//! - [`models`] - Userstore list items and properties
//! - [`directory`] - The `UserstoreDirectory` collaborator trait
//! - [`client`] - REST implementation of the directory
//! - [`read_only`] - Build the set of userstores that must not be edited
//!
//! # Example
//!
//! ```
//! use storegate_userstore::{resolve_userstore, PRIMARY_USERSTORE};
//!
//! assert_eq!(resolve_userstore("CUSTOM/alice"), "CUSTOM");
//! assert_eq!(resolve_userstore("alice"), PRIMARY_USERSTORE);
//! ```

pub mod client;
pub mod directory;
pub mod domain;
pub mod error;
pub mod models;
pub mod read_only;

pub use client::RestUserstoreDirectory;
pub use directory::{InMemoryUserstoreDirectory, UserstoreDirectory};
pub use domain::{
    resolve_userstore, resolve_userstore_with_primary, username_without_domain, ResourceLocation,
    PRIMARY_USERSTORE,
};
pub use error::{DirectoryError, DirectoryResult};
pub use models::{UserstoreListItem, UserstoreProperty, READONLY_USER_STORE};
pub use read_only::{
    is_read_only_property, resolve_read_only_userstores, resolve_read_only_userstores_with_primary,
    PropertyFetchFailure, ReadOnlyResolution, ReadOnlyUserstores,
};
