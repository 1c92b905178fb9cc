//! storegate CLI library: configuration, errors and command implementations.

pub mod commands;
pub mod config;
pub mod error;
