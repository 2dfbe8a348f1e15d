//! Domain layer: pure install-plan logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod install;

pub use config::ReleaseEndpoints;
pub use error::InstallError;
pub use install::{Environment, InstallMode, PathSet, resolve_mode};
