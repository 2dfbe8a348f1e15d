//! Command handlers: render output around application services.

pub mod install;
