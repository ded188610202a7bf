//! AppHost - builds launcher-redirect Android apps from a .NET host template
//!
//! This crate provides the core library functionality for AppHost: staging
//! a per-package workspace, specializing it, installing icons, driving the
//! `dotnet` toolchain and locating the built package.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for AppHost unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides scripted interaction and toolchain doubles
/// plus template fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{
    color::Rgb, error::BuildError, request::BuildRequest, template::TemplateRoot,
    workspace::BuildWorkspace,
};

pub use ops::{BuildOrchestrator, BuildOutcome};
pub use util::context::GlobalContext;
