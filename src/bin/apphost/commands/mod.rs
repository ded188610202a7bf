//! Command implementations

pub mod build;
pub mod completions;
pub mod icon;
pub mod locate;
pub mod swatches;
pub mod toolchain;

use anyhow::{anyhow, Error};
use miette::Diagnostic;

use apphost::BuildError;

/// Fold a build error's help line into an `anyhow` error for `main`.
pub fn with_help(err: BuildError) -> Error {
    let help = err.help().map(|h| h.to_string());
    match help {
        Some(help) => anyhow!("{}\nhelp: {}", err, help),
        None => Error::new(err),
    }
}
