//! Pipeline stages: staging, substitution, icons, toolchain and artifacts.

pub mod artifact;
pub mod icons;
pub mod stage;
pub mod substitute;
pub mod toolchain;

pub use artifact::{ArtifactLocator, ArtifactResult};
pub use toolchain::{DotnetToolchain, Toolchain};
