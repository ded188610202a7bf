//! Core data types: colors, requests, templates, workspaces and errors.

pub mod color;
pub mod error;
pub mod request;
pub mod template;
pub mod workspace;

pub use color::{ColorPair, Hsl, Rgb};
pub use error::{BuildError, ErrorKind};
pub use request::BuildRequest;
pub use template::TemplateRoot;
pub use workspace::BuildWorkspace;
