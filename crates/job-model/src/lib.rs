//! Montage Job Model
//!
//! Defines the job description handed to the rendering engine and the
//! pipeline stages that produce it:
//! - **Job:** An open key/value document; only a handful of keys are known
//! - **Format:** Strict JSON or relaxed JSON5, chosen by file suffix
//! - **Loader:** Reads a config file into a job description
//! - **Overrides:** Layers command-line values over the loaded document
//!
//! Keys the tool does not know about are carried through untouched and in
//! file order, so renderer-specific settings never need modelling here.

pub mod error;
pub mod format;
pub mod job;
pub mod loader;
pub mod overrides;

pub use error::*;
pub use format::*;
pub use job::*;
pub use loader::*;
pub use overrides::*;
