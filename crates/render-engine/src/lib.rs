//! Montage Render Engine
//!
//! The boundary between the resolved job description and the external
//! renderer that actually composites and encodes it.
//!
//! ```text
//! JobDescription ──► submit() ──► RenderEngine::render()
//!                       │                 │
//!                  notices (stdout)       ├── ProcessEngine: job.json ──► editly --json job.json
//!                                         └── any other engine (tests, embedders)
//! ```
//!
//! Exactly one render call is made per submission. Failures are not retried.

pub mod engine;
pub mod process;
pub mod submit;

pub use engine::*;
pub use process::*;
pub use submit::*;
