// Library surface for headless/integration tests and reuse.
// Terminal drawing stays in the binary.
pub mod arcade;
pub mod config;
pub mod corpus;
pub mod error;
pub mod games;
pub mod matcher;
pub mod metrics;
pub mod practice;
pub mod runtime;
pub mod scene;
pub mod session;
pub mod target;

pub use arcade::{Arcade, SessionKind};
pub use error::{ArcadeError, Result};
