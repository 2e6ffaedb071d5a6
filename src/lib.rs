//! 21 Run (workspace facade crate).
//!
//! Re-exports `run21::{core,engine,input,term,types}` while the implementation
//! lives in dedicated crates under `crates/`.

pub mod logging;

pub use run21_core as core;
pub use run21_engine as engine;
pub use run21_input as input;
pub use run21_term as term;
pub use run21_types as types;
