//! NetPilot assistant: library crate for the question answering pipeline.
//!
//! Re-exports all modules so the binaries (`np-assistant`, `np-api`) and
//! external crates (e.g. `np-e2e-tests`) can build a `Pipeline` and its
//! parts directly.

pub mod config;
pub mod inference;
pub mod pipeline;
pub mod postprocess;
pub mod resolver;
