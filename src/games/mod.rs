//! Game settlement: the wager engine and its outcome generators

pub mod engine;
pub mod outcome;
pub mod types;

pub use engine::{Settlement, WagerEngine};
pub use outcome::{SequenceSource, ThreadRngSource, UniformSource};
pub use types::*;
