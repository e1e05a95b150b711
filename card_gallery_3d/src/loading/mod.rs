//! Progressive loading module
//!
//! Instantiates cards in batches, visible cards first.

pub mod progressive_loader;

pub use progressive_loader::{LoaderConfig, LoadingPhase, LoadingState, ProgressiveLoader};
