pub mod analysis;
pub mod operations;
pub mod pipeline;
pub mod roster;

pub use analysis::*;
pub use operations::*;
pub use pipeline::{run_mix, MixOptions, MixOutcome};
pub use roster::*;
