pub mod agents;
pub mod similarity;

pub use agents::*;
pub use similarity::*;
