pub mod embedding;
pub mod pipeline;
pub mod sentiment;

pub use embedding::*;
pub use pipeline::*;
pub use sentiment::*;
