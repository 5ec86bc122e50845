pub mod call;
pub mod transcript;

pub use call::*;
pub use transcript::*;
