pub mod macros;
pub mod message;
pub mod plan;

pub use message::*;
pub use plan::*;
