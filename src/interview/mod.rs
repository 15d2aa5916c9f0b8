pub mod candidate;
pub mod engine;
pub mod extract;
pub mod questions;
pub mod tech_stack;
pub mod transcript;
pub mod validate;

pub use candidate::*;
pub use engine::*;
pub use questions::*;
pub use tech_stack::*;
pub use transcript::*;
pub use validate::*;
