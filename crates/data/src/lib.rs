pub mod loader;
pub mod source;

pub use loader::*;
pub use source::*;
