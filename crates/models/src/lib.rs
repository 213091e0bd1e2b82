pub mod error;
pub mod events;
pub mod odds;
pub mod predictions;
pub mod records;
pub mod stats;

pub use error::*;
pub use events::*;
pub use odds::*;
pub use predictions::*;
pub use records::*;
pub use stats::*;
