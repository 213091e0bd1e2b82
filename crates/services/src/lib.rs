pub mod driver;
pub mod fixtures;
pub mod match_simulator;
pub mod playback;
pub mod tracker;

pub use driver::*;
pub use fixtures::*;
pub use match_simulator::*;
pub use playback::*;
pub use tracker::*;
