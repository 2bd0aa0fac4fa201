pub mod symbol;
pub mod tape;
pub mod error;
pub mod scan;
pub mod head;
pub mod acceptance;
pub mod multiplier;
pub mod batch;

pub use acceptance::{is_accepted, is_accepted_with};
pub use error::MachineError;
pub use multiplier::{MachineConfig, Multiplier, Phase};
