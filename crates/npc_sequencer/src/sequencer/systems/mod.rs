//! Sequencer systems

pub mod dialogue;
pub mod fsm;
pub mod intake;

pub use dialogue::*;
pub use fsm::*;
pub use intake::*;
