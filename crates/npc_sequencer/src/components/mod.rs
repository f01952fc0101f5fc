//! ECS Components sequencer'а
//!
//! Организация:
//! - behavior: FSM state, timed guard, config, NPC marker
//! - queue: NpcCommand, CommandQueue, DialogueClip, DialogueQueue
//! - backends: collaborator компоненты (pose, rig, outline, pointer, audio, toggles)

pub mod backends;
pub mod behavior;
pub mod queue;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod behavior_tests;
#[cfg(test)]
mod queue_tests;

pub use backends::*;
pub use behavior::*;
pub use queue::*;
