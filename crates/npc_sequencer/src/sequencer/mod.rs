//! Sequencer: единый per-tick scheduler NPC
//!
//! Оба "цикла" (activation и dialogue drain): обычные системы в одном
//! FixedUpdate chain, поэтому дублирующихся экземпляров не бывает.

use bevy::prelude::*;

pub mod activation;
pub mod dialogue;
pub mod events;
pub mod states;
pub mod systems;

#[cfg(test)]
mod states_tests;

pub use activation::{activate_next, can_activate, force_idle, Activation};
pub use dialogue::{drain_step, DrainOutcome};
pub use events::*;
pub use states::{step_behavior, NpcBody, ResolvedTargets, StepOutcome, VisualUpdate};

/// Фазы тика sequencer'а (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SequencerSet {
    /// Внешние запросы, валидация, scripts
    Intake,
    /// Guard → activation → behavior
    Fsm,
    /// Dialogue drain
    Dialogue,
}

/// Sequencer Plugin
///
/// Регистрирует системы в FixedUpdate. Порядок выполнения:
/// 1. apply_enqueue_requests / apply_force_idle_requests: входящие события
/// 2. validate_collaborators: missing backend → SequencerHalted
/// 3. enqueue_pending_scripts: authored sequences → CommandQueue
/// 4. tick_timed_state_guard: forced Idle (приоритет над activation)
/// 5. activate_next_command: одна команда за тик
/// 6. run_behavior_states: поведение текущего состояния
/// 7. drain_dialogue_queue: аудио, независимо от FSM
pub struct SequencerPlugin;

impl Plugin for SequencerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EnqueueCommand>()
            .add_event::<ForceIdle>()
            .add_event::<StateChanged>()
            .add_event::<DialogueStarted>();

        app.configure_sets(
            FixedUpdate,
            (SequencerSet::Intake, SequencerSet::Fsm, SequencerSet::Dialogue).chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                systems::apply_enqueue_requests,
                systems::apply_force_idle_requests,
                systems::validate_collaborators,
                systems::enqueue_pending_scripts,
            )
                .chain()
                .in_set(SequencerSet::Intake),
        )
        .add_systems(
            FixedUpdate,
            (
                systems::tick_timed_state_guard,
                systems::activate_next_command,
                systems::run_behavior_states,
            )
                .chain()
                .in_set(SequencerSet::Fsm),
        )
        .add_systems(
            FixedUpdate,
            systems::drain_dialogue_queue.in_set(SequencerSet::Dialogue),
        );
    }
}
