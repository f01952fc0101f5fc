//! Activation protocol: dequeue одной команды и применение её к SequencerState.

use bevy::prelude::*;

use crate::components::{
    AnimationFlags, BehaviorState, CommandQueue, DialogueQueue, SequencerState, TimedStateGuard,
};
use crate::error::SequencerError;

/// Результат активации (toggles применяет система: у неё доступ к объектам сцены)
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    pub from: BehaviorState,
    pub to: BehaviorState,
    pub toggles: Vec<Entity>,
    pub duration: f32,
}

/// Можно ли активировать следующую команду в этот тик
///
/// Условия: FSM в Idle, pose backend подтвердил resting pose (флаг Idle),
/// timed guard не взведён, очередь не пуста.
pub fn can_activate(
    state: &SequencerState,
    guard: &TimedStateGuard,
    pose: &AnimationFlags,
    queue: &CommandQueue,
) -> bool {
    state.current_state == BehaviorState::Idle
        && pose.flag(BehaviorState::Idle.flag_name())
        && !guard.is_armed()
        && !queue.is_empty()
}

/// Достаёт голову очереди и применяет её
///
/// `position_of` резолвит move_location в позицию на момент активации.
/// Отсутствующие поля команды не меняют текущие targets.
pub fn activate_next(
    queue: &mut CommandQueue,
    state: &mut SequencerState,
    guard: &mut TimedStateGuard,
    pose: &mut AnimationFlags,
    dialogue: &mut DialogueQueue,
    now: f32,
    position_of: impl Fn(Entity) -> Option<Vec3>,
) -> Result<Activation, SequencerError> {
    let command = queue.dequeue()?;

    pose.set_flag(BehaviorState::Idle.flag_name(), false);

    let from = state.current_state;
    state.current_state = command.target_state();

    if let Some(location) = command.move_location() {
        match position_of(location) {
            Some(position) => state.move_destination = Some(position),
            None => crate::log_warning(&format!(
                "Sequencer: move location {:?} has no Transform, keeping previous destination",
                location
            )),
        }
    }

    if let Some(gesture) = command.gesture_location() {
        state.gesture_target = Some(gesture);
        state.active_target = Some(gesture);
    }

    if let Some(look) = command.look_location() {
        state.look_target = Some(look);
    }

    let duration = command.duration();
    if duration > 0.0 {
        guard.arm(now, duration);
    }

    let activation = Activation {
        from,
        to: command.target_state(),
        toggles: command.toggle_objects().to_vec(),
        duration,
    };

    if let Some(clip) = command.into_dialogue() {
        dialogue.enqueue(clip);
    }

    Ok(activation)
}

/// Внешнее прерывание: сброс pose флага и принудительный Idle
///
/// Guard тоже сбрасывается: armed допустим только в удерживаемом состоянии.
/// Возвращает предыдущее состояние.
pub fn force_idle(
    state: &mut SequencerState,
    guard: &mut TimedStateGuard,
    pose: &mut AnimationFlags,
    flag: &str,
) -> BehaviorState {
    pose.set_flag(flag, false);
    guard.disarm();

    let previous = state.current_state;
    state.current_state = BehaviorState::Idle;
    previous
}
