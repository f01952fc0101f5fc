//! FSM systems: timed guard → activation → per-state behavior.

use bevy::prelude::*;

use crate::components::{
    AnimationFlags, BehaviorState, CommandQueue, DialogueQueue, NpcRig, Outline, PointerLine,
    RigWeights, SequencedNpc, SequencerConfig, SequencerHalted, SequencerState, TimedStateGuard,
    Toggleable,
};
use crate::sequencer::activation::{activate_next, can_activate};
use crate::sequencer::states::{step_behavior, NpcBody, ResolvedTargets, VisualUpdate};
use crate::sequencer::{StateChanged, TransitionCause};

/// Система: timed guard (высший приоритет в тике)
///
/// Deadline прошёл → disarm + принудительный Idle, поверх любой логики переходов.
/// Pose флаг Idle здесь НЕ ставится, поэтому активация в этот же тик невозможна.
pub fn tick_timed_state_guard(
    mut npcs: Query<(Entity, &mut SequencerState, &mut TimedStateGuard), Without<SequencerHalted>>,
    mut state_changed: EventWriter<StateChanged>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for (entity, mut state, mut guard) in npcs.iter_mut() {
        if !guard.expire(now) {
            continue;
        }

        let previous = state.current_state;
        state.current_state = BehaviorState::Idle;
        crate::log(&format!("⏱️ {:?} guard expired at {:.3}: {:?} → Idle", entity, now, previous));

        if previous != BehaviorState::Idle {
            state_changed.write(StateChanged {
                npc: entity,
                from: previous,
                to: BehaviorState::Idle,
                cause: TransitionCause::GuardExpired,
            });
        }
    }
}

/// Система: activation protocol (максимум одна команда на NPC за тик)
pub fn activate_next_command(
    mut npcs: Query<
        (
            Entity,
            &mut SequencerState,
            &mut TimedStateGuard,
            &mut AnimationFlags,
            &mut CommandQueue,
            &mut DialogueQueue,
        ),
        Without<SequencerHalted>,
    >,
    scene: Query<&Transform, Without<SequencedNpc>>,
    mut toggles: Query<&mut Toggleable>,
    mut state_changed: EventWriter<StateChanged>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();
    let position_of = |entity: Entity| scene.get(entity).ok().map(|t| t.translation);

    for (entity, mut state, mut guard, mut pose, mut queue, mut dialogue) in npcs.iter_mut() {
        if !can_activate(&state, &guard, &pose, &queue) {
            continue;
        }

        let activation = match activate_next(
            &mut queue,
            &mut state,
            &mut guard,
            &mut pose,
            &mut dialogue,
            now,
            position_of,
        ) {
            Ok(activation) => activation,
            Err(error) => {
                crate::log_error(&format!("❌ {:?} activation failed: {}", entity, error));
                continue;
            }
        };

        for object in &activation.toggles {
            match toggles.get_mut(*object) {
                Ok(mut toggle) => toggle.toggle(),
                Err(_) => crate::log_warning(&format!(
                    "Sequencer: toggle object {:?} has no Toggleable, skipped",
                    object
                )),
            }
        }

        crate::log_info(&format!(
            "▶️ {:?} activated {:?} (duration {:.2}, {} left in queue)",
            entity,
            activation.to,
            activation.duration,
            queue.len()
        ));

        state_changed.write(StateChanged {
            npc: entity,
            from: activation.from,
            to: activation.to,
            cause: TransitionCause::Activation,
        });
    }
}

/// Система: поведение текущего состояния (поворот, движение, pose, rig, визуалы)
pub fn run_behavior_states(
    mut npcs: Query<
        (
            Entity,
            &mut SequencerState,
            &mut TimedStateGuard,
            &mut Transform,
            &mut AnimationFlags,
            &mut RigWeights,
            &NpcRig,
            &SequencerConfig,
        ),
        (With<SequencedNpc>, Without<SequencerHalted>),
    >,
    scene: Query<&Transform, Without<SequencedNpc>>,
    mut outlines: Query<&mut Outline>,
    mut pointers: Query<&mut PointerLine>,
    mut state_changed: EventWriter<StateChanged>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let position_of = |entity: Option<Entity>| {
        entity.and_then(|e| scene.get(e).ok()).map(|t| t.translation)
    };

    for (entity, mut state, mut guard, mut transform, mut pose, mut rig, npc_rig, config) in
        npcs.iter_mut()
    {
        let targets = ResolvedTargets {
            look: position_of(state.look_target),
            gesture: position_of(state.gesture_target),
            active: position_of(state.active_target),
            hand_offset: npc_rig.hand_offset,
        };

        let previous = state.current_state;
        let mut body = NpcBody {
            transform: &mut transform,
            pose: &mut pose,
            rig: &mut rig,
        };
        let outcome = step_behavior(&mut state, &mut body, &targets, config, delta);

        if let Some(next) = outcome.transition {
            // Walk завершён раньше deadline: guard больше ничего не держит
            guard.disarm();
            crate::log(&format!("🏁 {:?} arrived: {:?} → {:?}", entity, previous, next));
            state_changed.write(StateChanged {
                npc: entity,
                from: previous,
                to: next,
                cause: TransitionCause::Arrived,
            });
        }

        match outcome.visuals {
            VisualUpdate::Unchanged => {}
            VisualUpdate::Show {
                target,
                origin,
                destination,
            } => {
                if let Ok(mut outline) = outlines.get_mut(target) {
                    outline.enabled = true;
                }
                if let Ok(mut pointer) = pointers.get_mut(npc_rig.pointer) {
                    pointer.enabled = true;
                    pointer.set_endpoints(origin, destination);
                }
            }
            VisualUpdate::Clear { target } => {
                if let Ok(mut outline) = outlines.get_mut(target) {
                    outline.enabled = false;
                }
                if let Ok(mut pointer) = pointers.get_mut(npc_rig.pointer) {
                    pointer.enabled = false;
                }
                crate::log(&format!("{:?} cleared highlight on {:?}", entity, target));
            }
        }
    }
}
