//! Intake systems: внешние запросы, валидация collaborators, authored scripts.

use bevy::prelude::*;

use crate::components::{
    AnimationFlags, CommandQueue, DialogueSource, NpcRig, PointerLine, RigWeights, SequencedNpc,
    SequencerHalted, SequencerState, TimedStateGuard,
};
use crate::error::SequencerError;
use crate::script::PendingScript;
use crate::sequencer::activation::force_idle;
use crate::sequencer::{EnqueueCommand, ForceIdle, StateChanged, TransitionCause};

/// Система: EnqueueCommand → CommandQueue нужного NPC
pub fn apply_enqueue_requests(
    mut requests: EventReader<EnqueueCommand>,
    mut queues: Query<&mut CommandQueue, Without<SequencerHalted>>,
) {
    for request in requests.read() {
        let Ok(mut queue) = queues.get_mut(request.npc) else {
            crate::log_warning(&format!(
                "Sequencer: EnqueueCommand for {:?} ignored (not a running NPC)",
                request.npc
            ));
            continue;
        };

        queue.enqueue(request.command.clone());
        crate::log(&format!(
            "📥 {:?} enqueued {:?} (queue len {})",
            request.npc,
            request.command.target_state(),
            queue.len()
        ));
    }
}

/// Система: ForceIdle: внешнее прерывание, независимо от очереди и guard
pub fn apply_force_idle_requests(
    mut requests: EventReader<ForceIdle>,
    mut npcs: Query<
        (&mut SequencerState, &mut TimedStateGuard, &mut AnimationFlags),
        Without<SequencerHalted>,
    >,
    mut state_changed: EventWriter<StateChanged>,
) {
    for request in requests.read() {
        let Ok((mut state, mut guard, mut pose)) = npcs.get_mut(request.npc) else {
            continue;
        };

        let previous = force_idle(&mut state, &mut guard, &mut pose, &request.flag);
        crate::log_info(&format!(
            "⛔ {:?} ForceIdle (flag {:?}): {:?} → Idle",
            request.npc, request.flag, previous
        ));

        if previous != state.current_state() {
            state_changed.write(StateChanged {
                npc: request.npc,
                from: previous,
                to: state.current_state(),
                cause: TransitionCause::Forced,
            });
        }
    }
}

/// Какой обязательный collaborator отсутствует у NPC
pub fn check_collaborators(
    has_pose: bool,
    has_rig: bool,
    has_audio: bool,
    pointer_ready: bool,
) -> Result<(), SequencerError> {
    if !has_pose {
        return Err(SequencerError::MissingCollaborator("PoseBackend (AnimationFlags)"));
    }
    if !has_rig {
        return Err(SequencerError::MissingCollaborator("PoseBackend (RigWeights)"));
    }
    if !has_audio {
        return Err(SequencerError::MissingCollaborator("AudioBackend (DialogueSource)"));
    }
    if !pointer_ready {
        return Err(SequencerError::MissingCollaborator(
            "PointerVisualBackend (NpcRig → PointerLine)",
        ));
    }
    Ok(())
}

/// Система: проверка collaborators у новых NPC
///
/// Отсутствие обязательного backend'а фатально: NPC получает SequencerHalted
/// и все sequencer системы его пропускают.
pub fn validate_collaborators(
    mut commands: Commands,
    npcs: Query<
        (
            Entity,
            Has<AnimationFlags>,
            Has<RigWeights>,
            Has<DialogueSource>,
            Option<&NpcRig>,
        ),
        Added<SequencedNpc>,
    >,
    pointers: Query<(), With<PointerLine>>,
) {
    for (entity, has_pose, has_rig, has_audio, rig) in npcs.iter() {
        let pointer_ready = rig.is_some_and(|rig| pointers.contains(rig.pointer));

        if let Err(error) = check_collaborators(has_pose, has_rig, has_audio, pointer_ready) {
            crate::log_error(&format!("❌ {:?} sequencer halted: {}", entity, error));
            commands.entity(entity).insert(SequencerHalted {
                reason: error.to_string(),
            });
        }
    }
}

/// Система: PendingScript → resolve имён → CommandQueue
///
/// Resolve атомарный: если хоть одно имя неизвестно, не ставится ничего.
pub fn enqueue_pending_scripts(
    mut commands: Commands,
    mut npcs: Query<(Entity, &PendingScript, &mut CommandQueue), Without<SequencerHalted>>,
    named: Query<(Entity, &Name)>,
) {
    for (entity, pending, mut queue) in npcs.iter_mut() {
        let lookup = |name: &str| {
            named
                .iter()
                .find(|(_, candidate)| candidate.as_str() == name)
                .map(|(found, _)| found)
        };

        match pending.script.resolve(lookup) {
            Ok(resolved) => {
                crate::log_info(&format!(
                    "📜 {:?} loaded script with {} steps",
                    entity,
                    resolved.len()
                ));
                queue.extend(resolved);
            }
            Err(error) => {
                crate::log_error(&format!("❌ {:?} script rejected: {}", entity, error));
            }
        }

        commands.entity(entity).remove::<PendingScript>();
    }
}
