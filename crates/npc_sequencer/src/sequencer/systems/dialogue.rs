//! Dialogue system: DialogueQueue → DialogueSource (независимо от FSM).

use bevy::prelude::*;

use crate::components::{DialogueQueue, DialogueSource, SequencerHalted};
use crate::sequencer::dialogue::{drain_step, DrainOutcome};
use crate::sequencer::DialogueStarted;

/// Система: дренаж очереди диалогов
///
/// Пока audio source играет, очередь не трогаем; re-check каждый тик.
pub fn drain_dialogue_queue(
    mut npcs: Query<(Entity, &mut DialogueQueue, &mut DialogueSource), Without<SequencerHalted>>,
    mut dialogue_started: EventWriter<DialogueStarted>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for (entity, mut queue, mut source) in npcs.iter_mut() {
        // Пустая очередь: ничего не мутируем (Changed<DialogueSource> не должен спамить)
        if queue.is_empty() {
            continue;
        }

        match drain_step(&mut queue, &mut source, now) {
            Ok(DrainOutcome::Started(clip)) => {
                crate::log_info(&format!(
                    "🔊 {:?} dialogue {:?} ({:.2}s), {} queued",
                    entity,
                    clip.name,
                    clip.duration,
                    queue.len()
                ));
                dialogue_started.write(DialogueStarted { npc: entity, clip });
            }
            Ok(DrainOutcome::Waiting { .. }) | Ok(DrainOutcome::Empty) => {}
            Err(error) => {
                crate::log_error(&format!("❌ {:?} dialogue drain failed: {}", entity, error));
            }
        }
    }
}
