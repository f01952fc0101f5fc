//! Dialogue drain: один клип за раз, следующий только после окончания текущего.

use crate::components::{DialogueClip, DialogueQueue, DialogueSource};
use crate::error::SequencerError;

#[derive(Debug, Clone, PartialEq)]
pub enum DrainOutcome {
    /// Очередь пуста, ничего не играет
    Empty,
    /// Клип ещё играет: ждём (без dequeue) до конца его reported duration
    Waiting { until: f32 },
    /// Новый клип отдан audio backend'у
    Started(DialogueClip),
}

/// Один тик дренажа очереди диалогов
pub fn drain_step(
    queue: &mut DialogueQueue,
    source: &mut DialogueSource,
    now: f32,
) -> Result<DrainOutcome, SequencerError> {
    if source.is_playing() {
        return Ok(DrainOutcome::Waiting {
            until: source.playback_end(),
        });
    }

    if queue.is_empty() {
        return Ok(DrainOutcome::Empty);
    }

    let clip = queue.dequeue()?;
    source.play(clip.clone(), now);
    Ok(DrainOutcome::Started(clip))
}
