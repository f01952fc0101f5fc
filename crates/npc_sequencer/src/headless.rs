//! Headless audio backend
//!
//! Engine layer сам сообщает, когда клип доиграл. Без движка (тесты, headless
//! binary) клип считается играющим ровно его reported duration.

use bevy::prelude::*;

use crate::components::DialogueSource;
use crate::sequencer::SequencerSet;

/// Система: останавливает клипы, чья длительность истекла
pub fn finish_elapsed_clips(
    mut sources: Query<(Entity, &mut DialogueSource)>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for (entity, mut source) in sources.iter_mut() {
        if source.is_playing() && now >= source.playback_end() {
            source.stop();
            crate::log(&format!("🔇 {:?} clip finished at {:.3}", entity, now));
        }
    }
}

pub struct HeadlessAudioPlugin;

impl Plugin for HeadlessAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            finish_elapsed_clips
                .after(SequencerSet::Fsm)
                .before(SequencerSet::Dialogue),
        );
    }
}
