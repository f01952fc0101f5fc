//! Authored sequences (RON)
//!
//! Статическая последовательность команд, в которой объекты сцены названы
//! по `Name`. При старте NPC имена резолвятся в Entity и вся последовательность
//! ставится в CommandQueue.
//!
//! Формат:
//! ```ron
//! (steps: [
//!     (state: Walk, move_to: Some("door")),
//!     (state: Wave, look_at: Some("visitor"), duration: 2.0,
//!      dialogue: Some((name: "hello", duration: 1.5))),
//! ])
//! ```

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{BehaviorState, DialogueClip, NpcCommand};
use crate::error::SequencerError;

/// Один шаг authored sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub state: BehaviorState,
    #[serde(default)]
    pub move_to: Option<String>,
    #[serde(default)]
    pub gesture_at: Option<String>,
    #[serde(default)]
    pub look_at: Option<String>,
    #[serde(default)]
    pub dialogue: Option<DialogueClip>,
    #[serde(default)]
    pub toggle: Vec<String>,
    #[serde(default)]
    pub duration: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceScript {
    pub steps: Vec<ScriptStep>,
}

impl SequenceScript {
    pub fn from_ron(source: &str) -> Result<Self, SequencerError> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SequencerError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron(&source)
    }

    /// Резолвит имена в Entity; первое неизвестное имя → UnknownTarget
    pub fn resolve(
        &self,
        lookup: impl Fn(&str) -> Option<Entity>,
    ) -> Result<Vec<NpcCommand>, SequencerError> {
        let find = |name: &str| {
            lookup(name).ok_or_else(|| SequencerError::UnknownTarget(name.to_string()))
        };

        self.steps
            .iter()
            .map(|step| -> Result<NpcCommand, SequencerError> {
                let mut command = NpcCommand::new(step.state).with_duration(step.duration);

                if let Some(name) = &step.move_to {
                    command = command.move_to(find(name.as_str())?);
                }
                if let Some(name) = &step.gesture_at {
                    command = command.gesture_at(find(name.as_str())?);
                }
                if let Some(name) = &step.look_at {
                    command = command.look_at(find(name.as_str())?);
                }
                if let Some(clip) = &step.dialogue {
                    command = command.with_dialogue(clip.clone());
                }
                for name in &step.toggle {
                    command = command.toggle(find(name.as_str())?);
                }

                Ok(command)
            })
            .collect()
    }
}

/// Component: script, ожидающий загрузки в CommandQueue NPC
///
/// Обрабатывается `enqueue_pending_scripts` и удаляется после этого.
#[derive(Component, Debug, Clone)]
pub struct PendingScript {
    pub script: SequenceScript,
}

impl PendingScript {
    pub fn new(script: SequenceScript) -> Self {
        Self { script }
    }
}
