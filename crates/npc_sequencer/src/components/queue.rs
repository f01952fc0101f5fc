//! NpcCommand queue и dialogue queue (FIFO буферы NPC)

use std::collections::VecDeque;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::BehaviorState;
use crate::error::SequencerError;

/// Аудио клип диалога (opaque для sequencer'а, важна только длительность)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueClip {
    pub name: String,
    /// Длительность (секунды)
    pub duration: f32,
}

impl DialogueClip {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration: duration.max(0.0),
        }
    }
}

/// Одна авторская команда (intent) для NPC
///
/// Immutable после enqueue: поля приватные, builder методы потребляют self.
#[derive(Debug, Clone, PartialEq)]
pub struct NpcCommand {
    target_state: BehaviorState,
    move_location: Option<Entity>,
    gesture_location: Option<Entity>,
    look_location: Option<Entity>,
    dialogue_clip: Option<DialogueClip>,
    toggle_objects: Vec<Entity>,
    duration: f32,
}

impl NpcCommand {
    pub fn new(target_state: BehaviorState) -> Self {
        Self {
            target_state,
            move_location: None,
            gesture_location: None,
            look_location: None,
            dialogue_clip: None,
            toggle_objects: Vec::new(),
            duration: 0.0,
        }
    }

    pub fn move_to(mut self, location: Entity) -> Self {
        self.move_location = Some(location);
        self
    }

    pub fn gesture_at(mut self, location: Entity) -> Self {
        self.gesture_location = Some(location);
        self
    }

    pub fn look_at(mut self, location: Entity) -> Self {
        self.look_location = Some(location);
        self
    }

    pub fn with_dialogue(mut self, clip: DialogueClip) -> Self {
        self.dialogue_clip = Some(clip);
        self
    }

    pub fn toggle(mut self, object: Entity) -> Self {
        self.toggle_objects.push(object);
        self
    }

    /// 0 = держать состояние до следующей команды; отрицательные значения → 0
    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.duration = seconds.max(0.0);
        self
    }

    pub fn target_state(&self) -> BehaviorState {
        self.target_state
    }

    pub fn move_location(&self) -> Option<Entity> {
        self.move_location
    }

    pub fn gesture_location(&self) -> Option<Entity> {
        self.gesture_location
    }

    pub fn look_location(&self) -> Option<Entity> {
        self.look_location
    }

    pub fn dialogue_clip(&self) -> Option<&DialogueClip> {
        self.dialogue_clip.as_ref()
    }

    pub fn toggle_objects(&self) -> &[Entity] {
        &self.toggle_objects
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Разбирает команду на части при активации (команда после этого не существует)
    pub(crate) fn into_dialogue(self) -> Option<DialogueClip> {
        self.dialogue_clip
    }
}

/// FIFO очередь команд NPC (single consumer per tick)
#[derive(Component, Debug, Clone, Default)]
pub struct CommandQueue {
    commands: VecDeque<NpcCommand>,
}

impl CommandQueue {
    pub fn enqueue(&mut self, command: NpcCommand) {
        self.commands.push_back(command);
    }

    pub fn extend(&mut self, commands: impl IntoIterator<Item = NpcCommand>) {
        self.commands.extend(commands);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn dequeue(&mut self) -> Result<NpcCommand, SequencerError> {
        self.commands.pop_front().ok_or(SequencerError::EmptyQueue)
    }
}

/// FIFO очередь диалогов (дренируется независимо от command queue)
#[derive(Component, Debug, Clone, Default)]
pub struct DialogueQueue {
    clips: VecDeque<DialogueClip>,
}

impl DialogueQueue {
    pub fn enqueue(&mut self, clip: DialogueClip) {
        self.clips.push_back(clip);
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn dequeue(&mut self) -> Result<DialogueClip, SequencerError> {
        self.clips.pop_front().ok_or(SequencerError::EmptyQueue)
    }
}
