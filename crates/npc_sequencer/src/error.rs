//! Ошибки sequencer'а

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SequencerError {
    /// Dequeue из пустой очереди: баг вызывающего (eligibility check должен это предотвращать)
    #[error("dequeue attempted on an empty queue")]
    EmptyQueue,
    /// Обязательный backend не подключен к NPC: sequencer этого NPC останавливается
    #[error("required collaborator is missing: {0}")]
    MissingCollaborator(&'static str),
    /// Script ссылается на объект сцены, которого нет
    #[error("unknown scene object in script: {0:?}")]
    UnknownTarget(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Script(#[from] ron::error::SpannedError),
}
