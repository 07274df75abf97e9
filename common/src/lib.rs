use serde::{Deserialize, Serialize};

/// A single short text record. The id is assigned by the server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Whisper {
    pub id: u64,
    pub message: String,
}

impl Whisper {
    pub fn new(id: u64, message: impl Into<String>) -> Self {
        Self {
            id,
            message: message.into(),
        }
    }
}

/// Body of `POST /whisper`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewWhisper {
    pub message: String,
}

/// Body of `PATCH /whisper/:id`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateWhisper {
    pub message: String,
}
