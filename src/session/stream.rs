// src/session/stream.rs

use std::sync::mpsc::{Receiver, TryRecvError};

use serde::Deserialize;
use thiserror::Error;

use crate::document::{AiInfo, SnapshotError};

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("generator channel disconnected before completion")]
    Disconnected,
    #[error("malformed stream message: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("stream update carried an invalid grid: {0}")]
    InvalidGrid(#[from] SnapshotError),
    #[error("transport failure: {0}")]
    Transport(String),
}

/// One inbound message from the external generator: either a full grid
/// replacement with optional metadata, or the terminal completion marker.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StreamMessage {
    Done {
        done: bool,
    },
    Update {
        dungeon: Vec<Vec<char>>,
        #[serde(default)]
        ai_info: Option<AiInfo>,
    },
}

/// Ordered pull of decoded generator messages. One message per call, in
/// arrival order; the transport behind the source is not this crate's
/// concern.
pub trait StreamSource: Send {
    fn next_message(&mut self) -> Result<StreamMessage, StreamError>;
}

/// Adapts an in-process channel of raw JSON payloads, such as the receiving
/// end of a websocket reader thread.
pub struct ChannelSource {
    receiver: Receiver<String>,
}

impl ChannelSource {
    pub fn new(receiver: Receiver<String>) -> Self {
        Self { receiver }
    }

    /// Non-blocking variant of `next_message`, for callers that poll from a
    /// frame loop. `None` means no message has arrived yet.
    pub fn try_next_message(&mut self) -> Result<Option<StreamMessage>, StreamError> {
        match self.receiver.try_recv() {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(StreamError::Disconnected),
        }
    }
}

impl StreamSource for ChannelSource {
    fn next_message(&mut self) -> Result<StreamMessage, StreamError> {
        let raw = self
            .receiver
            .recv()
            .map_err(|_| StreamError::Disconnected)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::sync::mpsc;

    #[test]
    fn test_update_message_decodes_grid_and_metadata() {
        let raw = r#"{
            "dungeon": [["R", " "], [" ", "B"]],
            "ai_info": {
                "entropy_estimate": 0.4321,
                "input_noise_sample": [0.1, -0.5],
                "model": "dungeon-gan-v2"
            }
        }"#;
        match serde_json::from_str::<StreamMessage>(raw).unwrap() {
            StreamMessage::Update { dungeon, ai_info } => {
                assert_eq!(dungeon.len(), 2);
                assert_eq!(dungeon[0], vec!['R', ' ']);
                let info = ai_info.unwrap();
                assert_approx_eq!(info.entropy_estimate.unwrap(), 0.4321);
                assert_eq!(info.input_noise_sample.unwrap(), vec![0.1, -0.5]);
                assert_eq!(info.model.as_deref(), Some("dungeon-gan-v2"));
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn test_update_without_metadata_decodes() {
        let raw = r#"{"dungeon": [[" "]]}"#;
        assert!(matches!(
            serde_json::from_str::<StreamMessage>(raw).unwrap(),
            StreamMessage::Update { ai_info: None, .. }
        ));
    }

    #[test]
    fn test_done_marker_decodes() {
        assert!(matches!(
            serde_json::from_str::<StreamMessage>(r#"{"done": true}"#).unwrap(),
            StreamMessage::Done { done: true }
        ));
    }

    #[test]
    fn test_channel_source_reports_disconnect() {
        let (sender, receiver) = mpsc::channel::<String>();
        let mut source = ChannelSource::new(receiver);
        drop(sender);
        assert!(matches!(
            source.next_message(),
            Err(StreamError::Disconnected)
        ));
    }

    #[test]
    fn test_try_next_message_polls_without_blocking() {
        let (sender, receiver) = mpsc::channel();
        let mut source = ChannelSource::new(receiver);
        assert!(source.try_next_message().unwrap().is_none());
        sender.send(r#"{"done": true}"#.to_owned()).unwrap();
        assert!(matches!(
            source.try_next_message().unwrap(),
            Some(StreamMessage::Done { .. })
        ));
    }

    #[test]
    fn test_channel_source_rejects_garbage() {
        let (sender, receiver) = mpsc::channel();
        let mut source = ChannelSource::new(receiver);
        sender.send("not json".to_owned()).unwrap();
        assert!(matches!(source.next_message(), Err(StreamError::Decode(_))));
    }
}
