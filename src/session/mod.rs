// src/session/mod.rs

pub mod stream;

pub use stream::{ChannelSource, StreamError, StreamMessage, StreamSource};

use std::sync::Arc;

use log::{debug, error, info};
use thiserror::Error;

use crate::document::{snapshot, Document};
use crate::generator::{DungeonGenerator, GenerationParameters, GenerationReport, ParameterError};
use crate::map::GridError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    InvalidParameters(#[from] ParameterError),
    #[error("a generation request is already in flight")]
    AlreadyRequested,
    #[error("no generation request is pending")]
    NotRequested,
    #[error("session is not consuming a stream")]
    NotStreaming,
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Requested,
    Streaming,
    Completed,
    Failed,
}

/// Drives one generation request against the shared document.
///
/// A session starts `Idle`, accepts exactly one request, and then either
/// runs the synchronous pipeline to `Completed` or consumes an attached
/// stream one message at a time: `Requested` becomes `Streaming` on the
/// first grid update, `Completed` on the producer's done marker, `Failed`
/// on any transport or decode fault. Both terminal states keep the last
/// good grid in the document, and a failed or abandoned session releases
/// its stream source exactly once. A new request needs a new session.
pub struct GenerationSession {
    document: Arc<Document>,
    state: SessionState,
    params: Option<GenerationParameters>,
    source: Option<Box<dyn StreamSource>>,
    last_error: Option<String>,
}

impl GenerationSession {
    pub fn new(document: Arc<Document>) -> Self {
        Self {
            document,
            state: SessionState::Idle,
            params: None,
            source: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn document(&self) -> Arc<Document> {
        Arc::clone(&self.document)
    }

    /// Rendered form of the stream fault that moved the session to `Failed`.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Accepts a generation request. Parameters are validated before any
    /// state changes; an invalid request leaves the session `Idle`.
    pub fn request(&mut self, params: GenerationParameters) -> Result<(), SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::AlreadyRequested);
        }
        params.validate()?;
        info!(
            "generation requested: {}x{}, {} rooms",
            params.rows, params.cols, params.room_count
        );
        self.params = Some(params);
        self.state = SessionState::Requested;
        Ok(())
    }

    /// Runs the synchronous pipeline for the pending request and installs
    /// the result in the document.
    pub fn generate_blocking(&mut self) -> Result<GenerationReport, SessionError> {
        if self.state != SessionState::Requested {
            return Err(SessionError::NotRequested);
        }
        let params = self.params.clone().ok_or(SessionError::NotRequested)?;
        let generator = DungeonGenerator::new(params)?;
        let (grid, report) = generator.generate()?;
        self.document.replace_grid(grid);
        self.document.set_ai_info(None);
        self.state = SessionState::Completed;
        Ok(report)
    }

    /// Attaches the stream source that will feed the pending request.
    pub fn attach_stream(&mut self, source: Box<dyn StreamSource>) -> Result<(), SessionError> {
        if self.state != SessionState::Requested {
            return Err(SessionError::NotRequested);
        }
        if self.source.is_some() {
            return Err(SessionError::AlreadyRequested);
        }
        self.source = Some(source);
        Ok(())
    }

    /// Pulls and applies the next stream message. Each grid update is one
    /// atomic document swap; messages are processed strictly in arrival
    /// order, one per call.
    pub fn pump(&mut self) -> Result<SessionState, SessionError> {
        if !matches!(self.state, SessionState::Requested | SessionState::Streaming) {
            return Err(SessionError::NotStreaming);
        }
        let Some(source) = self.source.as_mut() else {
            return Err(SessionError::NotStreaming);
        };
        match source.next_message() {
            Ok(StreamMessage::Update { dungeon, ai_info }) => {
                match snapshot::decode(&dungeon) {
                    Ok(grid) => {
                        self.document.replace_grid(grid);
                        self.document.set_ai_info(ai_info);
                        self.state = SessionState::Streaming;
                        debug!("applied streamed grid update");
                        Ok(self.state)
                    }
                    Err(err) => self.fail(StreamError::InvalidGrid(err)),
                }
            }
            Ok(StreamMessage::Done { .. }) => {
                self.release();
                self.state = SessionState::Completed;
                info!("generation stream completed");
                Ok(self.state)
            }
            Err(err) => self.fail(err),
        }
    }

    /// Pumps until the session leaves the streaming states.
    pub fn drain(&mut self) -> Result<SessionState, SessionError> {
        while matches!(self.state, SessionState::Requested | SessionState::Streaming) {
            self.pump()?;
        }
        Ok(self.state)
    }

    /// Releases the stream source, if any. Safe to call more than once; the
    /// document keeps whatever grid it last received.
    pub fn close(&mut self) {
        self.release();
    }

    fn fail(&mut self, err: StreamError) -> Result<SessionState, SessionError> {
        self.release();
        self.state = SessionState::Failed;
        self.last_error = Some(err.to_string());
        error!("generation stream failed: {err}");
        Err(SessionError::Stream(err))
    }

    fn release(&mut self) {
        if self.source.take().is_some() {
            debug!("generator stream source released");
        }
    }
}

impl Drop for GenerationSession {
    fn drop(&mut self) {
        self.close();
    }
}
