//! Checkpoint and resume of a machine's position.
//!
//! A checkpoint captures the current state and the transition history. The
//! graph itself holds closures and is never serialized: a checkpoint is
//! restored onto a machine rebuilt with the same registrations.

use crate::core::{StateHistory, StateId};
use crate::engine::Fsm;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a machine's position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint<S> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Current state, `None` if the machine was never initialized
    pub current_state: Option<S>,

    /// Committed transitions
    pub history: StateHistory<S>,
}

impl<S> Checkpoint<S>
where
    S: Serialize + DeserializeOwned,
{
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }
}

impl<S> Checkpoint<S> {
    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }
}

impl<S: StateId> Fsm<S> {
    /// Snapshot the current state and history.
    pub fn checkpoint(&self) -> Checkpoint<S> {
        Checkpoint {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            current_state: self.state().cloned(),
            history: self.history().clone(),
        }
    }

    /// Resume from a checkpoint taken on a machine with the same graph.
    ///
    /// Position and history are replaced wholesale, so a checkpoint taken
    /// before any state was set leaves the machine unset. Fails without
    /// changing anything if the version is unsupported or the checkpointed
    /// state does not appear in this machine's graph.
    pub fn restore(&mut self, checkpoint: Checkpoint<S>) -> Result<(), CheckpointError> {
        checkpoint.check_version()?;

        if let Some(state) = &checkpoint.current_state {
            if self.edge_count(state).is_none() {
                return Err(CheckpointError::ValidationFailed(format!(
                    "state {state:?} is not part of the transition graph"
                )));
            }
        }

        debug!(id = %checkpoint.id, state = ?checkpoint.current_state, "restoring checkpoint");
        self.resume(checkpoint.current_state, checkpoint.history);
        Ok(())
    }
}
