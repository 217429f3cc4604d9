//! Owner-scoped namespaces inside a session

use super::{Session, request_seq};
use crate::error::Result;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

#[derive(Debug, Serialize, Deserialize)]
struct FlashEntry {
    value: String,
    /// Request number at the time of writing
    set_in: u64,
}

impl FlashEntry {
    /// Readable during the request that wrote it and the next one
    fn is_live(&self, current_seq: u64) -> bool {
        self.set_in.saturating_add(1) >= current_seq
    }
}

/// Isolated key/value namespace of a [`Session`]
///
/// Every key is stored in the session under a name derived from the owner,
/// so segments of different owners never collide. Operations fail with
/// `Error::SessionUnavailable` when the session record cannot be loaded or
/// (de)serialized.
#[derive(Clone, Debug)]
pub struct Segment {
    session: Session,
    owner: String,
}

impl Segment {
    /// Segment of `session` owned by `owner`
    pub fn new(session: Session, owner: impl Into<String>) -> Self {
        Self {
            session,
            owner: owner.into(),
        }
    }

    /// Name of the owner this segment belongs to
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The session this segment lives in
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Read a persistent value
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        Ok(self.session.get(&self.slot("value", key)).await?)
    }

    /// Write a persistent value
    pub async fn set(&self, key: &str, value: impl Serialize) -> Result<()> {
        Ok(self.session.insert(&self.slot("value", key), value).await?)
    }

    /// Remove a persistent value, returning it
    pub async fn remove<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        Ok(self.session.remove(&self.slot("value", key)).await?)
    }

    /// Store a single-use value under `key`, replacing any previous one
    pub async fn put_flash(&self, key: &str, value: impl Into<String>) -> Result<()> {
        let entry = FlashEntry {
            value: value.into(),
            set_in: request_seq(&self.session).await?,
        };
        Ok(self.session.insert(&self.slot("flash", key), entry).await?)
    }

    /// Read and clear the flash value under `key`
    ///
    /// Returns `None` if nothing was flashed, if it was already taken, or if
    /// it is older than one round trip.
    pub async fn take_flash(&self, key: &str) -> Result<Option<String>> {
        let seq = request_seq(&self.session).await?;
        let entry: Option<FlashEntry> = self.session.remove(&self.slot("flash", key)).await?;
        Ok(entry
            .filter(|entry| entry.is_live(seq))
            .map(|entry| entry.value))
    }

    fn slot(&self, kind: &str, key: &str) -> String {
        // The owner's length keeps names unambiguous whatever owner and key contain
        format!("{kind}:{}:{}:{key}", self.owner.len(), self.owner)
    }
}
