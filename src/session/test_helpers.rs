//! Session fixtures for unit tests

use super::{MemorySessionStore, Session, begin_request};
use async_trait::async_trait;
use std::sync::Arc;
use tower_sessions_core::{
    session::{Id, Record},
    session_store::{self, SessionStore},
};

/// Session detached from any cookie, backed by an empty memory store
pub(crate) fn test_session() -> Session {
    Session::new(None, Arc::new(MemorySessionStore::new()), None)
}

/// [`test_session`] with its first request already begun
pub(crate) async fn started_session() -> Session {
    let session = test_session();
    begin_request(&session)
        .await
        .expect("fresh session starts its first request");
    session
}

/// Store whose backend is down
#[derive(Debug, Clone, Copy)]
pub(crate) struct UnreachableStore;

#[async_trait]
impl SessionStore for UnreachableStore {
    async fn save(&self, _record: &Record) -> session_store::Result<()> {
        Err(unreachable_backend())
    }

    async fn load(&self, _id: &Id) -> session_store::Result<Option<Record>> {
        Err(unreachable_backend())
    }

    async fn delete(&self, _id: &Id) -> session_store::Result<()> {
        Err(unreachable_backend())
    }
}

fn unreachable_backend() -> session_store::Error {
    session_store::Error::Backend("store unreachable".to_string())
}

/// Session whose record can never be loaded
pub(crate) fn unreachable_session() -> Session {
    Session::new(Some(Id::default()), Arc::new(UnreachableStore), None)
}
