//! Server-side sessions
//!
//! Sessions are handled by `tower-sessions`: [`session_layer`] reads and
//! issues the session cookie and hands every request its [`Session`], whose
//! record lives in a [`MemorySessionStore`]. On top of that a session is
//! divided into [`Segment`]s: isolated key/value namespaces named after their
//! owner, so that two features storing the same key never see each other's
//! values.
//!
//! ## Flash values
//!
//! Segments also hold flash values: single-use cells that survive exactly one
//! round trip. [`count_request`] numbers the requests of each session. A flash
//! value written while handling request N can be taken once, during request N
//! or N+1. Taking it clears it; once request N+2 has begun it is never
//! returned again.
//!
//! ## Concurrency
//!
//! [`Segment::take_flash`] is a single [`Session::remove`], which holds the
//! session record lock while reading and clearing: two tasks sharing a
//! session handle can never both consume the same flash value.

mod layer;
mod segment;
mod store;
// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

pub use layer::{count_request, session_layer, spawn_expired_deletion};
pub use segment::Segment;
pub use store::MemorySessionStore;
pub use tower_sessions::Session;

use crate::error::Result;

/// Session key of the request counter
const REQUEST_SEQ_KEY: &str = "request_seq";

/// Number of the request currently handled for `session`
pub(crate) async fn request_seq(session: &Session) -> Result<u64> {
    Ok(session.get::<u64>(REQUEST_SEQ_KEY).await?.unwrap_or(0))
}

/// Mark the start of a request for `session`, returning its number
pub(crate) async fn begin_request(session: &Session) -> Result<u64> {
    let seq = request_seq(session).await?.saturating_add(1);
    session.insert(REQUEST_SEQ_KEY, seq).await?;
    Ok(seq)
}
