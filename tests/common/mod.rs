//! Shared helpers for integration tests

#![allow(dead_code)]

use sachat::cache::ChatCache;
use sachat::coordinator::Coordinator;
use sachat::gateway::ChatGateway;
use sachat::session::{Session, SessionStore};
use serde_json::{json, Value};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::MockServer;

/// Builds a gateway-shaped chat JSON body
pub fn chat_json(id: &str, title: &str, messages: &[(&str, &str)]) -> Value {
    json!({
        "_id": id,
        "title": title,
        "messages": messages
            .iter()
            .map(|(role, content)| json!({"role": role, "content": content}))
            .collect::<Vec<_>>(),
    })
}

/// Session store rooted in a test directory
pub fn session_store(dir: &TempDir) -> SessionStore {
    SessionStore::new_with_path(dir.path().join("session.json")).unwrap()
}

/// Coordinator with a saved session, pointed at the mock server
pub fn coordinator_for(server: &MockServer, dir: &TempDir) -> Coordinator {
    coordinator_with_staleness(server, dir, Duration::from_secs(300))
}

/// Same as [`coordinator_for`] but with an explicit staleness window
pub fn coordinator_with_staleness(
    server: &MockServer,
    dir: &TempDir,
    staleness: Duration,
) -> Coordinator {
    let sessions = session_store(dir);
    sessions.save(&Session::new("u1", "Test User", "tok")).unwrap();
    let gateway = ChatGateway::new(server.uri(), "tok").unwrap();
    let cache = ChatCache::with_thresholds(staleness, Duration::from_secs(600));
    Coordinator::with_cache(gateway, sessions, cache)
}
