//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};

use otpvault::adapters::mock::{
    InMemoryUnlockStore, MockCommandInvoker, MockPlatformSecret, MockResult,
};
use otpvault::Vault;

/// Opt-in log output for debugging a failing test:
/// `RUST_LOG=otpvault=debug cargo test -- --nocapture`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct VaultFixture {
    pub invoker: MockCommandInvoker,
    pub secret: Arc<MockPlatformSecret>,
    pub store: Arc<InMemoryUnlockStore>,
    pub vault: Vault,
}

pub fn vault_fixture() -> VaultFixture {
    init_tracing();
    let invoker = MockCommandInvoker::new();
    let secret = Arc::new(MockPlatformSecret::new());
    let store = Arc::new(InMemoryUnlockStore::new());
    let vault = Vault::new(
        Arc::new(invoker.clone()),
        secret.clone(),
        store.clone(),
    );
    VaultFixture {
        invoker,
        secret,
        store,
        vault,
    }
}

/// A fixture already unlocked with the given service ids.
pub async fn unlocked_fixture(ids: &[&str]) -> VaultFixture {
    let mut fx = vault_fixture();
    fx.invoker
        .enqueue("setup_storage_keys", MockResult::Success(map_json(ids)));
    // Refresh cycles started by mutations always find tokens.
    fx.invoker
        .set_default("get_services_tokens", tokens_json(ids, 30));
    fx.vault.unlock_with_password("hunter2").await.unwrap();
    fx
}

pub fn service_json(id: &str) -> Value {
    json!({
        "id": id,
        "issuer": "Example",
        "name": format!("{}@example.com", id),
        "secret": "JBSWY3DPEHPK3PXP",
        "algorithm": "SHA1",
        "digits": 6,
        "period": 30
    })
}

pub fn map_json(ids: &[&str]) -> Value {
    let mut obj = serde_json::Map::new();
    for id in ids {
        obj.insert(id.to_string(), service_json(id));
    }
    Value::Object(obj)
}

pub fn tokens_json(ids: &[&str], expires_in: i64) -> MockResult {
    let mut obj = serde_json::Map::new();
    for id in ids {
        let next = chrono::Utc::now().timestamp() + expires_in;
        obj.insert(
            id.to_string(),
            json!({ "token": "492039", "next_step_time": next }),
        );
    }
    MockResult::Success(Value::Object(obj))
}
