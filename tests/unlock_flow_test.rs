//! End-to-end unlock flows through the vault facade.
//!
//! Covers manual unlock, the silent biometric path, and the
//! persistence offer lifecycle, asserting on the directory broadcast
//! and cache rather than internal state.

mod common;

use common::{map_json, vault_fixture};

use otpvault::adapters::mock::MockResult;
use otpvault::error::UnlockError;
use otpvault::{DirectoryUpdate, UnlockState};

#[tokio::test]
async fn test_manual_unlock_populates_directory_and_broadcasts() {
    let mut fx = vault_fixture();
    fx.invoker.enqueue(
        "setup_storage_keys",
        MockResult::Success(map_json(&["svc-1", "svc-2"])),
    );
    let mut rx = fx.vault.directory().subscribe();

    let map = fx.vault.unlock_with_password("hunter2").await.unwrap();
    assert_eq!(map.len(), 2);

    match rx.recv().await.unwrap() {
        DirectoryUpdate::Snapshot(snapshot) => assert_eq!(snapshot.len(), 2),
        other => panic!("expected snapshot, got {:?}", other),
    }
    assert_eq!(fx.vault.directory().len(), 2);
    assert_eq!(
        fx.vault.unlock_state(),
        &UnlockState::Unlocked { onboarding: false }
    );
}

#[tokio::test]
async fn test_empty_store_unlocks_into_onboarding() {
    let mut fx = vault_fixture();
    fx.invoker
        .enqueue("setup_storage_keys", MockResult::Success(map_json(&[])));

    let map = fx.vault.unlock_with_password("hunter2").await.unwrap();
    assert!(map.is_empty());
    assert_eq!(
        fx.vault.unlock_state(),
        &UnlockState::Unlocked { onboarding: true }
    );
}

#[tokio::test]
async fn test_wrong_password_fails_channel_and_state() {
    let mut fx = vault_fixture();
    fx.invoker.enqueue(
        "setup_storage_keys",
        MockResult::Failure("Couldn't decrypt the storage file".to_string()),
    );
    let mut rx = fx.vault.directory().subscribe();

    let err = fx.vault.unlock_with_password("wrong").await.unwrap_err();
    assert!(matches!(err, UnlockError::UnlockFailed { .. }));
    assert!(matches!(rx.recv().await.unwrap(), DirectoryUpdate::Failed(_)));
    assert!(fx.vault.directory().is_empty());
}

#[tokio::test]
async fn test_silent_unlock_round_trip() {
    let mut fx = vault_fixture();
    fx.vault.persist_password("hunter2").await.unwrap();
    fx.invoker.enqueue(
        "setup_storage_keys",
        MockResult::Success(map_json(&["svc-1"])),
    );

    let map = fx.vault.try_silent_unlock().await.unwrap().unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(fx.vault.directory().len(), 1);

    let calls = fx.invoker.invocations();
    assert_eq!(calls.last().unwrap().args["userPass"], "hunter2");
}

#[tokio::test]
async fn test_silent_unlock_without_blob_touches_nothing() {
    let mut fx = vault_fixture();
    assert_eq!(fx.vault.try_silent_unlock().await.unwrap(), None);
    assert!(fx.invoker.invocations().is_empty());
    assert_eq!(fx.vault.unlock_state(), &UnlockState::Locked);
}

#[tokio::test]
async fn test_silent_unlock_denial_does_not_fail_directory_channel() {
    let mut fx = vault_fixture();
    fx.vault.persist_password("hunter2").await.unwrap();
    fx.secret.deny_next("user dismissed the prompt");
    let mut rx = fx.vault.directory().subscribe();

    let err = fx.vault.try_silent_unlock().await.unwrap_err();
    assert!(matches!(err, UnlockError::BiometricDenied { .. }));

    // The denial belongs to the prompt, not to the directory: the
    // caller falls back to manual entry on the same channel.
    assert!(matches!(
        rx.try_recv(),
        Err(tokio::sync::broadcast::error::TryRecvError::Empty)
    ));
}

#[tokio::test]
async fn test_persistence_offer_lifecycle() {
    let mut fx = vault_fixture();
    fx.invoker.enqueue(
        "setup_storage_keys",
        MockResult::Success(map_json(&["svc-1"])),
    );
    fx.vault.unlock_with_password("hunter2").await.unwrap();

    assert!(fx.vault.should_offer_persistence().await);
    fx.vault.persist_password("hunter2").await.unwrap();
    assert!(!fx.vault.should_offer_persistence().await);

    fx.vault.forget_persisted_password().await.unwrap();
    assert!(fx.store.stored_blob().is_none());
    assert!(fx.vault.should_offer_persistence().await);
}
