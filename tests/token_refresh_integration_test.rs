//! Token refresh behavior through the vault facade, under paused time.

mod common;

use std::time::Duration;

use common::{map_json, tokens_json, vault_fixture};

use otpvault::adapters::mock::MockResult;

async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test(start_paused = true)]
async fn test_unlock_starts_refresh_cycle() {
    let mut fx = vault_fixture();
    fx.invoker.enqueue(
        "setup_storage_keys",
        MockResult::Success(map_json(&["svc-1"])),
    );
    fx.invoker
        .set_default("get_services_tokens", tokens_json(&["svc-1"], 30));

    fx.vault.unlock_with_password("hunter2").await.unwrap();
    settle().await;

    let view = fx.vault.token_view();
    assert_eq!(view.tokens["svc-1"].code, "492039");
    assert_eq!(view.remaining["svc-1"], 30);
}

#[tokio::test(start_paused = true)]
async fn test_onboarding_unlock_does_not_fetch_tokens() {
    let mut fx = vault_fixture();
    fx.invoker
        .enqueue("setup_storage_keys", MockResult::Success(map_json(&[])));

    fx.vault.unlock_with_password("hunter2").await.unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(fx.invoker.invocation_count("get_services_tokens"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_is_observable_on_the_watch_channel() {
    let mut fx = vault_fixture();
    fx.invoker.enqueue(
        "setup_storage_keys",
        MockResult::Success(map_json(&["svc-1"])),
    );
    fx.invoker
        .set_default("get_services_tokens", tokens_json(&["svc-1"], 30));

    fx.vault.unlock_with_password("hunter2").await.unwrap();
    let rx = fx.vault.tokens();
    settle().await;
    tokio::time::sleep(Duration::from_secs(5)).await;

    let remaining = rx.borrow().remaining["svc-1"];
    assert!((24..=26).contains(&remaining), "got {}", remaining);
}

#[tokio::test(start_paused = true)]
async fn test_expiry_refetches_fresh_codes() {
    let mut fx = vault_fixture();
    fx.invoker.enqueue(
        "setup_storage_keys",
        MockResult::Success(map_json(&["svc-1"])),
    );
    fx.invoker
        .enqueue("get_services_tokens", tokens_json(&["svc-1"], 3));
    fx.invoker
        .set_default("get_services_tokens", tokens_json(&["svc-1"], 30));

    fx.vault.unlock_with_password("hunter2").await.unwrap();
    settle().await;
    tokio::time::sleep(Duration::from_secs(6)).await;

    assert_eq!(fx.invoker.invocation_count("get_services_tokens"), 2);
    assert!(fx.vault.token_view().remaining["svc-1"] > 0);
}

#[tokio::test(start_paused = true)]
async fn test_delete_prunes_token_view_immediately() {
    let mut fx = vault_fixture();
    fx.invoker.enqueue(
        "setup_storage_keys",
        MockResult::Success(map_json(&["svc-1", "svc-2"])),
    );
    fx.invoker
        .set_default("get_services_tokens", tokens_json(&["svc-1", "svc-2"], 30));

    fx.vault.unlock_with_password("hunter2").await.unwrap();
    settle().await;
    assert_eq!(fx.vault.token_view().tokens.len(), 2);

    fx.invoker
        .enqueue("remove_service", MockResult::Success(map_json(&["svc-2"])));
    fx.vault.delete_service("svc-1").await.unwrap();

    // Pruned at the instant of removal, before the restarted cycle
    // fetches anything.
    let view = fx.vault.token_view();
    assert!(!view.tokens.contains_key("svc-1"));
    assert!(!view.remaining.contains_key("svc-1"));
    assert!(view.tokens.contains_key("svc-2"));
}

#[tokio::test(start_paused = true)]
async fn test_deleting_last_service_stops_the_cycle() {
    let mut fx = vault_fixture();
    fx.invoker.enqueue(
        "setup_storage_keys",
        MockResult::Success(map_json(&["svc-1"])),
    );
    fx.invoker
        .set_default("get_services_tokens", tokens_json(&["svc-1"], 30));

    fx.vault.unlock_with_password("hunter2").await.unwrap();
    settle().await;

    fx.invoker
        .enqueue("remove_service", MockResult::Success(map_json(&[])));
    fx.vault.delete_service("svc-1").await.unwrap();

    assert!(fx.vault.token_view().tokens.is_empty());
    let calls = fx.invoker.invocation_count("get_services_tokens");
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(fx.invoker.invocation_count("get_services_tokens"), calls);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_halts_refreshing() {
    let mut fx = vault_fixture();
    fx.invoker.enqueue(
        "setup_storage_keys",
        MockResult::Success(map_json(&["svc-1"])),
    );
    fx.invoker
        .set_default("get_services_tokens", tokens_json(&["svc-1"], 30));

    fx.vault.unlock_with_password("hunter2").await.unwrap();
    settle().await;
    fx.vault.shutdown();

    assert!(fx.vault.token_view().tokens.is_empty());
    let calls = fx.invoker.invocation_count("get_services_tokens");
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(fx.invoker.invocation_count("get_services_tokens"), calls);
}
