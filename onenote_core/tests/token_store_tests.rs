use onenote_core::config::StorageMode;
use onenote_core::token_store::{FileTokenStore, StoreError, TokenChain, TokenStore};
use serde_json::Value;
use std::path::PathBuf;

fn scratch_path(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    std::env::temp_dir().join(format!(
        "onenote-mcp-test-{}-{}-{}",
        std::process::id(),
        name,
        nanos
    ))
}

/// A backend that always fails, standing in for a locked-down keychain.
struct FailingStore;

impl TokenStore for FailingStore {
    fn label(&self) -> &'static str {
        "keychain"
    }

    fn read(&self) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("no secure store".to_string()))
    }

    fn write(&self, _token: &str) -> Result<(), StoreError> {
        Err(StoreError::Persist("no secure store".to_string()))
    }

    fn available(&self) -> bool {
        false
    }
}

#[test]
fn test_file_store_round_trip() {
    let path = scratch_path("round-trip");
    let store = FileTokenStore::new(path.clone());

    store.write("tok-round-trip").unwrap();
    assert_eq!(store.read().unwrap(), Some("tok-round-trip".to_string()));

    // The on-disk format is a JSON object with a `token` member.
    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["token"], "tok-round-trip");

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_file_store_missing_file_reads_none() {
    let store = FileTokenStore::new(scratch_path("never-written"));
    assert_eq!(store.read().unwrap(), None);
}

#[test]
fn test_file_store_accepts_raw_token_content() {
    let path = scratch_path("raw-token");
    std::fs::write(&path, "raw-token-value\n").unwrap();

    let store = FileTokenStore::new(path.clone());
    assert_eq!(store.read().unwrap(), Some("raw-token-value".to_string()));

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_file_store_blank_content_reads_none() {
    let path = scratch_path("blank-token");
    std::fs::write(&path, "   \n").unwrap();

    let store = FileTokenStore::new(path.clone());
    assert_eq!(store.read().unwrap(), None);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_json_without_token_member_reads_none() {
    let path = scratch_path("wrong-member");
    std::fs::write(&path, r#"{"access_token": "nope"}"#).unwrap();

    let store = FileTokenStore::new(path.clone());
    assert_eq!(store.read().unwrap(), None);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_env_override_wins_over_stores() {
    let path = scratch_path("env-override");
    let store = FileTokenStore::new(path.clone());
    store.write("file-token").unwrap();

    let env_var = "ONENOTE_TEST_ENV_OVERRIDE_WINS";
    std::env::set_var(env_var, "env-token");
    let chain = TokenChain::new(StorageMode::File, env_var, vec![Box::new(store)]);

    assert_eq!(chain.read(true), Some("env-token".to_string()));
    // With the override disabled the file token shows through.
    assert_eq!(chain.read(false), Some("file-token".to_string()));

    std::env::remove_var(env_var);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_env_only_mode_refuses_writes() {
    let chain = TokenChain::new(StorageMode::Env, "ONENOTE_TEST_ENV_ONLY", Vec::new());

    let err = chain.write("anything").unwrap_err();
    assert_eq!(err.to_string(), "Token storage is set to env-only.");

    // Reads still work: absence is None, not an error.
    assert_eq!(chain.read(true), None);
}

#[test]
fn test_write_falls_back_past_failing_store() {
    let path = scratch_path("write-fallback");
    let chain = TokenChain::new(
        StorageMode::Keychain,
        "ONENOTE_TEST_WRITE_FALLBACK",
        vec![
            Box::new(FailingStore),
            Box::new(FileTokenStore::new(path.clone())),
        ],
    );

    let outcome = chain.write("fallback-token").unwrap();
    assert_eq!(outcome.destination, "file");
    let warning = outcome.warning.unwrap();
    assert!(warning.contains("keychain write failed"), "{}", warning);

    assert_eq!(chain.read(false), Some("fallback-token".to_string()));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_write_with_all_backends_failing_errors() {
    let chain = TokenChain::new(
        StorageMode::Keychain,
        "ONENOTE_TEST_ALL_FAIL",
        vec![Box::new(FailingStore)],
    );

    assert!(chain.write("anything").is_err());
}

#[test]
fn test_read_degrades_past_failing_store() {
    let path = scratch_path("read-degrade");
    let file = FileTokenStore::new(path.clone());
    file.write("survivor").unwrap();

    let chain = TokenChain::new(
        StorageMode::Keychain,
        "ONENOTE_TEST_READ_DEGRADE",
        vec![Box::new(FailingStore), Box::new(file)],
    );

    assert_eq!(chain.read(false), Some("survivor".to_string()));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_secure_store_reflects_chain_membership() {
    let chain = TokenChain::new(
        StorageMode::File,
        "ONENOTE_TEST_NO_KEYCHAIN",
        vec![Box::new(FileTokenStore::new(scratch_path("membership")))],
    );
    assert!(!chain.secure_store_available());

    let chain = TokenChain::new(
        StorageMode::Keychain,
        "ONENOTE_TEST_DEAD_KEYCHAIN",
        vec![Box::new(FailingStore)],
    );
    assert!(!chain.secure_store_available());
}
