//! End-to-end ledger scenarios over the in-memory and RocksDB backends.

use chrono::{TimeZone, Utc};
use docledger_auth::{AuthError, AuthResult, BcryptVerifier, CredentialVerifier};
use docledger_configs::{IdSettings, LedgerConfig, RegistryVersion, StorageBackendKind};
use docledger_core::{DocLedger, LedgerError};
use docledger_store::test_utils::FlakyBackend;
use docledger_store::{EntityError, EntityRegistry, InMemoryBackend, StorageBackend};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

const TEST_COST: u32 = 4;

fn memory_ledger(registry: EntityRegistry) -> DocLedger {
    DocLedger::new(
        Arc::new(InMemoryBackend::new()),
        registry,
        Arc::new(BcryptVerifier::new(TEST_COST)),
        IdSettings::default(),
    )
}

/// Bcrypt verifier that counts how often a hash was computed.
struct CountingVerifier {
    inner: BcryptVerifier,
    hashes: AtomicUsize,
}

impl CredentialVerifier for CountingVerifier {
    fn hash(&self, password: &str) -> AuthResult<String> {
        self.hashes.fetch_add(1, Ordering::SeqCst);
        self.inner.hash(password)
    }

    fn verify(&self, stored_hash: &str, candidate: &str) -> AuthResult<bool> {
        self.inner.verify(stored_hash, candidate)
    }
}

fn rocksdb_config(dir: &TempDir) -> LedgerConfig {
    let mut config = LedgerConfig::default();
    config.storage.backend = StorageBackendKind::Rocksdb;
    config.storage.data_path = dir.path().to_string_lossy().to_string();
    config.auth.bcrypt_cost = TEST_COST;
    config
}

fn is_not_found(err: &LedgerError) -> bool {
    matches!(err, LedgerError::Entity(EntityError::NotFound(_)))
}

fn is_already_exists(err: &LedgerError) -> bool {
    matches!(err, LedgerError::Entity(EntityError::AlreadyExists(_)))
}

#[test]
fn test_user_and_document_scenario() {
    let ledger = memory_ledger(EntityRegistry::indexed());
    let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();

    ledger.create_user("u1", "a@x.com", "secret").unwrap();
    let users = ledger.query_user_by_email("a@x.com").unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].user_id, "u1");
    assert_ne!(users[0].pwd, "secret");

    let err = ledger.create_user("u1", "b@x.com", "pw").unwrap_err();
    assert!(is_already_exists(&err));

    // The first record is untouched
    let users = ledger.query_all_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "a@x.com");

    ledger
        .create_document("u1", "d1", "report", "pdf", t0, "hash1")
        .unwrap();

    let doc = ledger.query_document_by_id("u1", "d1").unwrap();
    assert_eq!(doc.doc_name, "report");
    assert_eq!(doc.doc_type, "pdf");
    assert_eq!(doc.timestamp, t0);
    assert_eq!(doc.content_hash, "hash1");

    let by_name = ledger.query_document_by_name("report").unwrap();
    assert_eq!(by_name, vec![doc]);
}

#[test]
fn test_authenticate() {
    let ledger = memory_ledger(EntityRegistry::indexed());
    ledger.create_user("u1", "a@x.com", "secret").unwrap();

    assert!(ledger.authenticate("a@x.com", "secret").unwrap());

    let err = ledger.authenticate("a@x.com", "wrong").unwrap_err();
    assert!(matches!(err, LedgerError::Auth(AuthError::InvalidCredential)));

    let err = ledger.authenticate("nobody@x.com", "secret").unwrap_err();
    assert!(matches!(err, LedgerError::Auth(AuthError::NotFound(_))));
}

#[test]
fn test_duplicate_user_id_rejected_before_hashing() {
    let verifier = Arc::new(CountingVerifier {
        inner: BcryptVerifier::new(TEST_COST),
        hashes: AtomicUsize::new(0),
    });
    let ledger = DocLedger::new(
        Arc::new(InMemoryBackend::new()),
        EntityRegistry::indexed(),
        verifier.clone(),
        IdSettings::default(),
    );

    ledger.create_user("u1", "a@x.com", "pw").unwrap();
    assert_eq!(verifier.hashes.load(Ordering::SeqCst), 1);

    let err = ledger.create_user("u1", "b@x.com", "pw").unwrap_err();
    assert!(is_already_exists(&err));
    assert_eq!(verifier.hashes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_duplicate_email_rejected() {
    let ledger = memory_ledger(EntityRegistry::indexed());
    ledger.create_user("u1", "a@x.com", "pw1").unwrap();

    let err = ledger.create_user("u2", "a@x.com", "pw2").unwrap_err();
    assert!(is_already_exists(&err));
    assert_eq!(ledger.query_user_by_email("a@x.com").unwrap().len(), 1);
}

#[test]
fn test_document_queries() {
    let ledger = memory_ledger(EntityRegistry::indexed());
    let t0 = Utc::now();

    ledger.create_document("u1", "d2", "notes", "txt", t0, "h2").unwrap();
    ledger.create_document("u1", "d1", "report", "pdf", t0, "h1").unwrap();
    ledger.create_document("u2", "d1", "report", "pdf", t0, "h3").unwrap();
    ledger.create_document("u10", "d5", "report", "pdf", t0, "h4").unwrap();

    let docs = ledger.query_document_by_user("u1").unwrap();
    let ids: Vec<&str> = docs.iter().map(|d| d.doc_id.as_str()).collect();
    assert_eq!(ids, vec!["d1", "d2"]);

    let reports = ledger.query_document_by_name("report").unwrap();
    let owners: Vec<&str> = reports.iter().map(|d| d.user_id.as_str()).collect();
    assert_eq!(owners, vec!["u1", "u10", "u2"]);

    assert_eq!(ledger.query_all_documents().unwrap().len(), 4);

    let err = ledger.create_document("u1", "d1", "dup", "pdf", t0, "h5").unwrap_err();
    assert!(is_already_exists(&err));
}

#[test]
fn test_not_found_paths() {
    let ledger = memory_ledger(EntityRegistry::indexed());

    assert!(is_not_found(&ledger.query_user_by_email("a@x.com").unwrap_err()));
    assert!(is_not_found(&ledger.query_document_by_user("u1").unwrap_err()));
    assert!(is_not_found(&ledger.query_document_by_id("u1", "d1").unwrap_err()));
    assert!(is_not_found(&ledger.query_document_by_name("report").unwrap_err()));
    assert!(ledger.query_all_users().unwrap().is_empty());
    assert!(ledger.query_all_documents().unwrap().is_empty());
}

#[test]
fn test_invalid_segments() {
    let ledger = memory_ledger(EntityRegistry::indexed());

    let err = ledger.create_user("", "a@x.com", "pw").unwrap_err();
    assert!(matches!(err, LedgerError::Entity(EntityError::InvalidSegment(_))));

    let err = ledger
        .create_document("u1", "d1", "", "pdf", Utc::now(), "h")
        .unwrap_err();
    assert!(matches!(err, LedgerError::Entity(EntityError::InvalidSegment(_))));
    assert!(ledger.query_all_documents().unwrap().is_empty());
}

#[test]
fn test_register_user_generates_id() {
    let ledger = memory_ledger(EntityRegistry::indexed());

    let id = ledger.register_user("new@x.com", "pw").unwrap();
    assert_eq!(id.len(), 7);
    assert!(id.chars().all(|c| c.is_ascii_digit()));

    let users = ledger.query_user_by_email("new@x.com").unwrap();
    assert_eq!(users[0].user_id, id);
    assert!(ledger.authenticate("new@x.com", "pw").unwrap());
}

#[test]
fn test_legacy_registry() {
    let ledger = memory_ledger(EntityRegistry::legacy());
    let t0 = Utc::now();

    ledger.create_user("u2", "dup@x.com", "second").unwrap();
    ledger.create_user("u1", "dup@x.com", "first").unwrap();

    // No email index: duplicates are accepted and the lowest user id wins
    assert_eq!(ledger.query_user_by_email("dup@x.com").unwrap().len(), 2);
    assert!(ledger.authenticate("dup@x.com", "first").unwrap());
    let err = ledger.authenticate("dup@x.com", "second").unwrap_err();
    assert!(matches!(err, LedgerError::Auth(AuthError::InvalidCredential)));

    ledger.create_document("u1", "d1", "report", "pdf", t0, "h1").unwrap();

    // Legacy primary key is the doc id alone
    let err = ledger.create_document("u2", "d1", "other", "pdf", t0, "h2").unwrap_err();
    assert!(is_already_exists(&err));

    assert_eq!(ledger.query_document_by_id("u1", "d1").unwrap().content_hash, "h1");
    assert!(is_not_found(&ledger.query_document_by_id("u2", "d1").unwrap_err()));
    assert_eq!(ledger.query_document_by_user("u1").unwrap().len(), 1);
    assert_eq!(ledger.query_document_by_name("report").unwrap().len(), 1);
}

#[test]
fn test_index_write_failure_hides_record_from_index() {
    let inner: Arc<dyn StorageBackend> = Arc::new(InMemoryBackend::new());
    // One put allowed: the primary record lands, the email index entry does not
    let ledger = DocLedger::new(
        Arc::new(FlakyBackend::new(inner.clone(), 1)),
        EntityRegistry::indexed(),
        Arc::new(BcryptVerifier::new(TEST_COST)),
        IdSettings::default(),
    );

    let err = ledger.create_user("u1", "a@x.com", "pw").unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Entity(EntityError::StoreUnavailable(_))
    ));

    // Visible by primary key, invisible through the index
    assert_eq!(ledger.query_all_users().unwrap().len(), 1);
    assert!(is_not_found(&ledger.query_user_by_email("a@x.com").unwrap_err()));

    // Retrying is rejected because the primary record already exists
    let retry = DocLedger::new(
        inner,
        EntityRegistry::indexed(),
        Arc::new(BcryptVerifier::new(TEST_COST)),
        IdSettings::default(),
    );
    assert!(is_already_exists(&retry.create_user("u1", "a@x.com", "pw").unwrap_err()));

    // The missing index entry leaves the email free for another user
    retry.create_user("u2", "a@x.com", "pw").unwrap();
    let users = retry.query_user_by_email("a@x.com").unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].user_id, "u2");
}

#[test]
fn test_open_memory_from_config() {
    let mut config = LedgerConfig::default();
    config.auth.bcrypt_cost = TEST_COST;
    config.registry.version = RegistryVersion::V1;

    let ledger = DocLedger::open(&config).unwrap();
    ledger.create_user("u1", "a@x.com", "pw").unwrap();
    assert!(ledger.authenticate("a@x.com", "pw").unwrap());
}

#[test]
fn test_open_rejects_invalid_config() {
    let mut config = LedgerConfig::default();
    config.ids.max_attempts = 0;

    let err = DocLedger::open(&config).err().unwrap();
    assert!(matches!(err, LedgerError::Config(_)));
}

#[test]
fn test_rocksdb_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let config = rocksdb_config(&dir);
    let t0 = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

    {
        let ledger = DocLedger::open(&config).unwrap();
        ledger.create_user("u1", "a@x.com", "secret").unwrap();
        ledger
            .create_document("u1", "d1", "report", "pdf", t0, "hash1")
            .unwrap();
    }

    let ledger = DocLedger::open(&config).unwrap();
    assert!(ledger.authenticate("a@x.com", "secret").unwrap());
    assert_eq!(ledger.query_document_by_name("report").unwrap().len(), 1);
    assert_eq!(ledger.query_document_by_id("u1", "d1").unwrap().timestamp, t0);
    assert!(is_already_exists(
        &ledger.create_user("u1", "z@x.com", "pw").unwrap_err()
    ));
}
