//! DocLedger facade.
//!
//! Exposes the operations an invoking layer needs (user registration, login,
//! document registration and lookups) on top of the indexed world state.
//!
//! ```text
//! DocLedger
//!   ├── IndexedEntityStore   create_user / create_document
//!   ├── QueryEngine          query_* lookups
//!   └── AuthGate             authenticate
//!         └── StorageBackend (shared)
//! ```

use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use docledger_auth::{AuthGate, BcryptVerifier, CredentialVerifier};
use docledger_commons::{AttributeNames, Attributes, CompositeKey, Document, EntityKind, User};
use docledger_configs::{IdSettings, LedgerConfig, StorageBackendKind};
use docledger_store::{
    generate_unique_id, EntityError, EntityRegistry, IndexedEntityStore, InMemoryBackend, Partition,
    QueryEngine, RocksDBBackend, RocksDbInit, StorageBackend, StorageError,
};
use std::sync::Arc;

pub struct DocLedger {
    store: IndexedEntityStore,
    query: Arc<QueryEngine>,
    gate: AuthGate,
    ids: IdSettings,
}

impl DocLedger {
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        registry: EntityRegistry,
        verifier: Arc<dyn CredentialVerifier>,
        ids: IdSettings,
    ) -> Self {
        let registry = Arc::new(registry);
        let store = IndexedEntityStore::new(backend.clone(), registry.clone());
        let query = Arc::new(QueryEngine::new(backend, registry));
        let gate = AuthGate::new(query.clone(), verifier);

        Self {
            store,
            query,
            gate,
            ids,
        }
    }

    /// Build a ledger from configuration: validates it, opens the configured
    /// backend and uses bcrypt with the configured cost.
    pub fn open(config: &LedgerConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| LedgerError::Config(e.to_string()))?;

        let backend: Arc<dyn StorageBackend> = match config.storage.backend {
            StorageBackendKind::Memory => Arc::new(InMemoryBackend::new()),
            StorageBackendKind::Rocksdb => {
                let dir = config.storage.rocksdb_dir();
                std::fs::create_dir_all(&dir).map_err(|e| {
                    StorageError::IoError(format!("cannot create {}: {}", dir.display(), e))
                })?;

                let db = RocksDbInit::new(
                    dir.to_string_lossy(),
                    config.storage.partition.clone(),
                    config.storage.rocksdb.clone(),
                )
                .open()
                .map_err(|e| StorageError::IoError(e.to_string()))?;

                Arc::new(RocksDBBackend::new(
                    db,
                    Partition::new(config.storage.partition.clone()),
                )?)
            }
        };

        log::info!(
            "Opened DocLedger: backend={:?}, registry={:?}, partition={}",
            config.storage.backend,
            config.registry.version,
            config.storage.partition
        );

        Ok(Self::new(
            backend,
            EntityRegistry::new(config.registry.version),
            Arc::new(BcryptVerifier::new(config.auth.bcrypt_cost)),
            config.ids.clone(),
        ))
    }

    // ------------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------------

    /// Store a user. `pwd` is the plain password; only its hash is persisted.
    ///
    /// A taken user id is rejected before hashing. A taken email is only caught by
    /// the store, after the hash has been computed.
    pub fn create_user(&self, user_id: &str, email: &str, pwd: &str) -> Result<CompositeKey> {
        log::debug!("create_user: user_id={}, email={}", user_id, email);

        if self.query.exists(EntityKind::User, &[user_id])? {
            return Err(EntityError::AlreadyExists(format!("User({})", user_id)).into());
        }

        let hashed = self.gate.verifier().hash(pwd)?;
        let key = self.store.insert(&User::new(user_id, email, hashed))?;

        log::info!("Created user {}", user_id);
        Ok(key)
    }

    /// Create a user under a freshly generated id and return the id.
    pub fn register_user(&self, email: &str, pwd: &str) -> Result<String> {
        log::debug!("register_user: email={}", email);

        let mut rng = rand::rng();
        let user_id = generate_unique_id(
            &mut rng,
            |id| self.query.exists(EntityKind::User, &[id]),
            self.ids.max_attempts,
        )?;

        self.create_user(&user_id, email, pwd)?;
        Ok(user_id)
    }

    /// Users registered with `email`, in index order. `NotFound` when none.
    pub fn query_user_by_email(&self, email: &str) -> Result<Vec<User>> {
        log::debug!("query_user_by_email: email={}", email);
        Ok(self
            .query
            .get_by_attribute::<User>(AttributeNames::EMAIL, email)?)
    }

    pub fn authenticate(&self, email: &str, pwd: &str) -> Result<bool> {
        log::debug!("authenticate: email={}", email);
        Ok(self.gate.authenticate(email, pwd)?)
    }

    /// Every stored user, in primary key order.
    pub fn query_all_users(&self) -> Result<Vec<User>> {
        log::debug!("query_all_users");
        Ok(self.query.get_all::<User>()?)
    }

    // ------------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------------

    pub fn create_document(
        &self,
        user_id: &str,
        doc_id: &str,
        doc_name: &str,
        doc_type: &str,
        timestamp: DateTime<Utc>,
        content_hash: &str,
    ) -> Result<CompositeKey> {
        log::debug!(
            "create_document: user_id={}, doc_id={}, doc_name={}",
            user_id,
            doc_id,
            doc_name
        );

        let document = Document::new(user_id, doc_id, doc_name, doc_type, timestamp, content_hash);
        let key = self.store.insert(&document)?;

        log::info!("Created document {} for user {}", doc_id, user_id);
        Ok(key)
    }

    /// Documents owned by `user_id`, ordered by document id. `NotFound` when none.
    pub fn query_document_by_user(&self, user_id: &str) -> Result<Vec<Document>> {
        log::debug!("query_document_by_user: user_id={}", user_id);
        Ok(self
            .query
            .get_by_attribute::<Document>(AttributeNames::USER_ID, user_id)?)
    }

    /// One document by owner and id. `NotFound` when absent.
    pub fn query_document_by_id(&self, user_id: &str, doc_id: &str) -> Result<Document> {
        log::debug!("query_document_by_id: user_id={}, doc_id={}", user_id, doc_id);

        let mut key_attributes = Attributes::new();
        key_attributes.insert(AttributeNames::USER_ID.to_string(), user_id.to_string());
        key_attributes.insert(AttributeNames::DOC_ID.to_string(), doc_id.to_string());

        // Legacy keys hold only the doc id, so the owner is checked on the record
        let document = self.query.get_by_key_attributes::<Document>(&key_attributes)?;
        if document.user_id != user_id {
            return Err(EntityError::NotFound(format!("Document({}, {})", user_id, doc_id)).into());
        }
        Ok(document)
    }

    /// Documents named `doc_name`, in index order. `NotFound` when none.
    pub fn query_document_by_name(&self, doc_name: &str) -> Result<Vec<Document>> {
        log::debug!("query_document_by_name: doc_name={}", doc_name);
        Ok(self
            .query
            .get_by_attribute::<Document>(AttributeNames::DOC_NAME, doc_name)?)
    }

    /// Every stored document, in primary key order.
    pub fn query_all_documents(&self) -> Result<Vec<Document>> {
        log::debug!("query_all_documents");
        Ok(self.query.get_all::<Document>()?)
    }
}
