#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use oak_module::database::storage::object_version;
use oak_module::database::{
    AccountStore, AccountStoreError, StorageAck, StorageError, StorageGateway, StorageObject, StorageRead,
    StorageWrite,
};
use oak_module::game_config::BundledConfig;
use oak_module::{init_module, ModuleDeps, ModuleRegistry};

type SlotKey = (String, String, String);

/// Key/value store kept in memory, counting every backend call
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<SlotKey, StorageObject>>,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
    pub fail: bool,
}

impl MemoryStorage {
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn get(&self, collection: &str, key: &str, user_id: &str) -> Option<StorageObject> {
        let objects = self.objects.lock().unwrap();
        objects
            .get(&(collection.to_string(), key.to_string(), user_id.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn calls(&self) -> usize {
        self.reads.load(Ordering::SeqCst) + self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageGateway for MemoryStorage {
    async fn read(&self, request: &StorageRead) -> Result<Vec<StorageObject>, StorageError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StorageError::Backend("storage offline".to_string()));
        }
        Ok(self
            .get(&request.collection, &request.key, &request.user_id)
            .into_iter()
            .collect())
    }

    async fn write(&self, request: &StorageWrite) -> Result<StorageAck, StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StorageError::Backend("storage offline".to_string()));
        }
        let version = object_version(&request.value);
        let object = StorageObject {
            collection: request.collection.clone(),
            key: request.key.clone(),
            user_id: request.user_id.clone(),
            value: request.value.clone(),
            version: version.clone(),
            permission_read: request.permission_read,
            permission_write: request.permission_write,
            create_time: None,
            update_time: None,
        };
        self.objects.lock().unwrap().insert(
            (request.collection.clone(), request.key.clone(), request.user_id.clone()),
            object,
        );
        Ok(StorageAck {
            collection: request.collection.clone(),
            key: request.key.clone(),
            user_id: request.user_id.clone(),
            version,
        })
    }
}

/// Records every metadata update as (user_id, metadata)
#[derive(Default)]
pub struct MemoryAccounts {
    pub updates: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl MemoryAccounts {
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn updates(&self) -> Vec<(String, String)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl AccountStore for MemoryAccounts {
    async fn update_metadata(&self, user_id: &str, metadata: &str) -> Result<(), AccountStoreError> {
        if self.fail {
            return Err(AccountStoreError::Backend("connection reset".to_string()));
        }
        self.updates
            .lock()
            .unwrap()
            .push((user_id.to_string(), metadata.to_string()));
        Ok(())
    }
}

pub struct Harness {
    pub registry: ModuleRegistry,
    pub storage: Arc<MemoryStorage>,
    pub accounts: Arc<MemoryAccounts>,
}

pub fn harness_with(storage: MemoryStorage, accounts: MemoryAccounts) -> Harness {
    let storage = Arc::new(storage);
    let accounts = Arc::new(accounts);
    let deps = ModuleDeps {
        config: Arc::new(BundledConfig::new()),
        storage: storage.clone(),
        accounts: accounts.clone(),
    };

    let mut registry = ModuleRegistry::new();
    init_module(&deps, &mut registry).expect("module should load");

    Harness { registry, storage, accounts }
}

pub fn harness() -> Harness {
    harness_with(MemoryStorage::default(), MemoryAccounts::default())
}
