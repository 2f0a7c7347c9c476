pub mod account;
pub mod manager;
pub mod storage;

pub use account::{AccountStore, AccountStoreError, PgAccountStore};
pub use manager::{DatabaseError, DatabaseManager};
pub use storage::{
    PgStorage, ReadPermission, StorageAck, StorageError, StorageGateway, StorageObject, StorageRead,
    StorageWrite, WritePermission,
};
