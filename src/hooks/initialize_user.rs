// hooks/initialize_user.rs - after-authenticate hook seeding a new account

use tracing::{debug, error, info, warn};

use crate::auth::CallContext;
use crate::database::{ReadPermission, StorageGateway, StorageWrite, WritePermission};
use crate::error::RpcError;
use crate::game_config::ConfigSource;
use crate::types::{Session, STORAGE_CONFIGURATION, STORAGE_GAME_CONFIG_KEY};

/// Seed a freshly created account with its own copy of the baseline
/// configuration.
///
/// Runs after every device authentication but only acts when the host
/// reports the account as newly created. A failure here leaves the account
/// in place; only the configuration seed is missing.
pub async fn initialize_user(
    ctx: &CallContext,
    session: &Session,
    loader: &dyn ConfigSource,
    storage: &dyn StorageGateway,
) -> Result<(), RpcError> {
    if !session.created {
        return Ok(());
    }

    let user_id = ctx.identity().require_user().map_err(|e| {
        warn!("Context did not contain user ID.");
        e
    })?;

    let game_configuration = loader.load_baseline()?;

    let write = StorageWrite {
        collection: STORAGE_CONFIGURATION.to_string(),
        key: STORAGE_GAME_CONFIG_KEY.to_string(),
        user_id,
        value: game_configuration,
        permission_read: ReadPermission::OwnerRead,
        permission_write: WritePermission::OwnerWrite,
    };

    let ack = storage.write(&write).await.map_err(|e| {
        error!("StorageWrite error: {}", e);
        RpcError::InternalError
    })?;

    debug!("Seeded game configuration version {}", ack.version);
    info!("Initialized user {}", ack.user_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::storage::{MockStorageGateway, StorageAck, StorageError};
    use crate::game_config::{BundledConfig, MockConfigSource};

    fn ack_for(req: &StorageWrite) -> StorageAck {
        StorageAck {
            collection: req.collection.clone(),
            key: req.key.clone(),
            user_id: req.user_id.clone(),
            version: "v1".to_string(),
        }
    }

    #[tokio::test]
    async fn existing_session_touches_nothing() {
        let loader = MockConfigSource::new();
        let storage = MockStorageGateway::new();

        let result = initialize_user(
            &CallContext::for_user("user123"),
            &Session::existing(),
            &loader,
            &storage,
        )
        .await;

        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn new_account_gets_baseline_copy() {
        let loader = BundledConfig::new();
        let baseline = loader.load_baseline().unwrap();

        let mut storage = MockStorageGateway::new();
        storage
            .expect_write()
            .withf(move |req| {
                req.collection == STORAGE_CONFIGURATION
                    && req.key == STORAGE_GAME_CONFIG_KEY
                    && req.user_id == "user123"
                    && req.value == baseline
                    && req.permission_read == ReadPermission::OwnerRead
                    && req.permission_write == WritePermission::OwnerWrite
            })
            .times(1)
            .returning(|req| Ok(ack_for(req)));

        let result = initialize_user(
            &CallContext::for_user("user123"),
            &Session::created(),
            &loader,
            &storage,
        )
        .await;

        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn new_account_without_user_id_is_user_not_found() {
        let loader = MockConfigSource::new();
        let storage = MockStorageGateway::new();

        let result = initialize_user(&CallContext::new(), &Session::created(), &loader, &storage).await;

        assert_eq!(result, Err(RpcError::UserNotFound));
    }

    #[tokio::test]
    async fn loader_error_propagates_without_write() {
        let mut loader = MockConfigSource::new();
        loader
            .expect_load_baseline()
            .returning(|| Err(RpcError::MarshallingError));
        let storage = MockStorageGateway::new();

        let result = initialize_user(
            &CallContext::for_user("user123"),
            &Session::created(),
            &loader,
            &storage,
        )
        .await;

        assert_eq!(result, Err(RpcError::MarshallingError));
    }

    #[tokio::test]
    async fn write_failure_is_internal_error() {
        let mut storage = MockStorageGateway::new();
        storage
            .expect_write()
            .times(1)
            .returning(|_| Err(StorageError::Backend("disk full".to_string())));

        let result = initialize_user(
            &CallContext::for_user("user123"),
            &Session::created(),
            &BundledConfig::new(),
            &storage,
        )
        .await;

        assert_eq!(result, Err(RpcError::InternalError));
    }
}
