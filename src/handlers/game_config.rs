// handlers/game_config.rs - read_game_config_from_file / read_game_config_from_storage RPCs

use tracing::{debug, error, warn};

use crate::auth::CallContext;
use crate::database::{StorageGateway, StorageRead};
use crate::error::{RpcError, RpcResult};
use crate::game_config::ConfigSource;
use crate::types::{STORAGE_CONFIGURATION, STORAGE_GAME_CONFIG_KEY};

/// Return the bundled baseline configuration. Requires an authenticated
/// caller even though the document is the same for everyone.
pub fn read_game_config_from_file(ctx: &CallContext, loader: &dyn ConfigSource) -> RpcResult {
    debug!("ReadGameConfigurationFromFile RPC called");

    ctx.identity().require_user().map_err(|e| {
        warn!("Context did not contain user ID.");
        e
    })?;

    loader.load_baseline()
}

/// Return the caller's personal copy of the configuration as stored.
///
/// The stored document is passed through untouched.
pub async fn read_game_config_from_storage(ctx: &CallContext, storage: &dyn StorageGateway) -> RpcResult {
    debug!("ReadGameConfigurationFromStorage RPC called");

    let user_id = ctx.identity().require_user().map_err(|e| {
        warn!("Context did not contain user ID.");
        e
    })?;

    let request = StorageRead {
        collection: STORAGE_CONFIGURATION.to_string(),
        key: STORAGE_GAME_CONFIG_KEY.to_string(),
        user_id,
    };

    let objects = storage.read(&request).await.map_err(|e| {
        error!("StorageRead error: {}", e);
        RpcError::InternalError
    })?;

    match objects.into_iter().next() {
        Some(object) => Ok(object.value),
        None => {
            error!("Game configuration not found");
            Err(RpcError::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::storage::{
        MockStorageGateway, ReadPermission, StorageError, StorageObject, WritePermission,
    };
    use crate::game_config::{BundledConfig, MockConfigSource};
    use crate::types::GameConfig;

    const EXPECTED_CONFIG: &str = "{\n  \"game_name\": \"Super Fun Game\",\n  \"max_players\": 100\n}";

    fn stored(value: &str) -> StorageObject {
        StorageObject {
            collection: STORAGE_CONFIGURATION.to_string(),
            key: STORAGE_GAME_CONFIG_KEY.to_string(),
            user_id: "user123".to_string(),
            value: value.to_string(),
            version: "v1".to_string(),
            permission_read: ReadPermission::OwnerRead,
            permission_write: WritePermission::OwnerWrite,
            create_time: None,
            update_time: None,
        }
    }

    #[test]
    fn file_read_returns_loader_output() {
        let mut loader = MockConfigSource::new();
        loader
            .expect_load_baseline()
            .times(1)
            .returning(|| Ok(EXPECTED_CONFIG.to_string()));

        let result = read_game_config_from_file(&CallContext::for_user("user123"), &loader);

        assert_eq!(result, Ok(EXPECTED_CONFIG.to_string()));
    }

    #[test]
    fn file_read_requires_user() {
        let loader = MockConfigSource::new();

        let result = read_game_config_from_file(&CallContext::new(), &loader);

        assert_eq!(result, Err(RpcError::UserNotFound));
    }

    #[test]
    fn file_read_propagates_loader_error() {
        let mut loader = MockConfigSource::new();
        loader
            .expect_load_baseline()
            .returning(|| Err(RpcError::UnmarshallingError));

        let result = read_game_config_from_file(&CallContext::for_user("user123"), &loader);

        assert_eq!(result, Err(RpcError::UnmarshallingError));
    }

    #[test]
    fn file_read_of_bundled_baseline_decodes_to_baseline() {
        let loader = BundledConfig::new();

        let json = read_game_config_from_file(&CallContext::for_user("user123"), &loader).unwrap();
        let decoded: GameConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, loader.decode().unwrap());
    }

    #[tokio::test]
    async fn storage_read_returns_stored_value_verbatim() {
        let mut storage = MockStorageGateway::new();
        storage
            .expect_read()
            .withf(|req| {
                req.collection == STORAGE_CONFIGURATION
                    && req.key == STORAGE_GAME_CONFIG_KEY
                    && req.user_id == "user123"
            })
            .times(1)
            .returning(|_| Ok(vec![stored(EXPECTED_CONFIG)]));

        let result = read_game_config_from_storage(&CallContext::for_user("user123"), &storage).await;

        assert_eq!(result, Ok(EXPECTED_CONFIG.to_string()));
    }

    #[tokio::test]
    async fn storage_read_does_not_validate_stored_document() {
        let mut storage = MockStorageGateway::new();
        storage
            .expect_read()
            .returning(|_| Ok(vec![stored("{not json"), stored("{}")]));

        let result = read_game_config_from_storage(&CallContext::for_user("user123"), &storage).await;

        assert_eq!(result, Ok("{not json".to_string()));
    }

    #[tokio::test]
    async fn storage_read_error_is_internal_error() {
        let mut storage = MockStorageGateway::new();
        storage
            .expect_read()
            .times(1)
            .returning(|_| Err(StorageError::Backend("storage read error".to_string())));

        let result = read_game_config_from_storage(&CallContext::for_user("user123"), &storage).await;

        assert_eq!(result, Err(RpcError::InternalError));
    }

    #[tokio::test]
    async fn storage_read_empty_is_not_found() {
        let mut storage = MockStorageGateway::new();
        storage.expect_read().times(1).returning(|_| Ok(Vec::new()));

        let result = read_game_config_from_storage(&CallContext::for_user("user123"), &storage).await;

        assert_eq!(result, Err(RpcError::NotFound));
    }

    #[tokio::test]
    async fn storage_read_requires_user() {
        let storage = MockStorageGateway::new();

        let result = read_game_config_from_storage(&CallContext::new(), &storage).await;

        assert_eq!(result, Err(RpcError::UserNotFound));
    }
}
