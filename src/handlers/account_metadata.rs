// handlers/account_metadata.rs - update_account_metaData RPC

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use crate::auth::CallContext;
use crate::database::AccountStore;
use crate::error::{RpcError, RpcResult};
use crate::types::{Status, METADATA_SIZE_LIMIT};

#[derive(Debug, Serialize)]
pub struct AccountMetaDataResponse {
    pub status: Status,
}

/// Replace the caller's account metadata with `payload`.
///
/// All validation happens before the database is touched, so a failed call
/// never leaves a partial write behind. The stored value is the payload
/// exactly as received.
pub async fn update_account_metadata(
    ctx: &CallContext,
    accounts: &dyn AccountStore,
    payload: &str,
) -> RpcResult {
    debug!("UpdateAccountMetaData RPC called");

    let user_id = ctx.identity().require_user().map_err(|e| {
        warn!("Context did not contain user ID.");
        e
    })?;

    // Limit is on the raw payload, not on any re-encoded form
    if payload.len() > METADATA_SIZE_LIMIT {
        error!("Metadata size limit exceeded");
        return Err(RpcError::MetadataSizeLimit);
    }

    serde_json::from_str::<Map<String, Value>>(payload).map_err(|e| {
        error!("Cannot unmarshal metadata: {}", e);
        RpcError::UnmarshallingError
    })?;

    accounts
        .update_metadata(&user_id, payload)
        .await
        .map_err(|e| {
            error!("Cannot update metadata: {}", e);
            RpcError::InternalError
        })?;

    let resp = AccountMetaDataResponse { status: Status::Success };
    serde_json::to_string(&resp).map_err(|e| {
        error!("Cannot marshal response {}", e);
        RpcError::MarshallingError
    })
}
