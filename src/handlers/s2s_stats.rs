// handlers/s2s_stats.rs - read_game_stats RPC (server to server only)

use tracing::{debug, error, info};

use crate::auth::{CallContext, Identity};
use crate::error::{RpcError, RpcResult};

/// Read stats on behalf of a trusted backend.
///
/// Inverse of the user-gated RPCs: a call carrying an end-user identity is
/// refused.
pub fn s2s_read_stats(ctx: &CallContext, _payload: &str) -> RpcResult {
    debug!("S2SReadStats RPC called");

    if let Identity::Authenticated(user_id) = ctx.identity() {
        error!("Rpc was called by a user: {}", user_id);
        return Err(RpcError::S2SPermissionDenied);
    }

    info!("processing S2S read stats");

    Ok(String::new())
}
