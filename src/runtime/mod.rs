//! Module wiring: the registration surface the host exposes at load time
//! and the entry point that registers this module's RPCs and hook.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use thiserror::Error;
use tracing::{error, info};

use crate::auth::CallContext;
use crate::database::{AccountStore, StorageGateway};
use crate::error::{RpcError, RpcResult};
use crate::game_config::ConfigSource;
use crate::handlers;
use crate::hooks;
use crate::types::Session;

pub const RPC_UPDATE_ACCOUNT_METADATA: &str = "update_account_metaData";
pub const RPC_READ_GAME_CONFIG_FROM_FILE: &str = "read_game_config_from_file";
pub const RPC_READ_GAME_CONFIG_FROM_STORAGE: &str = "read_game_config_from_storage";
pub const RPC_S2S_READ_GAME_STATS: &str = "read_game_stats";

pub type RpcFuture = BoxFuture<'static, RpcResult>;

/// A registered RPC: context and raw payload in, JSON string or taxonomy error out
pub type RpcHandler = Arc<dyn Fn(CallContext, String) -> RpcFuture + Send + Sync>;

pub type HookFuture = BoxFuture<'static, Result<(), RpcError>>;

/// Runs after a device authentication with the host's session outcome
pub type AfterAuthenticateHook = Arc<dyn Fn(CallContext, Session) -> HookFuture + Send + Sync>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("rpc id must not be empty")]
    EmptyRpcId,

    #[error("rpc '{0}' is already registered")]
    DuplicateRpc(String),

    #[error("an after-authenticate hook is already registered")]
    HookAlreadyRegistered,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("rpc '{0}' is not registered")]
    UnknownRpc(String),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

/// Registration facility handed to the module at load time
pub trait Initializer {
    fn register_rpc(&mut self, id: &str, handler: RpcHandler) -> Result<(), RegistrationError>;

    fn register_after_authenticate_device(
        &mut self,
        hook: AfterAuthenticateHook,
    ) -> Result<(), RegistrationError>;
}

/// Backends shared by every handler
#[derive(Clone)]
pub struct ModuleDeps {
    pub config: Arc<dyn ConfigSource>,
    pub storage: Arc<dyn StorageGateway>,
    pub accounts: Arc<dyn AccountStore>,
}

/// In-process registry of RPCs and the after-authenticate hook
#[derive(Default)]
pub struct ModuleRegistry {
    rpcs: BTreeMap<String, RpcHandler>,
    after_authenticate: Option<AfterAuthenticateHook>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered RPC ids in sorted order
    pub fn rpc_ids(&self) -> Vec<&str> {
        self.rpcs.keys().map(String::as_str).collect()
    }

    pub fn has_after_authenticate_hook(&self) -> bool {
        self.after_authenticate.is_some()
    }

    /// Invoke one registered RPC
    pub async fn call(
        &self,
        id: &str,
        ctx: CallContext,
        payload: impl Into<String>,
    ) -> Result<String, DispatchError> {
        let handler = self
            .rpcs
            .get(id)
            .cloned()
            .ok_or_else(|| DispatchError::UnknownRpc(id.to_string()))?;
        Ok(handler(ctx, payload.into()).await?)
    }

    /// Run the after-authenticate hook, if one is registered
    pub async fn after_authenticate(&self, ctx: CallContext, session: Session) -> Result<(), DispatchError> {
        match self.after_authenticate.clone() {
            Some(hook) => Ok(hook(ctx, session).await?),
            None => Ok(()),
        }
    }
}

impl Initializer for ModuleRegistry {
    fn register_rpc(&mut self, id: &str, handler: RpcHandler) -> Result<(), RegistrationError> {
        if id.is_empty() {
            return Err(RegistrationError::EmptyRpcId);
        }
        if self.rpcs.contains_key(id) {
            return Err(RegistrationError::DuplicateRpc(id.to_string()));
        }
        self.rpcs.insert(id.to_string(), handler);
        Ok(())
    }

    fn register_after_authenticate_device(
        &mut self,
        hook: AfterAuthenticateHook,
    ) -> Result<(), RegistrationError> {
        if self.after_authenticate.is_some() {
            return Err(RegistrationError::HookAlreadyRegistered);
        }
        self.after_authenticate = Some(hook);
        Ok(())
    }
}

/// Register the module's RPCs and hook.
///
/// Failing to register one of the user RPCs is logged and loading goes on;
/// failing to register the server-to-server RPC or the hook aborts the load.
pub fn init_module(deps: &ModuleDeps, initializer: &mut dyn Initializer) -> Result<(), RegistrationError> {
    if let Err(e) = initializer.register_rpc(RPC_UPDATE_ACCOUNT_METADATA, update_account_metadata_rpc(deps)) {
        error!("Failed to register RPC {}", e);
    }

    if let Err(e) = initializer.register_rpc(RPC_READ_GAME_CONFIG_FROM_FILE, read_game_config_from_file_rpc(deps)) {
        error!("Failed to register RPC {}", e);
    }

    if let Err(e) =
        initializer.register_rpc(RPC_READ_GAME_CONFIG_FROM_STORAGE, read_game_config_from_storage_rpc(deps))
    {
        error!("Failed to register RPC {}", e);
    }

    if let Err(e) = initializer.register_rpc(RPC_S2S_READ_GAME_STATS, s2s_read_stats_rpc()) {
        error!("Error in registering RPC {}", e);
        return Err(e);
    }

    if let Err(e) = initializer.register_after_authenticate_device(initialize_user_hook(deps)) {
        error!("Unable to register: {}", e);
        return Err(e);
    }

    info!("Module loaded");
    Ok(())
}

fn update_account_metadata_rpc(deps: &ModuleDeps) -> RpcHandler {
    let accounts = deps.accounts.clone();
    Arc::new(move |ctx: CallContext, payload: String| {
        let accounts = accounts.clone();
        async move { handlers::update_account_metadata(&ctx, accounts.as_ref(), &payload).await }.boxed()
    })
}

fn read_game_config_from_file_rpc(deps: &ModuleDeps) -> RpcHandler {
    let config = deps.config.clone();
    Arc::new(move |ctx: CallContext, _payload: String| {
        let result = handlers::read_game_config_from_file(&ctx, config.as_ref());
        futures::future::ready(result).boxed()
    })
}

fn read_game_config_from_storage_rpc(deps: &ModuleDeps) -> RpcHandler {
    let storage = deps.storage.clone();
    Arc::new(move |ctx: CallContext, _payload: String| {
        let storage = storage.clone();
        async move { handlers::read_game_config_from_storage(&ctx, storage.as_ref()).await }.boxed()
    })
}

fn s2s_read_stats_rpc() -> RpcHandler {
    Arc::new(|ctx: CallContext, payload: String| {
        futures::future::ready(handlers::s2s_read_stats(&ctx, &payload)).boxed()
    })
}

fn initialize_user_hook(deps: &ModuleDeps) -> AfterAuthenticateHook {
    let config = deps.config.clone();
    let storage = deps.storage.clone();
    Arc::new(move |ctx: CallContext, session: Session| {
        let config = config.clone();
        let storage = storage.clone();
        async move { hooks::initialize_user(&ctx, &session, config.as_ref(), storage.as_ref()).await }.boxed()
    })
}
