pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod game_config;
pub mod handlers;
pub mod hooks;
pub mod runtime;
pub mod types;

pub use auth::{CallContext, Identity};
pub use error::{RpcCode, RpcError, RpcResult};
pub use runtime::{init_module, Initializer, ModuleDeps, ModuleRegistry};
