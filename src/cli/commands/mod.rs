pub mod baseline;
pub mod hook;
pub mod rpc;
