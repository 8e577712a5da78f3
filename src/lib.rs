//! MT7 JSON-RPC client library
//!
//! One blocking JSON-RPC 2.0 round trip per call against the MobiusTrader 7
//! API, with bearer or basic authentication and a normalized result shape.

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

// Re-export commonly used types for convenience
pub use clients::RpcCaller;
pub use config::{ClientConfig, ClientOptions, ResponseMapping};
pub use error::{ClientError, ClientResult};
pub use models::{RpcRequest, RpcResult, RpcStatus};
