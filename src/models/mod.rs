pub mod rpc_request;
pub mod rpc_result;

pub use rpc_request::RpcRequest;
pub use rpc_result::{RpcResult, RpcStatus};
