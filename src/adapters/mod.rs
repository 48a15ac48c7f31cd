pub mod near_account;
pub mod near_rpc;

pub use near_account::{CallSettings, NearConnector, NearSession};
pub use near_rpc::{
    AccessKeyView, AccountView, ExecutionOutcome, NearRpcClient, RpcError, RpcErrorCause,
};
