//! Newline-delimited JSON-RPC 2.0 over stdio

pub mod messages;
pub mod server;

pub use messages::{error_codes, Id, Request, Response, RpcError, ToolCallParams};
pub use server::{Server, ServerError, PROTOCOL_VERSION, SERVER_NAME};
