//! Subprocess-based fallback transport

pub mod curl;

pub use curl::{curl_args, parse_write_out, CurlTransport, WriteOut};
