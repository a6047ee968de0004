//! services/client/src/adapters/mod.rs
//!
//! Concrete implementations of the core crate's ports: the HTTP transport
//! to the remote recipe service and the durable credential storage.

pub mod http;
pub mod storage;
