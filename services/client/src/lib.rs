//! services/client/src/lib.rs
//!
//! The client service library: adapters for the remote recipe API and the
//! credential file, the session store, the tag-invalidated cache, the
//! listing controller, form handling, and the routing surface.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod error;
pub mod form;
pub mod listing;
pub mod routes;
pub mod session;
