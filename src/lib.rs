//! Lesson planning backend: lesson and resource-link storage, HTML and
//! email exports, and the state behind the lesson editor screen.
//!
//! The `lessond` binary exposes this crate over a line-delimited JSON
//! sidecar on stdin/stdout ([`ipc`]) and a REST surface ([`http`]).

pub mod api;
pub mod backup;
pub mod client;
pub mod db;
pub mod editor;
pub mod export;
pub mod http;
pub mod ipc;
pub mod model;
pub mod schema;
pub mod setup;
pub mod store;
