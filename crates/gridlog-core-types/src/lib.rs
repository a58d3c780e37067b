//! Core types shared across gridlog facilities
//!
//! This crate provides the leaf types used by the logging facade and by its
//! own diagnostics:
//!
//! - **Node identity**: NodeId, the runtime-assigned identity embedded in log file names
//! - **Schema constants**: Canonical field keys and event names

pub mod node;
pub mod schema;

pub use node::NodeId;
