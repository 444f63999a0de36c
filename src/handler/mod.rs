//! Request handler module
//!
//! Responsible for request routing dispatch and the read-only chain endpoints.

pub mod blockchain;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
