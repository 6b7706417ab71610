//! HTTP protocol layer module
//!
//! Response building helpers shared by both endpoints, decoupled from the
//! form-processing business logic.

pub mod response;

pub use response::{json_response, not_found, options_response};
