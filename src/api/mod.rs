//! Sheet Filter API Server module
//!
//! HTTP boundary over the filter pipelines.
//! Run with `sheet-filter-server`.

pub mod handlers;
pub mod server;

pub use server::run_api_server;
