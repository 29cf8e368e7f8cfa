//! Logging initialization shared by the harness library and its test
//! binaries.
pub mod tracing;
