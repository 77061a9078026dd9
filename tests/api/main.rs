//! HTTP API integration tests.
//!
//! Each test starts an axum server on port 0 and exercises it with reqwest.

#[cfg(feature = "http")]
mod support;

#[cfg(feature = "http")]
mod persons;

#[cfg(feature = "http")]
mod errors;

#[cfg(feature = "http")]
mod static_files;
