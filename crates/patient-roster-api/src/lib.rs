//! Upstream patient listing clients.
//!
//! This crate provides [`PatientSource`](patient_roster_core::PatientSource)
//! implementations: an HTTP client for the `users` endpoint (feature `http`)
//! and a canned source for tests and offline demos.

pub mod config;
pub mod fixture;
#[cfg(feature = "http")]
pub mod http;

pub use config::*;
pub use fixture::*;
#[cfg(feature = "http")]
pub use http::*;
