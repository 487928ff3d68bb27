//! Backend abstraction for the remote services behind the console.
//!
//! The console talks to three remote services: an identity service, an
//! entity store (schemas and records), and a comparison engine. All three
//! sit behind the [`Backend`] trait so the console logic can be tested
//! against an in-memory implementation.
//!
//! The trait is always available; the concrete HTTP adapter requires the
//! `http` feature (enabled by default).

mod provider;

pub use provider::Backend;

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HttpBackend, HttpConfig, HttpConfigBuilder};
