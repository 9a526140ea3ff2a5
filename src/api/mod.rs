//! Backend REST surface: wire types and the HTTP client behind [`EventsApi`].

pub mod client;
pub mod types;

pub use client::{ApiClient, ApiError, EventsApi};
