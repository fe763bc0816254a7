// src/chat/mod.rs
pub mod client;
pub mod frontend;

pub use client::{ChatError, HealthResponse, QueryApiClient, QueryResponse};
pub use frontend::{ChatFrontend, ConnectionStatus};
