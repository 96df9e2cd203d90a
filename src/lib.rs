//! FAQ chatbot backend: serves FAQ content and answers chat messages through
//! an external language model, falling back to keyword matching when the
//! model is unavailable.

pub mod config;
pub mod error;
pub mod message;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod telemetry;
