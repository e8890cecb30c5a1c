// HTTP Server modules
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;

// Vocabulary flows and persistence
pub mod service;
pub mod store;

// Language model, prompt and speech layers
pub mod linguistic;
pub mod llm;
pub mod speech;
