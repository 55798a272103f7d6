pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod routes;
pub mod sources;
pub mod state;
