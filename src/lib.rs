pub mod api;
pub mod config;
pub mod error;
pub mod generator;
pub mod listing;
pub mod registry;
pub mod server;
pub mod shutdown;
pub mod workflow;
