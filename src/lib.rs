pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod search;
pub mod upstream;
