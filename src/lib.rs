pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod import;
pub mod infrastructure;
pub mod models;
pub mod seed;
pub mod server;
