pub mod app_module;
pub mod app_router;
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod health;
pub mod script_generator;
pub mod scripts;
