pub mod auth_controller;
pub mod auth_middleware;
pub mod firebase_identity;
pub mod identity_provider;
pub mod jwt;
