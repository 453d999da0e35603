pub mod auth_service;
pub mod geo;
pub mod moderation;
pub mod spam;
pub mod trust;
