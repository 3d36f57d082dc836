pub mod appointment;
pub mod auth;
pub mod content;
pub mod health;
pub mod service;
pub mod slots;
