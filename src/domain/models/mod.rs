pub mod appointment;
pub mod auth;
pub mod job;
pub mod service;
pub mod settings;
