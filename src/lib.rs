pub mod api;
pub mod bridge;
pub mod client;
pub mod config;
pub mod data_models;
pub mod error;
pub mod session;
pub mod validator;
