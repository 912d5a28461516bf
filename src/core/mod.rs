pub mod app;
pub mod attachment;
pub mod client;
pub mod config;
pub mod message;
pub mod paths;
pub mod render;
pub mod session;
