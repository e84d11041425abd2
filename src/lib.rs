pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod local_image;
pub mod session;
pub mod terminal;
