pub mod auth;
pub mod breathe;
pub mod completions;
pub mod config;
pub mod meditate;
pub mod shell;
