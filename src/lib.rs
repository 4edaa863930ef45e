pub mod application;
pub mod cask;
pub mod commands;
pub mod executor;
pub mod runtime;
