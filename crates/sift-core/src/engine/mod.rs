pub mod adapters;
pub mod cache;
pub mod config;
pub mod error;
pub mod locator;
pub mod progress;
pub mod recover;
pub mod resolver;
