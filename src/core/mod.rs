// src/core/mod.rs
//! Collaborators the library talks to: configuration, files, storage and
//! the content generation service

pub mod config_manager;
pub mod database;
pub mod fs_ops;
pub mod service_client;

pub use config_manager::ConfigManager;
pub use database::{Database, KeyValueStore, MemoryStore, ProfileStore};
pub use fs_ops::FsOps;
pub use service_client::{generate_content, ContentGenerator, ServiceClient};
