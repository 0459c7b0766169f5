// src/lib.rs

pub mod config;
pub mod repositories;
pub mod services;
pub mod wardrobe;

pub use closetiq_common::error::Error;
pub use config::AppConfig;
pub use repositories::{FileKeyValueStore, InMemoryKeyValueStore};
pub use wardrobe::WardrobeStore;
