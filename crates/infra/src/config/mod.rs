//! Configuration loading and management
//!
//! This module provides utilities for loading backend connection settings
//! from environment variables and files.

pub mod loader;

// Re-export commonly used items
pub use loader::{
    find_config_file, find_config_in, into_client_config, load, load_from_env, load_from_file,
};
