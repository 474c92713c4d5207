pub mod audio_models;
pub mod config;
pub mod error;
pub mod saved_take;
pub mod state;
pub mod store;
pub mod take;
