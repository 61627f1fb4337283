pub mod config;
pub mod lyrics;
pub mod models;
pub mod settings;
pub mod storage;
