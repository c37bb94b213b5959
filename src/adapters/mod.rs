pub mod compression;
pub mod engine;
pub mod key_stores;
