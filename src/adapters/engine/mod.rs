pub mod gpg_engine;
pub mod status;
