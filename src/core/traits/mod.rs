pub mod signing_engine;
