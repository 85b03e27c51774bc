pub mod artifacts;
pub mod codec;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod features;
pub mod forest;
pub mod split;
pub mod state;
