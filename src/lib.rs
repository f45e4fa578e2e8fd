pub mod census;
pub mod config;
pub mod domain;
pub mod error;
pub mod loader;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod store;
pub mod table;
