//! `Dex` Server -- loads the Pokemon catalog at startup and serves health endpoints.

pub mod catalog;
pub mod models;
pub mod network;

pub use catalog::Catalog;
pub use models::Pokemon;
