pub mod config;
pub mod error;
pub mod server;

pub use error::{Error, Result};
