pub mod auth;
pub mod error;
pub mod export;
pub mod saved;
pub mod scrape;
pub mod seeds;
pub mod settings;
pub mod site;
pub mod trends;

pub use error::{ApiError, ApiResult};
