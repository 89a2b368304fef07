mod client;
mod error;

pub use client::{ApiClient, DashboardFilters};
pub use error::{ApiError, ApiResult};
