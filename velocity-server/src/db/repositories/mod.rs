mod profile_repository;
mod category_repository;
mod trend_repository;
mod metric_repository;
mod seed_repository;
mod saved_repository;

pub use profile_repository::ProfileRepository;
pub use category_repository::CategoryRepository;
pub use trend_repository::{DashboardQuery, TrendRepository};
pub use metric_repository::MetricRepository;
pub use seed_repository::SeedRepository;
pub use saved_repository::SavedTrendRepository;
