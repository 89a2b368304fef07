pub mod enums;
pub mod models;
pub mod plans;

pub use enums::*;
pub use models::*;
pub use plans::*;
