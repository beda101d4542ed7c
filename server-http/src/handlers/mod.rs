pub mod batches;
pub mod fallback;
pub mod health;
pub mod pages;
pub mod readings;

pub use batches::get_batches;
pub use health::health_check;
pub use fallback::{method_not_allowed, not_found};
pub use pages::{dashboard_page, setup_page};
pub use readings::get_readings;
