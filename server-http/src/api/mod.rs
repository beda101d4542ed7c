pub mod error;
pub mod query;
pub mod responses;

pub use error::ApiError;
pub use query::{first_value, QueryPairs};
pub use responses::{ErrorResponse, HealthResponse};
