mod batch_service;
mod readings_service;

pub use batch_service::BatchService;
pub use readings_service::ReadingsService;
