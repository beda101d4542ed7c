pub mod domain;
pub mod ports;
pub mod services;
pub mod upstream;

pub use domain::{BatchQuery, BatchSummary, BatchesEnvelope, ReadingsEnvelope, Served};
pub use ports::{UpstreamApi, UpstreamResponse};
pub use services::{BatchService, ReadingsService};
pub use upstream::BrewfatherClient;
