pub mod config;
pub mod document;
pub mod error;
pub mod format;
pub mod report;
pub mod summary;
pub mod telemetry;
pub mod transport;

pub use config::Config;
pub use document::Document;
pub use error::{AppError, AppResult};
pub use report::{FetchOptions, RiskClassification, RiskReport};
pub use summary::Summary;
pub use transport::{HttpTransport, Transport};
