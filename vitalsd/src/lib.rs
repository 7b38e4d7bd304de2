pub mod api;
pub mod collectors;
pub mod config;
pub mod metrics;
pub mod sampler;
pub mod types;
pub mod ui;

pub use collectors::{SnapshotSource, SysinfoSource};
pub use config::{Config, LoggingConfig, RuntimeConfig};
pub use metrics::Metrics;
pub use sampler::{Engine, History, SampleError, Thresholds};
pub use types::Sample;
