//! Switcheroo Library
//!
//! Hardware inventory and Linux compatibility resolution: probe the machine,
//! normalize and deduplicate what was found, resolve each component against a
//! remote service with a vendor-table fallback, and aggregate a scored report.

pub mod cli;
pub mod command;
pub mod compat;
pub mod config;
pub mod environment;
pub mod error;
pub mod hardware;
pub mod logic;
pub mod pipeline;
pub mod report;
pub mod types;

// Re-export main types for convenience
pub use compat::{CompatibilityResult, CompatibilitySource, HttpSource, LookupOutcome, VendorTable};
pub use config::ScanConfig;
pub use environment::Environment;
pub use error::{ProbeError, SwitcherooError};
pub use hardware::{DeviceCategory, HardwareComponent, HardwareQuery, RawDevice};
pub use logic::normalize::DeviceIds;
pub use logic::resolver::Resolver;
pub use pipeline::{ScanOutcome, scan};
pub use report::{Readiness, Report, Summary, SystemInfo};
pub use types::{ComponentType, Compatibility, ProbeStrategy, ResultSource, ResultStatus};
