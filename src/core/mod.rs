pub mod dataset;
pub mod engine;
pub mod exact;
pub mod greedy;
pub mod harness;
pub mod report;

pub use crate::domain::model::{BenchmarkRecord, BenchmarkReport, Instance, Item, Solution};
pub use crate::domain::ports::{ConfigProvider, InstanceSource, ReportSink, Solver, Storage};
pub use crate::utils::error::Result;
