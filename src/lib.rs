pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use core::{
    engine::BenchEngine, exact::ExactSolver, greedy::GreedySolver, harness::Harness,
    report::FileReportSink,
};
pub use domain::model::{BenchmarkConfig, BenchmarkRecord, Instance, Item, TableLayout};
pub use domain::ports::Solver;
pub use utils::error::{BenchError, Result};

// 量測視窗需要經過追蹤配置器
#[global_allocator]
static GLOBAL: utils::memory::TrackingAllocator = utils::memory::TrackingAllocator;
