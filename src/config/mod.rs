pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::{Algorithm, BenchmarkConfig, TableLayout};
use crate::utils::error::{BenchError, Result};
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "knapsack-bench")]
#[command(about = "Benchmark exact DP and greedy solvers for the 0/1 knapsack problem")]
pub struct CliConfig {
    #[arg(long, default_value = "datasets")]
    pub data_dir: String,

    /// Dataset files inside the data directory (default: every *.csv)
    #[arg(long, value_delimiter = ',')]
    pub datasets: Vec<String>,

    /// Knapsack capacity; several values run a capacity sweep
    #[arg(long, value_delimiter = ',', default_value = "480", allow_negative_numbers = true)]
    pub capacity: Vec<i64>,

    #[arg(long, default_value = "3")]
    pub repeats: usize,

    /// exact, greedy or both
    #[arg(long, default_value = "both")]
    pub algorithm: String,

    /// full or rolling
    #[arg(long, default_value = "full")]
    pub table_layout: String,

    #[arg(long, help = "Disable peak memory tracking")]
    pub no_memory: bool,

    #[arg(long, default_value = "./results")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "csv")]
    pub formats: Vec<String>,

    #[arg(long, help = "Log process CPU/RSS after each dataset")]
    pub monitor: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: "datasets".to_string(),
            datasets: Vec::new(),
            capacity: vec![480],
            repeats: 3,
            algorithm: "both".to_string(),
            table_layout: "full".to_string(),
            no_memory: false,
            output_path: "./results".to_string(),
            formats: vec!["csv".to_string()],
            monitor: false,
            verbose: false,
        }
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn dataset_files(&self) -> &[String] {
        &self.datasets
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> Vec<String> {
        self.formats.clone()
    }

    fn algorithms(&self) -> Result<Vec<Algorithm>> {
        if self.algorithm.trim().eq_ignore_ascii_case("both") {
            return Ok(Algorithm::ALL.to_vec());
        }
        Ok(vec![self.algorithm.parse()?])
    }

    fn capacities(&self) -> Result<Vec<u64>> {
        if self.capacity.is_empty() {
            return Err(BenchError::MissingConfigError {
                field: "capacity".to_string(),
            });
        }
        self.capacity
            .iter()
            .map(|&raw| validation::validate_capacity("capacity", raw))
            .collect()
    }

    fn benchmark_config(&self) -> Result<BenchmarkConfig> {
        let capacity = self.capacities()?[0];
        BenchmarkConfig::new(capacity, self.repeats, !self.no_memory)
    }

    fn monitoring_enabled(&self) -> bool {
        self.monitor
    }

    fn table_layout(&self) -> Result<TableLayout> {
        self.table_layout.parse()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("data_dir", &self.data_dir)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_positive_number("repeats", self.repeats, 1)?;
        validation::validate_file_extensions("datasets", &self.datasets, &["csv"])?;
        validation::validate_one_of(
            "formats",
            &self.formats,
            &crate::core::report::SUPPORTED_FORMATS,
        )?;
        self.table_layout()?;
        self.algorithms()?;
        self.capacities()?;
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_defaults() {
        let config = CliConfig::parse_from(["knapsack-bench"]);
        assert_eq!(config.capacities().unwrap(), vec![480]);
        assert_eq!(config.algorithms().unwrap(), Algorithm::ALL.to_vec());
        assert!(config.benchmark_config().unwrap().track_memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_cli_capacity_sweep() {
        let config = CliConfig::parse_from([
            "knapsack-bench",
            "--capacity",
            "100,200,300",
            "--algorithm",
            "greedy",
            "--no-memory",
        ]);
        assert_eq!(config.capacities().unwrap(), vec![100, 200, 300]);
        assert_eq!(config.algorithms().unwrap(), vec![Algorithm::Greedy]);
        let bench = config.benchmark_config().unwrap();
        assert_eq!(bench.capacity, 100);
        assert!(!bench.track_memory);
    }

    #[test]
    fn test_negative_capacity_rejected() {
        let config = CliConfig::parse_from(["knapsack-bench", "--capacity", "-5"]);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, BenchError::InvalidConfigValueError { .. }));
        // 設定錯誤以退出碼 2 結束
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_zero_repeats_rejected() {
        let config = CliConfig {
            repeats: 0,
            ..CliConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_layout_rejected() {
        let config = CliConfig {
            table_layout: "sparse".to_string(),
            ..CliConfig::default()
        };
        assert!(config.validate().is_err());
        // 未先呼叫 validate 也不會默默改用 Full
        assert!(matches!(
            config.table_layout(),
            Err(BenchError::InvalidConfigValueError { .. })
        ));
    }
}
