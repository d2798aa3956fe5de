use crate::core::ConfigProvider;
use crate::domain::model::{Algorithm, BenchmarkConfig, TableLayout};
use crate::utils::error::{BenchError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub benchmark: BenchmarkInfo,
    pub datasets: DatasetsConfig,
    pub run: RunConfig,
    pub output: OutputConfig,
    pub sweep: Option<SweepConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetsConfig {
    pub dir: String,
    pub files: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub capacity: Option<i64>,
    pub capacities: Option<Vec<i64>>, // 多個容量時逐一執行
    pub repeats: Option<usize>,
    pub track_memory: Option<bool>,
    pub algorithms: Option<Vec<String>>,
    pub table_layout: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    pub dataset: String,
    pub capacities: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub formats: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_format: Option<String>, // "compact" 或 "json"
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BenchError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BenchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BenchError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("benchmark.name", &self.benchmark.name)?;
        validation::validate_path("datasets.dir", &self.datasets.dir)?;
        validation::validate_path("output.path", &self.output.path)?;

        if let Some(files) = &self.datasets.files {
            validation::validate_file_extensions("datasets.files", files, &["csv"])?;
        }

        if let Some(repeats) = self.run.repeats {
            validation::validate_positive_number("run.repeats", repeats, 1)?;
        }

        validation::validate_one_of(
            "output.formats",
            &self.output_formats(),
            &crate::core::report::SUPPORTED_FORMATS,
        )?;

        self.table_layout()?;

        if let Some(monitoring) = &self.monitoring {
            if let Some(format) = &monitoring.log_format {
                validation::validate_one_of(
                    "monitoring.log_format",
                    std::slice::from_ref(format),
                    &["compact", "json"],
                )?;
            }
        }

        if let Some(sweep) = &self.sweep {
            validation::validate_non_empty_string("sweep.dataset", &sweep.dataset)?;
            self.sweep_capacities()?;
        }

        self.algorithms()?;
        self.capacities()?;
        Ok(())
    }

    pub fn repeats(&self) -> usize {
        self.run.repeats.unwrap_or(3)
    }

    pub fn track_memory(&self) -> bool {
        self.run.track_memory.unwrap_or(true)
    }

    pub fn json_logging(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .map(|format| format == "json")
            .unwrap_or(false)
    }

    /// 容量敏感度分析的容量清單
    pub fn sweep_capacities(&self) -> Result<Vec<u64>> {
        match &self.sweep {
            Some(sweep) => sweep
                .capacities
                .iter()
                .map(|&raw| validation::validate_capacity("sweep.capacities", raw))
                .collect(),
            None => Ok(Vec::new()),
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn data_dir(&self) -> &str {
        &self.datasets.dir
    }

    fn dataset_files(&self) -> &[String] {
        self.datasets.files.as_deref().unwrap_or(&[])
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> Vec<String> {
        self.output
            .formats
            .clone()
            .unwrap_or_else(|| vec!["csv".to_string()])
    }

    fn algorithms(&self) -> Result<Vec<Algorithm>> {
        match &self.run.algorithms {
            Some(names) if !names.is_empty() => names.iter().map(|name| name.parse()).collect(),
            _ => Ok(Algorithm::ALL.to_vec()),
        }
    }

    fn capacities(&self) -> Result<Vec<u64>> {
        let raw = match (&self.run.capacities, self.run.capacity) {
            (Some(list), _) if !list.is_empty() => list.clone(),
            (_, Some(single)) => vec![single],
            _ => {
                return Err(BenchError::MissingConfigError {
                    field: "run.capacity".to_string(),
                })
            }
        };
        raw.into_iter()
            .map(|c| validation::validate_capacity("run.capacity", c))
            .collect()
    }

    fn benchmark_config(&self) -> Result<BenchmarkConfig> {
        let capacity = self.capacities()?[0];
        BenchmarkConfig::new(capacity, self.repeats(), self.track_memory())
    }

    fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    fn table_layout(&self) -> Result<TableLayout> {
        match self.run.table_layout.as_deref() {
            Some(layout) => layout.parse(),
            None => Ok(TableLayout::default()),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[benchmark]
name = "dp-vs-greedy"
description = "Baseline run"

[datasets]
dir = "datasets"
files = ["knapsack_instance_50.csv", "knapsack_instance_100.csv"]

[run]
capacity = 480
repeats = 5
track_memory = false
algorithms = ["exact"]

[output]
path = "./results"
formats = ["csv", "json"]
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.benchmark.name, "dp-vs-greedy");
        assert_eq!(config.dataset_files().len(), 2);
        assert_eq!(config.capacities().unwrap(), vec![480]);
        assert_eq!(config.algorithms().unwrap(), vec![Algorithm::Exact]);
        assert_eq!(
            config.benchmark_config().unwrap(),
            BenchmarkConfig {
                capacity: 480,
                repeats: 5,
                track_memory: false,
            }
        );
        assert_eq!(config.table_layout().unwrap(), TableLayout::Full);
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_capacities_take_precedence() {
        let toml_content = r#"
[benchmark]
name = "sensitivity"

[datasets]
dir = "datasets"

[run]
capacity = 480
capacities = [100, 200, 300]
table_layout = "rolling"

[output]
path = "./results"

[sweep]
dataset = "knapsack_instance_200.csv"
capacities = [50, 100]

[monitoring]
enabled = true
log_format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.capacities().unwrap(), vec![100, 200, 300]);
        assert_eq!(config.sweep_capacities().unwrap(), vec![50, 100]);
        assert_eq!(config.algorithms().unwrap(), Algorithm::ALL.to_vec());
        assert_eq!(config.output_formats(), vec!["csv".to_string()]);
        assert_eq!(config.table_layout().unwrap(), TableLayout::Rolling);
        assert!(config.json_logging());
        assert!(config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("KNAPSACK_TEST_DATA_DIR", "/tmp/knapsack-data");

        let toml_content = r#"
[benchmark]
name = "env"

[datasets]
dir = "${KNAPSACK_TEST_DATA_DIR}"

[run]
capacity = 10

[output]
path = "./results"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.data_dir(), "/tmp/knapsack-data");

        std::env::remove_var("KNAPSACK_TEST_DATA_DIR");
    }

    #[test]
    fn test_negative_capacity_fails_validation() {
        let toml_content = r#"
[benchmark]
name = "bad"

[datasets]
dir = "datasets"

[run]
capacity = -10

[output]
path = "./results"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(BenchError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_missing_capacity_fails_validation() {
        let toml_content = r#"
[benchmark]
name = "no-capacity"

[datasets]
dir = "datasets"

[run]

[output]
path = "./results"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(BenchError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_unknown_table_layout_is_an_error() {
        let toml_content = r#"
[benchmark]
name = "bad-layout"

[datasets]
dir = "datasets"

[run]
capacity = 10
table_layout = "sparse"

[output]
path = "./results"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.table_layout(),
            Err(BenchError::InvalidConfigValueError { .. })
        ));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.benchmark.name, "dp-vs-greedy");
    }
}
