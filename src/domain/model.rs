use crate::utils::error::{BenchError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub weight: u64,
    pub value: f64,
}

/// 一個背包問題實例：有序物品序列與容量，建立後不可變
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    label: String,
    weights: Vec<u64>,
    values: Vec<f64>,
    capacity: u64,
}

impl Instance {
    pub fn new(label: impl Into<String>, items: &[Item], capacity: u64) -> Self {
        Self {
            label: label.into(),
            weights: items.iter().map(|item| item.weight).collect(),
            values: items.iter().map(|item| item.value).collect(),
            capacity,
        }
    }

    pub fn from_parts(
        label: impl Into<String>,
        weights: Vec<u64>,
        values: Vec<f64>,
        capacity: u64,
    ) -> Result<Self> {
        if weights.len() != values.len() {
            return Err(BenchError::invalid_input(format!(
                "weights and values lengths must match ({} != {})",
                weights.len(),
                values.len()
            )));
        }
        Ok(Self {
            label: label.into(),
            weights,
            values,
            capacity,
        })
    }

    /// 相同物品、不同容量 (容量敏感度分析用)
    pub fn with_capacity(&self, capacity: u64) -> Self {
        Self {
            capacity,
            ..self.clone()
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = Item> + '_ {
        self.weights
            .iter()
            .zip(&self.values)
            .map(|(&weight, &value)| Item { weight, value })
    }
}

/// 求解結果；`items` 為選取物品在原始序列中的索引 (遞增)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    pub value: f64,
    pub items: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Exact,
    Greedy,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Exact, Algorithm::Greedy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Exact => "exact",
            Algorithm::Greedy => "greedy",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" | "dp" => Ok(Algorithm::Exact),
            "greedy" => Ok(Algorithm::Greedy),
            other => Err(BenchError::InvalidConfigValueError {
                field: "algorithm".to_string(),
                value: other.to_string(),
                reason: "Valid algorithms: exact, greedy".to_string(),
            }),
        }
    }
}

/// DP 表的配置方式。
///
/// `Full` 保留整張 `(n + 1) x (capacity + 1)` 的連續表格，記憶體量測反映完整表格。
/// `Rolling` 只保留兩列，記憶體峰值只反映 `2 x (capacity + 1)`，量測結果不可與 `Full` 直接比較。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableLayout {
    #[default]
    Full,
    Rolling,
}

impl FromStr for TableLayout {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(TableLayout::Full),
            "rolling" => Ok(TableLayout::Rolling),
            other => Err(BenchError::InvalidConfigValueError {
                field: "table_layout".to_string(),
                value: other.to_string(),
                reason: "Valid layouts: full, rolling".to_string(),
            }),
        }
    }
}

/// 一次量測視窗的設定 (容量、重複次數、是否追蹤記憶體)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    pub capacity: u64,
    pub repeats: usize,
    pub track_memory: bool,
}

impl BenchmarkConfig {
    pub fn new(capacity: u64, repeats: usize, track_memory: bool) -> Result<Self> {
        crate::utils::validation::validate_positive_number("repeats", repeats, 1)?;
        Ok(Self {
            capacity,
            repeats,
            track_memory,
        })
    }

    pub fn with_capacity(self, capacity: u64) -> Self {
        Self { capacity, ..self }
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            capacity: 480,
            repeats: 3,
            track_memory: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    #[serde(rename = "Dataset")]
    pub dataset: String,
    #[serde(rename = "Algorithm")]
    pub algorithm: String,
    #[serde(rename = "n_items")]
    pub n_items: usize,
    #[serde(rename = "Capacity_W")]
    pub capacity: u64,
    #[serde(rename = "Value")]
    pub value: f64,
    #[serde(rename = "Runtime_sec")]
    pub runtime_sec: f64,
    /// 未啟用記憶體追蹤時為 None (CSV 中為空欄位)
    #[serde(rename = "Memory_KB")]
    pub memory_kb: Option<f64>,
}

/// 同一資料集、同一容量下精確解與貪婪解的對照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    #[serde(rename = "Dataset")]
    pub dataset: String,
    #[serde(rename = "n_items")]
    pub n_items: usize,
    #[serde(rename = "W")]
    pub capacity: u64,
    #[serde(rename = "Exact_DP_Value")]
    pub exact_value: f64,
    #[serde(rename = "Greedy_Value")]
    pub greedy_value: f64,
    #[serde(rename = "Exact_Runtime_sec")]
    pub exact_runtime_sec: f64,
    #[serde(rename = "Greedy_Runtime_sec")]
    pub greedy_runtime_sec: f64,
    #[serde(rename = "Exact_Memory_KB")]
    pub exact_memory_kb: Option<f64>,
    #[serde(rename = "Greedy_Memory_KB")]
    pub greedy_memory_kb: Option<f64>,
    #[serde(rename = "Optimality_Gap")]
    pub optimality_gap: f64,
}

impl ComparisonRecord {
    pub fn from_records(exact: &BenchmarkRecord, greedy: &BenchmarkRecord) -> Self {
        Self {
            dataset: exact.dataset.clone(),
            n_items: exact.n_items,
            capacity: exact.capacity,
            exact_value: exact.value,
            greedy_value: greedy.value,
            exact_runtime_sec: exact.runtime_sec,
            greedy_runtime_sec: greedy.runtime_sec,
            exact_memory_kb: exact.memory_kb,
            greedy_memory_kb: greedy.memory_kb,
            optimality_gap: optimality_gap(exact.value, greedy.value),
        }
    }
}

/// (exact - greedy) / exact * 100；exact 為 0 時差距定義為 0
pub fn optimality_gap(exact_value: f64, greedy_value: f64) -> f64 {
    if exact_value <= 0.0 {
        return 0.0;
    }
    (exact_value - greedy_value) / exact_value * 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetFailure {
    pub dataset: String,
    pub error: String,
}

/// 一次批次執行的結果表，只能追加
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    algorithm: String,
    capacity: u64,
    records: Vec<BenchmarkRecord>,
    failures: Vec<DatasetFailure>,
}

impl BenchmarkReport {
    pub fn new(algorithm: impl Into<String>, capacity: u64) -> Self {
        Self {
            algorithm: algorithm.into(),
            capacity,
            records: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn append(&mut self, record: BenchmarkRecord) {
        self.records.push(record);
    }

    pub fn append_failure(&mut self, failure: DatasetFailure) {
        self.failures.push(failure);
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn records(&self) -> &[BenchmarkRecord] {
        &self.records
    }

    pub fn failures(&self) -> &[DatasetFailure] {
        &self.failures
    }

    pub fn into_records(self) -> Vec<BenchmarkRecord> {
        self.records
    }
}
