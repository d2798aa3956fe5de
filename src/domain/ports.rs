use crate::domain::model::{
    Algorithm, BenchmarkConfig, BenchmarkReport, ComparisonRecord, Instance, Solution,
    TableLayout,
};
use crate::utils::error::{BenchError, Result};

/// 共同的求解能力：(weights, values, capacity) -> 總價值
pub trait Solver {
    fn name(&self) -> &'static str;

    fn solve(&self, weights: &[u64], values: &[f64], capacity: u64) -> Result<f64>;

    /// 同時回傳選取的物品索引
    fn solve_detailed(&self, weights: &[u64], values: &[f64], capacity: u64) -> Result<Solution>;

    fn solve_instance(&self, instance: &Instance) -> Result<f64> {
        self.solve(instance.weights(), instance.values(), instance.capacity())
    }
}

/// 兩個求解器共用的前置條件檢查
pub fn check_solver_inputs(weights: &[u64], values: &[f64]) -> Result<()> {
    if weights.len() != values.len() {
        return Err(BenchError::invalid_input(format!(
            "weights and values lengths must match ({} != {})",
            weights.len(),
            values.len()
        )));
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite() || *v < 0.0) {
        return Err(BenchError::invalid_input(format!(
            "item {} has value {} which is not a non-negative number",
            index, values[index]
        )));
    }
    Ok(())
}

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
    /// 列出指定副檔名的檔案 (排序後)
    fn list_files(&self, extension: &str) -> Result<Vec<String>>;
}

pub trait InstanceSource {
    fn load(&self, dataset: &str, capacity: u64) -> Result<Instance>;
}

pub trait ReportSink {
    /// 回傳寫出的檔案路徑
    fn write_report(&self, name: &str, report: &BenchmarkReport) -> Result<Vec<String>>;
    fn write_comparison(&self, name: &str, rows: &[ComparisonRecord]) -> Result<Vec<String>>;
}

pub trait ConfigProvider {
    fn data_dir(&self) -> &str;
    fn dataset_files(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> Vec<String>;
    fn algorithms(&self) -> Result<Vec<Algorithm>>;
    fn capacities(&self) -> Result<Vec<u64>>;
    fn benchmark_config(&self) -> Result<BenchmarkConfig>;
    fn monitoring_enabled(&self) -> bool;

    /// 未設定時為 `TableLayout::Full`；無法辨識的設定值回傳錯誤
    fn table_layout(&self) -> Result<TableLayout> {
        Ok(TableLayout::Full)
    }
}
