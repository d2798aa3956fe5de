use crate::core::dataset::CsvInstanceLoader;
use crate::core::exact::ExactSolver;
use crate::core::greedy::GreedySolver;
use crate::core::harness::Harness;
use crate::core::report::compare_records;
use crate::domain::model::{
    Algorithm, BenchmarkRecord, BenchmarkReport, ComparisonRecord, TableLayout,
};
use crate::domain::ports::{ConfigProvider, ReportSink, Solver, Storage};
use crate::utils::error::{BenchError, Result};

/// 一次完整執行的摘要
#[derive(Debug)]
pub struct RunSummary {
    pub reports: Vec<BenchmarkReport>,
    pub comparison: Vec<ComparisonRecord>,
    pub written: Vec<String>,
}

impl RunSummary {
    pub fn failure_count(&self) -> usize {
        self.reports.iter().map(|r| r.failures().len()).sum()
    }
}

pub fn solver_for(algorithm: Algorithm, layout: TableLayout) -> Box<dyn Solver> {
    match algorithm {
        Algorithm::Exact => Box::new(ExactSolver::with_layout(layout)),
        Algorithm::Greedy => Box::new(GreedySolver::new()),
    }
}

/// 報表檔名；多個容量時附上 `_W<capacity>` 以免互相覆蓋
pub fn report_name(algorithm: Algorithm, capacity: u64, multiple_capacities: bool) -> String {
    if multiple_capacities {
        format!("{}_runtime_summary_W{}", algorithm, capacity)
    } else {
        format!("{}_runtime_summary", algorithm)
    }
}

pub struct BenchEngine<C: ConfigProvider, D: Storage + Clone, R: ReportSink> {
    config: C,
    data: D,
    sink: R,
    monitor_enabled: bool,
}

impl<C: ConfigProvider, D: Storage + Clone, R: ReportSink> BenchEngine<C, D, R> {
    pub fn new(config: C, data: D, sink: R) -> Self {
        let monitor_enabled = config.monitoring_enabled();
        Self {
            config,
            data,
            sink,
            monitor_enabled,
        }
    }

    pub fn new_with_monitoring(config: C, data: D, sink: R, monitor_enabled: bool) -> Self {
        Self {
            config,
            data,
            sink,
            monitor_enabled,
        }
    }

    /// 未指定資料集時使用資料目錄下所有 CSV (已排序)
    pub fn resolve_datasets(&self) -> Result<Vec<String>> {
        let datasets = if self.config.dataset_files().is_empty() {
            self.data.list_files("csv")?
        } else {
            self.config.dataset_files().to_vec()
        };

        if datasets.is_empty() {
            return Err(BenchError::ConfigError {
                message: format!("No CSV files found in directory: {}", self.config.data_dir()),
            });
        }
        Ok(datasets)
    }

    fn harness(&self) -> Result<Harness<CsvInstanceLoader<D>>> {
        Ok(Harness::new_with_monitoring(
            CsvInstanceLoader::new(self.data.clone()),
            self.config.benchmark_config()?,
            self.monitor_enabled,
        ))
    }

    pub fn run(&self) -> Result<RunSummary> {
        tracing::info!("🚀 Starting knapsack benchmark");

        let datasets = self.resolve_datasets()?;
        let algorithms = self.config.algorithms()?;
        let capacities = self.config.capacities()?;
        let layout = self.config.table_layout()?;
        let multiple_capacities = capacities.len() > 1;
        tracing::info!(
            "📋 {} datasets, algorithms [{}], capacities {:?}",
            datasets.len(),
            algorithms
                .iter()
                .map(|a| a.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            capacities
        );

        let mut harness = self.harness()?;
        let mut reports = Vec::new();
        let mut written = Vec::new();

        for &capacity in &capacities {
            harness.set_capacity(capacity);
            for &algorithm in &algorithms {
                let solver = solver_for(algorithm, layout);
                let report = harness.run_all(&datasets, solver.as_ref())?;
                let name = report_name(algorithm, capacity, multiple_capacities);
                written.extend(self.sink.write_report(&name, &report)?);
                reports.push(report);
            }
        }

        let comparison = if algorithms.contains(&Algorithm::Exact)
            && algorithms.contains(&Algorithm::Greedy)
        {
            let exact = records_of(&reports, Algorithm::Exact);
            let greedy = records_of(&reports, Algorithm::Greedy);
            let rows = compare_records(&exact, &greedy);
            written.extend(self.sink.write_comparison("comparison_summary", &rows)?);
            rows
        } else {
            Vec::new()
        };

        let summary = RunSummary {
            reports,
            comparison,
            written,
        };
        tracing::info!(
            "✅ Benchmark finished: {} files written, {} dataset failures",
            summary.written.len(),
            summary.failure_count()
        );
        Ok(summary)
    }

    /// 單一資料集的容量敏感度分析，寫出 `W_sensitivity_results`
    pub fn run_sweep(&self, dataset: &str, capacities: &[u64]) -> Result<Vec<ComparisonRecord>> {
        if capacities.is_empty() {
            return Err(BenchError::MissingConfigError {
                field: "sweep.capacities".to_string(),
            });
        }
        tracing::info!(
            "📈 Capacity sweep on {} over {} capacities",
            dataset,
            capacities.len()
        );

        let mut harness = self.harness()?;
        let exact = ExactSolver::with_layout(self.config.table_layout()?);
        let rows = harness.sweep(dataset, capacities, &exact, &GreedySolver::new())?;
        self.sink.write_comparison("W_sensitivity_results", &rows)?;
        Ok(rows)
    }
}

fn records_of(reports: &[BenchmarkReport], algorithm: Algorithm) -> Vec<BenchmarkRecord> {
    reports
        .iter()
        .filter(|r| r.algorithm() == algorithm.as_str())
        .flat_map(|r| r.records().iter().cloned())
        .collect()
}
