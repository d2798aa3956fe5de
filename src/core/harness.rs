use crate::domain::model::{
    BenchmarkConfig, BenchmarkRecord, BenchmarkReport, ComparisonRecord, DatasetFailure, Instance,
};
use crate::domain::ports::{InstanceSource, Solver};
use crate::utils::error::{BenchError, Result};
use crate::utils::memory::MemoryTracker;
use crate::utils::monitor::SystemMonitor;
use crate::utils::validation::validate_positive_number;
use std::time::{Duration, Instant};

/// 對同一個已載入的實例重複執行求解器，量測平均時間與整段視窗的記憶體峰值。
///
/// 記憶體追蹤在第一次執行前開始、最後一次執行後結束；任何一次求解失敗都會直接回傳錯誤，
/// 追蹤視窗隨 guard 釋放，不會產生部分紀錄。
pub fn measure<S: Solver + ?Sized>(
    instance: &Instance,
    solver: &S,
    config: &BenchmarkConfig,
) -> Result<BenchmarkRecord> {
    validate_positive_number("repeats", config.repeats, 1)?;

    let mut timings = Vec::with_capacity(config.repeats);
    let tracker = if config.track_memory {
        Some(MemoryTracker::start()?)
    } else {
        None
    };

    // 視窗內不輸出日誌，格式化的配置會算進峰值
    let mut last_value = None;
    for _ in 0..config.repeats {
        let started = Instant::now();
        let value = solver.solve_instance(instance)?;
        timings.push(started.elapsed());
        last_value = Some(value);
    }

    let memory_kb = tracker.map(MemoryTracker::stop);
    let value = last_value.ok_or_else(|| BenchError::measurement("no repeat was executed"))?;

    for (repeat, elapsed) in timings.iter().enumerate() {
        tracing::debug!(
            "[{}] {} repeat {}/{}: value={} in {:?}",
            solver.name(),
            instance.label(),
            repeat + 1,
            config.repeats,
            value,
            elapsed
        );
    }
    let total: Duration = timings.iter().sum();

    Ok(BenchmarkRecord {
        dataset: instance.label().to_string(),
        algorithm: solver.name().to_string(),
        n_items: instance.len(),
        capacity: instance.capacity(),
        value,
        runtime_sec: total.as_secs_f64() / config.repeats as f64,
        memory_kb,
    })
}

pub struct Harness<L: InstanceSource> {
    loader: L,
    config: BenchmarkConfig,
    monitor: SystemMonitor,
}

impl<L: InstanceSource> Harness<L> {
    pub fn new(loader: L, config: BenchmarkConfig) -> Self {
        Self::new_with_monitoring(loader, config, false)
    }

    pub fn new_with_monitoring(loader: L, config: BenchmarkConfig, monitor_enabled: bool) -> Self {
        Self {
            loader,
            config,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    pub fn set_capacity(&mut self, capacity: u64) {
        self.config = self.config.with_capacity(capacity);
    }

    /// 載入一次實例並量測；錯誤不在此攔截
    pub fn run_one<S: Solver + ?Sized>(
        &mut self,
        dataset: &str,
        solver: &S,
    ) -> Result<BenchmarkRecord> {
        let instance = self.loader.load(dataset, self.config.capacity)?;
        tracing::debug!(
            "Loaded {} ({} items, capacity {})",
            instance.label(),
            instance.len(),
            instance.capacity()
        );
        measure(&instance, solver, &self.config)
    }

    /// 依序處理各資料集。單一資料集失敗只記錄下來並繼續；
    /// 量測機制本身出錯 (MeasurementFailure) 則中止整批。
    pub fn run_all<S: Solver + ?Sized>(
        &mut self,
        datasets: &[String],
        solver: &S,
    ) -> Result<BenchmarkReport> {
        let mut report = BenchmarkReport::new(solver.name(), self.config.capacity);

        for dataset in datasets {
            tracing::info!("[{}] Running on {} ...", solver.name(), dataset);

            match self.run_one(dataset, solver) {
                Ok(record) => {
                    tracing::info!(
                        "✅ {} value={} runtime={:.6}s memory={}",
                        record.dataset,
                        record.value,
                        record.runtime_sec,
                        record
                            .memory_kb
                            .map(|kb| format!("{:.2}KB", kb))
                            .unwrap_or_else(|| "n/a".to_string())
                    );
                    report.append(record);
                }
                Err(e @ BenchError::MeasurementFailure { .. }) => return Err(e),
                Err(e) => {
                    tracing::error!(
                        "❌ Dataset {} failed: {} (Category: {:?}, Severity: {:?})",
                        dataset,
                        e,
                        e.category(),
                        e.severity()
                    );
                    report.append_failure(DatasetFailure {
                        dataset: dataset.clone(),
                        error: e.to_string(),
                    });
                }
            }

            self.monitor.log_stats(dataset);
        }

        self.monitor.log_final_stats();
        Ok(report)
    }

    /// 容量敏感度分析：同一資料集在多個容量下比較兩個求解器
    pub fn sweep<E, G>(
        &mut self,
        dataset: &str,
        capacities: &[u64],
        exact: &E,
        greedy: &G,
    ) -> Result<Vec<ComparisonRecord>>
    where
        E: Solver + ?Sized,
        G: Solver + ?Sized,
    {
        let base = self.loader.load(dataset, self.config.capacity)?;
        let mut rows = Vec::with_capacity(capacities.len());

        for &capacity in capacities {
            let instance = base.with_capacity(capacity);
            let config = self.config.with_capacity(capacity);

            let exact_record = measure(&instance, exact, &config)?;
            let greedy_record = measure(&instance, greedy, &config)?;
            let row = ComparisonRecord::from_records(&exact_record, &greedy_record);

            tracing::info!(
                "📈 {} W={} exact={} greedy={} gap={:.2}%",
                row.dataset,
                capacity,
                row.exact_value,
                row.greedy_value,
                row.optimality_gap
            );
            self.monitor.log_stats(&format!("{} W={}", dataset, capacity));
            rows.push(row);
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exact::ExactSolver;
    use crate::core::greedy::GreedySolver;
    use crate::domain::model::{Item, Solution};
    use std::cell::Cell;
    use std::collections::HashMap;

    struct MemorySource {
        instances: HashMap<String, Vec<Item>>,
    }

    impl MemorySource {
        fn new(entries: &[(&str, Vec<Item>)]) -> Self {
            Self {
                instances: entries
                    .iter()
                    .map(|(name, items)| (name.to_string(), items.clone()))
                    .collect(),
            }
        }
    }

    impl InstanceSource for MemorySource {
        fn load(&self, dataset: &str, capacity: u64) -> Result<Instance> {
            let items = self.instances.get(dataset).ok_or_else(|| {
                BenchError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", dataset),
                ))
            })?;
            Ok(Instance::new(dataset, items, capacity))
        }
    }

    /// 計算被呼叫次數的求解器
    struct CountingSolver {
        calls: Cell<usize>,
        fail_on: Option<usize>,
    }

    impl Solver for CountingSolver {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn solve(&self, weights: &[u64], _values: &[f64], _capacity: u64) -> Result<f64> {
            let call = self.calls.get() + 1;
            self.calls.set(call);
            if Some(call) == self.fail_on {
                return Err(BenchError::invalid_input("scripted failure"));
            }
            Ok(weights.len() as f64)
        }

        fn solve_detailed(&self, weights: &[u64], values: &[f64], capacity: u64) -> Result<Solution> {
            Ok(Solution {
                value: self.solve(weights, values, capacity)?,
                items: Vec::new(),
            })
        }
    }

    fn gap_items() -> Vec<Item> {
        vec![
            Item { weight: 10, value: 60.0 },
            Item { weight: 20, value: 100.0 },
            Item { weight: 30, value: 120.0 },
        ]
    }

    #[test]
    fn test_measure_runs_exactly_r_times() {
        let instance = Instance::new("gap", &gap_items(), 50);
        let solver = CountingSolver {
            calls: Cell::new(0),
            fail_on: None,
        };
        let config = BenchmarkConfig::new(50, 7, false).unwrap();

        let record = measure(&instance, &solver, &config).unwrap();

        assert_eq!(solver.calls.get(), 7);
        assert_eq!(record.value, 3.0);
        assert_eq!(record.memory_kb, None);
        assert!(record.runtime_sec >= 0.0);
    }

    #[test]
    fn test_measure_propagates_solver_failure_and_releases_tracking() {
        let instance = Instance::new("gap", &gap_items(), 50);
        let solver = CountingSolver {
            calls: Cell::new(0),
            fail_on: Some(2),
        };
        let config = BenchmarkConfig::new(50, 5, true).unwrap();

        let result = measure(&instance, &solver, &config);

        assert!(matches!(result, Err(BenchError::InvalidInput { .. })));
        assert_eq!(solver.calls.get(), 2);
        assert!(!crate::utils::memory::is_tracking());
    }

    #[test]
    fn test_measure_exact_records_memory() {
        let instance = Instance::new("gap", &gap_items(), 50);
        let config = BenchmarkConfig::new(50, 3, true).unwrap();

        let record = measure(&instance, &ExactSolver::new(), &config).unwrap();

        assert_eq!(record.value, 220.0);
        assert_eq!(record.n_items, 3);
        assert_eq!(record.capacity, 50);
        assert_eq!(record.algorithm, "exact");
        // 4 x 51 個 f64 的表格
        assert!(record.memory_kb.unwrap() >= (4.0 * 51.0 * 8.0) / 1024.0);
    }

    #[test]
    fn test_measure_fails_when_window_already_open() {
        let _outer = MemoryTracker::start().unwrap();
        let instance = Instance::new("gap", &gap_items(), 50);
        let config = BenchmarkConfig::new(50, 1, true).unwrap();

        let result = measure(&instance, &GreedySolver, &config);
        assert!(matches!(result, Err(BenchError::MeasurementFailure { .. })));
    }

    #[test]
    fn test_debug_logging_does_not_inflate_peak() {
        let instance = Instance::new("gap", &gap_items(), 50);
        let config = BenchmarkConfig::new(50, 20, true).unwrap();
        let quiet = measure(&instance, &GreedySolver, &config).unwrap();

        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::sink)
            .finish();
        let verbose = tracing::subscriber::with_default(subscriber, || {
            measure(&instance, &GreedySolver, &config).unwrap()
        });

        assert!(quiet.memory_kb.is_some());
        assert_eq!(quiet.memory_kb, verbose.memory_kb);
    }

    #[test]
    fn test_run_all_aborts_on_measurement_failure() {
        let source = MemorySource::new(&[("first", gap_items()), ("second", gap_items())]);
        let mut harness = Harness::new(source, BenchmarkConfig::new(50, 1, true).unwrap());
        let datasets = vec!["first".to_string(), "second".to_string()];

        let _outer = MemoryTracker::start().unwrap();
        let result = harness.run_all(&datasets, &GreedySolver);

        assert!(matches!(result, Err(BenchError::MeasurementFailure { .. })));
    }

    #[test]
    fn test_run_all_continues_after_failed_dataset() {
        let source = MemorySource::new(&[("first", gap_items()), ("third", gap_items())]);
        let mut harness = Harness::new(source, BenchmarkConfig::new(50, 2, false).unwrap());
        let datasets = vec![
            "first".to_string(),
            "missing".to_string(),
            "third".to_string(),
        ];

        let report = harness.run_all(&datasets, &GreedySolver).unwrap();

        let names: Vec<&str> = report.records().iter().map(|r| r.dataset.as_str()).collect();
        assert_eq!(names, vec!["first", "third"]);
        assert_eq!(report.failures().len(), 1);
        assert_eq!(report.failures()[0].dataset, "missing");
        assert!(report.records().iter().all(|r| r.value == 160.0));
    }

    #[test]
    fn test_sweep_reports_gap_per_capacity() {
        let source = MemorySource::new(&[("gap", gap_items())]);
        let mut harness = Harness::new(source, BenchmarkConfig::new(0, 1, false).unwrap());

        let rows = harness
            .sweep("gap", &[0, 10, 50], &ExactSolver::new(), &GreedySolver)
            .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].exact_value, 0.0);
        assert_eq!(rows[0].optimality_gap, 0.0);
        assert_eq!(rows[1].exact_value, 60.0);
        assert_eq!(rows[1].greedy_value, 60.0);
        assert_eq!(rows[2].capacity, 50);
        assert!((rows[2].optimality_gap - 27.2727).abs() < 1e-3);
    }
}
