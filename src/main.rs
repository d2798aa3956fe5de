use clap::Parser;
use knapsack_bench::core::engine::RunSummary;
use knapsack_bench::core::ConfigProvider;
use knapsack_bench::utils::{logger, validation::Validate};
use knapsack_bench::{BenchEngine, CliConfig, FileReportSink, LocalStorage};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting knapsack-bench CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 資料來源與報表輸出
    let data = LocalStorage::new(config.data_dir.clone());
    let sink = FileReportSink::new(
        LocalStorage::new(config.output_path.clone()),
        config.output_formats(),
    )?;
    let output_path = config.output_path.clone();

    let engine = BenchEngine::new_with_monitoring(config, data, sink, monitor_enabled);

    match engine.run() {
        Ok(summary) => {
            print_summary(&summary, &output_path);
            if summary.failure_count() > 0 {
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Benchmark failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn print_summary(summary: &RunSummary, output_path: &str) {
    for report in &summary.reports {
        println!();
        println!("📋 {} (W={})", report.algorithm(), report.capacity());
        println!(
            "  {:<28} {:>8} {:>14} {:>14} {:>12}",
            "Dataset", "n_items", "Value", "Runtime (s)", "Memory (KB)"
        );
        for record in report.records() {
            println!(
                "  {:<28} {:>8} {:>14.2} {:>14.6} {:>12}",
                record.dataset,
                record.n_items,
                record.value,
                record.runtime_sec,
                record
                    .memory_kb
                    .map(|kb| format!("{:.2}", kb))
                    .unwrap_or_else(|| "-".to_string())
            );
        }
        for failure in report.failures() {
            println!("  ❌ {}: {}", failure.dataset, failure.error);
        }
    }

    if !summary.comparison.is_empty() {
        println!();
        println!("📉 Optimality gap (greedy vs exact):");
        for row in &summary.comparison {
            println!(
                "  {:<28} W={:<8} exact={:<12.2} greedy={:<12.2} gap={:.2}%",
                row.dataset, row.capacity, row.exact_value, row.greedy_value, row.optimality_gap
            );
        }
    }

    println!();
    println!("✅ Benchmark completed!");
    for file in &summary.written {
        println!("📁 Saved: {}/{}", output_path, file);
    }
}
