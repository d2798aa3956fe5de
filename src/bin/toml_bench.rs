use clap::Parser;
use knapsack_bench::core::ConfigProvider;
use knapsack_bench::utils::{logger, validation::Validate};
use knapsack_bench::{BenchEngine, BenchError, FileReportSink, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-bench")]
#[command(about = "Knapsack benchmark driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "bench-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override repeat count from config
    #[arg(long)]
    repeats: Option<usize>,

    /// Run only the capacity sweep section
    #[arg(long)]
    sweep_only: bool,

    /// Dry run - show what would be measured without executing
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置 (日誌格式取決於配置，因此先載入)
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(e.exit_code());
        }
    };

    if config.json_logging() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based knapsack benchmark");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(repeats) = args.repeats {
        config.run.repeats = Some(repeats);
        tracing::info!("🔧 Repeats overridden to: {}", repeats);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args)?;

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No solver will be executed");
        perform_dry_run(&config)?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    let sweep = config
        .sweep
        .as_ref()
        .map(|sweep| sweep.dataset.clone())
        .zip(Some(config.sweep_capacities()?));

    let data = LocalStorage::new(config.data_dir().to_string());
    let sink = FileReportSink::new(
        LocalStorage::new(config.output_path().to_string()),
        config.output_formats(),
    )?;
    let engine = BenchEngine::new_with_monitoring(config, data, sink, monitor_enabled);

    let result = run(&engine, args.sweep_only, sweep);
    if let Err(e) = result {
        tracing::error!(
            "❌ Benchmark failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn run(
    engine: &BenchEngine<TomlConfig, LocalStorage, FileReportSink<LocalStorage>>,
    sweep_only: bool,
    sweep: Option<(String, Vec<u64>)>,
) -> Result<(), BenchError> {
    if !sweep_only {
        let summary = engine.run()?;
        println!(
            "✅ Benchmark completed: {} files written, {} dataset failures",
            summary.written.len(),
            summary.failure_count()
        );
        for report in &summary.reports {
            for failure in report.failures() {
                println!("  ❌ [{}] {}: {}", report.algorithm(), failure.dataset, failure.error);
            }
        }
    }

    match sweep {
        Some((dataset, capacities)) => {
            let rows = engine.run_sweep(&dataset, &capacities)?;
            println!("📈 Capacity sweep on {}:", dataset);
            for row in &rows {
                println!(
                    "  W={:<8} exact={:<12.2} greedy={:<12.2} gap={:.2}%",
                    row.capacity, row.exact_value, row.greedy_value, row.optimality_gap
                );
            }
        }
        None if sweep_only => {
            return Err(BenchError::MissingConfigError {
                field: "sweep".to_string(),
            });
        }
        None => {}
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) -> Result<(), BenchError> {
    println!("📋 Configuration Summary:");
    println!("  Benchmark: {}", config.benchmark.name);
    if let Some(description) = &config.benchmark.description {
        println!("  Description: {}", description);
    }
    println!("  Data dir: {}", config.data_dir());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    println!("  Capacities: {:?}", config.capacities()?);
    println!("  Repeats: {}", config.repeats());
    println!("  Memory tracking: {}", config.track_memory());
    println!("  DP table layout: {:?}", config.table_layout()?);

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
    Ok(())
}

fn perform_dry_run(config: &TomlConfig) -> Result<(), BenchError> {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📂 Datasets:");
    if config.dataset_files().is_empty() {
        println!("  All *.csv files in {}", config.data_dir());
    } else {
        for file in config.dataset_files() {
            println!("  {}", file);
        }
    }

    println!();
    println!("⚙️ Measurement Plan:");
    let algorithms = config.algorithms()?;
    for capacity in config.capacities()? {
        for algorithm in &algorithms {
            println!(
                "  {} at W={} x {} repeats{}",
                algorithm,
                capacity,
                config.repeats(),
                if config.track_memory() {
                    " (peak memory tracked)"
                } else {
                    ""
                }
            );
        }
    }

    if let Some(sweep) = &config.sweep {
        println!();
        println!("📈 Capacity Sweep:");
        println!("  Dataset: {}", sweep.dataset);
        println!("  Capacities: {:?}", config.sweep_capacities()?);
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
