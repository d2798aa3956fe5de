use clap::Parser;
use knapsack_bench::core::dataset::DatasetGenerator;
use knapsack_bench::utils::logger;
use knapsack_bench::LocalStorage;

#[derive(Parser)]
#[command(name = "generate-datasets")]
#[command(about = "Generate seeded synthetic knapsack datasets as CSV files")]
struct Args {
    /// Directory the CSV files are written to
    #[arg(short, long, default_value = "./datasets")]
    output_dir: String,

    /// Instance sizes (one file per size)
    #[arg(short, long, value_delimiter = ',', default_value = "50,100,150,200,300,500")]
    sizes: Vec<usize>,

    /// Random seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Largest item weight (inclusive)
    #[arg(long, default_value = "100")]
    max_weight: u64,

    /// Largest item value (inclusive)
    #[arg(long, default_value = "500")]
    max_value: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let storage = LocalStorage::new(args.output_dir.clone());
    let mut generator = match DatasetGenerator::new(args.seed, args.max_weight, args.max_value) {
        Ok(generator) => generator,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    tracing::info!(
        "🎲 Generating {} datasets into {} (seed={})",
        args.sizes.len(),
        args.output_dir,
        args.seed
    );

    for &size in &args.sizes {
        let file_name = generator.write_instance(&storage, size)?;
        println!("📁 Saved: {}/{}", args.output_dir, file_name);
    }

    Ok(())
}
