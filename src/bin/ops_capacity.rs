use capacity_util::config::cli::DEFAULT_TIMEOUT_SECONDS;
use capacity_util::core::{CapacitySource, ExamSource, GovernanceSource};
use capacity_util::presentation::ops::render_ops_capacity_text;
use capacity_util::utils::validation::{parse_dos, validate_url};
use capacity_util::utils::logger;
use capacity_util::{CapacityEngine, CsvSource, HttpSource, LocalStorage, Result};
use chrono::NaiveDate;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "ops_capacity")]
#[command(about = "OPS daily radiology capacity execution report")]
struct Args {
    /// Date of service (YYYY-MM-DD)
    #[arg(long)]
    dos: String,

    #[arg(long, default_value = "./data")]
    data_dir: String,

    /// Read from a reporting API instead of CSV extracts
    #[arg(long)]
    api_endpoint: Option<String>,

    /// Print the projection as JSON
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting OPS capacity report");

    if let Err(e) = run(&args).await {
        tracing::error!("❌ OPS capacity report failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(if e.is_fatal() { 3 } else { 1 });
    }
}

async fn run(args: &Args) -> Result<()> {
    // 輸入在邊界正規化
    let dos = parse_dos("--dos", &args.dos)?;
    let today = chrono::Local::now().date_naive();

    match &args.api_endpoint {
        Some(endpoint) => {
            validate_url("--api-endpoint", endpoint)?;
            let source = HttpSource::new(endpoint, Some(DEFAULT_TIMEOUT_SECONDS))?;
            print_ops(CapacityEngine::from_source(source), dos, today, args.json).await
        }
        None => {
            let source = CsvSource::new(LocalStorage::new(args.data_dir.clone()));
            print_ops(CapacityEngine::from_source(source), dos, today, args.json).await
        }
    }
}

async fn print_ops<E, G, C>(
    engine: CapacityEngine<E, G, C>,
    dos: NaiveDate,
    today: NaiveDate,
    json: bool,
) -> Result<()>
where
    E: ExamSource,
    G: GovernanceSource,
    C: CapacitySource,
{
    let ops = engine.run_ops(dos, today).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ops)?);
    } else {
        println!("{}", render_ops_capacity_text(&ops));
    }

    Ok(())
}
