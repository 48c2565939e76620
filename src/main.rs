use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use serde_json::{Map, Value};

use rugcheck::{Config, Document, FetchOptions, HttpTransport, RiskReport, telemetry};

/// Check a Solana token against the RugCheck risk API
#[derive(Parser, Debug)]
#[command(name = "rugcheck", version)]
struct Cli {
    /// Token mint address
    token_address: String,

    /// Print the raw report as JSON instead of the summary
    #[arg(long)]
    json: bool,

    /// Also fetch the token price (shown with --json)
    #[arg(long)]
    price: bool,

    /// Also fetch community votes (shown with --json)
    #[arg(long)]
    votes: bool,
}

fn usage() -> String {
    let name = env!("CARGO_PKG_NAME");
    format!(
        "{name} v{}\nUsage: {name} <token_address>",
        env!("CARGO_PKG_VERSION")
    )
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => {
            println!("{}", usage());
            return ExitCode::from(1);
        }
    };

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = Config::from_env()?;
    telemetry::init_logging(&config)?;

    let transport = HttpTransport::new(&config)?;
    let options = FetchOptions::default()
        .with_price(cli.price)
        .with_votes(cli.votes);

    let report = RiskReport::fetch_with(&transport, &config, &cli.token_address, options);

    tracing::info!(
        token = %cli.token_address,
        classification = ?report.classification(),
        "Report fetched"
    );

    if cli.json {
        Ok(render_json(&report)?)
    } else {
        Ok(report.render_summary())
    }
}

/// The report alone, or `{report, price, votes}` when extras were fetched.
fn render_json(report: &RiskReport) -> rugcheck::AppResult<String> {
    if report.price().is_none() && report.votes().is_none() {
        return report.to_json_pretty();
    }

    let mut combined = Map::new();
    combined.insert("report".to_string(), report.to_plain());
    if let Some(price) = report.price() {
        combined.insert("price".to_string(), price.clone());
    }
    if let Some(votes) = report.votes() {
        combined.insert("votes".to_string(), votes.to_plain());
    }
    Document::wrap(Value::Object(combined)).to_json(true)
}
