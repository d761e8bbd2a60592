use clap::Parser;
use std::fs;
use swap_script::logging::init_logging;
use swap_script::report::{print_balances, print_event};
use swap_script::session::{Session, SessionRunner};

#[derive(Parser, Debug)]
#[command(name = "swap-cli")]
#[command(about = "Replay a session of token and swap actions against an order-based swap ledger", long_about = None)]
struct Cli {
    /// Path to the session JSON file
    #[arg(short, long, env = "SWAP_SESSION_FILE", default_value = "session.json")]
    session_file: String,

    /// Custody address of the ledger, overriding the session's own
    #[arg(short, long, env = "SWAP_LEDGER_ADDRESS")]
    ledger: Option<String>,

    /// Stop at the first failing action
    #[arg(long)]
    strict: bool,

    /// Print every event as EVM log topics and data
    #[arg(long)]
    logs: bool,

    /// Print the final orders and balances as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Debug-level logging for the swap crates
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let session_json = fs::read_to_string(&cli.session_file)?;
    let session = Session::from_json(&session_json)?;
    let mut runner = SessionRunner::new(&session, cli.ledger.as_deref())?;

    println!(
        "📝 Replaying {} actions from {}",
        session.actions.len(),
        cli.session_file
    );
    println!("📋 Ledger: {}\n", runner.swap().address());

    let reports = runner.run(&session.actions, cli.strict)?;
    let mut failures = 0;
    for report in &reports {
        match &report.result {
            Ok(summary) => println!("✅ [{}] {summary}", report.index + 1),
            Err(e) => {
                failures += 1;
                println!("❌ [{}] {}: {e}", report.index + 1, report.action.describe());
            }
        }
        for event in &report.events {
            print_event(event, cli.logs);
        }
    }
    println!();

    if cli.json {
        let state = serde_json::json!({
            "ledger": runner.swap().address(),
            "orders": runner.swap().orders(),
            "balances": runner.balances(),
        });
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print_balances(&runner.balances());
    }

    println!(
        "\n{} of {} actions succeeded",
        reports.len() - failures,
        reports.len()
    );
    Ok(())
}
