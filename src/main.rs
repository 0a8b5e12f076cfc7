use clap::Parser;
use std::process::ExitCode;

mod args;
use args::{Args, OutputFormat, build_audit};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let audit = match build_audit(&args) {
        Ok(audit) => audit,
        Err(e) => {
            ::log::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    ::log::info!(
        "Auditing {} (WebDriver at {}, {}s settle)",
        args.url,
        audit.config().webdriver_url,
        audit.config().settle_secs
    );

    let report = match audit.run().await {
        Ok(report) => report,
        Err(e) => {
            ::log::error!("Scan failed: {}", e);
            eprintln!("Scan failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match args.format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                ::log::error!("Failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}
