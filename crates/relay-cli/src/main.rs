//! alert-relay binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use relay_cli::CliError;
use relay_cli::cli::{Cli, Commands};
use relay_cli::commands::{HandleCommand, RenderCommand, SampleCommand, TestWebhookCommand};
use relay_cli::output::OutputFormat;

const DEFAULT_LOG_FILTER: &str = "alert_relay=info,relay_cli=info,relay_alerts=info";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Runs the selected command; `Ok(false)` means it completed but did not succeed.
fn run(cli: Cli) -> Result<bool, CliError> {
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Handle(args) => {
            let cmd = HandleCommand::new(args.dry_run);
            let response = cmd.execute(&mut stdout, &format, &args, &mut io::stdin().lock())?;
            Ok(response.is_success())
        }
        Commands::Render(args) => {
            RenderCommand::new().execute(&mut stdout, &format, &args, &mut io::stdin().lock())?;
            Ok(true)
        }
        Commands::Sample { kind } => {
            SampleCommand.execute(&mut stdout, &format, kind)?;
            Ok(true)
        }
        Commands::TestWebhook(args) => {
            let check = TestWebhookCommand.execute(&mut stdout, &format, &args)?;
            Ok(check.delivered)
        }
    }
}
