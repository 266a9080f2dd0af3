use agentlens_core::{
    build_store, AgentlensConfig, AgentlensError, AgentlensResult, CliErrorDisplay,
    ConsoleReporter, Inspector, VapiClient,
};
use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "agentlens")]
#[command(version = VERSION)]
#[command(about = "Agentlens - show the voice assistants linked to a customer")]
#[command(long_about = r#"
Agentlens looks up a customer in the data store, reads the semicolon-separated
assistant identifiers linked to it, and prints the name, model and first
message of each assistant as configured in Vapi.

Credentials come from the environment (SUPABASE_URL, SUPABASE_SERVICE_ROLE_KEY,
VAPI_PRIVATE_KEY) or from an agentlens.toml configuration file.
"#)]
struct Cli {
    /// Customer ID (UUID) to inspect; prompted for when omitted
    customer_id: Option<String>,

    #[arg(short, long)]
    verbose: bool,

    /// Additional configuration file, loaded after the default locations
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AgentlensConfig::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_logging(cli.verbose, "warn", false);
            let err = AgentlensError::from(e);
            eprintln!("{} {}", "Error:".red().bold(), CliErrorDisplay::new(&err));
            return ExitCode::FAILURE;
        }
    };

    init_logging(cli.verbose, config.log_level(), config.logging.json_format);
    if !config.display.color {
        colored::control::set_override(false);
    }
    config.log_summary();

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<AgentlensError>() {
                Some(err) => eprintln!("{} {}", "Error:".red().bold(), CliErrorDisplay::new(err)),
                None => eprintln!("{} {:#}", "Error:".red().bold(), e),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool, level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
        }
    });

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(io::stderr))
            .init();
    }
}

async fn run(cli: Cli, config: AgentlensConfig) -> anyhow::Result<()> {
    let customer_id = match cli.customer_id {
        Some(id) => id.trim().to_string(),
        None => prompt_customer_id()?,
    };

    if customer_id.is_empty() {
        println!("❌ No ID entered. Exiting.");
        return Ok(());
    }

    let store = build_store(&config.store)?;
    let assistants = VapiClient::new(&config.assistant_api)?;
    debug!(
        backend = store.backend_name(),
        base_url = assistants.base_url(),
        "Inspector ready"
    );

    let inspector = Inspector::new(store, Box::new(assistants));
    let mut reporter = ConsoleReporter::stdout(config.display.first_message_chars);
    let report = inspector.inspect(&customer_id, &mut reporter).await;
    inspector.store().close().await;
    reporter.finish().map_err(AgentlensError::from)?;

    debug!(
        lookup = report.lookup.label(),
        fetched = report.succeeded(),
        failed = report.failed(),
        "Run complete"
    );

    Ok(())
}

fn prompt_customer_id() -> AgentlensResult<String> {
    print!("Enter the Customer ID (UUID) to check: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_positional_id_and_flags() {
        let cli = Cli::parse_from(["agentlens", "-v", "--config", "extra.toml", "abc"]);
        assert_eq!(cli.customer_id.as_deref(), Some("abc"));
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("extra.toml")));
    }

    #[test]
    fn test_customer_id_is_optional() {
        let cli = Cli::parse_from(["agentlens"]);
        assert!(cli.customer_id.is_none());
        assert!(!cli.verbose);
    }
}
