use clap::{Args, Parser, Subcommand};
use mortgage::config::{ConfigArgs, build_config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "mortgage", version, about = "Mortgage repayment schedule calculator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the web UI together with the JSON and CSV schedule API
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to bind to [default: 0.0.0.0]
    #[arg(long, env = "MORTGAGE_HOST")]
    host: Option<String>,

    /// Port to listen on [default: 8080]
    #[arg(short, long, env = "MORTGAGE_PORT")]
    port: Option<u16>,

    /// Years to simulate before a schedule is reported as non-convergent [default: 1000]
    #[arg(long, env = "MORTGAGE_MAX_YEARS")]
    max_years: Option<u32>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, env = "MORTGAGE_LOG_LEVEL")]
    log_level: Option<String>,
}

impl From<ServeArgs> for ConfigArgs {
    fn from(args: ServeArgs) -> Self {
        ConfigArgs {
            host: args.host,
            port: args.port,
            log_level: args.log_level,
            max_years: args.max_years,
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Command::Serve(args) = Cli::parse().command;
    let config = build_config(&args.into())?;

    init_tracing(config.log_level.as_filter_str());
    tracing::info!(
        addr = %config.socket_addr(),
        log_level = %config.log_level,
        max_years = config.max_years,
        "configuration loaded"
    );

    mortgage::api::run_http_server(config).await?;
    Ok(())
}
