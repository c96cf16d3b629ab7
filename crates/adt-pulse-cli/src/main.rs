//! ADT Pulse CLI — entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use adt_pulse::{ClientConfig, PortalClient};
use adt_pulse_cli::config::{resolve_base_url, resolve_credentials};
use adt_pulse_cli::{run, Action};

#[derive(Parser)]
#[command(
    name = "pulse",
    about = "Read and change ADT Pulse security system state",
    version
)]
struct Cli {
    /// Portal origin. Also reads ADT_PULSE_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Account username. Also reads ADT_PULSE_USERNAME.
    #[arg(short, long, global = true)]
    username: Option<String>,

    /// Account password. Also reads ADT_PULSE_PASSWORD.
    #[arg(short, long, global = true)]
    password: Option<String>,

    /// Output results as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current arm state and mode.
    Status,
    /// List the arm transitions currently offered.
    ArmOptions,
    /// Change the arm state to a key from `arm-options`.
    Arm {
        key: String,
    },
    /// List the modes currently offered.
    Modes,
    /// Change the mode to an id from `modes`.
    Mode {
        id: i32,
    },
    /// Show the event log, newest first.
    Log,
    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let action = match cli.command {
        Commands::Status => Action::Status,
        Commands::ArmOptions => Action::ArmOptions,
        Commands::Arm { key } => Action::Arm(key),
        Commands::Modes => Action::Modes,
        Commands::Mode { id } => Action::Mode(id),
        Commands::Log => Action::Log,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "pulse", &mut std::io::stdout());
            return Ok(());
        }
    };

    let credentials = resolve_credentials(cli.username.as_deref(), cli.password.as_deref())?;
    let config = ClientConfig::with_base_url(resolve_base_url(cli.base_url.as_deref()));
    let client = PortalClient::new(config)?;

    let output = run(&client, &credentials, &action, cli.json).await?;
    println!("{output}");
    Ok(())
}
