use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::io::{self, IsTerminal, Read, Write};
use terminal_pos::application::controller::SessionController;
use terminal_pos::config::TerminalConfig;
use terminal_pos::domain::annotator::annotate_value;
use terminal_pos::infrastructure::console::TracingConsole;
use terminal_pos::interfaces::console::ConsoleSession;
use terminal_pos::interfaces::console::render::render_messages;
use tokio::io::BufReader;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Origin of the payments backend
    #[arg(long, env = "TERMINAL_POS_BACKEND_URL", default_value = "http://127.0.0.1:8000")]
    backend_url: String,

    /// Base of the payments dashboard that payment intent ids link to
    #[arg(
        long,
        env = "TERMINAL_POS_DASHBOARD_URL",
        default_value = "https://dashboard.stripe.com/test"
    )]
    dashboard_url: String,

    /// Use the built-in simulated backend instead of HTTP
    #[arg(long)]
    simulated: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive checkout session reading commands from stdin (default)
    Session,
    /// Annotate a JSON array of messages read from stdin
    Annotate,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,terminal_pos=info")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();
    let config =
        TerminalConfig::new(&cli.backend_url, &cli.dashboard_url, cli.simulated).into_diagnostic()?;

    match cli.command.unwrap_or(Commands::Session) {
        Commands::Session => {
            let controller = SessionController::new(
                config.backend().into_diagnostic()?,
                Box::new(TracingConsole::new()),
            );
            let stdout = io::stdout();
            let session = ConsoleSession::new(controller, config.dashboard_links(), stdout.lock());
            session
                .run(BufReader::new(tokio::io::stdin()))
                .await
                .into_diagnostic()?;
        }
        Commands::Annotate => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input).into_diagnostic()?;
            let messages = serde_json::from_str(&input).unwrap_or_else(|e| {
                warn!("Input is not JSON, nothing to annotate: {e}");
                serde_json::Value::Null
            });

            let rendered = render_messages(&annotate_value(&messages), &config.dashboard_links());
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes()).into_diagnostic()?;
        }
    }

    Ok(())
}
