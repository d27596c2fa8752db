use clap::{Parser, Subcommand};
use ferrous_socks_domain::CliOverrides;
use tracing::debug;

mod bootstrap;
mod commands;
mod di;

#[derive(Parser)]
#[command(name = "ferrous-socks")]
#[command(version)]
#[command(about = "Ferrous SOCKS - non-blocking SOCKS5 client with a built-in DNS stub resolver")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// DNS server as host or host:port (default: first resolv.conf nameserver)
    #[arg(short = 's', long, global = true)]
    dns_server: Option<String>,

    /// Seconds a handshake step may make no progress
    #[arg(long, global = true)]
    step_timeout: Option<u64>,

    /// Proxy username
    #[arg(short = 'u', long, global = true)]
    username: Option<String>,

    /// Proxy password
    #[arg(short = 'p', long, global = true)]
    password: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a tunnel through a SOCKS5 proxy
    Connect(commands::connect::ConnectArgs),
    /// Query the DNS server and print the decoded response
    Lookup(commands::lookup::LookupArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_server: cli.dns_server.clone(),
        step_timeout_secs: cli.step_timeout,
        username: cli.username.clone(),
        password: cli.password.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);

    debug!("Starting Ferrous SOCKS v{}", env!("CARGO_PKG_VERSION"));

    let services = di::Services::new(&config)?;

    match cli.command {
        Command::Connect(args) => commands::connect::run(&services, &config, args),
        Command::Lookup(args) => commands::lookup::run(&services, args),
    }
}
