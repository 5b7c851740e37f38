pub mod scan;
pub mod serve;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use portaudit_common::config::Config;
use portaudit_common::network::target::Target;
use portaudit_common::ports::PortSet;

#[derive(Parser)]
#[command(name = "portaudit")]
#[command(about = "TCP port exposure and risk auditing.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Print less; repeat (-qq) to print results only
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Do not print the startup banner
    #[arg(long, global = true)]
    pub no_banner: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a host, a hostname or a CIDR network
    #[command(alias = "s")]
    Scan(ScanArgs),
    /// Serve scans over a small HTTP API
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "127.0.0.1:5000")]
        bind: SocketAddr,
    },
}

#[derive(Args)]
pub struct ScanArgs {
    /// IP address, hostname or IPv4 network in CIDR notation
    pub target: Target,

    /// Require the target to be a CIDR network
    #[arg(short, long)]
    pub network: bool,

    /// Comma-separated ports to probe [default: 14 common service ports]
    #[arg(short, long)]
    pub ports: Option<PortSet>,

    /// Connect timeout per port, in seconds
    #[arg(short, long, default_value = "1", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// Maximum number of hosts scanned at once in a network scan
    #[arg(long, value_name = "HOSTS", value_parser = clap::value_parser!(u16).range(1..))]
    pub parallel: Option<u16>,

    /// Also write the JSON results to FILE
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the results as JSON
    #[arg(long)]
    pub json: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// JSON output implies no banner and no decorations.
    pub fn config(&self) -> Config {
        let json = matches!(&self.command, Commands::Scan(args) if args.json);
        Config {
            no_banner: self.no_banner || json,
            quiet: if json { 2 } else { self.quiet },
            json,
        }
    }
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a number of seconds"))?;
    if secs <= 0.0 {
        return Err(String::from("timeout must be greater than zero"));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| e.to_string())
}
