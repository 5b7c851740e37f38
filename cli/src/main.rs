mod commands;
mod terminal;

use commands::{CommandLine, Commands, scan, serve};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let cfg = commands.config();

    logging::init_logging(cfg.quiet);
    print::banner(cfg.no_banner, cfg.quiet);

    match commands.command {
        Commands::Scan(args) => {
            print::header("starting scanner", cfg.quiet);
            scan::scan(args, &cfg).await
        }
        Commands::Serve { bind } => {
            print::header("starting api server", cfg.quiet);
            serve::serve(bind).await
        }
    }
}
