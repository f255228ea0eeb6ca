use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use steady_core::config::Config;
use tracing::{error, info};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with a base configuration; flags given on the command line win
    #[arg(global = true, short, long)]
    config: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay synthetic tremor against a sample page
    Demo(cmd::demo::DemoArgs),
    /// Estimate tremor from a recorded cursor trace
    Analyze(cmd::analyze::AnalyzeArgs),
    /// Print the effective configuration
    Config(cmd::show_config::ConfigArgs),
}

fn resolve_config(path: Option<&str>, cli_config: &Config, sub_matches: &ArgMatches) -> Config {
    match path {
        Some(path) => {
            info!("Loading config: {}", path);
            let mut config = Config::load_from_file(path).unwrap_or_else(|e| {
                error!("{}", e);
                process::exit(1);
            });
            config.merge_from_cli(cli_config, sub_matches);
            config
        }
        None => cli_config.clone().normalized(),
    }
}

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let (cli_config, name) = match &cli.command {
        Commands::Demo(args) => (&args.config, "demo"),
        Commands::Analyze(args) => (&args.config, "analyze"),
        Commands::Config(args) => (&args.config, "config"),
    };
    let Some(sub_matches) = matches.subcommand_matches(name) else {
        error!("Missing arguments for '{}'", name);
        process::exit(2);
    };
    let config = resolve_config(cli.config.as_deref(), cli_config, sub_matches);

    let result = match cli.command {
        Commands::Demo(args) => cmd::demo::run(args, config),
        Commands::Analyze(args) => cmd::analyze::run(args, config),
        Commands::Config(args) => cmd::show_config::run(args, config),
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}
