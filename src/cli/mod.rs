use std::process;

use structopt::StructOpt;

use crate::{
    catalog::Catalog,
    config::GenConfig,
    driver::{ClassifyOptions, GenerateOptions},
    errors::GenError,
    logger,
};

mod classify;
mod generate;

#[derive(Debug, StructOpt)]
#[structopt(name = "srgen", about = "Generates static runtime dispatch code and tests")]
pub struct Cli {
    #[structopt(
        long, env = "LOG_LEVEL",
        help = "Sets the log level",
        default_value = "info",
        possible_values = &["off", "error", "warn", "info", "debug", "trace"],
        global = true
    )]
    log_level: log::LevelFilter,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Writes the dispatch registrations and their tests
    Generate(GenerateOptions),
    /// Reports which operator groups are eligible
    Classify(ClassifyOptions),
}

/// Loads the config at `path`, or the built-in tables when none is given.
fn load_config(path: Option<&std::path::Path>) -> Result<GenConfig, Vec<GenError>> {
    match path {
        Some(path) => GenConfig::from_path(path).map_err(|err| vec![err]),
        None => Ok(GenConfig::default()),
    }
}

fn load_catalog(path: &std::path::Path) -> Result<Catalog, Vec<GenError>> {
    let catalog = Catalog::from_path(path)?;
    log::debug!("{} native functions in catalog", catalog.functions.len());
    Ok(catalog)
}

pub fn run() {
    let cli: Cli = Cli::from_args();
    if let Err(err) = logger::init(cli.log_level) {
        eprintln!("could not install logger: {}", err);
    }

    let ok = match cli.cmd {
        Command::Generate(options) => generate::action(options),
        Command::Classify(options) => classify::action(options),
    };

    if !ok {
        process::exit(1);
    }
}
