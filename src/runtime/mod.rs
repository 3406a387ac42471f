use std::env;

use tracing::error;

use crate::config;
use crate::library::Catalog;

mod cli;
mod commands;
mod event_loop;
mod logging;
mod settings;

use cli::Command;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let command = match cli::parse(env::args().skip(1)) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("cadenza: {msg}\n\n{}", cli::USAGE);
            std::process::exit(2);
        }
    };
    if command == Command::Help {
        println!("{}", cli::USAGE);
        return Ok(());
    }

    let settings = settings::load_settings();
    if command == Command::Config {
        let source = config::resolve_config_path().filter(|p| p.is_file());
        return commands::print_config(&settings, source.as_deref());
    }

    logging::init(&settings);

    let catalog = Catalog::new(&settings.storage);
    if let Err(e) = catalog.initialize() {
        error!("cannot initialize library at {}: {e}", catalog.db_path().display());
        return Err(e.into());
    }

    match command {
        Command::Import(inputs) => commands::import(&catalog, &settings, &inputs),
        Command::List => commands::list(&catalog, &settings),
        Command::Delete(id) => commands::delete(&catalog, id),
        Command::Play(start) => event_loop::run(&settings, &catalog, start),
        Command::Config | Command::Help => Ok(()),
    }
}
