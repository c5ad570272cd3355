mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use skycast_core::{App, Config};
use skycast_store::Location;
use skycast_weather::display;

use cli::{Cli, Command, DarkModeArg};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    skycast_core::init()?;

    let (config, _) =
        Config::load_validated(cli.config.as_deref()).context("Failed to load configuration")?;

    let mut app = match App::open(config) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("Failed to open application state: {}", e);
            eprintln!("{}", e.user_message());
            return Ok(ExitCode::FAILURE);
        }
    };

    if !cli.no_seed && app.store().needs_seed() {
        let report = app.start().await?;
        for (city, message) in &report.failed {
            eprintln!("Could not load {city}: {message}");
        }
    }

    let result = run(&mut app, cli.command).await;
    let outcome = settle(result, app.error_banner());
    app.shutdown().context("Failed to save state on exit")?;

    let outcome = outcome?;
    if let Some(message) = &outcome.message {
        eprintln!("{message}");
    }
    Ok(if outcome.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// What to print and how to exit once a command has run.
#[derive(Debug, PartialEq, Eq)]
struct Outcome {
    message: Option<String>,
    failed: bool,
}

/// A failure already described by the banner is printed once and exits
/// quietly; anything else propagates with its full context.
fn settle(result: Result<()>, banner: Option<&str>) -> Result<Outcome> {
    let message = banner.map(str::to_string);
    match result {
        Ok(()) => Ok(Outcome {
            message,
            failed: false,
        }),
        Err(_) if message.is_some() => Ok(Outcome {
            message,
            failed: true,
        }),
        Err(e) => Err(e),
    }
}

async fn run(app: &mut App, command: Command) -> Result<()> {
    match command {
        Command::Search { city } => {
            let location = app.search(&city.join(" ")).await?;
            print_location(&location, app.store().is_favorite(location.display_name()));
        }
        Command::List { favorites } => {
            let locations = if favorites {
                app.store().favorite_locations()
            } else {
                app.store().locations().to_vec()
            };
            if locations.is_empty() {
                println!("No saved locations.");
            }
            for location in &locations {
                print_location(location, app.store().is_favorite(location.display_name()));
                println!();
            }
        }
        Command::Remove { location } => match resolve(app, &location) {
            Some(id) => {
                app.remove_location(&id)?;
                println!("Removed {location}.");
            }
            None => println!("No saved location matches {location}."),
        },
        Command::Favorite { location } => {
            let Some(id) = resolve(app, &location) else {
                println!("No saved location matches {location}.");
                return Ok(());
            };
            match app.toggle_favorite(&id)? {
                Some(true) => println!("Added {location} to favorites."),
                Some(false) => println!("Removed {location} from favorites."),
                None => println!("No saved location matches {location}."),
            }
        }
        Command::History => {
            if app.store().history().is_empty() {
                println!("No recent searches.");
            }
            for city in app.store().history() {
                println!("{city}");
            }
        }
        Command::ClearHistory => {
            app.clear_history()?;
            println!("Search history cleared.");
        }
        Command::DarkMode { mode } => {
            let enabled = match mode {
                None => app.store().dark_mode(),
                Some(DarkModeArg::On) => {
                    app.set_dark_mode(true)?;
                    true
                }
                Some(DarkModeArg::Off) => {
                    app.set_dark_mode(false)?;
                    false
                }
                Some(DarkModeArg::Toggle) => app.toggle_dark_mode()?,
            };
            println!("Dark mode is {}.", if enabled { "on" } else { "off" });
        }
        Command::Refresh => {
            let total = app.store().locations().len();
            let refreshed = app.refresh_all().await?;
            println!("Refreshed {refreshed} of {total} locations.");
        }
    }
    Ok(())
}

/// Find a saved location by id, then by typed or resolved city name.
fn resolve(app: &App, query: &str) -> Option<String> {
    let store = app.store();
    if let Some(location) = store.location(query) {
        return Some(location.id.clone());
    }
    let query = query.trim().to_lowercase();
    store
        .locations()
        .iter()
        .find(|l| l.city.to_lowercase() == query || l.display_name().to_lowercase() == query)
        .map(|l| l.id.clone())
}

fn print_location(location: &Location, favorite: bool) {
    let marker = if favorite { " *" } else { "" };
    println!("[{}]{}", location.id, marker);
    println!("{}", display::current_card(&location.weather));
    for line in display::forecast_lines(&location.forecast) {
        println!("  {line}");
    }
}
