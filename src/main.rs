// src/main.rs
//! Restaurant Finder - nearest restaurants and their weekly menus in the terminal

use clap::{Parser, Subcommand, ValueEnum};
use restaurant_finder::{
    api::MenuType,
    app::{self, Finder},
    config::FinderConfig,
    display::{self, terminal::column_widths, TerminalDisplay},
    error::{FinderError, Result},
    geo::provider::list_serial_ports,
    logging,
    render::{html, text},
};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "restaurant-finder", version, about)]
struct Cli {
    /// Base URL of the restaurant API
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Position source to use
    #[arg(long, global = true, value_enum)]
    source: Option<SourceArg>,

    /// Fixed latitude (with --lon)
    #[arg(long, global = true, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,

    /// Fixed longitude (with --lat)
    #[arg(long, global = true, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,

    /// gpsd address
    #[arg(long, global = true, value_name = "HOST:PORT")]
    gpsd: Option<String>,

    /// Serial port of an NMEA receiver
    #[arg(long, global = true, value_name = "PORT")]
    serial: Option<String>,

    /// Serial baud rate
    #[arg(long, global = true)]
    baud: Option<u32>,

    /// Menu language
    #[arg(long, global = true)]
    lang: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceArg {
    Fixed,
    Gpsd,
    Serial,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive table (default)
    Browse,
    /// Print restaurants nearest first
    List {
        #[arg(long)]
        html: bool,
    },
    /// Print the weekly menu of one restaurant
    Menu {
        /// Restaurant `_id`
        id: String,
        #[arg(long)]
        html: bool,
    },
    /// List available serial ports
    Ports,
    /// Write the effective configuration to the config file
    SaveConfig,
}

fn parse_host_port(value: &str) -> Result<(String, u16)> {
    let (host, port) = value
        .rsplit_once(':')
        .ok_or_else(|| FinderError::Config(format!("Expected HOST:PORT, got {}", value)))?;
    let port = port
        .parse::<u16>()
        .map_err(|e| FinderError::Config(format!("Invalid gpsd port {}: {}", port, e)))?;
    Ok((host.to_string(), port))
}

fn apply_overrides(config: &mut FinderConfig, cli: &Cli) -> Result<()> {
    if let Some(url) = &cli.api_url {
        config.api_url = url.clone();
    }
    if let Some(lang) = &cli.lang {
        config.language = lang.clone();
    }
    if let (Some(lat), Some(lon)) = (cli.lat, cli.lon) {
        config.update_fixed(lat, lon);
    }
    if let Some(addr) = &cli.gpsd {
        let (host, port) = parse_host_port(addr)?;
        config.update_gpsd(host, port);
    }
    if let Some(port) = &cli.serial {
        let baudrate = cli.baud.or(config.serial_baudrate).unwrap_or(9600);
        config.update_serial(port.clone(), baudrate);
    } else if let Some(baud) = cli.baud {
        config.serial_baudrate = Some(baud);
    }
    if let Some(source) = cli.source {
        config.update_source(match source {
            SourceArg::Fixed => "fixed",
            SourceArg::Gpsd => "gpsd",
            SourceArg::Serial => "serial",
        });
    }
    Ok(())
}

async fn list(finder: &Finder, as_html: bool) -> Result<()> {
    let (position, restaurants) = finder.locate_and_load().await?;

    if as_html {
        println!("{}", html::restaurant_table(&restaurants));
        return Ok(());
    }

    let width = crossterm::terminal::size().map(|(w, _)| w).unwrap_or(120);
    let widths = column_widths(width);
    println!("Restaurants near {}", position);
    for restaurant in &restaurants {
        let distance = restaurant_finder::sort::distance_km(&position, restaurant);
        let cells = text::restaurant_cells(restaurant, Some(distance));
        println!(
            " {}  {}  {}  {:>w$}",
            text::fit(&cells[0], widths[0]),
            text::fit(&cells[1], widths[1]),
            text::fit(&cells[2], widths[2]),
            cells[3],
            w = widths[3]
        );
    }
    Ok(())
}

async fn menu(finder: &Finder, id: &str, as_html: bool) -> Result<()> {
    let restaurants = finder.client().fetch_restaurants().await?;
    let restaurant = app::find_restaurant(&restaurants, id)
        .ok_or_else(|| FinderError::Other(format!("No restaurant with id {}", id)))?;

    let modal = finder.open_menu(restaurant, MenuType::Weekly).await;
    if as_html {
        println!("{}", modal.to_html());
    } else {
        for line in modal.lines() {
            println!("{}", line);
        }
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let browsing = matches!(cli.command, None | Some(Command::Browse));
    if browsing && display::is_interactive() {
        let log_path = logging::init_file_logging()?;
        info!(path = %log_path.display(), "Logging to file");
    } else {
        logging::init_stderr_logging();
    }

    let mut config = FinderConfig::load()?;
    apply_overrides(&mut config, &cli)?;

    match cli.command.unwrap_or(Command::Browse) {
        Command::Browse => {
            if !display::is_interactive() {
                return Err(FinderError::Other(
                    "browse needs a terminal; use `list` or `menu` instead".to_string(),
                ));
            }
            let finder = Finder::from_config(&config)?;
            info!(source = finder.source().name(), api = finder.client().base_url(), "Starting");
            let position = finder.require_position().await?;
            TerminalDisplay::new().run(&finder, &position).await
        }
        Command::List { html } => list(&Finder::from_config(&config)?, html).await,
        Command::Menu { id, html } => menu(&Finder::from_config(&config)?, &id, html).await,
        Command::Ports => {
            let ports = list_serial_ports()?;
            if ports.is_empty() {
                println!("No serial ports found.");
            } else {
                println!("Available serial ports:");
                for port in ports {
                    println!("  {}", port);
                }
            }
            Ok(())
        }
        Command::SaveConfig => {
            let path = config.save()?;
            println!("Configuration saved to {}", path.display());
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("{}: {}", env!("CARGO_PKG_NAME"), e);
        std::process::exit(1);
    }
}
