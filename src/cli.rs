use std::path::PathBuf;

use clap::builder::{styling::AnsiColor, Styles};
use clap::Parser;

const ABOUT: &str = "OpenWeatherMap district forecast TUI";

const LONG_ABOUT: &str = "
TUI for looking up current conditions and a five day forecast by district name.

The district is geocoded through the OpenWeatherMap geocoding API, then the forecast for the
matching coordinates is fetched and collapsed to one representative entry per day.

An OpenWeatherMap API key is required. It is read from the OWM_API_KEY environment variable
unless --api-key is given.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug)]
#[command(version, styles=STYLES, about=ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(help = "District or place name to look up on startup (e.g. Dhaka, Uppsala)")]
    pub district: Option<String>,

    #[arg(long, help = "OpenWeatherMap API key, overrides OWM_API_KEY")]
    pub api_key: Option<String>,

    #[arg(long, help = "Append diagnostic logging to this file")]
    pub log_file: Option<PathBuf>,
}
