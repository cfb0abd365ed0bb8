use clap::Parser;
use log::warn;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use whereto::LocationSourceKind;
use whereto::core::config::{self, CliOverrides};

#[derive(Parser)]
#[command(name = "whereto", about = "Search nearby places and route to them")]
struct Args {
    /// Where the current location comes from
    #[arg(short = 's', long, value_enum)]
    location_source: Option<LocationSourceKind>,

    /// Latitude for the fixed location source
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude for the fixed location source
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Bias place searches toward the current location
    #[arg(short, long)]
    bias_search: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to whereto.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("whereto.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        warn!("Falling back to default config: {}", e);
        config::WhereToConfig::default()
    });
    let cli = CliOverrides {
        location_source: args.location_source,
        latitude: args.lat,
        longitude: args.lon,
        bias_search: args.bias_search,
    };
    let resolved = config::resolve(&file_config, &cli);

    log::info!(
        "Where To? starting up (location source: {:?}, biased search: {})",
        resolved.location_source,
        resolved.location_bias
    );

    whereto::tui::run(resolved)
}
