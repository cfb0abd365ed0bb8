//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.whereto/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::LocationSourceKind;
use crate::core::geo::{Coordinate, TravelMode};
use crate::core::state::DEFAULT_INITIAL_REGION_METERS;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WhereToConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub directions: DirectionsConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub map: MapConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SearchConfig {
    pub base_url: Option<String>,
    pub debounce_ms: Option<u64>,
    pub limit: Option<u32>,
    pub location_bias: Option<bool>,
    pub bias_radius_m: Option<f64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DirectionsConfig {
    pub base_url: Option<String>,
    pub travel_mode: Option<TravelMode>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LocationConfig {
    pub source: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ip_base_url: Option<String>,
    pub poll_interval_secs: Option<u64>,
    /// Whether the user allows IP-based location lookups.
    pub consent: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MapConfig {
    pub initial_region_m: Option<f64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
pub const DEFAULT_BIAS_RADIUS_M: f64 = 10_000.0;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_OSRM_BASE_URL: &str = "https://router.project-osrm.org";
pub const DEFAULT_IP_API_BASE_URL: &str = "http://ip-api.com";
pub const DEFAULT_USER_AGENT: &str = concat!("whereto/", env!("CARGO_PKG_VERSION"));

/// Apple Park; only used when nothing else says where the user is.
const DEFAULT_FIXED_LOCATION: Coordinate = Coordinate {
    latitude: 37.3349,
    longitude: -122.009,
};

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub nominatim_base_url: String,
    pub debounce_ms: u64,
    pub search_limit: u32,
    pub location_bias: bool,
    pub bias_radius_m: f64,
    pub user_agent: String,
    pub osrm_base_url: String,
    pub travel_mode: TravelMode,
    pub location_source: LocationSourceKind,
    pub fixed_location: Coordinate,
    pub ip_base_url: String,
    pub poll_interval_secs: u64,
    pub location_consent: bool,
    pub initial_region_m: f64,
}

/// Values coming from CLI flags (None = not specified).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub location_source: Option<LocationSourceKind>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub bias_search: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.whereto/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".whereto").join("config.toml"))
}

/// Load config from `~/.whereto/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `WhereToConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<WhereToConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(WhereToConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(WhereToConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: WhereToConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Where To? Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [search]
# base_url = "https://nominatim.openstreetmap.org"   # Or WHERETO_NOMINATIM_URL
# debounce_ms = 300
# limit = 10
# location_bias = false      # true = prefer results near the current location
# bias_radius_m = 10000
# user_agent = "whereto/0.1" # Or WHERETO_USER_AGENT

# [directions]
# base_url = "https://router.project-osrm.org"       # Or WHERETO_OSRM_URL
# travel_mode = "automobile"  # "automobile", "walking", "cycling"

# [location]
# source = "fixed"            # "fixed" or "ip"
# latitude = 37.3349          # Or WHERETO_LOCATION="37.3349,-122.009"
# longitude = -122.009
# ip_base_url = "http://ip-api.com"
# poll_interval_secs = 30
# consent = true              # false = location lookups are denied

# [map]
# initial_region_m = 5000
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &WhereToConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Nominatim base URL: env → config → default
    let nominatim_base_url = std::env::var("WHERETO_NOMINATIM_URL")
        .ok()
        .or_else(|| config.search.base_url.clone())
        .unwrap_or_else(|| DEFAULT_NOMINATIM_BASE_URL.to_string());

    // OSRM base URL: env → config → default
    let osrm_base_url = std::env::var("WHERETO_OSRM_URL")
        .ok()
        .or_else(|| config.directions.base_url.clone())
        .unwrap_or_else(|| DEFAULT_OSRM_BASE_URL.to_string());

    let user_agent = std::env::var("WHERETO_USER_AGENT")
        .ok()
        .or_else(|| config.search.user_agent.clone())
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

    // Location source: CLI → config → fixed
    let location_source = cli
        .location_source
        .clone()
        .or_else(|| {
            config
                .location
                .source
                .as_deref()
                .and_then(LocationSourceKind::parse)
        })
        .unwrap_or_default();

    ResolvedConfig {
        nominatim_base_url,
        debounce_ms: config.search.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS),
        search_limit: config.search.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
        location_bias: cli.bias_search || config.search.location_bias.unwrap_or(false),
        bias_radius_m: config
            .search
            .bias_radius_m
            .unwrap_or(DEFAULT_BIAS_RADIUS_M),
        user_agent,
        osrm_base_url,
        travel_mode: config.directions.travel_mode.unwrap_or_default(),
        location_source,
        fixed_location: resolve_fixed_location(config, cli),
        ip_base_url: config
            .location
            .ip_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_IP_API_BASE_URL.to_string()),
        poll_interval_secs: config
            .location
            .poll_interval_secs
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
        location_consent: config.location.consent.unwrap_or(true),
        initial_region_m: config
            .map
            .initial_region_m
            .unwrap_or(DEFAULT_INITIAL_REGION_METERS),
    }
}

/// Fixed location: CLI lat/lon → WHERETO_LOCATION → config → default.
fn resolve_fixed_location(config: &WhereToConfig, cli: &CliOverrides) -> Coordinate {
    if let (Some(latitude), Some(longitude)) = (cli.latitude, cli.longitude) {
        return Coordinate::new(latitude, longitude);
    }

    if let Ok(raw) = std::env::var("WHERETO_LOCATION") {
        match Coordinate::parse(&raw) {
            Some(coord) => return coord,
            None => warn!("Ignoring malformed WHERETO_LOCATION: {:?}", raw),
        }
    }

    match (config.location.latitude, config.location.longitude) {
        (Some(latitude), Some(longitude)) => Coordinate::new(latitude, longitude),
        _ => DEFAULT_FIXED_LOCATION,
    }
}
