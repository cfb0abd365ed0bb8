//! Where To? library exports for testing

use clap::ValueEnum;

pub mod core;
pub mod engine;
pub mod services;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Where the user's location comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LocationSourceKind {
    /// A coordinate from config, env or CLI flags
    #[default]
    Fixed,
    /// Approximate location from the public IP address
    Ip,
}

impl LocationSourceKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Some(Self::Fixed),
            "ip" => Some(Self::Ip),
            _ => None,
        }
    }
}
