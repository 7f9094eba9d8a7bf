//! Algorithm capability trait and the closed set of built-in algorithms.
//!
//! Front ends pick an algorithm by name and then only talk to the [`Plugin`]
//! trait. Data-hiding algorithms implement embed/extract; watermarking
//! algorithms additionally score marks with `check_mark`.

use crate::config::StegoConfig;
use crate::error::{Result, StegoError};
use crate::raster::PixelGrid;
use crate::stego;

/// What an algorithm can be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    DataHiding,
    Watermarking,
}

pub trait Plugin {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn purposes(&self) -> &'static [Purpose];

    fn embed(&self, payload: &[u8], cover: &PixelGrid, config: &StegoConfig) -> Result<PixelGrid>;

    fn extract(&self, stego: &PixelGrid, config: &StegoConfig) -> Result<Vec<u8>>;

    /// Correlation between the mark found in `stego` and `signature`
    fn check_mark(&self, _stego: &PixelGrid, _signature: &[u8], _config: &StegoConfig) -> Result<f64> {
        Err(StegoError::Unsupported(format!(
            "{} does not support watermark verification",
            self.name()
        )))
    }

    /// Score range `(low, high)` for `check_mark`, if the algorithm supports it
    fn correlation_bounds(&self) -> Option<(f64, f64)> {
        None
    }
}

/// Built-in algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PluginKind {
    /// Sequential low-order-bit multiplexing, row-major
    #[default]
    Lsb,
}

impl PluginKind {
    pub const ALL: [PluginKind; 1] = [PluginKind::Lsb];
}

impl std::str::FromStr for PluginKind {
    type Err = StegoError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lsb" | "sequential-lsb" | "sequentiallsb" => Ok(Self::Lsb),
            _ => Err(StegoError::Unsupported(format!("algorithm: {}", s))),
        }
    }
}

impl Plugin for PluginKind {
    fn name(&self) -> &'static str {
        match self {
            Self::Lsb => "LSB",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Lsb => "Hides data in the low-order bits of each colour channel",
        }
    }

    fn purposes(&self) -> &'static [Purpose] {
        match self {
            Self::Lsb => &[Purpose::DataHiding],
        }
    }

    fn embed(&self, payload: &[u8], cover: &PixelGrid, config: &StegoConfig) -> Result<PixelGrid> {
        match self {
            Self::Lsb => stego::embed(payload, cover, config),
        }
    }

    fn extract(&self, stego: &PixelGrid, config: &StegoConfig) -> Result<Vec<u8>> {
        match self {
            Self::Lsb => stego::extract(stego, config),
        }
    }
}
