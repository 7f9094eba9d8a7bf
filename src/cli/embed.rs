use crate::config::StegoConfig;
use crate::error::Result;
use crate::plugin::{Plugin, PluginKind};
use crate::raster;
use std::path::Path;

/// Options for the embed command
#[derive(Debug, Clone, Default)]
pub struct EmbedOptions {
    pub config: StegoConfig,
    pub algorithm: PluginKind,
}

/// Hide a file inside a cover image and write the stego image
/// Returns the number of payload bytes read from the message file
pub fn embed_file(
    message_path: &Path,
    cover_path: &Path,
    output_path: &Path,
    options: &EmbedOptions,
) -> Result<usize> {
    let message = std::fs::read(message_path)?;
    let cover = raster::load(cover_path)?;

    let stego = options.algorithm.embed(&message, &cover, &options.config)?;
    raster::save(&stego, output_path)?;

    Ok(message.len())
}
