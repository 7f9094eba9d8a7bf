use crate::config::StegoConfig;
use crate::error::Result;
use crate::plugin::{Plugin, PluginKind};
use crate::raster;
use std::path::Path;

/// Options for the extract command
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub config: StegoConfig,
    pub algorithm: PluginKind,
}

/// Extract the hidden payload of a stego image into a file
/// Returns the number of bytes written
pub fn extract_file(
    stego_path: &Path,
    output_path: &Path,
    options: &ExtractOptions,
) -> Result<usize> {
    let stego = raster::load(stego_path)?;
    let data = options.algorithm.extract(&stego, &options.config)?;
    std::fs::write(output_path, &data)?;
    Ok(data.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::embed::{embed_file, EmbedOptions};
    use crate::error::StegoError;
    use crate::raster::PixelGrid;
    use tempfile::tempdir;

    fn stego_fixture(dir: &Path, payload: &[u8], config: &StegoConfig) -> std::path::PathBuf {
        let message = dir.join("message.bin");
        let cover = dir.join("cover.png");
        let stego = dir.join("stego.png");
        std::fs::write(&message, payload).unwrap();
        raster::save(&PixelGrid::new(48, 48), &cover).unwrap();
        let options = EmbedOptions {
            config: config.clone(),
            ..Default::default()
        };
        embed_file(&message, &cover, &stego, &options).unwrap();
        stego
    }

    #[test]
    fn test_extract_roundtrip() {
        let dir = tempdir().unwrap();
        let config = StegoConfig::with_password("my_secret");
        let stego = stego_fixture(dir.path(), b"Hello, World! This is a test.", &config);
        let output = dir.path().join("output.txt");

        let options = ExtractOptions {
            config,
            ..Default::default()
        };
        let written = extract_file(&stego, &output, &options).unwrap();
        assert_eq!(written, 29);
        assert_eq!(std::fs::read(&output).unwrap(), b"Hello, World! This is a test.");
    }

    #[test]
    fn test_extract_wrong_secret() {
        let dir = tempdir().unwrap();
        let stego = stego_fixture(dir.path(), b"Secret data", &StegoConfig::with_password("correct"));
        let output = dir.path().join("output.txt");

        let options = ExtractOptions {
            config: StegoConfig::with_password("wrong"),
            ..Default::default()
        };
        assert!(extract_file(&stego, &output, &options).is_err());
    }

    #[test]
    fn test_extract_plain_image() {
        let dir = tempdir().unwrap();
        let cover = dir.path().join("plain.png");
        raster::save(&PixelGrid::new(48, 48), &cover).unwrap();

        let result = extract_file(&cover, &dir.path().join("out"), &ExtractOptions::default());
        assert!(matches!(result, Err(StegoError::InvalidHeader(_))));
    }
}
