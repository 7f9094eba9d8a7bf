use crate::config::StegoConfig;
use crate::error::Result;
use crate::header::MAGIC;
use crate::lsb::LsbReader;
use crate::raster;
use crate::stego::capacity;
use std::path::Path;

/// Describe the header hidden in a stego image
pub fn show_info(path: &Path) -> Result<String> {
    let image = raster::load(path)?;
    let reader = LsbReader::new(&image)?;
    let header = reader.header();

    let mut output = String::new();

    output.push_str("LSB Stego Image Information\n");
    output.push_str("===========================\n\n");

    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!("Dimensions: {}x{}\n", image.width(), image.height()));
    output.push_str(&format!("Magic: {} ({})\n", String::from_utf8_lossy(MAGIC), hex::encode(MAGIC)));
    output.push('\n');

    output.push_str("Header:\n");
    output.push_str(&format!("  Payload size: {}\n", format_size(header.data_length() as u64)));
    output.push_str(&format!("  Bits per channel: {}\n", header.channel_bits_used));
    output.push_str(&format!("  Compressed: {}\n", if header.compressed { "yes" } else { "no" }));

    Ok(output)
}

/// Report how much data a cover image can hold
pub fn show_capacity(path: &Path, config: &StegoConfig) -> Result<String> {
    let image = raster::load(path)?;
    let bytes = capacity(&image, config)?;

    let mut output = String::new();
    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!("Dimensions: {}x{}\n", image.width(), image.height()));
    output.push_str(&format!("Max bits per channel: {}\n", config.max_bits_per_channel));
    output.push_str(&format!("Capacity: {} ({} bytes)\n", format_size(bytes as u64), bytes));
    Ok(output)
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::PixelGrid;
    use crate::stego::embed;
    use tempfile::tempdir;

    #[test]
    fn test_show_info() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stego.png");
        let config = StegoConfig {
            use_compression: false,
            ..Default::default()
        };
        let stego = embed(b"Test data", &PixelGrid::new(40, 40), &config).unwrap();
        raster::save(&stego, &path).unwrap();

        let info = show_info(&path).unwrap();
        assert!(info.contains("Dimensions: 40x40"));
        assert!(info.contains("Payload size: 9 B"));
        assert!(info.contains("Bits per channel: 1"));
        assert!(info.contains("Compressed: no"));
        assert!(info.contains("4f50454e535445474f"));
    }

    #[test]
    fn test_show_capacity() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cover.bmp");
        raster::save(&PixelGrid::new(100, 100), &path).unwrap();

        let config = StegoConfig {
            max_bits_per_channel: 1,
            ..Default::default()
        };
        let report = show_capacity(&path, &config).unwrap();
        assert!(report.contains("(3735 bytes)"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1048576), "1.0 MB");
    }
}
