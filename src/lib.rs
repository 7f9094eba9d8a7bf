//! lsbstego - LSB image steganography codec
//!
//! Hides an arbitrary payload in the low-order bits of a cover image's colour
//! channels and recovers it again. The hidden stream starts with a small
//! self-describing header, so a reader needs nothing but the image (and the
//! password, if one was used) to get the payload back.
//!
//! ## Transform Pipeline
//!
//! ```text
//! Embed:   Input → Compress → Encrypt → Header (depth 1) → Payload (depth d) → Image
//! Extract: Image → Header (depth 1) → Payload (depth d) → Decrypt → Decompress → Output
//! ```
//!
//! - **Compress**: zstd, flagged in the header
//! - **Encrypt**: PBKDF2-derived key, AES-128 / AES-256 / DES in CBC mode, with
//!   the algorithm parameters prefixed to the ciphertext
//! - **Header**: `OPENSTEGO` stamp, payload length, channel depth, compression flag
//! - **Payload**: `d` low-order bits per colour channel, where `d` is the
//!   smallest depth that fits
//!
//! ## Example
//!
//! ```no_run
//! use lsbstego::{embed, extract, raster, StegoConfig};
//! use std::path::Path;
//!
//! let cover = raster::load(Path::new("cover.png")).unwrap();
//! let config = StegoConfig::with_password("secret42");
//!
//! let stego = embed(b"meet at noon", &cover, &config).unwrap();
//! raster::save(&stego, Path::new("stego.png")).unwrap();
//!
//! let recovered = extract(&stego, &config).unwrap();
//! assert_eq!(recovered, b"meet at noon");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod header;
pub mod lsb;
pub mod pipeline;
pub mod plugin;
pub mod raster;
pub mod stego;

pub use config::StegoConfig;
pub use error::{ErrorKind, Result, StegoError};
pub use header::{Compatibility, LsbHeader};
pub use plugin::{Plugin, PluginKind};
pub use raster::PixelGrid;
pub use stego::{capacity, embed, extract};
