use clap::{Args, Parser, Subcommand};
use lsbstego::cli::{embed_file, extract_file, show_capacity, show_info, EmbedOptions, ExtractOptions};
use lsbstego::header::Compatibility;
use lsbstego::pipeline::EncryptionAlgorithm;
use lsbstego::{PluginKind, StegoConfig, StegoError};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Version info from build.rs
const VERSION: &str = env!("LSBSTEGO_VERSION");
const PROFILE: &str = env!("LSBSTEGO_PROFILE");
const TARGET: &str = env!("LSBSTEGO_TARGET");
const GIT_REVISION: &str = env!("LSBSTEGO_GIT_REVISION");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| {
        format!("{} ({} build, {}, {})", VERSION, PROFILE, GIT_REVISION, TARGET)
    })
}

#[derive(Parser)]
#[command(name = "lsbstego")]
#[command(author, about = "Hide data in the low-order bits of images", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a file inside a cover image
    #[command(alias = "e")]
    Embed {
        /// File to hide
        message: PathBuf,

        /// Cover image
        cover: PathBuf,

        /// Output stego image (PNG or BMP)
        output: PathBuf,

        #[command(flatten)]
        codec: CodecArgs,

        /// Upper bound for bits used per colour channel (1-8)
        #[arg(long)]
        max_bits: Option<u8>,

        /// Store the payload without compression
        #[arg(long)]
        no_compression: bool,
    },

    /// Extract the hidden file from a stego image
    #[command(alias = "x")]
    Extract {
        /// Stego image
        input: PathBuf,

        /// Output file
        output: PathBuf,

        #[command(flatten)]
        codec: CodecArgs,
    },

    /// Show the header hidden in a stego image
    #[command(alias = "i")]
    Info {
        /// Stego image to inspect
        file: PathBuf,
    },

    /// Show how many bytes a cover image can hold
    #[command(alias = "c")]
    Capacity {
        /// Cover image
        file: PathBuf,

        /// Upper bound for bits used per colour channel (1-8)
        #[arg(long)]
        max_bits: Option<u8>,

        /// Use the legacy capacity formula
        #[arg(long)]
        legacy: bool,

        /// JSON config file; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct CodecArgs {
    /// Password; enables encryption
    #[arg(long)]
    password: Option<String>,

    /// Encryption algorithm
    #[arg(long, value_parser = parse_algorithm)]
    algorithm: Option<EncryptionAlgorithm>,

    /// Steganography algorithm
    #[arg(long, default_value = "lsb", value_parser = parse_plugin)]
    plugin: PluginKind,

    /// Write the legacy wire format (fixed salt, 24-bit length)
    #[arg(long)]
    legacy: bool,

    /// JSON config file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
}

impl CodecArgs {
    fn to_config(&self) -> Result<StegoConfig, StegoError> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(password) = &self.password {
            config.use_encryption = true;
            config.password = Some(password.clone());
        }
        if let Some(algorithm) = self.algorithm {
            config.encryption_algorithm = algorithm;
        }
        if self.legacy {
            config.compatibility = Compatibility::Legacy;
        }
        Ok(config)
    }
}

fn load_config(path: Option<&Path>) -> Result<StegoConfig, StegoError> {
    match path {
        Some(path) => StegoConfig::from_json_file(path),
        None => Ok(StegoConfig::default()),
    }
}

fn parse_algorithm(s: &str) -> Result<EncryptionAlgorithm, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn parse_plugin(s: &str) -> Result<PluginKind, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    if let Err(e) = simple_logger::SimpleLogger::new().with_level(level).init() {
        eprintln!("Warning: logger unavailable: {}", e);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.version {
        println!("lsbstego {}", get_version());
        return ExitCode::SUCCESS;
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            if let Err(e) = Cli::command().print_help() {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
            println!();
            return ExitCode::SUCCESS;
        }
    };

    let result = match command {
        Commands::Embed {
            message,
            cover,
            output,
            codec,
            max_bits,
            no_compression,
        } => codec.to_config().and_then(|mut config| {
            if let Some(bits) = max_bits {
                config.max_bits_per_channel = bits;
            }
            if no_compression {
                config.use_compression = false;
            }
            let options = EmbedOptions {
                config,
                algorithm: codec.plugin,
            };
            let bytes = embed_file(&message, &cover, &output, &options)?;
            println!("Embedded {} bytes into {}", bytes, output.display());
            Ok(())
        }),

        Commands::Extract { input, output, codec } => codec.to_config().and_then(|config| {
            let options = ExtractOptions {
                config,
                algorithm: codec.plugin,
            };
            let bytes = extract_file(&input, &output, &options)?;
            println!("Extracted {} bytes to {}", bytes, output.display());
            Ok(())
        }),

        Commands::Info { file } => show_info(&file).map(|info| print!("{}", info)),

        Commands::Capacity {
            file,
            max_bits,
            legacy,
            config,
        } => load_config(config.as_deref()).and_then(|mut config| {
            if let Some(bits) = max_bits {
                config.max_bits_per_channel = bits;
            }
            if legacy {
                config.compatibility = Compatibility::Legacy;
            }
            let report = show_capacity(&file, &config)?;
            print!("{}", report);
            Ok(())
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
