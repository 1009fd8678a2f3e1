use clap::{Parser, Subcommand};
use sharp_image::config::{self, TransformConfig};
use sharp_image::imaging::RustEngine;
use sharp_image::output;
use sharp_image::{ImageTransformer, ResizeRequest};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sharp-image")]
#[command(about = "Resize and reformat images into JPEG or PNG")]
#[command(long_about = "\
Resize and reformat images into JPEG or PNG

The input is decoded once; every output is produced from that decoded copy.
Outputs keep the input's format when it is jpeg or png, and are written as
png otherwise (see 'default_format' in the config).

Batch requests file (JSON):

  [
    { \"width\": 100, \"height\": 100, \"isSquare\": true, \"name\": \"thumb\" },
    { \"width\": 320, \"height\": 320 },
    { \"width\": 500, \"height\": 500, \"name\": \"large\" }
  ]

Run 'sharp-image gen-config' to print a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file (TOML); stock defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log engine activity to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the detected format and dimensions
    Inspect {
        input: PathBuf,
    },
    /// Resize to fit within WIDTHxHEIGHT (or exactly, with --square)
    Resize {
        input: PathBuf,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        width: u32,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        height: u32,
        /// Force the exact size, ignoring aspect ratio
        #[arg(long)]
        square: bool,
        /// Destination file (default: <input>-<W>x<H>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Re-encode without resizing
    Reformat {
        input: PathBuf,
        /// jpeg or png (default: config default_format)
        #[arg(short, long)]
        format: Option<String>,
        /// Destination file (default: <input>-<format>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run every request in a JSON file against one input
    Batch {
        input: PathBuf,
        /// JSON array of resize requests
        #[arg(long)]
        requests: PathBuf,
        /// Directory for the outputs
        #[arg(long, default_value = "out")]
        output_dir: PathBuf,
        /// Print the results as JSON instead of one line per file
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => TransformConfig::default(),
    };
    init_thread_pool(&config.processing);
    let transformer = ImageTransformer::with_config(RustEngine::new(), config.output.clone());

    match cli.command {
        Command::Inspect { input } => {
            let loaded = transformer.load(&std::fs::read(&input)?)?;
            println!("{}", output::format_metadata(&input, loaded.metadata()));
        }
        Command::Resize {
            input,
            width,
            height,
            square,
            output,
        } => {
            let loaded = transformer.load(&std::fs::read(&input)?)?;
            let mut request = ResizeRequest::new(width, height);
            if square {
                request = request.square();
            }
            let result = transformer.resize(&loaded, &request)?;
            let destination = output.unwrap_or_else(|| {
                output::derived_path(&input, &format!("{width}x{height}"), result.format)
            });
            std::fs::write(&destination, &result.image)?;
            println!("{}", output::format_result(1, &result, &destination));
        }
        Command::Reformat {
            input,
            format,
            output,
        } => {
            let loaded = transformer.load(&std::fs::read(&input)?)?;
            let result = transformer.reformat(&loaded, format.as_deref())?;
            let destination = output.unwrap_or_else(|| {
                output::derived_path(&input, result.format.as_str(), result.format)
            });
            std::fs::write(&destination, &result.image)?;
            println!("{}", output::format_result(1, &result, &destination));
        }
        Command::Batch {
            input,
            requests,
            output_dir,
            json,
        } => {
            let requests = read_requests(&requests)?;
            let loaded = transformer.load(&std::fs::read(&input)?)?;
            let results = transformer.batch_resize(&loaded, &requests)?;

            std::fs::create_dir_all(&output_dir)?;
            for (i, result) in results.iter().enumerate() {
                let destination = output_dir.join(output::batch_file_name(i + 1, result));
                std::fs::write(&destination, &result.image)?;
                if !json {
                    println!("{}", output::format_result(i + 1, result, &destination));
                }
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn read_requests(path: &Path) -> Result<Vec<ResizeRequest>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    Ok(ResizeRequest::batch_from_value(&value)?)
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "sharp_image=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
