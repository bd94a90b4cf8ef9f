use clap::{Parser, Subcommand};
use image_fanout::config::{self, Config};
use image_fanout::event::StorageEvent;
use image_fanout::logging::{self, LogFormat};
use image_fanout::storage::LocalStorage;
use image_fanout::{output, process};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "image-fanout")]
#[command(about = "Derive reduced, backup and resized images from an uploaded source")]
#[command(long_about = "\
Derive reduced, backup and resized images from an uploaded source

Each record of an S3 put notification names one source object. The source is
fetched once and every operation enabled in the configuration produces one
output image, written in this order:

  reduce     same format, default quality   → reduce.bucket/reduce.directory/<name>
  backup     byte-identical copy            → <dir>/<prefix><stem><suffix>.<ext>
  resizes    longer edge = size, per entry  → same key, or new extension

Configuration (JSON):

  {
    \"reduce\":  { \"bucket\": \"foo\", \"directory\": \"some\" },
    \"backup\":  { \"prefix\": \"a_\", \"suffix\": \"_b\" },
    \"resizes\": [ { \"size\": 300, \"format\": \"png\", \"changeExtension\": true } ]
  }

Buckets map to directories under --storage-root.")]
#[command(version)]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process every record of a put notification
    Run {
        /// S3 put notification (JSON)
        #[arg(long)]
        event: PathBuf,
        /// Operation configuration (JSON)
        #[arg(long)]
        config: PathBuf,
        /// Directory holding one subdirectory per bucket
        #[arg(long, default_value = ".")]
        storage_root: PathBuf,
        /// Worker threads for image transforms (capped at available cores)
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Validate a configuration and show where each output would go
    Check {
        /// Operation configuration (JSON)
        #[arg(long)]
        config: PathBuf,
        /// Bucket of the example source object
        #[arg(long, default_value = "sourcebucket")]
        bucket: String,
        /// Key of the example source object
        #[arg(long, default_value = "HappyFace.jpg")]
        key: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_format);

    match cli.command {
        Command::Run {
            event,
            config,
            storage_root,
            threads,
        } => {
            let config = Config::load(&config)?;
            let notification = std::fs::read_to_string(&event)?;
            let events = StorageEvent::from_notification(&notification)?;
            init_thread_pool(threads);

            let storage = LocalStorage::new(storage_root);
            for event in events {
                let written = process::process(&storage, event.clone(), &config)?;
                output::print_run_output(&event, &written);
            }
        }
        Command::Check {
            config,
            bucket,
            key,
        } => {
            let config = Config::load(&config)?;
            config.validate()?;
            output::print_plan(&config, &StorageEvent::new(bucket, key));
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool.
///
/// Caps at the number of available CPU cores: callers can constrain down, not up.
fn init_thread_pool(requested: Option<usize>) {
    let threads = config::effective_threads(requested);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
