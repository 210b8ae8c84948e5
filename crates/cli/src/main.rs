use clap::{Parser, Subcommand};
use cxr_core::constants::{DEFAULT_SEED, DEFAULT_TEST_FRACTION, DEFAULT_VAL_FRACTION};
use cxr_core::{run_split, SplitConfig};
use cxr_storage::UploadService;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cxr-prep")]
#[command(about = "Chest X-ray dataset preparation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stratified train/val/test split of patient image/label pairs
    Split {
        /// Labels CSV with patientId and Target columns
        labels_csv: PathBuf,
        /// Source directory holding <patientId>.png images
        images_dir: PathBuf,
        /// Source directory holding <patientId>.txt label files
        labels_dir: PathBuf,
        /// Root under which train/, val/ and test/ are created
        output_root: PathBuf,
        /// Fraction of all patients for the validation subset
        #[arg(long, default_value_t = DEFAULT_VAL_FRACTION)]
        val_fraction: f64,
        /// Fraction of all patients for the test subset
        #[arg(long, default_value_t = DEFAULT_TEST_FRACTION)]
        test_fraction: f64,
        /// Seed for the split shuffle, for reproducible partitions
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
    /// Upload a prepared directory tree to a cloud bucket
    Upload {
        /// Local directory tree to upload
        local_root: PathBuf,
        /// Destination bucket name
        bucket: String,
        /// Key prefix inside the bucket
        #[arg(long, default_value = "processed")]
        prefix: String,
    },
}

/// Entry point for the cxr-prep batch jobs.
///
/// Both jobs run sequentially and report failures on the console rather than
/// panicking: a missing labels table or an unreachable bucket ends the job
/// with an error message, while per-file problems are logged and counted.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cxr_core=info".parse()?)
                .add_directive("cxr_storage=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Split {
            labels_csv,
            images_dir,
            labels_dir,
            output_root,
            val_fraction,
            test_fraction,
            seed,
        } => {
            let config = match SplitConfig::new(
                labels_csv,
                images_dir,
                labels_dir,
                output_root,
                val_fraction,
                test_fraction,
                seed,
            ) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: {e}");
                    return Ok(());
                }
            };

            match run_split(&config) {
                Ok(summary) => {
                    println!("--- Split complete ---");
                    println!(
                        "Training:   {} patients ({:.1}%)",
                        summary.train_patients,
                        100.0 * summary.train_patients as f64 / summary.total_patients as f64
                    );
                    println!(
                        "Validation: {} patients ({:.1}%)",
                        summary.val_patients,
                        100.0 * summary.val_patients as f64 / summary.total_patients as f64
                    );
                    println!(
                        "Test:       {} patients ({:.1}%)",
                        summary.test_patients,
                        100.0 * summary.test_patients as f64 / summary.total_patients as f64
                    );
                    println!(
                        "Moved {} files ({} missing, {} failed)",
                        summary.moves.moved, summary.moves.missing, summary.moves.failed
                    );
                }
                Err(e) => eprintln!("Error running split: {e}"),
            }
        }
        Commands::Upload {
            local_root,
            bucket,
            prefix,
        } => {
            tracing::info!("++ Uploading {} to gs://{}/{}", local_root.display(), bucket, prefix);

            let service = match UploadService::connect_gcs(&bucket, &prefix) {
                Ok(service) => service,
                Err(e) => {
                    eprintln!("Error connecting to bucket {bucket}: {e}");
                    eprintln!("Check that your service-account credentials are configured");
                    return Ok(());
                }
            };

            match service.upload_tree(&local_root).await {
                Ok(report) => {
                    println!(
                        "Upload complete: {} files uploaded, {} failed",
                        report.uploaded, report.failed
                    );
                    println!("Files are in: gs://{bucket}/{prefix}");
                }
                Err(e) => eprintln!("Error uploading {}: {e}", local_root.display()),
            }
        }
    }

    Ok(())
}
