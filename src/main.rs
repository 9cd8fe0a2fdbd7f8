// src/main.rs

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use serde::Deserialize;
use splitset::archive::{DirectoryArchive, StandardPathAssigner};
use splitset::config::{BuildMode, SerializerOptions};
use splitset::model::{Bundle, Fragment, GeneratedAssetSlices, GeneratedFragments, ModuleName};
use splitset::toc::LocalTestingInfo;
use splitset::{BuildRequest, SerializerManager};
use std::fs::File;
use std::io::BufReader;
use tracing::info;

#[derive(Parser)]
#[command(name = "splitset")]
#[command(author, version, about = "Serialize generated package splits into an archive with a table of contents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serialize a build plan into an archive directory
    Build {
        /// Path to the JSON build plan
        plan: String,
        /// Output archive directory
        #[arg(short, long, default_value = "out")]
        output: String,
        /// Build mode (default, universal, system, persistent, instant, archive)
        #[arg(short, long, default_value = "default")]
        mode: BuildMode,
        /// Number given to the first variant
        #[arg(long, default_value_t = 0)]
        first_variant_number: u32,
        /// Worker threads (default: available parallelism)
        #[arg(short, long)]
        workers: Option<usize>,
        /// Log every written artifact
        #[arg(short, long)]
        verbose: bool,
    },
    /// Summarize the table of contents of an archive directory
    Inspect {
        /// Archive directory
        archive: String,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        shell: clap_complete::Shell,
    },
}

/// Generated fragments and run metadata, as produced by upstream generation
#[derive(Debug, Deserialize)]
struct BuildPlan {
    bundle: Bundle,
    #[serde(default)]
    fragments: Vec<Fragment>,
    #[serde(default)]
    asset_slices: Vec<Fragment>,
    #[serde(default)]
    local_testing_info: LocalTestingInfo,
    #[serde(default)]
    permanently_fused_modules: Vec<ModuleName>,
}

fn load_plan(path: &str) -> Result<BuildPlan> {
    let file = File::open(path).with_context(|| format!("Failed to open build plan {}", path))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse build plan {}", path))
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Build {
            plan,
            output,
            mode,
            first_variant_number,
            workers,
            verbose,
        }) => {
            info!("Loading build plan: {}", plan);
            let plan = load_plan(&plan)?;

            let mut options = SerializerOptions {
                first_variant_number,
                verbose,
                ..SerializerOptions::default()
            };
            if let Some(workers) = workers {
                options.workers = workers;
            }

            let manager = SerializerManager::new(plan.bundle, options, StandardPathAssigner::new())?;
            let archive = DirectoryArchive::create(&output)?;

            let request = BuildRequest {
                fragments: GeneratedFragments::new(plan.fragments),
                asset_slices: GeneratedAssetSlices::new(plan.asset_slices),
                mode,
                device: None,
                local_testing_info: plan.local_testing_info,
                permanently_fused_modules: plan.permanently_fused_modules,
            };

            let toc = manager.populate(&archive, &request)?;
            println!(
                "Wrote {} variants ({} distinct artifacts) and {} asset slice sets to {}",
                toc.variants.len(),
                toc.distinct_variant_artifacts(),
                toc.asset_slice_sets.len(),
                archive.root().display()
            );
            Ok(())
        }
        Some(Commands::Inspect { archive }) => {
            let toc = DirectoryArchive::read_table_of_contents(&archive)
                .with_context(|| format!("Failed to read table of contents from {}", archive))?;

            println!("Package: {}", toc.package_name);
            println!("Tool version: {}", toc.tool_version);
            for variant in &toc.variants {
                println!("Variant {}:", variant.number);
                for set in &variant.artifact_sets {
                    println!("  {}", set.module_metadata.name);
                    for descriptor in &set.descriptors {
                        println!("    {}", descriptor.path);
                    }
                }
            }
            for set in &toc.asset_slice_sets {
                println!(
                    "Asset module {} ({:?}):",
                    set.metadata.name, set.metadata.delivery_type
                );
                for descriptor in &set.descriptors {
                    println!("    {}", descriptor.path);
                }
            }
            if !toc.permanently_fused_modules.is_empty() {
                println!(
                    "Permanently fused: {}",
                    toc.permanently_fused_modules.join(", ")
                );
            }
            Ok(())
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "splitset", &mut std::io::stdout());
            Ok(())
        }
        None => {
            println!("Splitset Package Serializer v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'splitset --help' for usage information");
            Ok(())
        }
    }
}
