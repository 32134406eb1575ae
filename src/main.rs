use anyhow::Context;
use clap::{Parser, Subcommand};
use mtzgen::config::{self, Configuration};
use mtzgen::ids::{FixedPrefix, PrefixProvider, RandomPrefix};
use mtzgen::package::{self, DEFAULT_ARCHIVE, DEFAULT_STAGING_DIR, PackageOptions, ResolvedPackage};
use mtzgen::{icons, layout, stub};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "mtzgen")]
#[command(about = "Maltego transform package generator", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the package archive and the service stub.
    Build {
        /// Transform configuration (.yaml, .yml or .json).
        config: PathBuf,

        #[arg(short = 'o', long, default_value = DEFAULT_ARCHIVE)]
        out: PathBuf,

        #[arg(long, default_value = DEFAULT_STAGING_DIR)]
        staging: PathBuf,

        #[arg(long, default_value = stub::DEFAULT_STUB)]
        stub: PathBuf,

        /// Skip writing the service stub.
        #[arg(long)]
        no_stub: bool,

        /// Namespace prefix when the configuration has none.
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Print the transforms a configuration expands to.
    List {
        config: PathBuf,

        #[arg(long)]
        prefix: Option<String>,
    },
}

fn prefix_provider(prefix: Option<String>) -> Box<dyn PrefixProvider> {
    match prefix {
        Some(p) => Box::new(FixedPrefix(p)),
        None => Box::new(RandomPrefix::default()),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Commands::Build {
            config,
            out,
            staging,
            stub: stub_path,
            no_stub,
            prefix,
        } => {
            let cfg: Configuration = config::load_config(&config)?;
            let options = PackageOptions {
                staging_dir: staging,
                output: out,
                last_sync: None,
                protect: vec![config.clone(), stub_path.clone()],
            };

            let processor = icons::default_processor();
            let report = package::build_package(
                &cfg,
                prefix_provider(prefix).as_ref(),
                processor.as_deref(),
                &options,
            )
            .with_context(|| format!("build package from {}", config.display()))?;

            if no_stub {
                println!("Created: {}", report.archive.display());
            } else {
                layout::write(&stub_path, &stub::render_wsgi(&cfg))?;
                println!(
                    "Created: {}, {}",
                    report.archive.display(),
                    stub_path.display()
                );
            }
        }

        Commands::List { config, prefix } => {
            let cfg = config::load_config(&config)?;
            let resolved = ResolvedPackage::resolve(&cfg, prefix_provider(prefix).as_ref())?;
            for trx in &resolved.transforms {
                let set = if trx.set.is_empty() { "-" } else { trx.set.as_str() };
                println!("{}\t{}\t{}", trx.id, trx.input, set);
            }
            for name in &resolved.empty_sets {
                eprintln!("note: transform set '{}' has no members and is not emitted", name);
            }
        }
    }

    Ok(())
}
