//! pwaicons command-line front end.
//!
//! Generates the icon set from an SVG and writes it, with `manifest.json`,
//! the HTML snippet and a README, to an output directory (and optionally a
//! zip archive).

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

use pwaicons::{
    batch, catalog, package, IconGenerator, ManifestConfig, RasterConfig, Rgb, VectorSource,
};

#[derive(Parser)]
#[command(name = "pwaicons", version)]
#[command(about = "Generate PWA icons, favicons and Apple touch icons from one SVG")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rasterize an SVG into the full icon set and write the bundle
    Generate {
        /// SVG file path, data: URL or http(s) URL
        input: String,

        /// Output directory
        #[arg(short, long, default_value = "pwa-icons")]
        output: PathBuf,

        /// Also write a zip archive (default name: pwa-icons.zip)
        #[arg(
            long,
            value_name = "PATH",
            num_args = 0..=1,
            default_missing_value = package::DEFAULT_ARCHIVE_NAME
        )]
        zip: Option<PathBuf>,

        /// Maximum number of icons rendered at once (defaults to CPU count)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Background colour painted under the SVG, as rrggbb
        #[arg(long, value_name = "COLOR")]
        background: Option<Rgb>,

        /// Skip loading system fonts (SVG text is then not drawn)
        #[arg(long)]
        no_system_fonts: bool,

        /// Timeout for remote sources in milliseconds
        #[arg(long, value_name = "MS")]
        timeout_ms: Option<u64>,

        /// Write the icons that succeeded instead of aborting on any failure
        #[arg(long)]
        skip_failed: bool,

        /// Accept inputs (or remote responses) whose declared type is not
        /// image/svg+xml
        #[arg(long)]
        no_type_check: bool,

        #[command(flatten)]
        manifest: ManifestArgs,
    },
    /// Print manifest.json
    Manifest {
        #[command(flatten)]
        manifest: ManifestArgs,
    },
    /// Print the HTML <head> snippet
    Html {
        #[command(flatten)]
        manifest: ManifestArgs,
    },
    /// List every icon that gets generated
    Sizes,
}

#[derive(Args)]
struct ManifestArgs {
    /// App name
    #[arg(long)]
    name: Option<String>,
    /// Short app name
    #[arg(long)]
    short_name: Option<String>,
    /// App description
    #[arg(long)]
    description: Option<String>,
    /// Start URL
    #[arg(long)]
    start_url: Option<String>,
    /// Display mode (standalone, fullscreen, minimal-ui, browser)
    #[arg(long)]
    display: Option<String>,
    /// Manifest background colour
    #[arg(long)]
    background_color: Option<String>,
    /// Theme colour for the manifest and meta tag
    #[arg(long)]
    theme_color: Option<String>,
    /// URL path the icons are served from
    #[arg(long)]
    icons_path: Option<String>,
}

impl ManifestArgs {
    fn into_config(self) -> ManifestConfig {
        let mut cfg = ManifestConfig::default();
        let overrides = [
            (self.name, &mut cfg.name),
            (self.short_name, &mut cfg.short_name),
            (self.description, &mut cfg.description),
            (self.start_url, &mut cfg.start_url),
            (self.display, &mut cfg.display),
            (self.background_color, &mut cfg.background_color),
            (self.theme_color, &mut cfg.theme_color),
            (self.icons_path, &mut cfg.icons_path),
        ];
        for (value, field) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }
        cfg
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, _) => LevelFilter::Debug,
    };
    let config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

struct GenerateOptions {
    input: String,
    output: PathBuf,
    zip: Option<PathBuf>,
    raster: RasterConfig,
    skip_failed: bool,
    no_type_check: bool,
    manifest: ManifestConfig,
}

async fn run_generate(opts: GenerateOptions) -> anyhow::Result<()> {
    let source = VectorSource::parse(&opts.input)?;
    if !opts.no_type_check {
        source
            .check_declared_type()
            .with_context(|| format!("{} is not an SVG", opts.input))?;
    }

    let generator = IconGenerator::new(opts.raster)?;
    let specs = catalog::catalog();
    info!("generating {} icons from {}", specs.len(), opts.input);

    let outcomes = generator.generate_each(source, specs).await;
    let results = if opts.skip_failed {
        let kept = batch::successes(specs, outcomes);
        if kept.is_empty() {
            bail!("no icons could be generated");
        }
        kept
    } else {
        batch::collect(specs, outcomes)?
    };

    for path in package::write_bundle(&opts.output, &results, &opts.manifest)? {
        println!("Created {}", path.display());
    }

    if let Some(zip_path) = opts.zip {
        write_archive(&zip_path, &results, &opts.manifest)?;
        println!("Created {}", zip_path.display());
    }
    Ok(())
}

#[cfg(feature = "archive")]
fn write_archive(
    path: &std::path::Path,
    results: &[pwaicons::RasterResult],
    manifest: &ManifestConfig,
) -> anyhow::Result<()> {
    package::write_zip(path, results, manifest)
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(not(feature = "archive"))]
fn write_archive(
    _path: &std::path::Path,
    _results: &[pwaicons::RasterResult],
    _manifest: &ManifestConfig,
) -> anyhow::Result<()> {
    bail!("this build of pwaicons has no zip support (enable the `archive` feature)")
}

fn print_sizes() {
    for spec in catalog::catalog() {
        let purpose = spec.purpose().map(|p| p.as_str()).unwrap_or("-");
        println!(
            "{:<8} {:>9}  {:<9} {}",
            spec.category().as_str(),
            spec.sizes(),
            purpose,
            spec.filename()
        );
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Generate {
            input,
            output,
            zip,
            jobs,
            background,
            no_system_fonts,
            timeout_ms,
            skip_failed,
            no_type_check,
            manifest,
        } => {
            let mut raster = RasterConfig::default();
            if let Some(jobs) = jobs {
                raster.jobs = jobs;
            }
            if let Some(background) = background {
                raster.background = background;
            }
            if let Some(timeout_ms) = timeout_ms {
                raster.timeout_ms = timeout_ms;
            }
            raster.load_system_fonts = !no_system_fonts;
            raster.check_content_type = !no_type_check;

            run_generate(GenerateOptions {
                input,
                output,
                zip,
                raster,
                skip_failed,
                no_type_check,
                manifest: manifest.into_config(),
            })
            .await
            .context("Failed to generate icons")
        }
        Commands::Manifest { manifest } => {
            println!("{}", pwaicons::generate_manifest(&manifest.into_config()));
            Ok(())
        }
        Commands::Html { manifest } => {
            println!("{}", pwaicons::generate_html_snippet(&manifest.into_config()));
            Ok(())
        }
        Commands::Sizes => {
            print_sizes();
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{:#}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
