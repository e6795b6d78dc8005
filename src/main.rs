use clap::Parser;
use std::path::PathBuf;

use transit_feed_data::feed::{self, error::Error, output, variant::Variant, TransformOptions};
use transit_feed_data::gtfs::layout::Layout;

/// Generate map data (routes, stops and shapes) from a static GTFS feed
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Which routes to extract
    #[arg(value_enum, default_value_t = Variant::Bus)]
    variant: Variant,

    /// GTFS directory or zip archive
    #[arg(long, default_value = "mbta_gtfs")]
    gtfs_path: PathBuf,

    /// Directory the .js and .json files are written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// JSON file overriding column positions
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Keep bus replacement shuttles
    #[arg(long)]
    include_shuttles: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn run(args: Args) -> Result<(), Error> {
    let layout = match &args.layout {
        Some(path) => Layout::from_path(path)?,
        None => Layout::default(),
    };
    let options = TransformOptions {
        variant: args.variant,
        layout,
        include_shuttles: args.include_shuttles,
    };

    log::info!(
        "Generating {} data from {}",
        args.variant,
        args.gtfs_path.display()
    );
    let data = feed::transform(&args.gtfs_path, &options)?;
    output::write_outputs(&data, &args.output_dir)?;
    data.print_stats();
    Ok(())
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    if let Err(e) = run(args) {
        log::error!("{}", e);
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            log::error!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}
