use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

mod calendar;
mod data;
mod error;
mod feed;
mod gtfs;
mod html;
mod naming;
mod pdf;
mod time;
mod timetable;

use data::FeedIndex;
use timetable::Options;

/// Renders printable timetables (one HTML page and one PDF per timetable
/// page) from a GTFS feed.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GTFS feed: a directory of .txt tables or a .zip archive
    feed: PathBuf,

    /// directory the rendered documents are written to
    #[arg(long, default_value = "timetables")]
    output_dir: PathBuf,

    /// only render routes whose id or short name equals this value
    #[arg(long)]
    route: Option<String>,

    /// trip columns per timetable page
    #[arg(long, default_value = "8")]
    max_trips: NonZeroUsize,

    /// comma-separated stop names or ids to emphasize; without it, stops
    /// with all-uppercase names are emphasized
    #[arg(long, value_delimiter = ',')]
    major_stops: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let options = Options {
        route_filter: args.route,
        max_trips: args.max_trips.get(),
        major_stops: args
            .major_stops
            .iter()
            .map(|stop| timetable::normalize_major(stop))
            .collect(),
    };

    let feed = feed::load(&args.feed, options.route_filter.as_deref())
        .with_context(|| format!("failed to load feed {}", args.feed.display()))?;
    log::info!(
        "loaded {} routes, {} trips, {} stops, {} stop times",
        feed.routes.len(),
        feed.trips.len(),
        feed.stops.len(),
        feed.stop_times.len()
    );

    let index = FeedIndex::from(feed);
    let pages = timetable::build_timetables(&index, &options)?;
    log::info!("built {} timetable page(s)", pages.len());

    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("failed to create output directory {}", args.output_dir.display())
    })?;
    for page in &pages {
        let base = naming::page_basename(page);
        // a failed render must leave nothing on disk for the page
        let markup = html::render(page);
        let document = pdf::render(page)?;
        let html_path = args.output_dir.join(format!("{base}.html"));
        fs::write(&html_path, markup)
            .with_context(|| format!("failed to write {}", html_path.display()))?;
        let pdf_path = args.output_dir.join(format!("{base}.pdf"));
        fs::write(&pdf_path, document)
            .with_context(|| format!("failed to write {}", pdf_path.display()))?;
        log::info!("wrote {} and {}", html_path.display(), pdf_path.display());
    }
    Ok(())
}
