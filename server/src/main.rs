use anyhow::Context;
use clap::Parser;
use config::{parse_fixed_location, AppConfig};
use geolocation::LocationSource;
use geomarkcore::model::location::format_degrees;
use geomarkcore::render::RendererKind;
use geomarkcore::{LocationStore, SaveOutcome};
use log::info;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use web::AppState;

mod config;
mod geolocation;
mod web;

#[derive(Parser)]
#[command(author, version, about = "Bookmark your IP-derived location on a map")]
struct Args {
    /// Load settings from YAML; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Backing file for saved locations
    #[arg(long)]
    store: Option<PathBuf>,
    #[arg(long)]
    bind: Option<SocketAddr>,
    /// Map front end: leaflet or svg
    #[arg(long)]
    renderer: Option<RendererKind>,
    /// IP geolocation endpoint
    #[arg(long)]
    lookup_url: Option<String>,
    /// Use LAT,LON instead of looking the location up
    #[arg(long, value_parser = parse_fixed_location)]
    fixed_location: Option<[f64; 2]>,
    /// Print saved locations and exit
    #[arg(long, default_value_t = false)]
    list: bool,
    /// Save the current location under NAME and exit
    #[arg(long, value_name = "NAME")]
    save: Option<String>,
}

impl Args {
    fn resolve_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if let Some(store) = &self.store {
            config.store_path = store.clone();
        }
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(renderer) = self.renderer {
            config.renderer = renderer;
        }
        if let Some(url) = &self.lookup_url {
            config.lookup_url = url.clone();
        }
        if let Some(fixed) = self.fixed_location {
            config.fixed_location = Some(fixed);
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.resolve_config()?;
    let store = LocationStore::new(&config.store_path);

    if args.list {
        let report = store.load_report()?;
        if report.locations.is_empty() {
            println!("No locations saved yet.");
        }
        for (index, location) in report.locations.iter().enumerate() {
            println!(
                "Location {}: {} - Latitude: {}, Longitude: {}",
                index + 1,
                location.name,
                format_degrees(location.latitude),
                format_degrees(location.longitude)
            );
        }
        if !report.skipped.is_empty() {
            println!("({} malformed lines skipped)", report.skipped.len());
        }
        return Ok(());
    }

    let source = LocationSource::from_config(&config)?;
    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating runtime")?;

    if let Some(name) = args.save {
        let current = runtime.block_on(source.current_location());
        match store.save(&name, current)? {
            SaveOutcome::Saved(location) => println!(
                "Saved {:?} at {}, {}",
                location.name,
                format_degrees(location.latitude),
                format_degrees(location.longitude)
            ),
            SaveOutcome::EmptyName => println!("Nothing saved: the name is blank."),
            SaveOutcome::LocationUnknown => {
                println!("Nothing saved: location not found. Check that geolocation is available.")
            }
        }
        return Ok(());
    }

    info!(
        "store {} / renderer {} / lookup {}",
        config.store_path.display(),
        config.renderer,
        match &source {
            LocationSource::Ip(_) => config.lookup_url.as_str(),
            LocationSource::Fixed(_) => "fixed",
        }
    );
    let state = Arc::new(AppState::new(store, config.renderer.build(), source));
    runtime.block_on(web::serve(state.clone(), config.bind))?;

    let snapshot = state.metrics().snapshot();
    info!(
        "session totals -> saves {}, lookups {}, failed lookups {}",
        snapshot.saves, snapshot.lookups, snapshot.failed_lookups
    );
    Ok(())
}
