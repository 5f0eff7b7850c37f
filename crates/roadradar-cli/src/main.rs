// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::Result;
use clap::{Parser, Subcommand};
use roadradar_core::radar::{self, Scene, DEFAULT_SCALE};
use roadradar_core::{geo, GeoPoint, Theme, ViewState};
use roadradar_providers::places::{parse_coordinates, NominatimClient};
use roadradar_providers::position::IpLocator;
use roadradar_providers::routing::OsrmClient;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Routing server to use
    #[arg(long, env = "ROADRADAR_OSRM_URL", default_value = "https://router.project-osrm.org")]
    osrm_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the current position from the public IP
    Locate,
    /// Look up places by name
    Search { query: String },
    /// Fetch a route and print its steps
    Route { from: String, to: String },
    /// Render one radar frame of a route as plain text
    Render {
        from: String,
        to: String,
        #[arg(long, default_value_t = 61)]
        width: u16,
        #[arg(long, default_value_t = 25)]
        height: u16,
        /// Cells per degree of longitude
        #[arg(long)]
        scale: Option<f64>,
        /// Color theme (classic, contrast)
        #[arg(long, default_value = "classic")]
        theme: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Locate => {
            let sample = IpLocator::new().current_position()?;
            println!(
                "{:.5}, {:.5} ({})",
                sample.point.lat, sample.point.lon, sample.label
            );
        }
        Commands::Search { query } => {
            let places = NominatimClient::new().search(query, None)?;
            if places.is_empty() {
                println!("No match for '{}'", query);
            }
            for (i, place) in places.iter().enumerate() {
                println!(
                    "{}. {} ({:.5}, {:.5})",
                    i + 1,
                    place.name,
                    place.point.lat,
                    place.point.lon
                );
            }
        }
        Commands::Route { from, to } => {
            let (from, _) = resolve(from)?;
            let (to, to_name) = resolve(to)?;
            let route = OsrmClient::with_base_url(&cli.osrm_url).fetch_route(from, to)?;

            println!(
                "Route to {}: {}, {}",
                to_name,
                geo::format_distance(route.total_distance_m),
                geo::format_duration(route.total_duration_s)
            );
            for (i, step) in route.steps.iter().enumerate() {
                println!(
                    "{:>3}. {:<44} {:>7}",
                    i + 1,
                    step.instruction,
                    geo::format_distance_compact(step.distance_m)
                );
            }
        }
        Commands::Render {
            from,
            to,
            width,
            height,
            scale,
            theme,
        } => {
            let (from, _) = resolve(from)?;
            let (to, to_name) = resolve(to)?;
            let route = OsrmClient::with_base_url(&cli.osrm_url).fetch_route(from, to)?;

            let view = ViewState::new(*width, *height);
            let scene = Scene {
                position: Some(from),
                route: Some(&route),
                active_step: Some(0),
                destination_name: Some(&to_name),
            };
            let grid = radar::render(
                &view,
                &Theme::by_name(theme),
                &scene,
                scale.unwrap_or(DEFAULT_SCALE),
            );
            println!("{}", grid.to_text());
        }
    }

    Ok(())
}

/// Accept either a "lat,lon" literal or a place name. Returns the point
/// and a short display name for it.
fn resolve(query: &str) -> Result<(GeoPoint, String)> {
    if let Some(point) = parse_coordinates(query) {
        return Ok((point, format!("{:.4}, {:.4}", point.lat, point.lon)));
    }
    let places = NominatimClient::new().search(query, None)?;
    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("No match for '{}'", query))?;
    let name = place
        .name
        .split(',')
        .next()
        .unwrap_or(&place.name)
        .trim()
        .to_string();
    Ok((place.point, name))
}
