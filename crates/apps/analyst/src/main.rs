use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use analysis::{
    AnalysisKind, AnalysisSession, ClientConfig, HttpBackend, PopulationClient, PredictionParams,
    PredictionSession, WeatherParams, WeatherSession,
};
use clap::{Parser, Subcommand};
use foundation::math::offset_north;
use foundation::Point;
use runtime::{ExportFormat, StopHandle, Task, TaskBackend};
use scene::{MapEvent, Region, SelectionController, Tool};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Weather, forecast and population analysis for a map selection")]
struct Args {
    /// API root (default: $ANALYSIS_API_URL or http://127.0.0.1:5000/api)
    #[arg(long)]
    api_url: Option<String>,

    /// Poll interval in milliseconds (default: $ANALYSIS_POLL_INTERVAL_MS or 2000)
    #[arg(long)]
    poll_ms: Option<u64>,

    #[command(flatten)]
    selection: SelectionArgs,

    #[command(subcommand)]
    command: Command,
}

/// The region to analyse, drawn with one of the map tools.
#[derive(clap::Args, Debug)]
#[group(multiple = false)]
struct SelectionArgs {
    /// Single point: LAT,LON
    #[arg(long)]
    marker: Option<String>,

    /// Circle: LAT,LON,RADIUS_M
    #[arg(long)]
    circle: Option<String>,

    /// Rectangle from two opposite corners: LAT,LON,LAT,LON
    #[arg(long)]
    rect: Option<String>,

    /// Polygon clicks: LAT,LON;LAT,LON;... (at most 8 are kept)
    #[arg(long)]
    polygon: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Historical weather statistics and risk assessment
    Weather {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Last day (YYYY-MM-DD), at most 365 days after the start
        #[arg(long)]
        end: String,

        /// Download the finished analysis as csv or json
        #[arg(long)]
        export: Option<ExportFormat>,

        /// Export destination (default: weather-<task id>.<format>)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Forecast for a target date
    Predict {
        /// Target day (YYYY-MM-DD)
        #[arg(long)]
        target_date: String,

        /// Number of days to forecast
        #[arg(long, default_value_t = 1)]
        horizon: u32,

        /// Climate model
        #[arg(long, default_value = "mediterranean")]
        climate_type: String,
    },

    /// Population estimate for the selected area
    Population,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = ClientConfig::from_env();
    if let Some(url) = args.api_url {
        config = config.with_base_url(url);
    }
    if let Some(ms) = args.poll_ms {
        config = config.with_poll_interval(Duration::from_millis(ms));
    }

    let selection = draw_selection(&args.selection)?;
    let http = HttpBackend::new(config.clone())?;

    match args.command {
        Command::Weather {
            start,
            end,
            export,
            out,
        } => {
            let params = WeatherParams::parse(&start, &end)?;
            let backend: Arc<dyn TaskBackend> = Arc::new(http);
            let mut session = WeatherSession::start(
                backend,
                config.poll_config(),
                selection.region(),
                &params,
            )
            .await?;
            spawn_ctrl_c(session.stop_handle());
            let summary = finish(session, export.map(|format| (format, out))).await?;

            println!("risk level: {}", summary.overall_risk_level);
            println!("recommendation: {}", summary.recommendation);
            for (name, value) in &summary.weather_highlights {
                println!("  {name}: {value}");
            }
            for (name, value) in &summary.risk_assessment {
                println!("  {name}: {value}");
            }
        }
        Command::Predict {
            target_date,
            horizon,
            climate_type,
        } => {
            let params = PredictionParams::parse(&target_date)?
                .with_horizon(horizon)
                .with_climate_type(climate_type);
            let backend: Arc<dyn TaskBackend> = Arc::new(http);
            let mut session = PredictionSession::start(
                backend,
                config.poll_config(),
                selection.region(),
                &params,
            )
            .await?;
            spawn_ctrl_c(session.stop_handle());
            let summary = finish(session, None).await?;

            println!(
                "forecast for {}: accuracy {:.1}% ({})",
                summary.target_date, summary.accuracy_score, summary.confidence_level
            );
            for day in &summary.predictions {
                println!("  {day}");
            }
        }
        Command::Population => {
            let client = PopulationClient::from_backend(&http);
            let report = client.analyze(selection.region()).await?;
            println!(
                "population: {} over {:.2} km² ({:.1}/km², {})",
                report.total_population, report.area_km2, report.density, report.data_source
            );
        }
    }

    Ok(())
}

/// Runs the session to completion, optionally exporting the result, and
/// closes it on every path so an interrupted or failed task is released
/// while the runtime is still alive.
async fn finish<K: AnalysisKind>(
    mut session: AnalysisSession<K>,
    export: Option<(ExportFormat, Option<PathBuf>)>,
) -> Result<K::Summary, Box<dyn std::error::Error>> {
    let outcome = complete(&mut session, export).await;
    session.close().await;
    outcome
}

async fn complete<K: AnalysisKind>(
    session: &mut AnalysisSession<K>,
    export: Option<(ExportFormat, Option<PathBuf>)>,
) -> Result<K::Summary, Box<dyn std::error::Error>> {
    let summary = session.run(print_progress).await?;
    if let Some((format, out)) = export {
        let bytes = session.export(format).await?;
        let path = out.unwrap_or_else(|| {
            let id = session.task().map(|t| t.id.as_str()).unwrap_or("result");
            PathBuf::from(format!("{}-{id}.{}", K::TASK.as_str(), format.extension()))
        });
        tokio::fs::write(&path, &bytes).await?;
        info!(path = %path.display(), bytes = bytes.len(), "export written");
    }
    Ok(summary)
}

fn spawn_ctrl_c(stop: StopHandle) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted; stopping");
            stop.stop();
        }
    });
}

fn print_progress(task: &Task) {
    eprintln!(
        "[{:>5.1}%] {:>4}s {}",
        task.progress_percent, task.elapsed_seconds, task.status_text
    );
}

/// Replays the selection flags as map gestures through a
/// [`SelectionController`].
fn draw_selection(args: &SelectionArgs) -> Result<SelectionController, String> {
    let mut selection = SelectionController::new();
    selection.on_region_finalized(|region: &Region| {
        info!(
            kind = region.kind().as_str(),
            lat = region.center().lat,
            lon = region.center().lon,
            area_km2 = region.area_km2(),
            "region selected"
        );
    });

    let (tool, events) = if let Some(raw) = &args.marker {
        let p = parse_point(raw)?;
        (Tool::Marker, vec![MapEvent::Click(p)])
    } else if let Some(raw) = &args.circle {
        let values = parse_numbers(raw, 3)?;
        let center = Point::new(values[0], values[1]);
        let edge = offset_north(center, values[2]);
        (
            Tool::Circle,
            vec![
                MapEvent::Click(center),
                MapEvent::PointerMove(edge),
                MapEvent::Click(edge),
            ],
        )
    } else if let Some(raw) = &args.rect {
        let values = parse_numbers(raw, 4)?;
        let a = Point::new(values[0], values[1]);
        let b = Point::new(values[2], values[3]);
        (
            Tool::Rectangle,
            vec![MapEvent::Click(a), MapEvent::PointerMove(b), MapEvent::Click(b)],
        )
    } else if let Some(raw) = &args.polygon {
        let mut events = raw
            .split(';')
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_point(s).map(MapEvent::Click))
            .collect::<Result<Vec<_>, _>>()?;
        events.push(MapEvent::ContextMenu);
        (Tool::Polygon, events)
    } else {
        return Ok(selection);
    };

    selection.set_tool(tool);
    for event in events {
        let outcome = selection.handle(event);
        if let Some(notice) = outcome.notice {
            warn!("{notice}");
        }
    }
    if selection.region().is_none() {
        return Err(format!("{tool:?} gesture did not produce a region"));
    }
    Ok(selection)
}

fn parse_point(raw: &str) -> Result<Point, String> {
    let values = parse_numbers(raw, 2)?;
    Ok(Point::new(values[0], values[1]))
}

fn parse_numbers(raw: &str, expected: usize) -> Result<Vec<f64>, String> {
    let values = raw
        .split(',')
        .map(|s| {
            s.trim()
                .parse::<f64>()
                .map_err(|_| format!("invalid number {s:?} in {raw:?}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if values.len() != expected {
        return Err(format!(
            "expected {expected} comma-separated values, got {} in {raw:?}",
            values.len()
        ));
    }
    Ok(values)
}
