//! matrix — compute a cost matrix for a CSV of points.
//!
//! ```text
//! matrix data/points.csv                         # great circle, 60 km/h
//! matrix data/points.csv --graph data/graph      # road network (nodes.csv + edges.csv)
//! matrix data/points.csv --output summed --distance-weight 0.5 -o matrix.csv
//! matrix data/points.csv --graph data/graph --route depot,store-1
//! ```
//!
//! The points file needs an id, a latitude and a longitude column.  Their
//! default names are `location-key`, `latitude` and `longitude`; override
//! them with `--id-column`, `--lat-column` and `--lon-column`.
//!
//! Logging goes to stderr; set `RUST_LOG` (default `info`).

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use rc_app::{AppContextBuilder, LoggingContext};
use rc_core::{DistanceUnit, OutputType, Table, TableSource, TimeUnit};
use rc_crs::NoShapefileSupport;
use rc_distance::{
    CostMatrix, DistanceConfiguration, DistanceMethod, GreatCircleConfig, OutputConfig, PointSet,
    RoadNetworkConfig,
};
use rc_distance::points::{LATITUDE, LOCATION_KEY, LONGITUDE};
use rc_network::CsvGraphLoader;

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "matrix")]
#[command(about = "Cost matrix from a CSV of points, by great circle or road network", long_about = None)]
struct Cli {
    /// Points CSV
    points: PathBuf,

    /// Road graph directory; great circle distance is used when absent
    #[arg(long)]
    graph: Option<PathBuf>,

    /// Great circle travel speed in km/h
    #[arg(long, default_value_t = 60.0)]
    speed_kmh: f64,

    /// Great circle distance multiplier
    #[arg(long, default_value_t = 1.0)]
    distance_multiplier: f64,

    /// Road network travel time multiplier
    #[arg(long, default_value_t = 1.0)]
    time_multiplier: f64,

    /// What the cost channel holds
    #[arg(long, value_enum, default_value_t = Output::Time)]
    output: Output,

    #[arg(long, value_enum, default_value_t = Distance::Km)]
    distance_unit: Distance,

    #[arg(long, value_enum, default_value_t = Time::H)]
    time_unit: Time,

    /// Weight of time in summed cost
    #[arg(long, default_value_t = 1.0)]
    time_weight: f64,

    /// Weight of distance in summed cost
    #[arg(long, default_value_t = 0.0)]
    distance_weight: f64,

    #[arg(long, default_value = LOCATION_KEY)]
    id_column: String,

    #[arg(long, default_value = LATITUDE)]
    lat_column: String,

    #[arg(long, default_value = LONGITUDE)]
    lon_column: String,

    /// Also print the route geometry between two ids, e.g. `--route a,b`
    #[arg(long, value_delimiter = ',', num_args = 2)]
    route: Option<Vec<String>>,

    /// Write the matrix here instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Copy, Clone, ValueEnum)]
enum Output {
    Distance,
    Time,
    Summed,
}

#[derive(Copy, Clone, ValueEnum)]
enum Distance {
    M,
    Km,
    Miles,
}

#[derive(Copy, Clone, ValueEnum)]
enum Time {
    Ms,
    S,
    Min,
    H,
}

impl Cli {
    fn configuration(&self) -> DistanceConfiguration {
        let method = match &self.graph {
            Some(dir) => DistanceMethod::RoadNetwork(RoadNetworkConfig {
                graph_dir:       dir.clone(),
                time_multiplier: self.time_multiplier,
            }),
            None => DistanceMethod::GreatCircle(GreatCircleConfig {
                speed_mps:           self.speed_kmh / 3.6,
                distance_multiplier: self.distance_multiplier,
            }),
        };
        let output = OutputConfig {
            output_type: match self.output {
                Output::Distance => OutputType::Distance,
                Output::Time     => OutputType::Time,
                Output::Summed   => OutputType::Summed,
            },
            distance_unit: match self.distance_unit {
                Distance::M     => DistanceUnit::Metres,
                Distance::Km    => DistanceUnit::Kilometres,
                Distance::Miles => DistanceUnit::Miles,
            },
            time_unit: match self.time_unit {
                Time::Ms  => TimeUnit::Milliseconds,
                Time::S   => TimeUnit::Seconds,
                Time::Min => TimeUnit::Minutes,
                Time::H   => TimeUnit::Hours,
            },
            time_weight:     self.time_weight,
            distance_weight: self.distance_weight,
        };
        DistanceConfiguration { method, output }
    }
}

// ── Input / output ────────────────────────────────────────────────────────────

fn load_points(cli: &Cli) -> Result<Table> {
    let mut table = Table::from_csv_path(&cli.points)
        .with_context(|| format!("reading {}", cli.points.display()))?;
    for (column, tag) in [
        (&cli.id_column, LOCATION_KEY),
        (&cli.lat_column, LATITUDE),
        (&cli.lon_column, LONGITUDE),
    ] {
        let Some(col) = table.find_column(column) else {
            bail!("{}: no column named {column:?}", cli.points.display());
        };
        table.tag_column(col, tag);
    }
    Ok(table)
}

fn write_matrix(matrix: &CostMatrix, out: Option<&Path>) -> Result<()> {
    let sink: Box<dyn Write> = match out {
        Some(path) => Box::new(
            std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut w = csv::Writer::from_writer(sink);
    w.write_record(["from", "to", "cost", "distance", "time"])?;
    let ids = matrix.ids();
    for (i, from) in ids.iter().enumerate() {
        for (j, to) in ids.iter().enumerate() {
            w.write_record([
                from.clone(),
                to.clone(),
                matrix.cost(i, j).to_string(),
                matrix.distance(i, j).to_string(),
                matrix.time(i, j).to_string(),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.configuration();
    let points = load_points(&cli)?;
    let tables: [&dyn TableSource; 1] = [&points];

    let app = AppContextBuilder::new(CsvGraphLoader, NoShapefileSupport).build()?;
    let ctx = LoggingContext::new("matrix");

    let t0 = Instant::now();
    let Some(matrix) = app.distance().calculate(&config, &tables, &ctx)? else {
        bail!("matrix calculation was cancelled");
    };
    tracing::info!(
        points = matrix.size(),
        method = config.method.name(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "matrix ready"
    );
    write_matrix(&matrix, cli.out.as_deref())?;

    if let Some([from, to]) = cli.route.as_deref() {
        let set = PointSet::from_tables(&tables)?;
        let position = |id: &str| set.get(id).with_context(|| format!("unknown point id {id:?}"));
        let route = app
            .distance()
            .calculate_route_geometry(&config, position(from)?, position(to)?, &ctx)?;
        eprintln!("route {from} -> {to}: {} points, {:.0} m", route.point_count(), route.length_m());
        for p in route.points() {
            eprintln!("  {:.6},{:.6}", p.lat, p.lon);
        }
    }

    app.dispose();
    Ok(())
}
