use celestial_region::pixel::{ang2pix, pix2ang, pixel_area};
use celestial_region::{predicate, Geometry, RasterConfig};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "sky-region")]
#[command(about = "HEALPix pixels, sky regions and geometry predicates")]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    /// Rasterization order for circles and polygons (0-29)
    #[arg(long, default_value = "10", global = true)]
    order: u8,

    /// Extra depth used to tighten inclusive disc coverage
    #[arg(long, default_value = "2", global = true)]
    delta_depth: u8,

    /// Use the approximate polygon coverage
    #[arg(long, global = true)]
    approx_polygon: bool,

    /// Print timing to stderr
    #[arg(long, global = true)]
    timing: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Nested pixel index of a position, or the center of a pixel
    Pixel {
        /// Right ascension in degrees
        #[arg(long, requires = "dec", conflicts_with = "pix")]
        ra: Option<f64>,
        /// Declination in degrees
        #[arg(long, allow_hyphen_values = true)]
        dec: Option<f64>,
        /// Pixel index at --order
        #[arg(long)]
        pix: Option<u64>,
    },
    /// Area of a geometry in steradians and square degrees
    Area {
        /// Geometry text, e.g. "CIRCLE(10 20 1)"
        geometry: String,
    },
    /// Centroid of a circle or polygon
    Centroid { geometry: String },
    /// The rest of the sphere
    Complement { geometry: String },
    /// Pixel region covering a geometry
    Rasterize {
        geometry: String,
        /// Print the pixel ranges at --order instead of the REGION text
        #[arg(long)]
        ranges: bool,
    },
    /// Whether OUTER contains INNER
    Contains { inner: String, outer: String },
    /// Whether two geometries share a point
    Intersects { a: String, b: String },
}

#[derive(Serialize)]
struct PixelReport {
    order: u8,
    pix: u64,
    ra_deg: f64,
    dec_deg: f64,
    area_sr: f64,
}

#[derive(Serialize)]
struct AreaReport {
    kind: String,
    steradians: f64,
    square_degrees: f64,
}

#[derive(Serialize)]
struct PredicateReport<'a> {
    predicate: &'a str,
    result: bool,
}

const SQ_DEG_PER_SR: f64 = (180.0 / std::f64::consts::PI) * (180.0 / std::f64::consts::PI);

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = RasterConfig::at_order(cli.order)
        .with_inclusive_delta_depth(cli.delta_depth)
        .with_exact_polygon(!cli.approx_polygon);
    config.validate()?;

    let start = cli.timing.then(Instant::now);

    match &cli.command {
        Commands::Pixel { ra, dec, pix } => {
            let pix = match (ra, dec, pix) {
                (Some(ra), Some(dec), _) => ang2pix(config.order, *ra, *dec)?,
                (_, _, Some(pix)) => *pix,
                _ => anyhow::bail!("either --ra/--dec or --pix is required"),
            };
            let (ra_deg, dec_deg) = pix2ang(config.order, pix)?;
            let report = PixelReport {
                order: config.order,
                pix,
                ra_deg,
                dec_deg,
                area_sr: pixel_area(config.order),
            };
            match cli.format {
                OutputFormat::Text => println!(
                    "order={} pix={} center=({:.6}°, {:+.6}°) area={:.6e} sr",
                    report.order, report.pix, report.ra_deg, report.dec_deg, report.area_sr
                ),
                OutputFormat::Json => print_json(&report)?,
            }
        }
        Commands::Area { geometry } => {
            let g = parse_geometry(geometry)?;
            let steradians = g.area();
            let report = AreaReport {
                kind: g.kind().to_string(),
                steradians,
                square_degrees: steradians * SQ_DEG_PER_SR,
            };
            match cli.format {
                OutputFormat::Text => println!(
                    "{}: {:.9} sr ({:.6} deg²)",
                    report.kind, report.steradians, report.square_degrees
                ),
                OutputFormat::Json => print_json(&report)?,
            }
        }
        Commands::Centroid { geometry } => {
            let (ra, dec) = parse_geometry(geometry)?.centroid()?;
            match cli.format {
                OutputFormat::Text => println!("{:.6} {:+.6}", ra, dec),
                OutputFormat::Json => print_json(&[ra, dec])?,
            }
        }
        Commands::Complement { geometry } => {
            let complement = parse_geometry(geometry)?.complement()?;
            print_geometry(&complement, cli.format)?;
        }
        Commands::Rasterize { geometry, ranges } => {
            let region = parse_geometry(geometry)?.rasterize(&config)?;
            if *ranges {
                let pixels = region.to_order_ranges(config.order, true)?;
                match cli.format {
                    OutputFormat::Text => println!("{}", pixels),
                    OutputFormat::Json => print_json(&pixels)?,
                }
            } else {
                print_geometry(&Geometry::region(region), cli.format)?;
            }
        }
        Commands::Contains { inner, outer } => {
            let result =
                predicate::contains(&parse_geometry(inner)?, &parse_geometry(outer)?, &config)?;
            print_predicate("contains", result, cli.format)?;
        }
        Commands::Intersects { a, b } => {
            let result =
                predicate::intersects(&parse_geometry(a)?, &parse_geometry(b)?, &config)?;
            print_predicate("intersects", result, cli.format)?;
        }
    }

    if let Some(start_time) = start {
        eprintln!(
            "Completed in {:.2} ms",
            start_time.elapsed().as_secs_f64() * 1000.0
        );
    }

    Ok(())
}

fn parse_geometry(text: &str) -> anyhow::Result<Geometry> {
    text.parse::<Geometry>()
        .map_err(|e| anyhow::anyhow!("cannot parse '{}': {}", text, e))
}

fn print_geometry(geometry: &Geometry, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("{}", geometry),
        OutputFormat::Json => print_json(geometry)?,
    }
    Ok(())
}

fn print_predicate(name: &str, result: bool, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("{}", result),
        OutputFormat::Json => print_json(&PredicateReport {
            predicate: name,
            result,
        })?,
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
