//! QARTOD Configuration Generator - CLI
//!
//! Generates QARTOD and NERACOOS dataset configuration files for a
//! tide-gauge site:
//! 1. Fetches site metadata and water-level observations from Hohonu
//!    (or observations from a NERACOOS ERDDAP dataset)
//! 2. Derives suggested QARTOD test thresholds from the series statistics
//! 3. Overlays regional datum-based guidance where available
//! 4. Previews the suggested tests against the fetched series
//! 5. Writes the configuration documents
//!
//! Usage:
//!   cargo run --release -- --station hohonu-180                 # both formats
//!   cargo run --release -- --station hohonu-180 --days 90 --format qartod
//!
//! Environment:
//!   HOHONU_API_KEY - Hohonu dashboard API credential (.env supported)

use chrono::{Duration, Utc};
use std::env;
use std::path::Path;

use qartod_gen::apply::QcFlag;
use qartod_gen::config;
use qartod_gen::emit::Format;
use qartod_gen::ingest::{erddap, hohonu};
use qartod_gen::logging::{self, DataSource, LogLevel};
use qartod_gen::regions;
use qartod_gen::session::Session;

struct Args {
    station: String,
    days: i64,
    datum: String,
    variable: String,
    out_dir: String,
    formats: Vec<Format>,
    region: String,
    erddap_dataset: Option<String>,
    log_file: Option<String>,
    verbose: bool,
}

fn parse_args() -> Result<Args, String> {
    let argv: Vec<String> = env::args().collect();
    let mut args = Args {
        station: String::new(),
        days: 60,
        datum: "NAVD88".to_string(),
        variable: "water_level".to_string(),
        out_dir: ".".to_string(),
        formats: vec![Format::Qartod, Format::Neracoos],
        region: "Gulf of Maine".to_string(),
        erddap_dataset: None,
        log_file: None,
        verbose: false,
    };

    let mut i = 1;
    while i < argv.len() {
        let take_value = |i: usize| -> Result<String, String> {
            argv.get(i + 1)
                .cloned()
                .ok_or_else(|| format!("{} requires a value", argv[i]))
        };
        match argv[i].as_str() {
            "--station" => {
                args.station = take_value(i)?;
                i += 2;
            }
            "--days" => {
                args.days = take_value(i)?
                    .parse()
                    .map_err(|_| "--days requires a whole number".to_string())?;
                i += 2;
            }
            "--datum" => {
                args.datum = take_value(i)?;
                i += 2;
            }
            "--variable" => {
                args.variable = take_value(i)?;
                i += 2;
            }
            "--out" => {
                args.out_dir = take_value(i)?;
                i += 2;
            }
            "--format" => {
                args.formats = match take_value(i)?.as_str() {
                    "qartod" => vec![Format::Qartod],
                    "neracoos" => vec![Format::Neracoos],
                    "both" => vec![Format::Qartod, Format::Neracoos],
                    other => return Err(format!("unknown format: {}", other)),
                };
                i += 2;
            }
            "--region" => {
                args.region = take_value(i)?;
                i += 2;
            }
            "--erddap-dataset" => {
                args.erddap_dataset = Some(take_value(i)?);
                i += 2;
            }
            "--log-file" => {
                args.log_file = Some(take_value(i)?);
                i += 2;
            }
            "--verbose" => {
                args.verbose = true;
                i += 1;
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
    }

    if args.station.is_empty() {
        return Err("--station is required".to_string());
    }
    if args.days <= 0 {
        return Err("--days must be positive".to_string());
    }
    Ok(args)
}

fn main() {
    println!("🌊 QARTOD Configuration Generator");
    println!("==================================\n");

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!(
                "Usage: qartod_gen --station ID [--days N] [--datum NAVD88] [--variable NAME]"
            );
            eprintln!(
                "                  [--out DIR] [--format qartod|neracoos|both] [--region NAME]"
            );
            eprintln!("                  [--erddap-dataset ID] [--log-file PATH] [--verbose]");
            std::process::exit(1);
        }
    };

    dotenv::dotenv().ok();
    let min_level = if args.verbose { LogLevel::Debug } else { LogLevel::Info };
    logging::init_logger(min_level, args.log_file.as_deref(), args.log_file.is_some());

    let api_key = match env::var("HOHONU_API_KEY") {
        Ok(key) => key,
        Err(_) => {
            eprintln!("❌ HOHONU_API_KEY not set (use .env or the environment)");
            std::process::exit(1);
        }
    };

    let tuning = config::load_config();
    let client = reqwest::blocking::Client::new();
    let end = Utc::now();
    let start = end - Duration::days(args.days);

    // Fetch site metadata
    println!("📡 Fetching station info for {}...", args.station);
    let site = match hohonu::fetch_station_info(&client, &api_key, &args.station) {
        Ok(site) => site,
        Err(e) => {
            logging::log_fetch_failure(DataSource::Hohonu, &args.station, "station info", &e);
            eprintln!("\n❌ Could not fetch station info: {}", e);
            std::process::exit(1);
        }
    };
    println!("   {} ({})", site.location, site.station_id);
    if !site.has_tidal_datums() {
        println!("   ⚠ No tidal datums computed yet; regional datum defaults unavailable");
    }

    // Fetch observations
    let series = if let Some(dataset_id) = &args.erddap_dataset {
        println!("📥 Fetching {} days from ERDDAP dataset {}...", args.days, dataset_id);
        erddap::fetch_observations(
            &client,
            erddap::DEFAULT_SERVER,
            dataset_id,
            &args.variable,
            &args.datum,
            start,
            end,
        )
    } else {
        println!("📥 Fetching {} days of observations from Hohonu...", args.days);
        hohonu::fetch_observations(
            &client,
            &api_key,
            &args.station,
            start.date_naive(),
            end.date_naive(),
        )
    };
    let series = match series {
        Ok(series) => series,
        Err(e) => {
            let source = if args.erddap_dataset.is_some() {
                DataSource::Erddap
            } else {
                DataSource::Hohonu
            };
            logging::log_fetch_failure(source, &args.station, "observation fetch", &e);
            eprintln!("\n❌ Could not fetch observations: {}", e);
            std::process::exit(1);
        }
    };
    println!(
        "   ✓ {} observations spanning {} days\n",
        series.len(),
        series.span().num_days()
    );

    // Suggest thresholds
    println!("📊 Deriving threshold suggestions...");
    let mut session = Session::new(site, series);
    if let Err(e) = session.suggest(&tuning) {
        logging::error(DataSource::Engine, Some(&args.station), &e.to_string());
        eprintln!("\n❌ Suggestion failed: {}", e);
        std::process::exit(1);
    }

    match regions::find_region(&args.region) {
        Some(region) => {
            session.apply_regional_defaults(region);
            println!("   ✓ Applied {} guidance ({})", region.name, region.attribution);
        }
        None => {
            logging::warn(
                DataSource::Engine,
                Some(&args.station),
                &format!("no regional guidance registered for {}", args.region),
            );
            println!("   ⚠ No regional guidance for {}; statistical suggestion only", args.region);
        }
    }

    if let Some(set) = session.thresholds() {
        println!(
            "   Gross range: suspect [{:.3}, {:.3}] m, fail [{:.3}, {:.3}] m",
            set.gross_range.suspect_span.lower,
            set.gross_range.suspect_span.upper,
            set.gross_range.fail_span.lower,
            set.gross_range.fail_span.upper
        );
        println!("   Rate of change: {:.6} m/s", set.rate_of_change.threshold);
        println!(
            "   Flat line: tolerance {:.4} m, windows {}s / {}s",
            set.flat_line.tolerance, set.flat_line.suspect_threshold, set.flat_line.fail_threshold
        );
        match &set.climatology {
            Some(clim) => {
                println!("   Climatology: {} month(s) with multi-year coverage", clim.months.len())
            }
            None => println!("   Climatology: omitted (no multi-year coverage)"),
        }
    }

    // Preview against the fetched series
    if let Some(results) = session.preview() {
        let suspect = results.rollup.iter().filter(|f| **f == QcFlag::Suspect).count();
        let fail = results.rollup.iter().filter(|f| **f == QcFlag::Fail).count();
        println!(
            "\n🔍 Preview: {} suspect, {} fail of {} observations",
            suspect,
            fail,
            results.rollup.len()
        );
        if suspect + fail > results.rollup.len() / 10 {
            println!("   ⚠ More than 10% flagged; review thresholds before deploying");
        }
    }

    // Emit configuration documents
    println!("\n📝 Writing configuration files...");
    for format in &args.formats {
        let bytes = match session.export(&args.variable, *format) {
            Ok(bytes) => bytes,
            Err(e) => {
                logging::error(DataSource::Emit, Some(&args.station), &e.to_string());
                eprintln!("\n❌ Emission failed: {}", e);
                std::process::exit(1);
            }
        };
        let name = match format {
            Format::Qartod => format!("{}_qartod.{}", args.station, format.extension()),
            Format::Neracoos => format!("{}_neracoos.{}", args.station, format.extension()),
        };
        let path = Path::new(&args.out_dir).join(&name);
        if let Err(e) = std::fs::write(&path, &bytes) {
            eprintln!("   ✗ {} - write failed: {}", path.display(), e);
            std::process::exit(1);
        }
        println!("   ✓ {}", path.display());
    }

    println!("\n✓ Done");
}
