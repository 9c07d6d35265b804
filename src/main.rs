//! Flood Warning Intensity Index - calculation CLI
//!
//! Reads historic flood warning exports, reconstructs warning durations,
//! scores each requested year and normalizes it against the stored
//! baseline:
//! 1. Load settings and the warning area registry
//! 2. Validate warning rows (rejected rows are counted and reported)
//! 3. Reconstruct events per warning area
//! 4. Score, normalize and print the indicators (JSON)
//!
//! The baseline is only ever written by an explicit `--establish-baseline`.
//!
//! Usage:
//!   fwii_service --records data/warnings_2024.json --year 2024
//!   fwii_service --records data/warnings_2020.json --establish-baseline
//!   fwii_service --records all.json --year 2021 --year 2022 --year 2023 --workers 4
//!   fwii_service --revert-baseline
//!
//! Options:
//!   --records FILE        Warning export (JSON array); may repeat
//!   --year YEAR           Year to calculate; may repeat (trend table for >1)
//!   --settings PATH       Settings file (default: $FWII_SETTINGS or config/settings.toml)
//!   --areas PATH          Area registry (default: $FWII_AREAS or config/warning_areas.toml)
//!   --establish-baseline  Compute and store the baseline from the baseline year
//!   --replace-baseline    Allow --establish-baseline to supersede an existing baseline
//!   --revert-baseline     Undo the last establishment (restore the replaced
//!                         baseline, or retire a first one)
//!   --workers N           Reconstruct areas on N threads
//!
//! Environment:
//!   RUST_LOG - log filter (e.g. RUST_LOG=fwii_service=debug)

use fwii_service::analysis::reconstruct::{reconstruct_events, reconstruct_events_parallel};
use fwii_service::analysis::scoring::score_year;
use fwii_service::areas::AreaRegistry;
use fwii_service::baseline::{BaselineStore, RevertOutcome};
use fwii_service::config::{load_settings, path_from_env, DEFAULT_AREAS_PATH, DEFAULT_SETTINGS_PATH};
use fwii_service::indicator::{indicators_from_events, NormalizedIndicators};
use fwii_service::ingest::warnings::load_warnings;
use fwii_service::trend::build_trend;
use fwii_service::validate::validate_records;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Default)]
struct Args {
    records: Vec<PathBuf>,
    years: Vec<i32>,
    settings: Option<PathBuf>,
    areas: Option<PathBuf>,
    establish_baseline: bool,
    replace_baseline: bool,
    revert_baseline: bool,
    workers: usize,
}

fn usage_error(program: &str, message: &str) -> ! {
    eprintln!("Error: {}", message);
    eprintln!(
        "Usage: {} --records FILE [--records FILE ...] [--year YEAR ...] [--settings PATH] \
         [--areas PATH] [--establish-baseline [--replace-baseline]] [--revert-baseline] [--workers N]",
        program
    );
    std::process::exit(1);
}

fn parse_args() -> Args {
    let argv: Vec<String> = env::args().collect();
    let program = argv.first().map(String::as_str).unwrap_or("fwii_service");
    let mut args = Args {
        workers: 1,
        ..Default::default()
    };

    let mut i = 1;
    while i < argv.len() {
        let flag = argv[i].as_str();
        let next = argv.get(i + 1).cloned();
        let value = || {
            next.clone()
                .unwrap_or_else(|| usage_error(program, &format!("{} requires a value", flag)))
        };
        match flag {
            "--records" => {
                args.records.push(PathBuf::from(value()));
                i += 2;
            }
            "--year" => {
                let raw = value();
                let year = raw
                    .parse()
                    .unwrap_or_else(|_| usage_error(program, &format!("invalid year: {}", raw)));
                args.years.push(year);
                i += 2;
            }
            "--settings" => {
                args.settings = Some(PathBuf::from(value()));
                i += 2;
            }
            "--areas" => {
                args.areas = Some(PathBuf::from(value()));
                i += 2;
            }
            "--workers" => {
                let raw = value();
                args.workers = raw
                    .parse()
                    .unwrap_or_else(|_| usage_error(program, &format!("invalid worker count: {}", raw)));
                i += 2;
            }
            "--establish-baseline" => {
                args.establish_baseline = true;
                i += 1;
            }
            "--replace-baseline" => {
                args.replace_baseline = true;
                i += 1;
            }
            "--revert-baseline" => {
                args.revert_baseline = true;
                i += 1;
            }
            other => usage_error(program, &format!("unknown argument: {}", other)),
        }
    }

    if !args.revert_baseline && args.records.is_empty() {
        usage_error(program, "at least one --records file is required");
    }
    if !args.revert_baseline && !args.establish_baseline && args.years.is_empty() {
        usage_error(program, "give --year, --establish-baseline or --revert-baseline");
    }
    if args.replace_baseline && !args.establish_baseline {
        usage_error(program, "--replace-baseline only applies with --establish-baseline");
    }
    args
}

fn print_indicators(indicators: &NormalizedIndicators) {
    println!("📈 {} (baseline {} v{})", indicators.year, indicators.baseline_year, indicators.baseline_version);
    println!(
        "   Fluvial: score {:>10.2}  index {:>7.1}  ({} events, {:.1} h)",
        indicators.fluvial_score_raw, indicators.fluvial_index, indicators.fluvial_events, indicators.fluvial_hours
    );
    println!(
        "   Coastal: score {:>10.2}  index {:>7.1}  ({} events, {:.1} h)",
        indicators.coastal_score_raw, indicators.coastal_index, indicators.coastal_events, indicators.coastal_hours
    );
    println!("   Composite FWII: {:.1}", indicators.composite_index);
    println!(
        "   Severe warnings: {}  Flood warnings: {}  Flood alerts: {}\n",
        indicators.severe_warnings, indicators.flood_warnings, indicators.flood_alerts
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let args = parse_args();

    println!("🌊 Flood Warning Intensity Index");
    println!("================================\n");

    let settings_path = args
        .settings
        .clone()
        .unwrap_or_else(|| path_from_env("FWII_SETTINGS", DEFAULT_SETTINGS_PATH));
    println!("⚙️  Loading settings from {}...", settings_path.display());
    let config = load_settings(&settings_path)?;
    println!(
        "✓ Settings v{} (baseline year {}, max gap {} h)\n",
        config.version, config.baseline_year, config.duration.max_gap_hours
    );

    let store = BaselineStore::new(&config.baseline_path);

    if args.revert_baseline {
        match store.revert()? {
            RevertOutcome::Restored(restored) => println!(
                "↩️  Restored baseline v{} for {} at {}",
                restored.version,
                restored.year,
                store.path().display()
            ),
            RevertOutcome::Retired(retired) => println!(
                "↩️  Retired baseline v{} for {} to {}; no baseline is established",
                retired.version,
                retired.year,
                store.retired_path().display()
            ),
        }
        return Ok(());
    }

    let areas_path = args
        .areas
        .clone()
        .unwrap_or_else(|| path_from_env("FWII_AREAS", DEFAULT_AREAS_PATH));
    let areas = AreaRegistry::load(&areas_path)?;
    println!("✓ {} warning areas loaded from {}\n", areas.len(), areas_path.display());

    println!("📋 Loading warning records...");
    let mut raw = Vec::new();
    for path in &args.records {
        let rows = load_warnings(path)?;
        println!("   {} - {} rows", path.display(), rows.len());
        raw.extend(rows);
    }

    let (records, report) = validate_records(&raw, &areas);
    for line in report.summary_lines() {
        println!("   {}", line);
    }
    for finding in report.rejected.iter().take(10) {
        println!("   ⚠ {}", finding);
    }
    if report.rejected_count() > 10 {
        println!("   ⚠ ... and {} more", report.rejected_count() - 10);
    }
    println!();

    let events = if args.workers > 1 {
        reconstruct_events_parallel(records, &config.duration, args.workers)?
    } else {
        reconstruct_events(records, &config.duration)
    };
    println!("🔍 Reconstructed {} warning events\n", events.len());

    if args.establish_baseline {
        let scores = score_year(&events, &config.severity_weights, config.baseline_year);
        let baseline = store.establish(&scores, config.baseline_year, args.replace_baseline)?;
        println!(
            "📌 Baseline v{} for {} saved to {}: fluvial {:.2}, coastal {:.2}\n",
            baseline.version,
            baseline.year,
            store.path().display(),
            baseline.fluvial_score,
            baseline.coastal_score
        );
    }

    if args.years.is_empty() {
        return Ok(());
    }

    let baseline = store.load_for_year(config.baseline_year)?;
    let mut results = Vec::with_capacity(args.years.len());
    for year in &args.years {
        let indicators = indicators_from_events(&events, *year, &config, baseline.as_ref())?;
        print_indicators(&indicators);
        results.push(indicators);
    }

    if results.len() > 1 {
        let trend = build_trend(results);
        println!("📊 Trend");
        println!("   {:>6} {:>10} {:>10} {:>10} {:>10}", "Year", "Fluvial", "Coastal", "FWII", "Change");
        for point in &trend {
            let change = point
                .change_percent
                .map(|p| format!("{:+.1}%", p))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "   {:>6} {:>10.1} {:>10.1} {:>10.1} {:>10}",
                point.indicators.year,
                point.indicators.fluvial_index,
                point.indicators.coastal_index,
                point.indicators.composite_index,
                change
            );
        }
        println!();
        println!("{}", serde_json::to_string_pretty(&trend)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    Ok(())
}
