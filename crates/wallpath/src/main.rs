//! wallpath: plan a serpentine coverage path for a wall and export it.
//!
//! Reads a plan request (JSON file, stdin, inline JSON, or individual
//! flags), runs the planner, and prints the result as JSON. Optionally
//! prints per-stage diagnostics and writes SVG/CSV exports.
//!
//! # Usage
//!
//! ```text
//! wallpath --wall-width 5 --wall-height 5 --obstacle 1,1,0.25,0.25
//! wallpath request.json --report --svg wall.svg
//! cat request.json | wallpath - --csv path.csv
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use wallpath_planner::diagnostics::{Clock, PlanDiagnostics, plan_with_diagnostics};
use wallpath_planner::{GridDimensions, Obstacle, PlanRequest, PlanResult, PlannerConfig, Workspace};

/// Full-coverage serpentine path planning for wall-finishing robots.
///
/// The request comes from, in order of precedence: `--request-json`, the
/// REQUEST file (`-` for stdin), or the `--wall-*`/`--obstacle` flags.
#[derive(Parser)]
#[command(name = "wallpath", version)]
struct Cli {
    /// Path to a JSON plan request, or `-` to read it from stdin.
    request: Option<PathBuf>,

    /// Wall width in meters.
    #[arg(long)]
    wall_width: Option<f64>,

    /// Wall height in meters.
    #[arg(long)]
    wall_height: Option<f64>,

    /// Obstacle as `x,y,width,height` in meters. Repeatable.
    #[arg(long = "obstacle", value_parser = parse_obstacle, allow_hyphen_values = true)]
    obstacles: Vec<Obstacle>,

    /// Cell side length in meters.
    #[arg(long, default_value_t = PlannerConfig::DEFAULT_CELL_SIZE)]
    cell_size: f64,

    /// Full plan request as a JSON string.
    ///
    /// When provided, the REQUEST file and all wall/obstacle flags are
    /// ignored.
    #[arg(long)]
    request_json: Option<String>,

    /// Refuse grids with more than this many cells.
    #[arg(long)]
    max_cells: Option<usize>,

    /// Reject obstacles that extend beyond the wall instead of clipping.
    #[arg(long)]
    strict_bounds: bool,

    /// Print a human-readable diagnostics report instead of the plan JSON.
    #[arg(long, conflicts_with = "json_diagnostics")]
    report: bool,

    /// Print diagnostics as JSON instead of the plan JSON.
    #[arg(long)]
    json_diagnostics: bool,

    /// Write an SVG coverage preview to file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Write the path as CSV to file.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Number of runs for timing.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Parse an `x,y,width,height` obstacle.
fn parse_obstacle(s: &str) -> Result<Obstacle, String> {
    let values = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid number {part:?}: {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    match *values.as_slice() {
        [x, y, width, height] => Ok(Obstacle::new(x, y, width, height)),
        _ => Err(format!(
            "expected x,y,width,height, got {} values",
            values.len()
        )),
    }
}

/// Read a request document from a file, or from stdin for `-`.
fn read_request_source(path: &Path) -> Result<String, String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("Error reading stdin: {e}"))?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).map_err(|e| format!("Error reading {}: {e}", path.display()))
    }
}

/// Build a [`PlanRequest`] from CLI arguments.
fn request_from_cli(cli: &Cli) -> Result<PlanRequest, String> {
    if let Some(ref json) = cli.request_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --request-json: {e}"));
    }

    if let Some(ref path) = cli.request {
        let source = read_request_source(path)?;
        return serde_json::from_str(&source)
            .map_err(|e| format!("Error parsing {}: {e}", path.display()));
    }

    let (Some(wall_width), Some(wall_height)) = (cli.wall_width, cli.wall_height) else {
        return Err(
            "a request file, --request-json, or both --wall-width and --wall-height are required"
                .to_owned(),
        );
    };

    Ok(
        PlanRequest::new(Workspace::new(wall_width, wall_height), cli.obstacles.clone())
            .with_cell_size(cli.cell_size),
    )
}

/// Apply the caller-side policies selected on the command line.
fn check_request(cli: &Cli, request: &PlanRequest) -> Result<(), String> {
    if cli.strict_bounds {
        request.check_within_wall().map_err(|e| e.to_string())?;
    }

    if let Some(max_cells) = cli.max_cells {
        let dims = GridDimensions::for_workspace(request.workspace(), request.cell_size)
            .map_err(|e| e.to_string())?;
        match dims.cell_count() {
            Some(count) if count <= max_cells => {}
            _ => {
                return Err(format!(
                    "grid of {}x{} cells exceeds --max-cells {max_cells}",
                    dims.rows, dims.cols
                ));
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Write the SVG and CSV exports requested on the command line.
fn write_exports(cli: &Cli, request: &PlanRequest, result: &PlanResult) -> Result<(), String> {
    if let Some(ref svg_path) = cli.svg {
        let title = cli
            .request
            .as_deref()
            .and_then(Path::file_stem)
            .and_then(|s| s.to_str())
            .filter(|s| *s != "-")
            .unwrap_or("wallpath");
        let desc = format!(
            "{} x {} m wall, {} obstacles, {} m cells",
            request.wall_width,
            request.wall_height,
            request.obstacles.len(),
            request.cell_size,
        );
        let request_json = serde_json::to_string(request)
            .map_err(|e| format!("Error serializing request: {e}"))?;
        let metadata = wallpath_export::SvgMetadata {
            title: Some(title),
            description: Some(&desc),
            request_json: Some(&request_json),
        };
        write_file(svg_path, "SVG", &wallpath_export::to_svg(result, &metadata))?;
    }

    if let Some(ref csv_path) = cli.csv {
        write_file(csv_path, "CSV", &wallpath_export::to_csv(result))?;
    }

    Ok(())
}

fn write_file(path: &Path, kind: &str, contents: &str) -> Result<(), String> {
    std::fs::write(path, contents)
        .map_err(|e| format!("Error writing {kind} to {}: {e}", path.display()))?;
    eprintln!(
        "{kind} written to {} ({} bytes)",
        path.display(),
        contents.len(),
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let request = match request_from_cli(&cli) {
        Ok(r) => r,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(msg) = check_request(&cli, &request) {
        eprintln!("Invalid request: {msg}");
        return ExitCode::FAILURE;
    }

    log::info!(
        "planning {} x {} m wall with {} obstacles at {} m cells",
        request.wall_width,
        request.wall_height,
        request.obstacles.len(),
        request.cell_size,
    );

    let mut all_diagnostics = Vec::with_capacity(cli.runs);
    let mut final_result = None;

    for run in 0..cli.runs {
        if cli.runs > 1 {
            eprintln!("--- Run {}/{} ---", run + 1, cli.runs);
        }

        match plan_with_diagnostics(request.clone(), &StdClock) {
            Ok((result, diagnostics)) => {
                if cli.json_diagnostics {
                    match serde_json::to_string_pretty(&diagnostics) {
                        Ok(json) => println!("{json}"),
                        Err(e) => {
                            eprintln!("Error serializing diagnostics: {e}");
                            return ExitCode::FAILURE;
                        }
                    }
                } else if cli.report {
                    println!("{}", diagnostics.report());
                }

                // Exports are identical across runs, so write them once.
                if run == 0
                    && let Err(msg) = write_exports(&cli, &request, &result)
                {
                    eprintln!("{msg}");
                    return ExitCode::FAILURE;
                }

                all_diagnostics.push(diagnostics);
                final_result = Some(result);
            }
            Err(e) => {
                eprintln!("Invalid request: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    if !cli.report
        && !cli.json_diagnostics
        && let Some(result) = final_result
    {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing result: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    if cli.runs > 1 {
        // Keep stdout parseable when it carries JSON.
        let summary = multi_run_summary(&all_diagnostics);
        if cli.report {
            println!("\n{summary}");
        } else {
            eprintln!("\n{summary}");
        }
    }

    ExitCode::SUCCESS
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

/// Function pointer type for extracting a stage duration from diagnostics.
type StageExtractor = fn(&PlanDiagnostics) -> Duration;

/// Aggregate timing statistics across multiple runs.
#[allow(clippy::cast_precision_loss)]
fn multi_run_summary(all_diagnostics: &[PlanDiagnostics]) -> String {
    let mut lines = vec![format!(
        "Summary ({} runs)\n{}",
        all_diagnostics.len(),
        "=".repeat(60),
    )];

    if all_diagnostics.is_empty() {
        lines.push("Warning: no diagnostics to summarize".to_owned());
        return lines.join("\n");
    }

    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| d.total_duration.as_secs_f64() * 1000.0)
        .collect();

    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;

    lines.push(format!(
        "Total duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms"
    ));
    lines.push(String::new());
    lines.push(format!("{:<16} {:>12}", "Stage", "Mean (ms)"));
    lines.push("-".repeat(30));

    let stage_extractors: &[(&str, StageExtractor)] = &[
        ("Validate", |d| d.validate.duration),
        ("Grid", |d| d.grid.duration),
        ("Rasterize", |d| d.rasterize.duration),
        ("Route", |d| d.route.duration),
        ("Report", |d| d.report.duration),
    ];

    for (name, extractor) in stage_extractors {
        let stage_mean = all_diagnostics
            .iter()
            .map(|d| extractor(d).as_secs_f64() * 1000.0)
            .sum::<f64>()
            / all_diagnostics.len() as f64;
        lines.push(format!("{name:<16} {stage_mean:>10.3}ms"));
    }

    lines.join("\n")
}
