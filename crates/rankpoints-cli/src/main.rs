//! Rankpoints - ranking points equivalence CLI
//!
//! The `rankpoints` command converts athletics results to ranking points and
//! back, and expands a points total into its equivalents across events and
//! meet categories.
//!
//! ## Commands
//!
//! - `events`: List the events contested by a gender/season table
//! - `bonus`: Show the competition placement bonus table
//! - `points`: Performance to points, with wind correction
//! - `performance`: Points to performance
//! - `compare`: Equivalent performance in every other event
//! - `meets`: Total points and required performance at every meet and place
//! - `batch`: Raw batch lookup from the conversion service

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use conversion_client::{
    BatchPerformances, BatchRequest, ConversionConfig, ConversionService, HttpConversionClient,
    SERVICE_URL_ENV,
};
use rankpoints_core::{
    input_hint, list_events, parse_wind_speed, render_performance, resolve_event,
    CalculationMode, CalculationOutcome, CalculationRequest, Calculator, CompetitionCategory,
    CompetitionInput, CompetitionMatrix, EquivalenceEngine, EquivalenceRow, EventEquivalences,
    ExpansionInput, Finish, Gender, Season, WindReading, MAX_SCORING_PLACE,
};
use serde::Serialize;
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "rankpoints")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Athletics ranking points calculator and equivalence tables", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Result format on stdout
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Conversion service API root (overrides RANKPOINTS_SERVICE_URL)
    #[arg(long, global = true, env = SERVICE_URL_ENV)]
    service_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Gender/season table selection shared by most commands.
#[derive(Debug, Clone, Copy, clap::Args)]
struct TableArgs {
    /// Scoring table gender (mens, womens)
    #[arg(short, long, default_value = "mens")]
    gender: Gender,

    /// Scoring table season (indoor, outdoor)
    #[arg(short, long, default_value = "outdoor")]
    season: Season,
}

#[derive(Subcommand)]
enum Commands {
    /// List the events contested by a table, grouped by section
    Events {
        #[command(flatten)]
        table: TableArgs,
    },

    /// Show the placement bonus table
    Bonus {
        /// Only this category (OW, DF, GW, GL, A-F)
        category: Option<CompetitionCategory>,
    },

    /// Convert a performance to points
    Points {
        /// Event name or code (e.g. "100m", "LJ")
        event: String,

        /// Performance in the event's notation (ss.xx, mm:ss.xx, m.cm or a score)
        performance: String,

        #[command(flatten)]
        table: TableArgs,

        /// Wind speed in m/s (negative = headwind)
        #[arg(short, long, allow_hyphen_values = true, conflicts_with = "no_wind_info")]
        wind: Option<String>,

        /// No wind reading exists for this result
        #[arg(long)]
        no_wind_info: bool,
    },

    /// Convert points to a performance
    Performance {
        /// Event name or code
        event: String,

        /// Points (0-1400)
        points: String,

        #[command(flatten)]
        table: TableArgs,
    },

    /// Equivalent performance for a points value in every event
    Compare {
        /// Points (0-1400)
        points: String,

        #[command(flatten)]
        table: TableArgs,
    },

    /// Points and required performance at every meet category and place
    Meets {
        /// Event name or code
        event: String,

        /// Entered points total
        points: String,

        #[command(flatten)]
        table: TableArgs,

        /// Category the entered total was earned at
        #[arg(long)]
        category: Option<CompetitionCategory>,

        /// Finishing place at that meet
        #[arg(long, requires = "category", conflicts_with = "beyond_scoring")]
        place: Option<u8>,

        /// Finished outside that category's scoring places
        #[arg(long, requires = "category")]
        beyond_scoring: bool,
    },

    /// Batch lookup: performance for base points plus every placement bonus
    Batch {
        /// Event name or code
        event: String,

        /// Base performance points
        base_points: i32,

        #[command(flatten)]
        table: TableArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    rankpoints_core::init_tracing(cli.json, level);

    let output = cli.output;
    let service_url = cli.service_url.as_deref();

    let rendered = match cli.command {
        Commands::Events { table } => cmd_events(table, output)?,
        Commands::Bonus { category } => cmd_bonus(category, output)?,
        Commands::Points {
            event,
            performance,
            table,
            wind,
            no_wind_info,
        } => {
            let reading = wind_reading(wind.as_deref(), no_wind_info)?;
            let service = connect(service_url)?;
            cmd_points(service, &event, &performance, table, reading, output).await?
        }
        Commands::Performance {
            event,
            points,
            table,
        } => cmd_performance(connect(service_url)?, &event, &points, table, output).await?,
        Commands::Compare { points, table } => {
            cmd_compare(connect(service_url)?, &points, table, output).await?
        }
        Commands::Meets {
            event,
            points,
            table,
            category,
            place,
            beyond_scoring,
        } => {
            let baseline = baseline_finish(category, place, beyond_scoring)?;
            let service = connect(service_url)?;
            cmd_meets(service, &event, &points, table, baseline, output).await?
        }
        Commands::Batch {
            event,
            base_points,
            table,
        } => cmd_batch(connect(service_url)?, &event, base_points, table, output).await?,
    };

    print!("{rendered}");
    Ok(())
}

/// Build the HTTP conversion client, failing fast on missing configuration.
fn connect(service_url: Option<&str>) -> Result<Arc<dyn ConversionService>> {
    let config = match service_url {
        Some(url) => ConversionConfig::from_env_with_base_url(url),
        None => ConversionConfig::from_env(),
    }
    .context("Conversion service is not configured")?;
    debug!(base_url = %config.base_url, attempts = config.max_attempts, "using conversion service");

    let client = HttpConversionClient::new(config).context("Failed to build HTTP client")?;
    Ok(Arc::new(client))
}

fn wind_reading(wind: Option<&str>, no_wind_info: bool) -> Result<WindReading> {
    if no_wind_info {
        return Ok(WindReading::NoInformation);
    }
    match wind {
        Some(raw) => Ok(WindReading::Measured(parse_wind_speed(raw)?)),
        None => Ok(WindReading::NotSupplied),
    }
}

fn baseline_finish(
    category: Option<CompetitionCategory>,
    place: Option<u8>,
    beyond_scoring: bool,
) -> Result<Option<Finish>> {
    match (category, place, beyond_scoring) {
        (None, _, _) => Ok(None),
        (Some(category), _, true) => Ok(Some(Finish::beyond_scoring(category))),
        (Some(category), Some(place), false) => {
            let finish = Finish::new(category, place);
            finish.bonus()?;
            Ok(Some(finish))
        }
        (Some(_), None, false) => bail!("--category needs --place or --beyond-scoring"),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    json.push('\n');
    Ok(json)
}

/// List events for a table
fn cmd_events(table: TableArgs, output: OutputFormat) -> Result<String> {
    let events = list_events(table.gender, table.season);
    if output == OutputFormat::Json {
        return to_json(&events);
    }

    let mut out = String::new();
    writeln!(out, "Events ({} {})", table.gender, table.season)?;
    for (section, members) in rankpoints_core::group_by_section(&events) {
        writeln!(out, "\n{section}")?;
        for event in members {
            let wind = if rankpoints_core::is_wind_eligible(event, table.season) {
                "  [wind]"
            } else {
                ""
            };
            writeln!(
                out,
                "  {:<14} {}{}",
                event.name,
                input_hint(event, CalculationMode::PerformanceToPoints),
                wind
            )?;
        }
    }
    Ok(out)
}

#[derive(Serialize)]
struct BonusTable {
    category: CompetitionCategory,
    label: &'static str,
    bonuses: &'static [i32],
}

/// Show placement bonuses
fn cmd_bonus(category: Option<CompetitionCategory>, output: OutputFormat) -> Result<String> {
    let categories: Vec<CompetitionCategory> = match category {
        Some(c) => vec![c],
        None => CompetitionCategory::ALL.to_vec(),
    };
    let tables: Vec<BonusTable> = categories
        .into_iter()
        .map(|category| BonusTable {
            category,
            label: category.label(),
            bonuses: category.bonuses(),
        })
        .collect();
    if output == OutputFormat::Json {
        return to_json(&tables);
    }

    let mut out = String::new();
    for table in &tables {
        let places: Vec<String> = table
            .bonuses
            .iter()
            .enumerate()
            .map(|(idx, b)| format!("{}:{b}", idx + 1))
            .collect();
        writeln!(out, "{:<3} {:<17} {}", table.category, table.label, places.join(" "))?;
    }
    Ok(out)
}

/// Performance to points
async fn cmd_points(
    service: Arc<dyn ConversionService>,
    event: &str,
    performance: &str,
    table: TableArgs,
    wind: WindReading,
    output: OutputFormat,
) -> Result<String> {
    let request = CalculationRequest::new(
        event,
        table.gender,
        table.season,
        CalculationMode::PerformanceToPoints,
        performance,
    )?
    .with_wind(wind);
    let outcome = Calculator::new(service)
        .calculate(&request)
        .await
        .context("Points calculation failed")?;
    if output == OutputFormat::Json {
        return to_json(&outcome);
    }

    let CalculationOutcome::Points(points) = outcome else {
        bail!("unexpected calculation outcome");
    };
    let mut out = String::new();
    writeln!(
        out,
        "{} {} = {} points",
        points.event,
        render_performance(request.event, points.performance),
        points.points()
    )?;
    if let Some(summary) = points.adjustment.summary() {
        writeln!(
            out,
            "  wind adjustment: {summary} (base {})",
            points.adjustment.base_points
        )?;
    }
    Ok(out)
}

/// Points to performance
async fn cmd_performance(
    service: Arc<dyn ConversionService>,
    event: &str,
    points: &str,
    table: TableArgs,
    output: OutputFormat,
) -> Result<String> {
    let request = CalculationRequest::new(
        event,
        table.gender,
        table.season,
        CalculationMode::PointsToPerformance,
        points,
    )?;
    let outcome = Calculator::new(service)
        .calculate(&request)
        .await
        .context("Performance calculation failed")?;
    if output == OutputFormat::Json {
        return to_json(&outcome);
    }

    let CalculationOutcome::Performance(performance) = outcome else {
        bail!("unexpected calculation outcome");
    };
    Ok(format!(
        "{} points = {} {}\n",
        performance.points, performance.display, performance.event
    ))
}

/// Equivalent performances across events
async fn cmd_compare(
    service: Arc<dyn ConversionService>,
    points: &str,
    table: TableArgs,
    output: OutputFormat,
) -> Result<String> {
    let input = ExpansionInput {
        points: rankpoints_core::parse_points(points)?,
        gender: table.gender,
        season: table.season,
    };
    let result = EquivalenceEngine::new(service).expand_events(input).await;
    if output == OutputFormat::Json {
        return to_json(&result);
    }
    render_equivalences(&result)
}

fn render_equivalences(result: &EventEquivalences) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "{} points ({} {})",
        result.input.points, result.input.gender, result.input.season
    )?;
    for (section, entries) in result.sections() {
        writeln!(out, "\n{section}")?;
        for entry in entries {
            writeln!(out, "  {:<14} {:>10}", entry.event.name, entry.display)?;
        }
    }
    Ok(out)
}

/// Meet-by-meet comparison for one event
async fn cmd_meets(
    service: Arc<dyn ConversionService>,
    event: &str,
    points: &str,
    table: TableArgs,
    baseline: Option<Finish>,
    output: OutputFormat,
) -> Result<String> {
    let input = CompetitionInput {
        event: resolve_event(event)?,
        gender: table.gender,
        season: table.season,
        points: rankpoints_core::parse_points(points)?,
        baseline,
    };
    let matrix = EquivalenceEngine::new(service)
        .expand_competition(input)
        .await
        .context("Competition comparison failed")?;
    if output == OutputFormat::Json {
        return to_json(&matrix);
    }
    render_matrix(&matrix)
}

fn render_matrix(matrix: &CompetitionMatrix) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "{}: {} total points, {} performance points",
        matrix.input.event, matrix.input.points, matrix.performance_points
    )?;
    writeln!(out, "\nTotal points")?;
    render_grid(&mut out, &matrix.total_points_rows())?;
    writeln!(out, "\nRequired performance")?;
    render_grid(&mut out, &matrix.performance_rows())?;
    Ok(out)
}

fn render_grid(out: &mut String, rows: &[EquivalenceRow]) -> Result<()> {
    write!(out, "{:>5}", "Place")?;
    for category in CompetitionCategory::ALL {
        write!(out, " {:>9}", category.code())?;
    }
    writeln!(out)?;
    for row in rows {
        write!(out, "{:>5}", row.place)?;
        for category in CompetitionCategory::ALL {
            let cell = row.cells.get(&category).map(String::as_str).unwrap_or("-");
            write!(out, " {cell:>9}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Batch lookup straight from the service
async fn cmd_batch(
    service: Arc<dyn ConversionService>,
    event: &str,
    base_points: i32,
    table: TableArgs,
    output: OutputFormat,
) -> Result<String> {
    let event = resolve_event(event)?;
    let request = BatchRequest {
        base_points,
        event_type: event.service_code().to_string(),
        gender: table.gender,
        season: table.season,
    };
    let results = service
        .calculate_performances_batch(&request)
        .await
        .context("Batch lookup failed")?;
    if output == OutputFormat::Json {
        return to_json(&results);
    }
    render_batch(event, &results)
}

fn render_batch(event: &rankpoints_core::Event, results: &BatchPerformances) -> Result<String> {
    let rows: Vec<EquivalenceRow> = (1..=MAX_SCORING_PLACE)
        .map(|place| EquivalenceRow {
            place,
            cells: CompetitionCategory::ALL
                .into_iter()
                .map(|category| {
                    let display = results
                        .get(category.code())
                        .and_then(|places| places.get(&place))
                        .copied()
                        .flatten()
                        .map(|v| render_performance(event, v))
                        .unwrap_or_else(|| rankpoints_core::NOT_AVAILABLE.to_string());
                    (category, display)
                })
                .collect(),
        })
        .collect();
    let mut out = String::new();
    render_grid(&mut out, &rows)?;
    Ok(out)
}
