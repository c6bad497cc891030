use std::sync::atomic::Ordering;
use std::time::Duration;

use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use colored::Colorize;
use serde::Serialize;

use gof_behavioral::{policy_by_name, AlarmClock, TimeService};
use gof_creational::SqlQuery;
use gof_structural::{
    CsvExporter, DataExporter, DataFetcher, DbConfig, JsonExporter, MysqlFetcher, OracleFetcher,
};
use gof_stream::{FileStream, MockFileStream, StreamState};

use crate::cli::*;
use crate::config::{CatalogueConfig, TimeServiceSettings};

pub fn run_command(cli: Cli, config: CatalogueConfig) -> anyhow::Result<()> {
    let json = matches!(cli.format, OutputFormat::Json);
    match cli.command {
        Command::Stream(args) => cmd_stream(args, json),
        Command::Sort(args) => cmd_sort(args, &config, json),
        Command::Sql(args) => cmd_sql(args, json),
        Command::Alarm(args) => cmd_alarm(args, &config, json),
        Command::Export(args) => cmd_export(args, json),
        Command::Patterns(_) => cmd_patterns(json),
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// stream
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct StepOutcome {
    pub op: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StreamReport {
    pub name: String,
    pub steps: Vec<StepOutcome>,
    pub state: StreamState,
}

/// Transfers are handed to the stream in slices of at most this size.
const CHUNK: usize = 64 * 1024;

/// Move `total` bytes through `step`, one chunk at a time.
///
/// `step` always runs at least once so an empty transfer is still checked
/// against the stream's mode.
fn chunked(
    total: usize,
    mut step: impl FnMut(usize) -> gof_stream::Result<usize>,
) -> Result<usize, String> {
    if total > MAX_TRANSFER {
        return Err(format!("byte count {total} exceeds {MAX_TRANSFER}"));
    }
    let mut moved = step(total.min(CHUNK)).map_err(|e| e.to_string())?;
    while moved < total {
        let n = step((total - moved).min(CHUNK)).map_err(|e| e.to_string())?;
        if n == 0 {
            break;
        }
        moved += n;
    }
    Ok(moved)
}

/// Apply every op in order. Rejected ops are recorded and the script goes on.
pub fn run_stream_script(name: &str, ops: &[StreamOp]) -> StreamReport {
    let mut stream = MockFileStream::new(name);
    let mut chunk = vec![0u8; CHUNK];
    let steps = ops
        .iter()
        .map(|op| {
            let result = match *op {
                StreamOp::OpenRead => stream.open_read().map(|()| None).map_err(|e| e.to_string()),
                StreamOp::OpenWrite => stream.open_write().map(|()| None).map_err(|e| e.to_string()),
                StreamOp::Read(n) => chunked(n, |len| stream.read(&mut chunk[..len])).map(Some),
                StreamOp::Write(n) => chunked(n, |len| stream.write(&chunk[..len])).map(Some),
                StreamOp::Close => stream.close().map(|()| None).map_err(|e| e.to_string()),
            };
            match result {
                Ok(bytes) => StepOutcome {
                    op: op.to_string(),
                    ok: true,
                    bytes,
                    error: None,
                },
                Err(error) => StepOutcome {
                    op: op.to_string(),
                    ok: false,
                    bytes: None,
                    error: Some(error),
                },
            }
        })
        .collect();
    StreamReport {
        name: name.to_string(),
        steps,
        state: stream.state(),
    }
}

fn cmd_stream(args: StreamArgs, json: bool) -> anyhow::Result<()> {
    let report = run_stream_script(&args.name, &args.ops);
    if json {
        return print_json(&report);
    }
    println!("Stream {}", report.name.bold());
    for step in &report.steps {
        match (&step.error, step.bytes) {
            (Some(err), _) => println!("  {:<12} {} {}", step.op, "✗".red().bold(), err.red()),
            (None, Some(n)) => println!("  {:<12} {} {} bytes", step.op, "✓".green(), n),
            (None, None) => println!("  {:<12} {}", step.op, "✓".green()),
        }
    }
    println!("State: {}", report.state.to_string().yellow());
    Ok(())
}

// ---------------------------------------------------------------------------
// sort
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SortOutcome {
    pub policy: &'static str,
    pub sorted: Vec<i32>,
}

pub fn sort_numbers(policy: &str, mut numbers: Vec<i32>) -> anyhow::Result<SortOutcome> {
    let policy = policy_by_name(policy)?;
    policy.sort(&mut numbers);
    Ok(SortOutcome {
        policy: policy.name(),
        sorted: numbers,
    })
}

fn cmd_sort(args: SortArgs, config: &CatalogueConfig, json: bool) -> anyhow::Result<()> {
    let policy = args.policy.as_deref().unwrap_or(&config.sort_policy);
    let outcome = sort_numbers(policy, args.numbers)?;
    if json {
        return print_json(&outcome);
    }
    println!("{} {:?}", format!("{}:", outcome.policy).cyan(), outcome.sorted);
    Ok(())
}

// ---------------------------------------------------------------------------
// sql
// ---------------------------------------------------------------------------

pub fn render_sql(args: &SqlArgs) -> anyhow::Result<String> {
    let mut builder = SqlQuery::builder().table(&args.table);
    for field in &args.fields {
        builder = builder.field(field);
    }
    for condition in &args.conditions {
        builder = builder.condition(condition);
    }
    if let Some(order_by) = &args.order_by {
        builder = builder.order_by(order_by);
    }
    Ok(builder.build()?.to_sql())
}

fn cmd_sql(args: SqlArgs, json: bool) -> anyhow::Result<()> {
    let sql = render_sql(&args)?;
    if json {
        return print_json(&serde_json::json!({ "sql": sql }));
    }
    println!("{}", sql.bold());
    Ok(())
}

// ---------------------------------------------------------------------------
// alarm
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct AlarmOutcome {
    pub name: String,
    pub time: String,
    pub repeatable: bool,
    pub occurs: u32,
}

const ALARMS: &[(&str, u32, u32, bool)] = &[
    ("meeting", 14, 30, false),
    ("wake up", 6, 0, true),
    ("lunch", 12, 30, true),
    ("nap", 13, 0, true),
    ("dinner", 18, 30, true),
    ("good night", 22, 0, true),
];

/// Run the standard alarm set for `run_for` real time, starting at `start`.
pub fn run_alarms(
    settings: &TimeServiceSettings,
    start: NaiveDateTime,
    run_for: Duration,
) -> anyhow::Result<Vec<AlarmOutcome>> {
    let service = std::sync::Arc::new(TimeService::new());
    let mut counters = Vec::with_capacity(ALARMS.len());
    for &(name, hour, minute, repeatable) in ALARMS {
        let clock = AlarmClock::new(name, hour, minute, repeatable, start)?;
        counters.push((name, clock.time(), repeatable, clock.occurs_handle()));
        service.attach(clock)?;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting runtime")?;
    runtime.block_on(async {
        let ticker = service.spawn_ticker(settings.to_service_config(), start);
        tokio::time::sleep(run_for).await;
        ticker.stop().await
    })?;

    Ok(counters
        .into_iter()
        .map(|(name, time, repeatable, occurs)| AlarmOutcome {
            name: name.to_string(),
            time: time.format("%H:%M").to_string(),
            repeatable,
            occurs: occurs.load(Ordering::SeqCst),
        })
        .collect())
}

fn cmd_alarm(args: AlarmArgs, config: &CatalogueConfig, json: bool) -> anyhow::Result<()> {
    let seconds = args.seconds.unwrap_or(config.alarm_seconds);
    let settings = &config.time_service;
    let start = Local::now().naive_local();
    let run_for = Duration::from_secs(seconds);
    let outcomes = run_alarms(settings, start, run_for)?;
    if json {
        return print_json(&outcomes);
    }
    let end = settings.to_service_config().simulated(start, run_for);
    println!(
        "Simulated {} → {} (x{})",
        start.format("%Y-%m-%d %H:%M").to_string().dimmed(),
        end.format("%Y-%m-%d %H:%M").to_string().dimmed(),
        settings.speed
    );
    for alarm in &outcomes {
        let kind = if alarm.repeatable { "daily" } else { "once" };
        let count = if alarm.occurs > 0 {
            format!("rang {}x", alarm.occurs).green()
        } else {
            "silent".dimmed()
        };
        println!("  {} {:<12} {:<5} {}", alarm.time.yellow(), alarm.name, kind, count);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// export
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ExportReport {
    pub source: DataSource,
    pub kind: ExportKind,
    pub rows: usize,
    pub output: String,
}

/// Fetch `args.sql` from the chosen source and write it in the chosen format.
/// Returns the row count.
pub fn export_rows(args: &ExportArgs, out: &mut dyn std::io::Write) -> anyhow::Result<usize> {
    let fetcher: Box<dyn DataFetcher> = match args.source {
        DataSource::Mysql => Box::new(MysqlFetcher::new(DbConfig::new(
            "mysql",
            "mysql://localhost:3306/catalogue",
            "root",
            "",
        ))),
        DataSource::Oracle => Box::new(OracleFetcher::new(DbConfig::new(
            "oracle",
            "oracle://localhost:1521/catalogue",
            "system",
            "",
        ))),
    };
    let exporter: Box<dyn DataExporter> = match args.kind {
        ExportKind::Csv => Box::new(CsvExporter::new(fetcher)),
        ExportKind::Json => Box::new(JsonExporter::new(fetcher)),
    };
    exporter
        .export(&args.sql, out)
        .with_context(|| format!("exporting {:?}", args.sql))
}

fn cmd_export(args: ExportArgs, json: bool) -> anyhow::Result<()> {
    if !json {
        let stdout = std::io::stdout();
        export_rows(&args, &mut stdout.lock())?;
        return Ok(());
    }
    let mut buf = Vec::new();
    let rows = export_rows(&args, &mut buf)?;
    print_json(&ExportReport {
        source: args.source,
        kind: args.kind,
        rows,
        output: String::from_utf8_lossy(&buf).into_owned(),
    })
}

// ---------------------------------------------------------------------------
// patterns
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct PatternEntry {
    pub category: &'static str,
    pub name: &'static str,
    pub summary: &'static str,
}

pub const CATALOGUE: &[PatternEntry] = &[
    entry("creational", "abstract_factory", "device families per vendor"),
    entry("creational", "builder", "SQL SELECT builder"),
    entry("creational", "factory_method", "one light factory per vendor"),
    entry("creational", "prototype", "users cloned from a JSON-configured prototype"),
    entry("creational", "simple_factory", "vendor chosen by name"),
    entry("creational", "singleton", "lazy singletons and a bean container"),
    entry("structural", "adapter", "Fahrenheit thermometers behind a Celsius interface"),
    entry("structural", "bridge", "fetchers and exporters combined freely"),
    entry("structural", "composite", "courses made of courses"),
    entry("structural", "decorator", "JSON formatting over a console logger"),
    entry("structural", "facade", "one-call gift exchange"),
    entry("structural", "flyweight", "shared ticket records"),
    entry("structural", "proxy", "logging and permission proxies"),
    entry("behavioral", "chain", "log lines through level filters"),
    entry("behavioral", "command", "undoable drawing commands"),
    entry("behavioral", "delegate", "messages dispatched by class"),
    entry("behavioral", "iterator", "FIFO linked list iteration"),
    entry("behavioral", "mediator", "phone app and lights via a cloud hub"),
    entry("behavioral", "memento", "editor undo and redo"),
    entry("behavioral", "observer", "alarm clocks on a time service"),
    entry("behavioral", "policy", "interchangeable sort algorithms"),
    entry("behavioral", "state", "mode-gated mock file stream"),
    entry("behavioral", "template_method", "query skeleton with row hooks"),
    entry("behavioral", "visitor", "sales reports by city and product"),
];

const fn entry(category: &'static str, name: &'static str, summary: &'static str) -> PatternEntry {
    PatternEntry {
        category,
        name,
        summary,
    }
}

fn cmd_patterns(json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&CATALOGUE);
    }
    let mut current = "";
    for pattern in CATALOGUE {
        if pattern.category != current {
            current = pattern.category;
            println!("{}", current.bold());
        }
        println!("  {:<18} {}", pattern.name.cyan(), pattern.summary);
    }
    Ok(())
}
