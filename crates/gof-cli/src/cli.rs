use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "gof",
    about = "Design pattern catalogue: a mode-gated file stream and runnable pattern demos",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a script of operations against a mock file stream
    Stream(StreamArgs),
    /// Sort numbers with a sort policy
    Sort(SortArgs),
    /// Render a SELECT statement with the query builder
    Sql(SqlArgs),
    /// Run alarm clocks on an accelerated time service
    Alarm(AlarmArgs),
    /// Export a query result from a mock data source
    Export(ExportArgs),
    /// List the patterns in the catalogue
    Patterns(PatternsArgs),
}

/// Largest byte count a `read:N` or `write:N` step accepts (16 MiB).
pub const MAX_TRANSFER: usize = 16 * 1024 * 1024;

/// One step of a stream script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamOp {
    OpenRead,
    OpenWrite,
    Read(usize),
    Write(usize),
    Close,
}

impl FromStr for StreamOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = |n: &str| {
            let len = n
                .parse::<usize>()
                .map_err(|_| format!("invalid byte count in {s:?}"))?;
            if len > MAX_TRANSFER {
                return Err(format!("byte count in {s:?} exceeds {MAX_TRANSFER}"));
            }
            Ok(len)
        };
        match s.split_once(':') {
            None => match s {
                "open-read" => Ok(Self::OpenRead),
                "open-write" => Ok(Self::OpenWrite),
                "close" => Ok(Self::Close),
                _ => Err(format!(
                    "unknown op {s:?} (expected open-read, open-write, read:N, write:N or close)"
                )),
            },
            Some(("read", n)) => len(n).map(Self::Read),
            Some(("write", n)) => len(n).map(Self::Write),
            Some(_) => Err(format!("unknown op {s:?}")),
        }
    }
}

impl fmt::Display for StreamOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenRead => f.write_str("open-read"),
            Self::OpenWrite => f.write_str("open-write"),
            Self::Read(n) => write!(f, "read:{n}"),
            Self::Write(n) => write!(f, "write:{n}"),
            Self::Close => f.write_str("close"),
        }
    }
}

#[derive(Args)]
pub struct StreamArgs {
    /// Stream name used in messages
    pub name: String,
    /// open-read, open-write, read:N, write:N or close
    #[arg(required = true)]
    pub ops: Vec<StreamOp>,
}

#[derive(Args)]
pub struct SortArgs {
    /// bubble or selection; defaults to the configured policy
    #[arg(long)]
    pub policy: Option<String>,
    #[arg(required = true, allow_negative_numbers = true)]
    pub numbers: Vec<i32>,
}

#[derive(Args)]
pub struct SqlArgs {
    #[arg(long)]
    pub table: String,
    #[arg(long = "field")]
    pub fields: Vec<String>,
    #[arg(long = "where")]
    pub conditions: Vec<String>,
    #[arg(long)]
    pub order_by: Option<String>,
}

#[derive(Args)]
pub struct AlarmArgs {
    /// Real seconds to run; defaults to the configured value
    #[arg(long)]
    pub seconds: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Mysql,
    Oracle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    Csv,
    Json,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Query handed to the data source
    #[arg(default_value = "select * from t")]
    pub sql: String,
    #[arg(long, default_value = "mysql")]
    pub source: DataSource,
    /// Row format: csv or json
    #[arg(long = "as", default_value = "csv")]
    pub kind: ExportKind,
}

#[derive(Args)]
pub struct PatternsArgs {}
