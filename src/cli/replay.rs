//! `cgrid replay` - run a scripted edit session against the backend.
//!
//! A script is a JSON document of grid events, applied in order:
//!
//! ```json
//! {
//!   "rows": [{ "Product": "P1", "ProductDescription": "Widget" }],
//!   "events": [
//!     { "event": "new-row" },
//!     { "event": "select", "row": -1, "field": "uncode", "value": "U9 || Hazmat" },
//!     { "event": "options", "row": "new", "field": "dgclass" },
//!     { "event": "commit" },
//!     { "event": "clear", "row": 0, "field": "product" }
//!   ]
//! }
//! ```
//!
//! `--rows` replaces the script's `rows` with the contents of a JSON file. The
//! first event that misuses the grid (unknown row, commit without a new row)
//! stops the replay.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use super::{CliConfig, CommandContext};
use crate::core::GridError;
use crate::grid::{CacheStats, ConsignmentGrid, OptionQuery};
use crate::models::{DgField, Row, RowRef};

/// One user action on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ReplayEvent {
    Focus {
        row: RowRef,
    },
    /// Pick `"code || description"` from a dropdown
    Select {
        row: RowRef,
        field: DgField,
        value: String,
    },
    Clear {
        row: RowRef,
        field: DgField,
    },
    /// Open a dropdown; the fetched options are counted, not applied
    Options {
        row: RowRef,
        field: DgField,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        search: Option<String>,
    },
    NewRow,
    Commit,
    Discard,
    Delete {
        row: RowRef,
    },
}

impl std::fmt::Display for ReplayEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplayEvent::Focus { row } => write!(f, "focus row {row}"),
            ReplayEvent::Select { row, field, value } => write!(f, "select {field} '{value}' on row {row}"),
            ReplayEvent::Clear { row, field } => write!(f, "clear {field} on row {row}"),
            ReplayEvent::Options { row, field, .. } => write!(f, "open {field} options on row {row}"),
            ReplayEvent::NewRow => f.write_str("start new row"),
            ReplayEvent::Commit => f.write_str("commit new row"),
            ReplayEvent::Discard => f.write_str("discard new row"),
            ReplayEvent::Delete { row } => write!(f, "delete row {row}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub rows: Vec<Row>,
    pub events: Vec<ReplayEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayStep {
    pub event: String,
    pub outcome: String,
}

/// Grid state after a replay, plus what each event did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub steps: Vec<ReplayStep>,
    pub rows: Vec<Row>,
    pub new_row: Option<Row>,
    pub cache: CacheStats,
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).map_err(|e| {
        GridError::ScriptParseError {
            file: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

impl ReplayScript {
    pub async fn load(path: &Path) -> Result<Self> {
        read_json(path).await
    }

    /// Load `rows` into `grid` and apply every event.
    ///
    /// # Errors
    /// Returns the first misuse error, with the failing event in its context
    pub async fn run(&self, grid: &mut ConsignmentGrid) -> Result<ReplayReport> {
        grid.load_rows(self.rows.clone());

        let mut steps = Vec::with_capacity(self.events.len());
        for (index, event) in self.events.iter().enumerate() {
            let outcome = apply(grid, event)
                .await
                .with_context(|| format!("Event {} ({event}) failed", index + 1))?;
            info!("{event}: {outcome}");
            steps.push(ReplayStep {
                event: event.to_string(),
                outcome,
            });
        }

        Ok(ReplayReport {
            steps,
            rows: grid.rows().to_vec(),
            new_row: grid.new_row().cloned(),
            cache: grid.cache_stats(),
        })
    }
}

async fn apply(grid: &mut ConsignmentGrid, event: &ReplayEvent) -> Result<String, GridError> {
    let outcome = match event {
        ReplayEvent::Focus { row } => {
            grid.focus(*row);
            "focused".to_string()
        }
        ReplayEvent::Select { row, field, value } => {
            format!("{:?}", grid.on_field_change(*field, Some(value.as_str()), *row).await?)
        }
        ReplayEvent::Clear { row, field } => format!("{:?}", grid.on_field_change(*field, None, *row).await?),
        ReplayEvent::Options { row, field, search } => {
            let mut query = OptionQuery::new();
            query.search_term = search.clone();
            let options = grid.options_for(*row, *field, &query).await?;
            format!("{} option(s)", options.len())
        }
        ReplayEvent::NewRow => {
            grid.start_new_row();
            "started".to_string()
        }
        ReplayEvent::Commit => format!("committed as row {}", grid.commit_new_row()?),
        ReplayEvent::Discard => {
            grid.discard_new_row()?;
            "discarded".to_string()
        }
        ReplayEvent::Delete { row } => {
            grid.mark_deleted(*row)?;
            "marked deleted".to_string()
        }
    };
    Ok(outcome)
}

#[derive(Args)]
pub struct ReplayCommand {
    /// Script of grid events (JSON)
    script: PathBuf,

    /// JSON array of rows to start from, replacing the script's rows
    #[arg(long)]
    rows: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl ReplayCommand {
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        let mut script = ReplayScript::load(&self.script).await?;
        if let Some(rows_path) = &self.rows {
            script.rows = read_json(rows_path).await?;
        }

        let ctx = CommandContext::load(cli).await?;
        let mut grid = ctx.grid()?;
        let report = script.run(&mut grid).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }
        Ok(())
    }
}

fn print_report(report: &ReplayReport) {
    println!("{}", "Events".bold());
    for (index, step) in report.steps.iter().enumerate() {
        println!("  {:>3}. {} -> {}", index + 1, step.event, step.outcome.green());
    }

    println!("\n{}", "Rows".bold());
    println!(
        "  {:<5} {:<24} {:<24} {:<24} {}",
        "#", "Product", "UN Code", "DG Class", "Hazardous"
    );
    for (index, row) in report.rows.iter().enumerate() {
        print_row(&index.to_string(), row);
    }
    if let Some(row) = &report.new_row {
        print_row("new", row);
    }

    println!(
        "\n{} {} hit(s), {} miss(es), {} cached list(s)",
        "Option cache:".dimmed(),
        report.cache.hits,
        report.cache.misses,
        report.cache.entries
    );
}

fn cell(row: &Row, field: DgField) -> String {
    let code = row.code(field);
    let description = row.description(field);
    if description.is_empty() {
        code.to_string()
    } else {
        format!("{code} ({description})")
    }
}

fn print_row(label: &str, row: &Row) {
    let line = format!(
        "  {:<5} {:<24} {:<24} {:<24} {}",
        label,
        cell(row, DgField::Product),
        cell(row, DgField::UnCode),
        cell(row, DgField::DgClass),
        row.contains_hazardous_goods
    );
    if row.is_deleted {
        println!("{} {}", line.strikethrough(), "(deleted)".red());
    } else {
        println!("{line}");
    }
}
