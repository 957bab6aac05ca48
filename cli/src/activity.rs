use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use chrono::DateTime;
use chrono::Local;
use chrono::TimeZone;
use chrono::Utc;
use clap::Parser;
use stockroom_activity::ActivityRecord;
use stockroom_activity::ActivityType;
use stockroom_activity::DateRange;
use stockroom_activity::Details;
use stockroom_activity::FilterCriteria;
use stockroom_activity::Ledger;
use stockroom_activity::TypeFilter;
use stockroom_activity::describe;
use stockroom_activity::export;
use stockroom_activity::filter::DayEdge;
use stockroom_activity::filter::parse_date_bound;
use stockroom_activity::view::ActivityView;
use stockroom_activity::view::FULL_PAGE_SIZE;

/// CLI for the inventory activity log.
#[derive(Debug, Parser)]
pub struct ActivityCli {
    #[command(subcommand)]
    pub cmd: ActivityCommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum ActivityCommand {
    /// Record a completed inventory mutation.
    Record {
        /// CREATE, UPDATE or DELETE.
        #[arg(long = "type")]
        kind: ActivityType,
        #[arg(long)]
        item_id: String,
        #[arg(long)]
        item_name: String,
        /// Extra annotation as `key=value`. Repeatable.
        #[arg(long = "detail", value_parser = parse_detail)]
        details: Vec<(String, String)>,
    },
    /// List every retained activity, newest first.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show the most recent activities.
    Recent {
        #[arg(long, default_value_t = 5)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Filter activities and show one page of the result.
    Filter {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = FULL_PAGE_SIZE)]
        page_size: usize,
        #[arg(long)]
        json: bool,
    },
    /// Remove every activity.
    Clear {
        /// Confirm the irreversible clear.
        #[arg(long)]
        yes: bool,
    },
    /// Write the filtered activities to `activities_export_<date>.json`.
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Merge a previous export into the log.
    Import { file: PathBuf },
    /// Drop duplicate entries and enforce the retention cap.
    Compact,
    /// Show counts per activity type.
    Stats,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct FilterArgs {
    /// CREATE, UPDATE, DELETE or ALL.
    #[arg(long = "type", default_value = "ALL")]
    pub kind: TypeFilter,

    /// Preset date range; overrides --since/--until.
    #[arg(long, value_enum, conflicts_with_all = ["since", "until"])]
    pub range: Option<RangeArg>,

    /// Inclusive lower bound, RFC 3339 or YYYY-MM-DD.
    #[arg(long, value_parser = parse_since)]
    pub since: Option<DateTime<Utc>>,

    /// Inclusive upper bound, RFC 3339 or YYYY-MM-DD (whole day).
    #[arg(long, value_parser = parse_until)]
    pub until: Option<DateTime<Utc>>,

    /// Case-insensitive item-name substring.
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RangeArg {
    Today,
    Last7,
    Last30,
}

impl From<RangeArg> for DateRange {
    fn from(value: RangeArg) -> Self {
        match value {
            RangeArg::Today => DateRange::Today,
            RangeArg::Last7 => DateRange::Last7Days,
            RangeArg::Last30 => DateRange::Last30Days,
        }
    }
}

impl FilterArgs {
    pub fn criteria<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> FilterCriteria {
        let mut criteria = FilterCriteria::new().with_type(self.kind);
        match self.range {
            Some(range) => criteria = criteria.with_date_range(range.into(), now),
            None => {
                if let Some(start) = self.since {
                    criteria = criteria.since(start);
                }
                if let Some(end) = self.until {
                    criteria = criteria.until(end);
                }
            }
        }
        if let Some(search) = &self.search {
            criteria = criteria.with_search(search.clone());
        }
        criteria
    }
}

fn parse_since(s: &str) -> Result<DateTime<Utc>, String> {
    parse_date_bound(s, DayEdge::Start).map_err(|e| e.to_string())
}

fn parse_until(s: &str) -> Result<DateTime<Utc>, String> {
    parse_date_bound(s, DayEdge::End).map_err(|e| e.to_string())
}

fn parse_detail(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got `{s}`")),
    }
}

pub fn run(ledger: &Ledger, cli: ActivityCli, out: &mut dyn Write) -> anyhow::Result<()> {
    match cli.cmd {
        ActivityCommand::Record {
            kind,
            item_id,
            item_name,
            details,
        } => {
            let details: Option<Details> = if details.is_empty() {
                None
            } else {
                Some(details.into_iter().collect())
            };
            let record = ledger.try_record(kind, item_id, item_name, details)?;
            writeln!(out, "{}", serde_json::to_string(&record)?)?;
        }
        ActivityCommand::List { json } => {
            print_records(out, &ledger.try_list()?, json)?;
        }
        ActivityCommand::Recent { limit, json } => {
            let mut records = ledger.try_list()?;
            records.truncate(limit);
            print_records(out, &records, json)?;
        }
        ActivityCommand::Filter {
            filter,
            page,
            page_size,
            json,
        } => {
            // Surface storage problems instead of rendering an empty page.
            ledger.try_list()?;
            let mut view = ActivityView::new(page_size);
            view.set_criteria(ledger, filter.criteria(&Local::now()));
            view.set_page(page);
            print_records(out, view.visible(), json)?;
            if !json {
                let summary = view.summary();
                writeln!(
                    out,
                    "Page {} of {} ({} of {} activities)",
                    summary.current_page, summary.total_pages, summary.filtered, summary.total
                )?;
            }
        }
        ActivityCommand::Clear { yes } => {
            if !yes {
                anyhow::bail!("refusing to clear the activity log without --yes");
            }
            ledger.try_clear()?;
            writeln!(out, "Cleared all activities")?;
        }
        ActivityCommand::Export { filter, out_dir } => {
            ledger.try_list()?;
            let mut view = ActivityView::full_page();
            view.set_criteria(ledger, filter.criteria(&Local::now()));
            let outcome = view
                .export_to(&out_dir, Utc::now().date_naive())
                .with_context(|| format!("exporting to {}", out_dir.display()))?;
            writeln!(
                out,
                "Exported {} activities to {}",
                outcome.count,
                outcome.path.display()
            )?;
        }
        ActivityCommand::Import { file } => {
            let mut input =
                File::open(&file).with_context(|| format!("opening {}", file.display()))?;
            let records = export::read_from(&mut input)
                .with_context(|| format!("reading {}", file.display()))?;
            let added = ledger.import(records)?;
            writeln!(out, "Imported {added} activities")?;
        }
        ActivityCommand::Compact => {
            let report = ledger.compact()?;
            writeln!(
                out,
                "Read {} entries, kept {} entries",
                report.read, report.kept
            )?;
        }
        ActivityCommand::Stats => {
            writeln!(out, "{}", serde_json::to_string_pretty(&ledger.stats())?)?;
        }
    }
    Ok(())
}

fn print_records(out: &mut dyn Write, records: &[ActivityRecord], json: bool) -> anyhow::Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(records)?)?;
        return Ok(());
    }
    if records.is_empty() {
        writeln!(out, "No activities")?;
        return Ok(());
    }
    let now = Utc::now();
    for record in records {
        writeln!(out, "{}  {}", record.id, describe::feed_line(record, now))?;
    }
    Ok(())
}
