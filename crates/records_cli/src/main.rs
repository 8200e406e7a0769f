//! Command-line entry point for student record files.
//!
//! # Responsibility
//! - Parse commands and wire stores, merger, reporter and log together.
//! - Keep all record rules inside `records_core`.

use anyhow::{bail, Context, Result};
use bpaf::*;
use records_core::{
    default_log_level, describe_store, init_logging, render_report, render_report_row,
    DisplayMode, LogEntry, LogResult, ManagedRecordLog, RecordMerger, RecordReporter, RecordStore,
};
use std::path::PathBuf;

/// Log management subcommands.
#[derive(Debug, Clone)]
enum LogCmd {
    /// Append one entry
    Add {
        log: PathBuf,
        name: String,
        subject: String,
        score: i64,
    },
    /// List entries, optionally filtered by subject
    List {
        log: PathBuf,
        subject: Option<String>,
    },
}

/// Top-level commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Describe one store
    Show { file: PathBuf, highlight: bool },
    /// Merge two or more stores
    Merge { files: Vec<PathBuf>, out: Option<PathBuf> },
    /// Appearance report over several stores
    Report { files: Vec<PathBuf>, json: bool, detailed: bool },
    /// Append-only subject log
    Log(LogCmd),
}

/// Global logging options.
#[derive(Debug, Clone)]
struct Options {
    log_level: Option<String>,
    log_dir: Option<String>,
    cmd: Cmd,
}

fn options() -> Options {
    fn file() -> impl Parser<PathBuf> {
        positional("FILE").help("Student record file (`name, score` lines)")
    }

    fn files() -> impl Parser<Vec<PathBuf>> {
        positional("FILE").help("Student record files").many()
    }

    fn log_file() -> impl Parser<PathBuf> {
        positional("LOG").help("Log file (`name,subject,score` lines)")
    }

    let show = {
        let highlight = long("highlight")
            .short('H')
            .help("Use the highlighted store label")
            .switch();
        let file = file();
        construct!(Cmd::Show { highlight, file })
            .to_options()
            .command("show")
            .help("Describe a store and list its records")
    };

    let merge = {
        let out = long("out")
            .short('o')
            .help("Directory for the merged file (defaults to the first file's directory)")
            .argument::<PathBuf>("DIR")
            .optional();
        let files = files();
        construct!(Cmd::Merge { out, files })
            .to_options()
            .command("merge")
            .help("Merge stores keeping the highest score per name")
    };

    let report = {
        let json = long("json").help("Print report rows as JSON").switch();
        let detailed = long("detailed")
            .short('d')
            .help("Include appearance count and average score")
            .switch();
        let files = files();
        construct!(Cmd::Report {
            json,
            detailed,
            files
        })
        .to_options()
        .command("report")
        .help("Show in how many stores each student appears")
    };

    let log_add = {
        let log = log_file();
        let name = positional("NAME").help("Student name");
        let subject = positional("SUBJECT").help("Subject");
        let score = positional::<i64>("SCORE").help("Score between 0 and 100");
        construct!(LogCmd::Add {
            log,
            name,
            subject,
            score
        })
        .to_options()
        .command("add")
        .help("Append one entry to the log")
    };

    let log_list = {
        let subject = long("subject")
            .short('s')
            .help("Only list entries for this subject (case-insensitive)")
            .argument::<String>("SUBJECT")
            .optional();
        let log = log_file();
        construct!(LogCmd::List { subject, log })
            .to_options()
            .command("list")
            .help("List log entries with their pass/fail status")
    };

    let log = construct!([log_add, log_list])
        .to_options()
        .command("log")
        .help("Append-only subject log")
        .map(Cmd::Log);

    let cmd = construct!([show, merge, report, log]);

    let log_level = long("log-level")
        .env("RECORDS_LOG_LEVEL")
        .help("Log level: trace|debug|info|warn|error")
        .argument::<String>("LEVEL")
        .optional();
    let log_dir = long("log-dir")
        .env("RECORDS_LOG_DIR")
        .help("Absolute directory for log files; logging is off without it")
        .argument::<String>("DIR")
        .optional();

    construct!(Options {
        log_level,
        log_dir,
        cmd
    })
    .to_options()
    .descr("Manage plain-text student record files")
    .run()
}

fn main() -> Result<()> {
    let options = options();

    if let Some(log_dir) = options.log_dir.as_deref() {
        let level = options.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("Failed to initialize logging")?;
    }

    match options.cmd {
        Cmd::Show { file, highlight } => show(file, highlight),
        Cmd::Merge { files, out } => merge(files, out),
        Cmd::Report {
            files,
            json,
            detailed,
        } => report(files, json, detailed),
        Cmd::Log(log_cmd) => run_log(log_cmd),
    }
}

fn show(file: PathBuf, highlight: bool) -> Result<()> {
    let mode = if highlight {
        DisplayMode::Highlighted
    } else {
        DisplayMode::Plain
    };
    let store = RecordStore::new(file);
    let records = store
        .records()
        .with_context(|| format!("Failed to load `{}`", store.path().display()))?;

    println!("{}", describe_store(&store, mode));
    for (name, score) in records {
        println!("{name}, {score}");
    }
    println!("{} students", records.len());
    Ok(())
}

fn merge(files: Vec<PathBuf>, out: Option<PathBuf>) -> Result<()> {
    let stores: Vec<RecordStore> = files.into_iter().map(RecordStore::new).collect();
    let Some((base, others)) = stores.split_first().filter(|(_, rest)| !rest.is_empty()) else {
        bail!("merge needs at least two files");
    };

    let merger = match out {
        Some(dir) => RecordMerger::new(dir),
        None => RecordMerger::beside(base.path()),
    };
    let others: Vec<&RecordStore> = others.iter().collect();
    let combined = if others.len() == 1 {
        merger.merge(base, others[0])
    } else {
        merger.merge_all(base, &others)
    }
    .context("Failed to merge record files")?;

    println!("{}", describe_store(&combined, DisplayMode::Highlighted));
    for record in combined.to_records()? {
        println!("{}", record.to_line());
    }
    Ok(())
}

fn report(files: Vec<PathBuf>, json: bool, detailed: bool) -> Result<()> {
    let stores: Vec<RecordStore> = files.into_iter().map(RecordStore::new).collect();
    let refs: Vec<&RecordStore> = stores.iter().collect();
    let rows = RecordReporter::default()
        .report(&refs)
        .context("Failed to build report")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else if detailed {
        for row in &rows {
            println!("{}", render_report_row(row));
        }
    } else if !rows.is_empty() {
        println!("{}", render_report(&rows));
    }
    Ok(())
}

fn run_log(cmd: LogCmd) -> Result<()> {
    match cmd {
        LogCmd::Add {
            log,
            name,
            subject,
            score,
        } => {
            let log = ManagedRecordLog::new(log);
            let entry = log
                .append(&name, &subject, score)
                .with_context(|| format!("Failed to append to `{}`", log.path().display()))?;
            println!("{} ({})", entry.to_line(), entry.grade());
        }
        LogCmd::List { log, subject } => {
            let log = ManagedRecordLog::new(log);
            let lines: Box<dyn Iterator<Item = LogResult<String>> + '_> = match subject.as_deref() {
                Some(subject) => Box::new(log.filter_by_subject(subject)?),
                None => Box::new(log.read_all()?),
            };
            for line in lines {
                let line = line?;
                match LogEntry::parse_line(&line) {
                    Some(entry) => println!("{line} ({})", entry.grade()),
                    None => println!("{line}"),
                }
            }
        }
    }
    Ok(())
}
