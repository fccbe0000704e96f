use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use transit_forest::{ForestConfig, IndexedForest, Registration, RemotePath};

use crate::cli::*;
use crate::script::{parse_script, ScriptLine, Step};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Replay(args) => cmd_replay(args, cli.format, &mut out),
        Command::Ancestors(args) => cmd_ancestors(args, cli.format, &mut out),
        Command::Config(args) => cmd_config(args, &mut out),
    }
}

/// Load a forest configuration, falling back to defaults without a file.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ForestConfig> {
    let Some(path) = path else {
        return Ok(ForestConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: ForestConfig =
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn cmd_replay(args: ReplayArgs, format: OutputFormat, out: &mut impl Write) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let source = match &args.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("reading script from stdin")?;
            buf
        }
    };
    let steps = parse_script(&source)?;
    let forest = IndexedForest::with_config(&config)?;
    info!(steps = steps.len(), backend = ?config.backend, "replaying script");
    replay(&forest, &steps, format, out)
}

/// One executed step, as printed.
#[derive(Debug, Serialize)]
struct Report {
    line: usize,
    op: &'static str,
    account: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    result: serde_json::Value,
    #[serde(skip)]
    summary: String,
}

pub fn replay(
    forest: &IndexedForest<String>,
    steps: &[ScriptLine],
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    for line in steps {
        let report = execute(forest, line)?;
        match format {
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&report)?)?,
            OutputFormat::Text => writeln!(
                out,
                "{:>4}  {:<10} {}",
                report.line.to_string().dimmed(),
                report.op.bold(),
                report.summary
            )?,
        }
    }
    if format == OutputFormat::Text {
        writeln!(out, "{} {} node(s) still tracked", "✓".green().bold(), forest.len())?;
    }
    Ok(())
}

fn execute(forest: &IndexedForest<String>, line: &ScriptLine) -> anyhow::Result<Report> {
    let op = line.step.name();
    let (account, path, result, summary) = match &line.step {
        Step::Register {
            account,
            path,
            value,
        } => {
            let registration = forest.register(account, path, value.clone());
            let summary = match &registration {
                Registration::Inserted { attached_to, .. } => format!(
                    "{} attached to {}",
                    path.to_string().yellow(),
                    attached_to.to_string().cyan()
                ),
                Registration::AlreadyTracked => {
                    format!("{} already tracked", path.to_string().yellow())
                }
            };
            (account, Some(path), serde_json::to_value(&registration)?, summary)
        }
        Step::Clear { account, path } => {
            let removal = forest.clear_payload(account, path);
            let summary = match &removal {
                Some(r) => format!(
                    "{} removed, payload {}, unlinked from {}",
                    path.to_string().yellow(),
                    show(&r.payload),
                    show(&r.unlinked_from)
                ),
                None => format!("{} kept (placeholder or untracked)", path.to_string().yellow()),
            };
            (account, Some(path), serde_json::to_value(&removal)?, summary)
        }
        Step::Unregister { account, path } => {
            let removal = forest.unregister(account, path);
            let summary = match &removal {
                Some(r) => format!(
                    "{} removed, payload {}, unlinked from {}",
                    path.to_string().yellow(),
                    show(&r.payload),
                    show(&r.unlinked_from)
                ),
                None => format!("{} not tracked", path.to_string().yellow()),
            };
            (account, Some(path), serde_json::to_value(&removal)?, summary)
        }
        Step::Contains { account, path } => {
            let tracked = forest.contains(account, path);
            let status = if tracked {
                "tracked".green()
            } else {
                "untracked".red()
            };
            let summary = format!("{} {}", path.to_string().yellow(), status);
            (account, Some(path), json!(tracked), summary)
        }
        Step::Lookup { account, path } => {
            let payload = forest.lookup(account, path);
            let summary = format!("{} = {}", path.to_string().yellow(), show(&payload));
            (account, Some(path), json!(payload), summary)
        }
        Step::Purge { account } => {
            let removed = forest.purge_account(account);
            let summary = format!("{} node(s) of {} removed", removed, account.to_string().bold());
            (account, None, json!(removed), summary)
        }
        Step::Dump { account } => {
            let paths = forest.tracked_paths(account);
            let mut summary = format!("{} node(s) for {}", paths.len(), account.to_string().bold());
            for path in &paths {
                let marker = match forest.is_placeholder(account, path) {
                    Some(false) => "●".green(),
                    _ => "○".dimmed(),
                };
                summary.push_str(&format!("\n              {marker} {path}"));
            }
            (account, None, serde_json::to_value(&paths)?, summary)
        }
    };

    Ok(Report {
        line: line.line,
        op,
        account: account.to_string(),
        path: path.map(RemotePath::to_string),
        result,
        summary,
    })
}

fn show<T: std::fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "none".dimmed().to_string(),
    }
}

fn cmd_ancestors(
    args: AncestorsArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    for raw in &args.paths {
        let path = RemotePath::new(raw.as_str())?;
        let chain: Vec<String> = path.ancestors().map(String::from).collect();
        match format {
            OutputFormat::Json => writeln!(
                out,
                "{}",
                json!({ "path": path.as_str(), "ancestors": chain })
            )?,
            OutputFormat::Text => writeln!(
                out,
                "{} <- {}",
                path.to_string().yellow(),
                chain.join(" <- ")
            )?,
        }
    }
    Ok(())
}

fn cmd_config(args: ConfigArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    write!(out, "{}", toml::to_string_pretty(&config)?)?;
    Ok(())
}
