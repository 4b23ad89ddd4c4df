// ABOUTME: CLI for parsing WordPress WXR exports with wpexport-wxr.
// ABOUTME: Reads exports from files or stdin and prints the site model (or a summary) as JSON.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser as ClapParser;
use serde_json::json;
use wpexport_wxr::{
    CommonFields, DateScope, ItemKind, ParseObserver, ParseSummary, Parser, SkipReason,
    TracingObserver, WebsiteInfo,
};

/// Parse one or more WordPress WXR exports and output JSON.
#[derive(ClapParser, Debug)]
#[command(name = "wpexport")]
#[command(about = "Parse WordPress WXR exports and print JSON", long_about = None)]
struct Args {
    /// Export files. Use "-" to read one export from stdin.
    #[arg(required = true)]
    targets: Vec<String>,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Print only counts per export instead of the full model.
    #[arg(long, default_value_t = false)]
    summary: bool,

    /// Do not strip XML-invalid control characters before parsing.
    #[arg(long = "keep-invalid-chars", default_value_t = false)]
    keep_invalid_chars: bool,

    /// Additional post type to skip (repeatable).
    #[arg(long = "ignore-type", value_name = "TYPE")]
    ignore_types: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns Ok(false) when any target failed to parse.
fn run(args: &Args) -> Result<bool> {
    let mut builder = Parser::builder().strip_invalid_chars(!args.keep_invalid_chars);
    for post_type in &args.ignore_types {
        builder = builder.ignore_post_type(post_type.clone());
    }
    let parser = builder.build();

    let mut results = Vec::new();
    for target in &args.targets {
        match parse_target(&parser, target) {
            Ok((site, summary)) => {
                let body = if args.summary {
                    serde_json::to_value(summary)?
                } else {
                    serde_json::to_value(&site)?
                };
                results.push(json!({ "source": target, "ok": true, "site": body, "error": null }));
            }
            Err(err) => {
                tracing::error!(source = %target, "failed to parse export: {err:#}");
                results.push(json!({
                    "source": target,
                    "ok": false,
                    "site": null,
                    "error": format!("{err:#}")
                }));
            }
        }
    }

    let parsed = results
        .iter()
        .filter(|r| r.get("ok").and_then(|v| v.as_bool()) == Some(true))
        .count();
    let all_ok = parsed == results.len();

    // Single successful target => emit the site object directly.
    let output = if results.len() == 1 && all_ok {
        results[0].get("site").cloned().unwrap_or_else(|| json!({}))
    } else {
        json!({
            "exports": results,
            "total": results.len(),
            "parsed": parsed,
            "failed": results.len() - parsed
        })
    };

    if args.compact {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(all_ok)
}

/// Logs through `tracing` and keeps the final summary, which is the only
/// place skipped items are counted.
#[derive(Default)]
struct SummaryObserver {
    summary: Option<ParseSummary>,
}

impl ParseObserver for SummaryObserver {
    fn missing_publish_date(&mut self, scope: DateScope<'_>, raw: Option<&str>) {
        TracingObserver.missing_publish_date(scope, raw);
    }

    fn skipped_item(&mut self, title: &str, post_type: &str, reason: SkipReason) {
        TracingObserver.skipped_item(title, post_type, reason);
    }

    fn item_extracted(&mut self, kind: ItemKind, fields: &CommonFields) {
        TracingObserver.item_extracted(kind, fields);
    }

    fn finished(&mut self, summary: &ParseSummary) {
        TracingObserver.finished(summary);
        self.summary = Some(summary.clone());
    }
}

fn parse_target(parser: &Parser, target: &str) -> Result<(WebsiteInfo, ParseSummary)> {
    let mut observer = SummaryObserver::default();
    let site = if target == "-" {
        parser
            .parse_with(io::stdin().lock(), &mut observer)
            .context("parsing export from stdin")?
    } else {
        let path = PathBuf::from(target);
        if !path.exists() {
            return Err(anyhow!("file not found: {}", target));
        }
        let file = File::open(&path).with_context(|| format!("opening {}", target))?;
        parser
            .parse_with(BufReader::new(file), &mut observer)
            .with_context(|| format!("parsing {}", target))?
    };

    let summary = observer
        .summary
        .unwrap_or_else(|| ParseSummary::from_website(&site, 0));
    Ok((site, summary))
}
