//! `profile-finder resolve` command.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::cli::ResolveArgs;
use crate::config::FinderConfig;
use crate::context::ServiceContext;
use crate::error::Error;
use crate::finder::{BatchReport, BatchRun, BatchScheduler};
use crate::model::{Candidate, ExportRecord, ProbeMethod};
use crate::ports::progress::LogProgress;

/// Export file layout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    /// Id of the run that produced the file.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Aggregate counts.
    pub report: BatchReport,
    /// One record per identity, in input order.
    pub records: Vec<ExportRecord>,
}

impl From<&BatchRun> for ExportDocument {
    fn from(run: &BatchRun) -> Self {
        Self {
            run_id: run.run_id,
            started_at: run.started_at,
            finished_at: run.finished_at,
            report: run.report,
            records: run.export_records(),
        }
    }
}

/// Execute the `resolve` command.
///
/// # Errors
///
/// Returns an error string if the input cannot be loaded, the context cannot
/// be built, or the export cannot be written.
pub fn run(args: &ResolveArgs) -> Result<(), String> {
    execute(args).map_err(|e| e.to_string())
}

fn execute(args: &ResolveArgs) -> Result<(), Error> {
    let mut config = FinderConfig::from_env()?;
    args.apply(&mut config);

    let candidates = load_candidates(&args.input)?;
    let ctx = super::service_context(&config, args.replay.as_deref())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::io("starting async runtime", e))?;
    let run = runtime
        .block_on(BatchScheduler::from_context(&ctx, &config).run(&candidates, &LogProgress));

    save_outputs(ctx, &args.output, &run)?;
    print_summary(&run.report, &args.output);
    Ok(())
}

/// Writes the export, then releases the context.
///
/// The cassette of a recording context is written even when the export fails.
fn save_outputs(ctx: ServiceContext, output: &Path, run: &BatchRun) -> Result<(), Error> {
    let exported = write_export(output, &ExportDocument::from(run));
    let finished = ctx.finish();
    exported?;
    if let Some(cassette) = finished? {
        eprintln!("Recording saved to: {}", cassette.display());
    }
    Ok(())
}

/// Reads the identity list. An empty list is a configuration error.
pub(crate) fn load_candidates(path: &Path) -> Result<Vec<Candidate>, Error> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::io(format!("reading {}", path.display()), e))?;
    let candidates: Vec<Candidate> = serde_json::from_str(&content)
        .map_err(|e| Error::json(format!("parsing identities in {}", path.display()), e))?;
    if candidates.is_empty() {
        return Err(Error::Config(format!(
            "no identities in {}; nothing to resolve",
            path.display()
        )));
    }
    Ok(candidates)
}

/// Writes the export document as pretty JSON, creating parent directories.
pub(crate) fn write_export(path: &Path, document: &ExportDocument) -> Result<(), Error> {
    let json = serde_json::to_string_pretty(document)
        .map_err(|e| Error::json("serializing export", e))?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::io(format!("creating {}", parent.display()), e))?;
        }
    }
    std::fs::write(path, json).map_err(|e| Error::io(format!("writing {}", path.display()), e))
}

fn print_summary(report: &BatchReport, output: &Path) {
    println!(
        "Found {}/{} profiles ({}%)",
        report.resolved,
        report.total,
        report.resolved_percent()
    );
    for method in ProbeMethod::ALL {
        println!("  {:<12} {}", method.label(), report.count(method));
    }
    println!("Results written to: {}", output.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finder::testing::{FixedJitter, ManualClock, ScriptedFetcher};

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_identities_treating_blank_source_as_absent() {
        let dir = temp_dir("profile_finder_load_test");
        let path = dir.join("identities.json");
        std::fs::write(
            &path,
            r#"[
                {"displayName": "Jane Doe", "sourceProfileUrl": "", "totalComments": 4,
                 "totalLikes": 10, "activityScore": 18.0},
                {"displayName": "John Roe", "sourceProfileUrl": "https://www.youtube.com/@jr"}
            ]"#,
        )
        .unwrap();

        let candidates = load_candidates(&path).unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].identity.source_url(), None);
        assert_eq!(candidates[0].metrics.total_likes, 10);
        assert_eq!(candidates[1].identity.source_url(), Some("https://www.youtube.com/@jr"));
        assert_eq!(candidates[1].metrics.total_comments, 0);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_identity_list_is_a_config_error() {
        let dir = temp_dir("profile_finder_empty_input_test");
        let path = dir.join("identities.json");
        std::fs::write(&path, "[]").unwrap();

        let err = load_candidates(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_input_is_a_json_error() {
        let dir = temp_dir("profile_finder_bad_input_test");
        let path = dir.join("identities.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(load_candidates(&path), Err(Error::Json { .. })));
        assert!(matches!(
            load_candidates(&dir.join("missing.json")),
            Err(Error::Io { .. })
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn export_contains_every_identity_with_ranks_on_resolved() {
        let dir = temp_dir("profile_finder_export_test");
        let output = dir.join("out").join("profiles.json");

        let config = FinderConfig { base_delay_ms: 0, ..FinderConfig::default() };
        let fetcher = ScriptedFetcher::new().status("https://www.instagram.com/johnroe/", 200);
        let clock = ManualClock::new();
        let jitter = FixedJitter(0);
        let candidates: Vec<Candidate> = serde_json::from_str(
            r#"[{"displayName": "Jane Doe"}, {"displayName": "John Roe", "totalComments": 3}]"#,
        )
        .unwrap();

        let run = BatchScheduler::new(&fetcher, &clock, &jitter, &config)
            .run(&candidates, &LogProgress)
            .await;
        write_export(&output, &ExportDocument::from(&run)).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["runId"], run.run_id.to_string());
        assert_eq!(written["report"]["resolved"], 1);
        let records = written["records"].as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0]["rank"].is_null());
        assert_eq!(records[1]["rank"], 1);
        assert_eq!(records[1]["resolvedProfileUrl"], "https://www.instagram.com/johnroe/");
        assert_eq!(records[1]["confidence"], 60);
        assert_eq!(records[1]["totalComments"], 3);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn cassette_is_saved_when_export_cannot_be_written() {
        let dir = temp_dir("profile_finder_export_failure_test");
        let blocker = dir.join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let cassette = dir.join("session.cassette.yaml");

        let config = FinderConfig { base_delay_ms: 0, ..FinderConfig::default() };
        let fetcher = ScriptedFetcher::new();
        let clock = ManualClock::new();
        let jitter = FixedJitter(0);
        let candidates: Vec<Candidate> =
            serde_json::from_str(r#"[{"displayName": "Jane Doe"}]"#).unwrap();
        let run = BatchScheduler::new(&fetcher, &clock, &jitter, &config)
            .run(&candidates, &LogProgress)
            .await;

        let ctx = ServiceContext::recording(&config, &cassette).unwrap();
        let result = save_outputs(ctx, &blocker.join("profiles.json"), &run);

        assert!(matches!(result, Err(Error::Io { .. })));
        assert!(cassette.exists(), "cassette should be written despite the export error");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
