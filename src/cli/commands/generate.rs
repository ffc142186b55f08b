//! Implementation of the `leadgen generate` command.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::{organization_orchestrator, profile_orchestrator};
use crate::cli::output::{list_table, output, truncate, CommandOutput};
use crate::cli::ReportedFailure;
use crate::cli::progress::{create_progress_bar, ProgressBarReporter};
use crate::domain::models::{Config, GenerationCriteria, OutcomeKind, SessionReport};
use crate::domain::ports::{IdentityExtractor, ProgressReporter};
use crate::infrastructure::{ConfigLoader, EnvTokenProvider};
use crate::services::{OrganizationIdentity, ProfileIdentity, TracingProgressReporter};

/// Which search to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadKind {
    /// Bulk organization search
    Organization,
    /// Social profile search
    Profile,
}

/// Arguments for `leadgen generate`
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Search to run
    #[arg(short, long, value_enum, default_value_t = LeadKind::Organization)]
    pub kind: LeadKind,

    /// Number of unique records to collect (1-999)
    #[arg(short, long)]
    pub target: u32,

    /// Search criteria as a JSON object, or @path to read it from a file
    #[arg(long, default_value = "{}")]
    pub criteria: String,

    /// Wall-clock budget for the whole session, in seconds
    #[arg(long)]
    pub time_budget: Option<u64>,

    /// Attempt cap for this session (1-30)
    #[arg(long)]
    pub max_attempts: Option<u32>,
}

/// Result of one `leadgen generate` run
#[derive(Debug, Serialize)]
pub struct GenerateOutput {
    /// Session identifier, also present in the logs
    pub session_id: Uuid,
    /// Search that was run
    pub kind: LeadKind,
    /// How the session ended
    pub status: OutcomeKind,
    /// Why the session stopped short, if it did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Requested number of unique records
    pub target: u32,
    /// Attempts made, including failed ones
    pub attempts: u32,
    /// Session duration in milliseconds
    pub elapsed_ms: u64,
    /// Records dropped as duplicates
    pub duplicates_skipped: usize,
    /// Whether the remote side may have stored new records
    pub needs_reload: bool,
    /// Unique records, at most `target` of them
    pub items: Vec<Value>,
    #[serde(skip)]
    keys: Vec<String>,
}

impl GenerateOutput {
    fn new(
        kind: LeadKind,
        target: u32,
        report: SessionReport<Value>,
        identity: &dyn IdentityExtractor<Value>,
    ) -> Self {
        let needs_reload = report.needs_reload();
        let status = report.outcome.kind();
        let reason = report.outcome.reason();
        let items = report.outcome.into_items();
        let keys = items
            .iter()
            .map(|item| identity.key(item).to_string())
            .collect();

        Self {
            session_id: report.session_id,
            kind,
            status,
            reason,
            target,
            attempts: report.attempts,
            elapsed_ms: report.elapsed_ms,
            duplicates_skipped: report.duplicates_skipped,
            needs_reload,
            items,
            keys,
        }
    }
}

impl CommandOutput for GenerateOutput {
    fn to_human(&self) -> String {
        let headline = format!(
            "{} {}/{} records in {} attempt(s), {:.1}s",
            status_label(self.status),
            self.items.len(),
            self.target,
            self.attempts,
            Duration::from_millis(self.elapsed_ms).as_secs_f64()
        );
        let mut lines = vec![headline];
        if let Some(reason) = &self.reason {
            lines.push(format!("Reason: {reason}"));
        }
        if self.duplicates_skipped > 0 {
            lines.push(format!("Skipped {} duplicate(s)", self.duplicates_skipped));
        }

        if !self.items.is_empty() {
            let mut table = list_table(&["#", "key", "record"]);
            for (index, (key, item)) in self.keys.iter().zip(&self.items).enumerate() {
                table.add_row(vec![
                    (index + 1).to_string(),
                    truncate(key, 40),
                    truncate(&item.to_string(), 80),
                ]);
            }
            lines.push(String::new());
            lines.push(table.to_string());
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn status_label(kind: OutcomeKind) -> console::StyledObject<String> {
    let label = kind.to_string();
    match kind {
        OutcomeKind::Completed => console::style(label).green().bold(),
        OutcomeKind::Failed => console::style(label).red().bold(),
        _ => console::style(label).yellow().bold(),
    }
}

/// Parse `--criteria`: inline JSON, or `@path` to a JSON file
async fn read_criteria(raw: &str) -> Result<Value> {
    let text = if let Some(path) = raw.strip_prefix('@') {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read criteria file {path}"))?
    } else {
        raw.to_string()
    };
    serde_json::from_str(&text).context("Criteria must be valid JSON")
}

fn apply_overrides(config: &mut Config, args: &GenerateArgs) -> Result<()> {
    if let Some(secs) = args.time_budget {
        config.generation.time_budget_secs = Some(secs);
    }
    if let Some(max_attempts) = args.max_attempts {
        config.generation.max_attempts = max_attempts;
    }
    ConfigLoader::validate(config)?;
    Ok(())
}

/// Run one generation session and print its outcome.
///
/// A failed outcome is printed first, then returned as [`ReportedFailure`].
pub async fn execute(args: GenerateArgs, mut config: Config, json_mode: bool) -> Result<()> {
    apply_overrides(&mut config, &args)?;
    let criteria = GenerationCriteria::from_json(read_criteria(&args.criteria).await?, args.target)?;

    let tokens = Arc::new(EnvTokenProvider::new(config.api.token_env.clone()));
    let (orchestrator, identity): (_, Box<dyn IdentityExtractor<Value>>) = match args.kind {
        LeadKind::Organization => (
            organization_orchestrator(&config, tokens)?,
            Box::new(OrganizationIdentity::from_endpoint(&config.organization)),
        ),
        LeadKind::Profile => (
            profile_orchestrator(&config, tokens)?,
            Box::new(ProfileIdentity::from_endpoint(&config.profile)),
        ),
    };

    // The bar is hidden in JSON mode; progress goes to the log instead.
    let bar = create_progress_bar(u64::from(args.target), !json_mode);
    let reporter: Arc<dyn ProgressReporter> = if json_mode {
        Arc::new(TracingProgressReporter)
    } else {
        Arc::new(ProgressBarReporter::new(bar.clone()))
    };
    let handle = orchestrator.start_with_reporter(criteria, reporter);
    info!(session_id = %handle.id(), kind = ?args.kind, target_count = args.target, "session started");

    let cancel = handle.cancellation_token();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling session");
            cancel.cancel();
        }
    });

    let report = handle.wait().await?;
    ctrl_c.abort();
    bar.finish_and_clear();

    let out = GenerateOutput::new(args.kind, args.target, report, identity.as_ref());
    output(&out, json_mode);

    if out.status == OutcomeKind::Failed {
        return Err(ReportedFailure(format!(
            "generation failed: {}",
            out.reason.as_deref().unwrap_or("unknown error")
        ))
        .into());
    }
    Ok(())
}
