//! End-to-end `generate` pipeline: accounts → enumerate → assemble → render → files.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, instrument, warn};

use tildegen_discovery::enumerate_visible_users;
use tildegen_shared::{
    AccountEntry, AggregateDocument, AppConfig, Reporter, Result, VisibilityPolicy, coerce_flag,
};

use crate::assembler::assemble_document;
use crate::output::{OutputMeta, write_output};
use crate::render::{Renderer, renderer_for_name};

/// Metadata flag coerced to a boolean before assembly.
pub const WANT_USERS_FLAG: &str = "want_users";

/// Result of the `generate` pipeline.
#[derive(Debug)]
pub struct GenerateResult {
    /// Number of users in the document.
    pub user_count: usize,
    /// Outputs written successfully.
    pub outputs: Vec<OutputMeta>,
    /// Format identifiers whose render or write failed.
    pub failed: Vec<String>,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// A configured output with its renderer resolved.
pub struct PlannedOutput {
    pub format: String,
    pub path: PathBuf,
    pub renderer: Box<dyn Renderer>,
}

/// Resolve every `[output]` entry to a renderer.
///
/// Fails on the first unsupported format or unusable template, before any
/// user is enumerated.
pub fn plan_outputs(config: &AppConfig) -> Result<Vec<PlannedOutput>> {
    config
        .output
        .iter()
        .map(|(format, path)| -> Result<PlannedOutput> {
            Ok(PlannedOutput {
                format: format.clone(),
                path: path.clone(),
                renderer: renderer_for_name(format, config)?,
            })
        })
        .collect()
}

/// Enumerate visible users and assemble them with the configured metadata.
pub fn build_document(
    config: &AppConfig,
    accounts: &[AccountEntry],
    reporter: &dyn Reporter,
) -> AggregateDocument {
    let policy = VisibilityPolicy::from(config);
    let users = enumerate_visible_users(accounts, &policy, reporter);

    let mut metadata = config.metadata();
    coerce_flag(&mut metadata, WANT_USERS_FLAG);

    assemble_document(metadata, users, reporter)
}

/// Run the full pipeline and write every configured output.
///
/// 1. Resolve renderers for all outputs
/// 2. Enumerate visible users
/// 3. Assemble the document
/// 4. Render and write each output
#[instrument(skip_all, fields(accounts = accounts.len(), outputs = config.output.len()))]
pub fn generate(
    config: &AppConfig,
    accounts: &[AccountEntry],
    reporter: &dyn Reporter,
) -> Result<GenerateResult> {
    let start = Instant::now();

    let planned = plan_outputs(config)?;
    let document = build_document(config, accounts, reporter);

    reporter.phase("Writing outputs");
    let (outputs, failed) = write_outputs(&document, &planned);

    let result = GenerateResult {
        user_count: document.user_count(),
        outputs,
        failed,
        elapsed: start.elapsed(),
    };

    info!(
        users = result.user_count,
        written = result.outputs.len(),
        failed = result.failed.len(),
        "generation complete"
    );

    Ok(result)
}

/// Render and write each output. One failing output does not stop the rest.
pub fn write_outputs(
    document: &AggregateDocument,
    planned: &[PlannedOutput],
) -> (Vec<OutputMeta>, Vec<String>) {
    let mut outputs = Vec::with_capacity(planned.len());
    let mut failed = Vec::new();

    for output in planned {
        info!(format = %output.format, path = %output.path.display(), "rendering output");

        let written = output
            .renderer
            .render(document)
            .and_then(|content| write_output(&output.format, &output.path, &content));

        match written {
            Ok(meta) => outputs.push(meta),
            Err(error) => {
                warn!(format = %output.format, %error, "output failed, continuing");
                failed.push(output.format.clone());
            }
        }
    }

    (outputs, failed)
}
