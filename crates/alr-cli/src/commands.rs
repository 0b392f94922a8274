use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

use alr_core::{BatchContext, BatchOptions, BatchOrchestrator, BatchOutput};
use alr_standards::{CrosswalkSource, CrosswalkTable};
use anyhow::{Context, Result};
use chrono::Utc;
use comfy_table::Table;
use tracing::{debug, info, info_span};

use crate::cli::{CrosswalkArgs, SynthesizeArgs};
use crate::logging::redact_value;
use crate::records::{load_records, write_ndjson};
use crate::summary::{apply_table_style, count_cell, header_cell};
use crate::types::SynthesizeResult;

pub fn run_synthesize(args: &SynthesizeArgs) -> Result<SynthesizeResult> {
    let batch_id = args
        .batch_id
        .clone()
        .unwrap_or_else(|| derive_batch_id(&args.records));
    let batch_span = info_span!("synthesize", batch_id = %batch_id, version = %args.schema);
    let _batch_guard = batch_span.enter();

    let crosswalk = load_crosswalk(args.crosswalk.as_deref())?;
    let crosswalk_path = crosswalk.source().map(Path::to_path_buf);
    let records = load_records(&args.records)?;

    let orchestrator = BatchOrchestrator::new(Arc::new(crosswalk), args.schema)
        .with_options(BatchOptions {
            parallel: !args.sequential,
        });
    let batch = BatchContext::new(batch_id.clone(), Utc::now());
    let output = orchestrator
        .run(&records, &batch)
        .context("synthesize batch")?;
    log_diagnostics(&output);

    let lines_written = match &args.output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("create {}", path.display()))?;
            write_ndjson(file, &output).with_context(|| format!("write {}", path.display()))?
        }
        None => write_ndjson(io::stdout().lock(), &output).context("write stdout")?,
    };
    info!(lines = lines_written, "resources written");

    Ok(SynthesizeResult {
        batch_id,
        version: args.schema,
        crosswalk: crosswalk_path,
        output: args.output.clone(),
        lines_written,
        summary: output.summary,
    })
}

pub fn run_crosswalk(args: &CrosswalkArgs) -> Result<()> {
    let crosswalk = load_crosswalk(args.crosswalk.as_deref())?;
    if let Some(path) = crosswalk.source() {
        println!("Crosswalk: {}", path.display());
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("HCC Version"), header_cell("Entries")]);
    apply_table_style(&mut table);
    for (version, count) in crosswalk.version_counts() {
        table.add_row(vec![header_cell(version), count_cell(count)]);
    }
    println!("{table}");
    Ok(())
}

fn load_crosswalk(explicit: Option<&Path>) -> Result<CrosswalkTable> {
    let source = explicit.map_or_else(CrosswalkSource::default, CrosswalkSource::explicit);
    debug!(candidates = source.candidates().len(), "resolving HCC crosswalk");
    source.load().context("load HCC crosswalk")
}

fn log_diagnostics(output: &BatchOutput) {
    for diagnostic in &output.diagnostics {
        debug!(
            mbi = redact_value(&diagnostic.mbi),
            kind = %diagnostic.kind,
            key = diagnostic.key.as_deref().unwrap_or("-"),
            message = redact_value(&diagnostic.message),
            "record diagnostic"
        );
    }
}

/// Batch id from the records file stem, e.g. `alr_2021_03.ndjson` -> `alr_2021_03`.
fn derive_batch_id(records: &Path) -> String {
    records
        .file_stem()
        .and_then(|v| v.to_str())
        .filter(|v| !v.is_empty())
        .unwrap_or("alr-batch")
        .to_string()
}
