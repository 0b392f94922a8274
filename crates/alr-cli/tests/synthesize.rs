//! End-to-end runs of the `synthesize` and `crosswalk` commands.

use std::fs;
use std::path::{Path, PathBuf};

use alr_cli::cli::{Cli, Command, SynthesizeArgs};
use alr_cli::commands::{run_crosswalk, run_synthesize};
use alr_model::SchemaVersion;
use clap::Parser;

const CROSSWALK: &str = "HCC Version\tHCC Column Position\tHCC Flag\tHCC Description\n\
                         V24\tHCC_COL_19\tHCC19\tDiabetes\n";

const RECORDS: &str = concat!(
    r#"{"mbi":"1S00E00AA00","timestamp":"2021-03-01T00:00:00Z","fields":{"HCC_version":"V24","EnrollFlag1":"1","HCC_COL_19":"1","CBA_FLAG":"1"}}"#,
    "\n",
    r#"{"mbi":"2S00E00AA00","timestamp":"2021-03-01T00:00:00Z","fields":{"HCC_version":"V24","ASG_STATUS":"1"}}"#,
    "\n",
    r#"{"mbi":"3S00E00AA00","timestamp":"2021-03-01T00:00:00Z","fields":{"EnrollFlag1":"1"}}"#,
    "\n"
);

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

fn args(dir: &Path, schema: SchemaVersion) -> SynthesizeArgs {
    SynthesizeArgs {
        records: write(dir, "alr_2021_03.ndjson", RECORDS),
        schema,
        crosswalk: Some(write(dir, "hcc_crosswalk.tsv", CROSSWALK)),
        output: Some(dir.join("out.ndjson")),
        batch_id: None,
        sequential: false,
    }
}

fn resource_types(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            value["resourceType"].as_str().unwrap().to_string()
        })
        .collect()
}

#[test]
fn synthesize_v2_writes_ndjson_with_one_batch_group() {
    let dir = tempfile::tempdir().unwrap();
    let args = args(dir.path(), SchemaVersion::V2);
    let result = run_synthesize(&args).unwrap();

    assert_eq!(result.batch_id, "alr_2021_03");
    assert_eq!(result.summary.records, 3);
    assert_eq!(result.summary.bundles, 2);
    assert_eq!(result.summary.aborted, 1);
    assert!(!result.is_empty_run());

    let types = resource_types(&dir.path().join("out.ndjson"));
    assert_eq!(types.len(), result.lines_written);
    assert_eq!(types.iter().filter(|t| *t == "Patient").count(), 2);
    assert_eq!(types.iter().filter(|t| *t == "Group").count(), 1);
    assert_eq!(types.last().map(String::as_str), Some("Group"));
}

#[test]
fn synthesize_v1_folds_groups_into_records() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = args(dir.path(), SchemaVersion::V1);
    args.batch_id = Some("explicit".to_string());
    args.sequential = true;
    let result = run_synthesize(&args).unwrap();

    assert_eq!(result.batch_id, "explicit");
    let types = resource_types(&dir.path().join("out.ndjson"));
    assert_eq!(types.iter().filter(|t| *t == "Group").count(), 2);
    assert!(!types.iter().any(|t| t == "EpisodeOfCare"));
}

#[test]
fn synthesize_fails_on_malformed_records() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = args(dir.path(), SchemaVersion::V2);
    args.records = write(dir.path(), "bad.ndjson", "{not json}\n");
    let error = run_synthesize(&args).unwrap_err();
    assert!(format!("{error:#}").contains("line 1"));
}

#[test]
fn synthesize_fails_when_explicit_crosswalk_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = args(dir.path(), SchemaVersion::V2);
    args.crosswalk = Some(dir.path().join("missing.tsv"));
    let error = run_synthesize(&args).unwrap_err();
    assert!(format!("{error:#}").contains("missing.tsv"));
    assert!(!dir.path().join("out.ndjson").exists());
}

#[test]
fn crosswalk_command_loads_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "hcc_crosswalk.tsv", CROSSWALK);
    let cli = Cli::try_parse_from(["alr-cli", "crosswalk", "--crosswalk", path.to_str().unwrap()])
        .unwrap();
    let Command::Crosswalk(args) = cli.command else {
        panic!("expected crosswalk command");
    };
    run_crosswalk(&args).unwrap();
}

#[test]
fn parses_schema_aliases() {
    let cli = Cli::try_parse_from(["alr-cli", "synthesize", "records.ndjson", "--schema", "stu3"])
        .unwrap();
    let Command::Synthesize(args) = cli.command else {
        panic!("expected synthesize command");
    };
    assert_eq!(args.schema, SchemaVersion::V1);
    assert!(args.output.is_none());

    let cli = Cli::try_parse_from(["alr-cli", "synthesize", "records.ndjson"]).unwrap();
    let Command::Synthesize(args) = cli.command else {
        panic!("expected synthesize command");
    };
    assert_eq!(args.schema, SchemaVersion::V2);

    assert!(Cli::try_parse_from(["alr-cli", "synthesize", "r.ndjson", "--schema", "v9"]).is_err());
}
