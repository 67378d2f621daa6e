use easystack_core::{parse_easystack, CoreError, PlanOptions};
use easystack_schema::{ExecutionMode, ManifestDialect, ManifestError};
use std::fs;
use std::path::{Path, PathBuf};

fn write_manifest(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("easystack.yaml");
    fs::write(&path, content).unwrap();
    path
}

const LABELLED_STACK: &str = r"
software:
  CUDA:
    toolchains:
      system:
        include_labels: [gpu]
        versions: [11.1.1]
  zlib:
    toolchains:
      GCCcore-10.2.0:
        versions:
          1.2.11:
          1.2.8:
            exclude-labels: [old]
  Rust:
    toolchains:
      GCCcore-10.2.0:
        versions: 1.52
";

fn targets(options: &PlanOptions) -> Vec<String> {
    let project = tempfile::tempdir().unwrap();
    let manifest = write_manifest(project.path(), LABELLED_STACK);
    parse_easystack(&manifest, options)
        .unwrap()
        .targets
        .into_iter()
        .map(easystack_schema::TargetId::into_inner)
        .collect()
}

#[test]
fn unfiltered_plan_lists_every_unlabelled_and_drops_required_labels() {
    assert_eq!(
        targets(&PlanOptions::default()),
        vec![
            "zlib-1.2.11-GCCcore-10.2.0.eb",
            "zlib-1.2.8-GCCcore-10.2.0.eb",
            "Rust-1.52-GCCcore-10.2.0.eb",
        ]
    );
}

#[test]
fn include_label_pulls_in_labelled_target() {
    let options = PlanOptions::default().with_labels(["gpu"], Vec::<&str>::new());
    assert_eq!(
        targets(&options),
        vec![
            "CUDA-11.1.1.eb",
            "zlib-1.2.11-GCCcore-10.2.0.eb",
            "zlib-1.2.8-GCCcore-10.2.0.eb",
            "Rust-1.52-GCCcore-10.2.0.eb",
        ]
    );
}

#[test]
fn exclude_label_drops_target() {
    let options = PlanOptions::default().with_labels(Vec::<&str>::new(), ["old"]);
    assert_eq!(
        targets(&options),
        vec![
            "zlib-1.2.11-GCCcore-10.2.0.eb",
            "Rust-1.52-GCCcore-10.2.0.eb",
        ]
    );
}

#[test]
fn global_options_yield_print_mode_and_commands() {
    let project = tempfile::tempdir().unwrap();
    let manifest = write_manifest(
        project.path(),
        r"
robot: true
parallel: 8
software:
  zlib:
    toolchains:
      GCCcore-10.2.0:
        versions: [1.2.11]
",
    );
    let plan = parse_easystack(&manifest, &PlanOptions::default()).unwrap();
    assert_eq!(plan.mode, ExecutionMode::PrintCommandsOnly);
    assert!(plan.is_print_only());
    assert_eq!(plan.general_options.robot, Some(true));
    assert_eq!(
        plan.render_commands("eb"),
        vec!["eb zlib-1.2.11-GCCcore-10.2.0.eb --robot --parallel=8"]
    );
}

#[test]
fn legacy_dialect_reports_general_options() {
    let project = tempfile::tempdir().unwrap();
    let manifest = write_manifest(
        project.path(),
        r"
easybuild_version: 4.3.1
software:
  zlib:
    toolchains:
      GCCcore-10.2.0:
        versions: [1.2.11]
",
    );
    let plan = parse_easystack(&manifest, &PlanOptions::new(ManifestDialect::Legacy)).unwrap();
    assert_eq!(
        plan.general_options.easybuild_version.as_deref(),
        Some("4.3.1")
    );
    assert_eq!(plan.mode, ExecutionMode::PrintCommandsOnly);
}

#[test]
fn legacy_dialect_rejects_invocation_labels() {
    let project = tempfile::tempdir().unwrap();
    let manifest = write_manifest(project.path(), LABELLED_STACK);
    let options = PlanOptions::new(ManifestDialect::Legacy).with_labels(["gpu"], Vec::<&str>::new());
    let err = parse_easystack(&manifest, &options).unwrap_err();
    assert!(matches!(
        err,
        CoreError::Manifest(ManifestError::UnsupportedLabel { .. })
    ));
}

#[test]
fn legacy_dialect_rejects_manifest_labels() {
    let project = tempfile::tempdir().unwrap();
    let manifest = write_manifest(project.path(), LABELLED_STACK);
    let err = parse_easystack(&manifest, &PlanOptions::new(ManifestDialect::Legacy)).unwrap_err();
    assert!(err.to_string().starts_with("manifest error:"));
    assert!(err.to_string().contains("CUDA"));
}

#[test]
fn missing_file_is_manifest_io_error() {
    let project = tempfile::tempdir().unwrap();
    let err = parse_easystack(&project.path().join("absent.yaml"), &PlanOptions::default())
        .unwrap_err();
    assert!(matches!(err, CoreError::Manifest(ManifestError::Io(_))));
}

#[test]
fn structural_errors_abort_the_whole_parse() {
    let project = tempfile::tempdir().unwrap();
    let manifest = write_manifest(
        project.path(),
        r"
software:
  zlib:
    toolchains:
      GCCcore-10.2.0:
        versions: [1.2.11]
  bzip2:
    toolchains:
      GCCcore-10.2.0:
        versions: '1.0.*'
",
    );
    let err = parse_easystack(&manifest, &PlanOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        CoreError::Manifest(ManifestError::UnsupportedWildcard { ref software }) if software == "bzip2"
    ));
}
