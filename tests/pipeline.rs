// tests/pipeline.rs
//! End-to-end pipeline tests: document -> staging -> manifest -> package

use mcpkg::{
    build_manifest, dataurl, emit, Error, LoadedConfig, MachineConfig, PackagePolicy,
    StagingRoot,
};
use std::fs;
use std::path::{Path, PathBuf};

// =============================================================================
// TEST HELPERS
// =============================================================================

fn write_input(dir: &Path, yaml: &str) -> PathBuf {
    let path = dir.join("machineconfig.yaml");
    fs::write(&path, yaml).unwrap();
    path
}

/// A machine config describing one file at /etc/foo.conf containing "hello".
fn example_yaml() -> String {
    format!(
        r#"apiVersion: machineconfiguration.openshift.io/v1
kind: MachineConfig
metadata:
  name: example
spec:
  config:
    ignition:
      version: 3.2.0
    storage:
      files:
        - path: /etc/foo.conf
          contents:
            source: "{}"
"#,
        dataurl::encode(b"hello")
    )
}

// =============================================================================
// END-TO-END
// =============================================================================

#[test]
fn test_end_to_end_rpm() {
    let work = tempfile::tempdir().unwrap();
    let input = write_input(work.path(), &example_yaml());

    let document = MachineConfig::load(&input).unwrap();
    assert_eq!(document.name(), "example");

    let mut config = LoadedConfig::new(document);

    let staging_path;
    let output;
    {
        let staging = StagingRoot::new().unwrap();
        staging_path = staging.path().to_path_buf();

        let files = config.translate().unwrap().clone();
        let staged = staging.materialize(&files).unwrap();

        // The staged file holds the decoded bytes.
        assert_eq!(staged.len(), 1);
        let staged_file = staging.path().join("etc/foo.conf");
        assert_eq!(fs::read(&staged_file).unwrap(), b"hello");

        let manifest =
            build_manifest(&mut config, staging.path(), &PackagePolicy::default()).unwrap();

        // Exactly one content entry, rooted under the staging root.
        assert_eq!(manifest.contents.len(), 1);
        assert_eq!(manifest.contents[0].destination, "/etc/foo.conf");
        assert_eq!(manifest.contents[0].source, staged_file);

        output = emit(&manifest, "rpm", work.path()).unwrap();
    }

    // The package exists and is named per RPM convention; the staging root
    // is gone once dropped.
    assert_eq!(
        output.file_name().unwrap().to_str().unwrap(),
        "example-1.0.0-1.x86_64.rpm"
    );
    assert!(fs::metadata(&output).unwrap().len() > 0);
    assert!(!staging_path.exists());
}

#[test]
fn test_empty_source_becomes_empty_packaged_file() {
    let work = tempfile::tempdir().unwrap();
    let yaml = r#"metadata:
  name: empties
spec:
  config:
    ignition:
      version: 3.2.0
    storage:
      files:
        - path: /etc/empty.conf
"#;
    let input = write_input(work.path(), yaml);

    let mut config = LoadedConfig::new(MachineConfig::load(&input).unwrap());
    let staging = StagingRoot::new().unwrap();

    let files = config.translate().unwrap().clone();
    staging.materialize(&files).unwrap();

    let staged = staging.path().join("etc/empty.conf");
    assert!(staged.is_file());
    assert_eq!(fs::metadata(&staged).unwrap().len(), 0);

    let manifest =
        build_manifest(&mut config, staging.path(), &PackagePolicy::default()).unwrap();
    let output = emit(&manifest, "rpm", work.path()).unwrap();
    assert!(output.is_file());
}

// =============================================================================
// FAILURE PATHS
// =============================================================================

#[test]
fn test_missing_name_fails_before_any_staging() {
    let work = tempfile::tempdir().unwrap();
    let yaml = r#"metadata: {}
spec:
  config:
    ignition:
      version: 3.2.0
"#;
    let input = write_input(work.path(), yaml);

    let staging_parent = work.path().join("staging");
    fs::create_dir(&staging_parent).unwrap();

    // Same ordering as the pipeline: the staging root is only created once
    // the document has loaded and validated.
    let result = MachineConfig::load(&input)
        .map(LoadedConfig::new)
        .and_then(|_config| StagingRoot::new_in(&staging_parent));

    assert!(matches!(
        result.unwrap_err(),
        Error::Validation { field: "metadata.name", .. }
    ));
    assert_eq!(fs::read_dir(&staging_parent).unwrap().count(), 0);
}

#[test]
fn test_unreadable_input_is_read_error() {
    let err = MachineConfig::load("/nonexistent/machineconfig.yaml").unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
}

#[test]
fn test_unknown_format_leaves_no_output() {
    let work = tempfile::tempdir().unwrap();
    let input = write_input(work.path(), &example_yaml());

    let mut config = LoadedConfig::new(MachineConfig::load(&input).unwrap());
    let staging = StagingRoot::new().unwrap();
    let files = config.translate().unwrap().clone();
    staging.materialize(&files).unwrap();

    let manifest =
        build_manifest(&mut config, staging.path(), &PackagePolicy::default()).unwrap();

    let out_dir = tempfile::tempdir().unwrap();
    let err = emit(&manifest, "deb", out_dir.path()).unwrap_err();
    assert!(matches!(err, Error::UnknownFormat(name) if name == "deb"));
    assert_eq!(fs::read_dir(out_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_writer_failure_removes_partial_package() {
    let work = tempfile::tempdir().unwrap();
    let input = write_input(work.path(), &example_yaml());

    let mut config = LoadedConfig::new(MachineConfig::load(&input).unwrap());

    // Build the manifest against a staging root that was never materialized,
    // so the archive writer fails when it reads the missing source.
    let staging = StagingRoot::new().unwrap();
    let manifest =
        build_manifest(&mut config, staging.path(), &PackagePolicy::default()).unwrap();

    let out_dir = tempfile::tempdir().unwrap();
    assert!(emit(&manifest, "rpm", out_dir.path()).is_err());
    assert_eq!(fs::read_dir(out_dir.path()).unwrap().count(), 0);
}
