//! End-to-end integration tests for amalgam.
//!
//! These tests exercise the full pipeline from `amalgam.toml` to the
//! single-header artifact on disk, checking the artifact layout byte by byte.

use std::fs;
use std::path::{Path, PathBuf};

use amalgam_config::{AmalgamConfig, LibraryConfig};
use amalgam_core::template::SEPARATOR;
use amalgam_core::{Assembler, AssemblyPlan, Error, WriteMode};

// ── Fixture project ──────────────────────────────────────────────────────

const HEADER: &str = "\
#ifndef MINIMAL_H
#define MINIMAL_H

#include <stdint.h>

int minimal_load(const char* title, uint32_t w, uint32_t h);
void minimal_destroy(void);

#endif /* !MINIMAL_H */
";

const MINIMAL_C: &str = "\
#include \"minimal.h\"

int minimal_load(const char* title, uint32_t w, uint32_t h)
{
    return minimal_platform_init(title, w, h);
}
";

const INPUT_C: &str = "\
#include \"minimal.h\"

static uint8_t key_states[512];
";

const EVENT_C: &str = "\
#include \"minimal.h\"

#define MINIMAL_LOWORD(dw) ((uint16_t)(dw))
";

const PLATFORM_C: &str = "\
#include \"minimal.h\"

#ifdef MINIMAL_PLATFORM_WINDOWS
static HWND window;
#endif
";

const LICENSE: &str = "\
MIT License

Copyright (c) 2022 Minimal Contributors

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software.
";

struct Project {
    _tmp: tempfile::TempDir,
    root: PathBuf,
}

impl Project {
    fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let src = root.join("src");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(root.join("dist")).unwrap();
        fs::write(src.join("minimal.h"), HEADER).unwrap();
        fs::write(src.join("minimal.c"), MINIMAL_C).unwrap();
        fs::write(src.join("input.c"), INPUT_C).unwrap();
        fs::write(src.join("event.c"), EVENT_C).unwrap();
        fs::write(src.join("platform_windows.c"), PLATFORM_C).unwrap();
        fs::write(root.join("LICENSE"), LICENSE).unwrap();
        Self { _tmp: tmp, root }
    }

    /// The starter config, rebased onto this project's directory.
    fn config(&self) -> AmalgamConfig {
        let mut config = AmalgamConfig::example();
        config.output_dir = self.root.join("dist");
        config.license = self.root.join("LICENSE");
        for lib in &mut config.libraries {
            lib.source_dir = self.root.join(&lib.source_dir);
        }
        config
    }

    fn write_config(&self, config: &AmalgamConfig) -> PathBuf {
        let path = self.root.join("amalgam.toml");
        fs::write(&path, toml::to_string_pretty(config).unwrap()).unwrap();
        path
    }

    fn artifact(&self, name: &str) -> String {
        fs::read_to_string(self.root.join("dist").join(format!("{name}.h"))).unwrap()
    }
}

fn without_first_line(s: &str) -> &str {
    s.split_once('\n').map(|(_, rest)| rest).unwrap_or("")
}

fn build(config_path: &Path) -> Vec<amalgam_core::AssemblyReport> {
    let config = AmalgamConfig::load_from(config_path).unwrap();
    config
        .plans()
        .into_iter()
        .map(|plan| Assembler::new(plan).run().unwrap())
        .collect()
}

// ── Full pipeline ────────────────────────────────────────────────────────

#[test]
fn e2e_config_to_single_header() {
    let project = Project::new();
    let config_path = project.write_config(&project.config());

    let reports = build(&config_path);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].source_segments, 4);

    let mut expected = String::new();
    expected.push_str(HEADER);
    expected.push_str(SEPARATOR);
    expected.push_str("#ifdef MINIMAL_IMPLEMENTATION\n");
    for src in [MINIMAL_C, INPUT_C, EVENT_C, PLATFORM_C] {
        expected.push_str(without_first_line(src));
        expected.push_str("\n\n");
    }
    expected.push_str("#endif /* !MINIMAL_IMPLEMENTATION */\n\n");
    expected.push_str("/*\n");
    expected.push_str(LICENSE);
    expected.push_str("*/");

    assert_eq!(project.artifact("minimal"), expected);
    assert_eq!(reports[0].bytes_written, expected.len() as u64);
}

#[test]
fn e2e_header_prefix_preserved() {
    let project = Project::new();
    build(&project.write_config(&project.config()));

    let output = project.artifact("minimal");
    let sep = output.find(SEPARATOR).unwrap();
    assert_eq!(&output[..sep], HEADER);
}

#[test]
fn e2e_license_is_final_segment() {
    let project = Project::new();
    build(&project.write_config(&project.config()));

    let output = project.artifact("minimal");
    let tail_start = output.rfind("#endif /* !MINIMAL_IMPLEMENTATION */\n\n").unwrap()
        + "#endif /* !MINIMAL_IMPLEMENTATION */\n\n".len();
    let tail = &output[tail_start..];
    let license = tail
        .strip_prefix("/*\n")
        .and_then(|t| t.strip_suffix("*/"))
        .unwrap();
    assert_eq!(license, LICENSE);
}

#[test]
fn e2e_source_order_follows_config() {
    let project = Project::new();
    let mut config = project.config();
    config.libraries[0].sources = vec![
        "event.c".into(),
        "minimal.c".into(),
        "event.c".into(),
    ];
    build(&project.write_config(&config));

    let output = project.artifact("minimal");
    let guarded_start = output.find("#ifdef MINIMAL_IMPLEMENTATION\n").unwrap()
        + "#ifdef MINIMAL_IMPLEMENTATION\n".len();
    let guarded_end = output.find("#endif /* !MINIMAL_IMPLEMENTATION */").unwrap();
    let guarded = &output[guarded_start..guarded_end];

    let expected = format!(
        "{}\n\n{}\n\n{}\n\n",
        without_first_line(EVENT_C),
        without_first_line(MINIMAL_C),
        without_first_line(EVENT_C)
    );
    assert_eq!(guarded, expected);
}

#[test]
fn e2e_deterministic_rebuild() {
    let project = Project::new();
    let config_path = project.write_config(&project.config());
    build(&config_path);
    let first = project.artifact("minimal");
    build(&config_path);
    assert_eq!(project.artifact("minimal"), first);
}

#[test]
fn e2e_multiple_libraries_with_overrides() {
    let project = Project::new();
    fs::write(project.root.join("COPYING"), "zlib license\n").unwrap();

    let mut config = project.config();
    config.libraries.push(LibraryConfig {
        name: "input".into(),
        source_dir: project.root.join("src"),
        header: "minimal.h".into(),
        sources: vec!["input.c".into()],
        license: Some(project.root.join("COPYING")),
        output_dir: None,
        write_mode: Some(WriteMode::Atomic),
    });
    let reports = build(&project.write_config(&config));

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[1].write_mode, WriteMode::Atomic);

    let input = project.artifact("input");
    assert!(input.contains("#ifdef INPUT_IMPLEMENTATION\n"));
    assert!(input.ends_with("/*\nzlib license\n*/"));
    assert!(project.artifact("minimal").ends_with(&format!("/*\n{LICENSE}*/")));
}

// ── Degenerate & failure cases ───────────────────────────────────────────

#[test]
fn e2e_empty_sources() {
    let project = Project::new();
    let mut config = project.config();
    config.libraries[0].sources.clear();
    build(&project.write_config(&config));

    let output = project.artifact("minimal");
    let open = output.find("#ifdef MINIMAL_IMPLEMENTATION").unwrap();
    let close = output.find("#endif /* !MINIMAL_IMPLEMENTATION */").unwrap();
    let between = &output[open + "#ifdef MINIMAL_IMPLEMENTATION".len()..close];
    assert!(between.trim().is_empty());
    assert!(output.starts_with(HEADER));
    assert!(output.ends_with(&format!("/*\n{LICENSE}*/")));
}

#[test]
fn e2e_missing_source_fails_before_license() {
    let project = Project::new();
    let mut config = project.config();
    config.libraries[0].sources.insert(1, "platform_linux.c".into());
    let config = AmalgamConfig::load_from(&project.write_config(&config)).unwrap();

    let plan = config.plans().remove(0);
    let err = Assembler::new(plan).run().unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
    assert!(err.path().ends_with("platform_linux.c"));

    let partial = project.artifact("minimal");
    assert!(!partial.contains("MIT License"));
}

#[test]
fn e2e_atomic_failure_leaves_no_artifact() {
    let project = Project::new();
    let mut config = project.config();
    config.write_mode = WriteMode::Atomic;
    config.libraries[0].sources.push("missing.c".into());

    let plan: AssemblyPlan = config.plans().remove(0);
    assert!(Assembler::new(plan).run().is_err());
    assert!(!project.root.join("dist").join("minimal.h").exists());
    assert_eq!(fs::read_dir(project.root.join("dist")).unwrap().count(), 0);
}

#[test]
fn e2e_report_serializes_to_json() {
    let project = Project::new();
    let reports = build(&project.write_config(&project.config()));
    let json = serde_json::to_value(&reports).unwrap();
    assert_eq!(json[0]["library"], "minimal");
    assert_eq!(json[0]["guard_macro"], "MINIMAL_IMPLEMENTATION");
    assert_eq!(json[0]["write_mode"], "stream");
    assert_eq!(json[0]["source_segments"], 4);
}
