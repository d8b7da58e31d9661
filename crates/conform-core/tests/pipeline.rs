//! Integration test: the concurrent pipeline end-to-end with a stub
//! normalizer.
//!
//! The stub turns every line containing `concat` into a string
//! concatenation node, fails to parse files containing `SYNTAX`, and panics
//! on files containing `PANIC`.

use conform_core::catalog::parse_catalog;
use conform_core::ir::{IrNode, Span, StringConcat};
use conform_core::{
    render, Analyzer, AnalyzerError, FailOn, FileIr, Normalizer, OutputFormat, ParseError,
    Severity, SourceFile, ViolationKind,
};
use std::path::Path;
use std::sync::Arc;

struct LineNormalizer;

impl Normalizer for LineNormalizer {
    fn language_id(&self) -> &'static str {
        "lines"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["ts", "tsx"]
    }

    fn normalize(&self, file: &SourceFile) -> Result<FileIr, ParseError> {
        let text = file.text();
        assert!(!text.contains("PANIC"), "normalizer blew up");
        if let Some(line) = text.lines().position(|l| l.contains("SYNTAX")) {
            return Err(ParseError {
                message: "unexpected token".into(),
                line: line + 1,
                column: 1,
            });
        }
        let nodes = text
            .lines()
            .enumerate()
            .filter(|(_, l)| l.contains("concat"))
            .map(|(i, _)| {
                IrNode::StringConcat(StringConcat {
                    span: Span::point(i + 1, 1),
                })
            })
            .collect();
        Ok(FileIr::new(file.role(), nodes))
    }
}

const CATALOG: &str = r#"
version = 1

[[rule]]
id = "no-string-concat"
description = "Prefer template literals"
roles = ["*"]
severity = "warning"
message = "Use a template literal instead of `+`"
check = { kind = "no-string-concat" }
"#;

fn analyzer(root: &Path, concurrency: usize) -> Analyzer {
    let catalog = parse_catalog("test", CATALOG).unwrap();
    Analyzer::builder(Arc::new(LineNormalizer), Arc::new(catalog))
        .root(root)
        .concurrency(concurrency)
        .build()
        .unwrap()
}

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn populated_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..24 {
        let body = format!("const a = 1;\nconst b = concat;\n{}", "concat\n".repeat(i % 3));
        write(dir.path(), &format!("src/utils/mod{i:02}.ts"), body.as_bytes());
    }
    dir
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn identical_results_for_one_and_many_workers() {
    let dir = populated_tree();
    let serial = analyzer(dir.path(), 1).run().await.unwrap();
    let parallel = analyzer(dir.path(), 8).run().await.unwrap();
    assert_eq!(serial, parallel);
    assert_eq!(serial.files_checked, 24);
    // 24 files with 1 + (i % 3) findings each.
    assert_eq!(serial.violations.len(), 48);
}

#[tokio::test]
async fn repeated_runs_render_identically() {
    let dir = populated_tree();
    let analyzer = analyzer(dir.path(), 3);
    let first = render(&analyzer.run().await.unwrap(), OutputFormat::Json, false).unwrap();
    let second = render(&analyzer.run().await.unwrap(), OutputFormat::Json, false).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn json_count_matches_per_file_counts() {
    let dir = populated_tree();
    let report = analyzer(dir.path(), 4).run().await.unwrap();
    let json = render(&report, OutputFormat::Json, false).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    let per_file: usize = (0..24)
        .map(|i| report.for_file(Path::new(&format!("src/utils/mod{i:02}.ts"))).len())
        .sum();
    assert_eq!(parsed.as_array().unwrap().len(), per_file);
}

#[tokio::test]
async fn parse_errors_are_isolated() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/a.ts", b"const x = concat;\n");
    write(dir.path(), "src/b.ts", b"const y = concat;\nSYNTAX\n");
    let report = analyzer(dir.path(), 2).run().await.unwrap();

    let b = report.for_file(Path::new("src/b.ts"));
    assert_eq!(b.len(), 1);
    assert_eq!(b[0].kind, ViolationKind::ParseError);
    assert_eq!(b[0].location.line, 2);
    assert_eq!(report.for_file(Path::new("src/a.ts")).len(), 1);
    assert_eq!(report.exit_code(FailOn::Error), 1);
}

#[tokio::test]
async fn normalizer_panic_becomes_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/a.ts", b"PANIC\n");
    write(dir.path(), "src/b.ts", b"concat\n");
    let report = analyzer(dir.path(), 2).run().await.unwrap();
    assert_eq!(report.violations.len(), 2);
    assert_eq!(report.violations[0].kind, ViolationKind::ParseError);
    assert_eq!(report.violations[1].rule, "no-string-concat");
}

#[tokio::test]
async fn unreadable_file_is_a_warning_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/ok.ts", b"const ok = 1;\n");
    write(dir.path(), "src/broken.ts", &[0xff, 0xfe, 0x00, 0x80]);
    let report = analyzer(dir.path(), 2).run().await.unwrap();

    assert_eq!(report.violations.len(), 1);
    let diag = &report.violations[0];
    assert_eq!(diag.kind, ViolationKind::IoError);
    assert_eq!(diag.severity, Severity::Warning);
    assert_eq!(diag.location.file, Path::new("src/broken.ts"));
    assert_eq!(report.exit_code(FailOn::Error), 0);
}

#[tokio::test]
async fn missing_root_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = analyzer(&dir.path().join("missing"), 2)
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, AnalyzerError::RootUnreadable(_)));
}

#[tokio::test]
async fn shutdown_cancels_without_partial_results() {
    let dir = populated_tree();
    let err = analyzer(dir.path(), 2)
        .run_until(std::future::ready(()))
        .await
        .unwrap_err();
    assert!(matches!(err, AnalyzerError::Cancelled));
}

#[test]
fn blocking_entry_point() {
    let dir = populated_tree();
    let report = analyzer(dir.path(), 2).analyze().unwrap();
    assert_eq!(report.files_checked, 24);
    assert!(!report.has_errors());
}
