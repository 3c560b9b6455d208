use document::ElementSpec;
use document::HtmlDocument;
use document::snapshot::{DocumentSnapshot, SnapshotOptions};
use serde::Deserialize;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch < ' ' => {
                let _ = write!(&mut out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Human-readable report of the first mismatching line, with context.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    const MISSING: &str = "<missing>";
    let max = expected.len().max(actual.len());
    let line = |lines: &[String], i: usize| lines.get(i).map_or(MISSING, |l| l.as_str()).to_string();
    let mut out = String::new();
    let mismatch = (0..max).find(|&i| line(expected, i) != line(actual, i));
    if let Some(i) = mismatch {
        let start = i.saturating_sub(2);
        let end = (i + 3).min(max);
        let _ = writeln!(
            &mut out,
            "first mismatch at line {} (showing {}..={}):",
            i + 1,
            start + 1,
            end
        );
        for idx in start..end {
            let marker = if idx == i { ">" } else { " " };
            let _ = writeln!(&mut out, "{marker} {:>4}  expected: {}", idx + 1, line(expected, idx));
            let _ = writeln!(&mut out, "{marker} {:>4}    actual: {}", idx + 1, line(actual, idx));
        }
    }
    let _ = writeln!(
        &mut out,
        "expected {} lines, actual {} lines",
        expected.len(),
        actual.len()
    );
    out
}

/// One line per spec, in the compact `open`/`close`/`content` form.
pub fn format_specs(specs: &[ElementSpec]) -> Vec<String> {
    specs.iter().map(ToString::to_string).collect()
}

pub fn snapshot_lines(doc: &HtmlDocument, include_css: bool) -> Vec<String> {
    let options = SnapshotOptions {
        include_css,
        ..SnapshotOptions::default()
    };
    DocumentSnapshot::new(doc, options).as_lines().to_vec()
}

fn default_true() -> bool {
    true
}

/// A golden assembly case: markup in, expected spec stream and/or document out.
#[derive(Clone, Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    pub input: String,
    #[serde(default)]
    pub specs: Option<Vec<String>>,
    #[serde(default)]
    pub document: Option<Vec<String>>,
    #[serde(default)]
    pub include_css: bool,
    #[serde(default)]
    pub preserve_unknown_tags: bool,
    #[serde(default)]
    pub coalesce_text: bool,
    #[serde(default = "default_true")]
    pub collapse_whitespace: bool,
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[serde(rename = "case", default)]
    cases: Vec<Fixture>,
}

/// Load every `*.toml` file in `dir`, in file-name order.
pub fn load_fixtures(dir: &Path) -> Vec<Fixture> {
    let entries = fs::read_dir(dir)
        .unwrap_or_else(|err| panic!("failed to read fixture dir {dir:?}: {err}"));
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();
    let mut fixtures = Vec::new();
    for path in paths {
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("failed to read fixture {path:?}: {err}"));
        let file: FixtureFile = toml::from_str(&content)
            .unwrap_or_else(|err| panic!("failed to parse fixture {path:?}: {err}"));
        for fixture in &file.cases {
            assert!(
                fixture.specs.is_some() || fixture.document.is_some(),
                "fixture '{}' in {path:?} expects nothing",
                fixture.name
            );
        }
        fixtures.extend(file.cases);
    }
    fixtures
}

/// Substring filter from `ASSEMBLY_FIXTURE_FILTER`; empty matches everything.
pub fn fixture_filter() -> impl Fn(&str) -> bool {
    let filter = std::env::var("ASSEMBLY_FIXTURE_FILTER").unwrap_or_default();
    move |name: &str| filter.is_empty() || name.contains(&filter)
}
