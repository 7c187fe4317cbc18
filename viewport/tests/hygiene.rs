//! Hygiene: source-level rules for the viewport crate.
//!
//! Scans `src/` (minus `_test.rs` files) for patterns that crash the page or
//! lose errors silently inside an event handler. Every rule has a budget; the
//! budget never grows.

use std::fs;
use std::path::Path;

struct SourceFile {
    path: String,
    content: String,
}

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if path.extension().is_none_or(|e| e != "rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

/// Assert `pattern` appears on at most `budget` lines across production code.
fn check_budget(pattern: &str, budget: usize, why: &str) {
    let files = source_files();
    assert!(!files.is_empty(), "no sources found; run from the viewport crate root");
    let hits: Vec<(String, usize)> = files
        .iter()
        .map(|f| (f.path.clone(), f.content.lines().filter(|line| line.contains(pattern)).count()))
        .filter(|(_, n)| *n > 0)
        .collect();
    let count: usize = hits.iter().map(|(_, n)| n).sum();
    let listing: Vec<String> = hits.iter().map(|(path, n)| format!("  {path}: {n}")).collect();
    assert!(
        count <= budget,
        "`{pattern}` budget exceeded ({why}): found {count}, max {budget}.\n{}",
        listing.join("\n")
    );
}

// --- Panics: a panic inside a DOM callback poisons the whole view ---

#[test]
fn unwrap_budget() {
    check_budget(".unwrap()", 0, "panics");
}

#[test]
fn expect_budget() {
    check_budget(".expect(", 0, "panics");
}

#[test]
fn panic_budget() {
    check_budget("panic!(", 0, "panics");
}

#[test]
fn unreachable_budget() {
    check_budget("unreachable!(", 0, "panics");
}

#[test]
fn todo_budget() {
    check_budget("todo!(", 0, "panics");
}

#[test]
fn unimplemented_budget() {
    check_budget("unimplemented!(", 0, "panics");
}

// --- Silent loss ---

#[test]
fn silent_discard_budget() {
    check_budget("let _ =", 0, "discards a result unread");
}

#[test]
fn dot_ok_budget() {
    check_budget(".ok()", 0, "discards an error unread");
}

// --- Style ---

#[test]
fn allow_dead_code_budget() {
    check_budget("#[allow(dead_code)]", 0, "hides unused code");
}

#[test]
fn println_budget() {
    check_budget("println!(", 0, "use the log macros");
}
