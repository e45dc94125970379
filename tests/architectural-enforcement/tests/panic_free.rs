//! Integration Test: Panic-Free Production Code
//!
//! **Policy**: production code propagates errors with `?` instead of
//! calling `unwrap()` or `expect()`. Test modules are exempt.

use architectural_enforcement::{production_sources, report};

#[test]
fn test_no_unwrap_in_production_code() {
    let mut violations = Vec::new();

    for dir in ["calculator/core/src", "tui/src"] {
        for file in production_sources(dir) {
            for (line, code) in file.code_lines() {
                if code.contains(".unwrap()") || code.contains(".expect(") {
                    violations.push(file.violation(line, code.trim()));
                }
            }
        }
    }

    report("unwrap/expect found in production code:", &violations);
}
