//! Integration Test: Layering
//!
//! **Policy**: `calculator-core` is headless; it must not know about the
//! terminal. `calculator-tui` is a thin client; it must not talk HTTP or do
//! arithmetic itself. Every calculation goes through the core's backend.

use architectural_enforcement::{manifest, production_sources, report};

const CORE: &str = "calculator/core";
const TUI: &str = "tui";

#[test]
fn test_core_has_no_terminal_dependencies() {
    let cargo = manifest(CORE);
    let mut violations = Vec::new();

    for dep in ["ratatui", "crossterm", "clap"] {
        if cargo.contains(dep) {
            violations.push(format!("{CORE}/Cargo.toml - depends on {dep}"));
        }
    }

    for file in production_sources(&format!("{CORE}/src")) {
        for (line, code) in file.code_lines() {
            if code.contains("ratatui::") || code.contains("crossterm::") {
                violations.push(file.violation(line, code.trim()));
            }
        }
    }

    report("Terminal code found in calculator-core:", &violations);
}

#[test]
fn test_tui_does_not_talk_http() {
    let cargo = manifest(TUI);
    let mut violations = Vec::new();

    if cargo.contains("reqwest") {
        violations.push(format!("{TUI}/Cargo.toml - depends on reqwest"));
    }

    for file in production_sources(&format!("{TUI}/src")) {
        for (line, code) in file.code_lines() {
            if code.contains("reqwest") || code.contains("CalculationRequest") {
                violations.push(file.violation(line, code.trim()));
            }
        }
    }

    report(
        "calculator-tui must go through the core backend:",
        &violations,
    );
}

#[test]
fn test_tui_does_not_evaluate() {
    let mut violations = Vec::new();

    for file in production_sources(&format!("{TUI}/src")) {
        for (line, code) in file.code_lines() {
            if code.contains("parse::<f64>") || code.contains("format_result") {
                violations.push(file.violation(line, code.trim()));
            }
        }
    }

    report(
        "calculator-tui renders the core's strings as-is:",
        &violations,
    );
}
