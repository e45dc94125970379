//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code must not sleep. Error display timers are
//! deadlines checked on poll, not sleeping tasks.
//! **Exception**: frame rate limiting in the TUI app loop.

use architectural_enforcement::{production_sources, report};

/// Only the frame loop may sleep
const FRAME_LOOP: &str = "tui/src/app.rs";

#[test]
fn test_no_sleep_in_production_code() {
    let mut violations = Vec::new();

    for dir in ["calculator/core/src", "tui/src"] {
        for file in production_sources(dir) {
            let frame_loop = file.path.ends_with(FRAME_LOOP);
            for (line, code) in file.code_lines() {
                if code.contains("thread::sleep") {
                    violations.push(file.violation(line, code.trim()));
                } else if code.contains("sleep(") && !frame_loop {
                    violations.push(file.violation(line, code.trim()));
                }
            }
        }
    }

    report("Sleep calls found in production code:", &violations);
}
