//! Runs every fault fixture under `tests/faults`.
//!
//! Each fixture is a JSON object holding a serialised [`FaultRecord`] and the
//! expected outcome:
//!
//! ```json
//! {
//!   "expect": "attribute-typo",
//!   "cause_contains": ["has no attribute named `appendh`"],
//!   "suggestion": "Did you mean `append`?",
//!   "fault": { "kind": "AttributeError", "message": "...", "frames": [] }
//! }
//! ```
//!
//! `suggestion` is compared exactly when present; `null` asserts there is no
//! suggestion and omitting the key skips the check.

use std::{fs, path::Path};

use lucid::{CauseCategory, Explainer, FaultRecord, RecordingTracer};

#[derive(serde::Deserialize)]
struct Fixture {
    expect: CauseCategory,
    #[serde(default)]
    cause_contains: Vec<String>,
    #[serde(default, deserialize_with = "present")]
    suggestion: Option<Option<String>>,
    fault: FaultRecord,
}

/// Distinguishes `"suggestion": null` from a missing key.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

fn run_fixture(path: &Path) -> datatest_stable::Result<()> {
    let fixture: Fixture = serde_json::from_str(&fs::read_to_string(path)?)?;

    let mut explainer = Explainer::new().with_tracer(RecordingTracer::new());
    let explanation = fixture.fault.with_fault(|fault| explainer.explain(fault));

    if explanation.category != fixture.expect {
        let trace: Vec<_> = explainer.tracer().checked_rules();
        return Err(format!(
            "expected category '{}', got '{}'\nrules checked: {trace:?}\ncause: {}",
            fixture.expect, explanation.category, explanation.cause
        )
        .into());
    }
    for needle in &fixture.cause_contains {
        if !explanation.cause.contains(needle.as_str()) {
            return Err(format!("cause does not contain {needle:?}:\n{}", explanation.cause).into());
        }
    }
    if let Some(expected) = &fixture.suggestion
        && explanation.suggestion != *expected
    {
        return Err(format!(
            "expected suggestion {expected:?}, got {:?}",
            explanation.suggestion
        )
        .into());
    }

    // same input, same output
    let again = fixture.fault.with_fault(|fault| explainer.explain(fault));
    if again != explanation {
        return Err("explaining the same record twice gave different results".into());
    }
    Ok(())
}

datatest_stable::harness!(run_fixture, "tests/faults", r"^.*\.json$");
