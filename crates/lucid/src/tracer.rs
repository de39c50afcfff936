//! Inference tracing infrastructure.
//!
//! Provides a trait-based tracing system for the rule engine. When using
//! [`NoopTracer`], every hook is an empty default method and compiles away.
//!
//! # Architecture
//!
//! The [`InferenceTracer`] trait defines hook points at the events worth
//! observing while a fault is explained: each rule tried, the rule that won,
//! guarded probes that failed, and source files that could not be read.
//!
//! | Tracer | Purpose |
//! |--------|---------|
//! | [`NoopTracer`] | Zero-cost no-op (production default) |
//! | [`StderrTracer`] | Human-readable inference log to stderr |
//! | [`RecordingTracer`] | Full event recording for tests and post-mortem |
//!
//! Probe failures are the engine's "weaker signal": they never abort
//! classification, they only show up here.

use crate::{category::CauseCategory, reflect::ProbeError};

/// Event emitted while explaining a fault.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// A rule predicate was evaluated.
    RuleChecked {
        /// Rule family, e.g. `attribute` or `syntax`.
        family: &'static str,
        rule: &'static str,
    },
    /// A rule predicate matched; no further rules of the family run.
    RuleMatched {
        family: &'static str,
        rule: &'static str,
        category: CauseCategory,
    },
    /// A guarded probe failed and was treated as inconclusive.
    ProbeFailed {
        /// Which probe, e.g. `list_members`.
        what: String,
        error: ProbeError,
    },
    /// The offending source file could not be read.
    SourceUnavailable { path: String },
    /// Composition failed and the explanation degraded to `unknown`.
    Degraded { reason: String },
}

/// Trait for inference tracing.
///
/// All methods have default no-op implementations, so [`NoopTracer`] needs no
/// code at all. Implementations only override the hooks they care about.
pub trait InferenceTracer: std::fmt::Debug {
    #[inline(always)]
    fn on_rule_checked(&mut self, _family: &'static str, _rule: &'static str) {}

    #[inline(always)]
    fn on_rule_matched(&mut self, _family: &'static str, _rule: &'static str, _category: CauseCategory) {}

    #[inline(always)]
    fn on_probe_failed(&mut self, _what: &str, _error: &ProbeError) {}

    #[inline(always)]
    fn on_source_unavailable(&mut self, _path: &str) {}

    #[inline(always)]
    fn on_degraded(&mut self, _reason: &str) {}
}

// ============================================================================
// NoopTracer: zero-cost production default
// ============================================================================

/// A tracer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl InferenceTracer for NoopTracer {}

// ============================================================================
// StderrTracer: human-readable inference log
// ============================================================================

/// Tracer that prints a human-readable inference log to stderr.
///
/// Output format:
/// ```text
///   ... attribute/uses-slots
///   ... attribute/read-only
///   >>> attribute/object-typo -> attribute-typo
///   !!! probe list_members failed: looking up '__dir__' failed: boom
/// ```
#[derive(Debug, Default)]
pub struct StderrTracer {
    /// Only print matches and failures, not every rule tried.
    quiet: bool,
}

impl StderrTracer {
    #[must_use]
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// A tracer that skips the per-rule lines.
    #[must_use]
    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

impl InferenceTracer for StderrTracer {
    fn on_rule_checked(&mut self, family: &'static str, rule: &'static str) {
        if !self.quiet {
            eprintln!("  ... {family}/{rule}");
        }
    }

    fn on_rule_matched(&mut self, family: &'static str, rule: &'static str, category: CauseCategory) {
        eprintln!("  >>> {family}/{rule} -> {category}");
    }

    fn on_probe_failed(&mut self, what: &str, error: &ProbeError) {
        eprintln!("  !!! probe {what} failed: {error}");
    }

    fn on_source_unavailable(&mut self, path: &str) {
        eprintln!("  !!! source unavailable: {path}");
    }

    fn on_degraded(&mut self, reason: &str) {
        eprintln!("  !!! degraded to unknown: {reason}");
    }
}

// ============================================================================
// RecordingTracer: full event capture
// ============================================================================

/// Tracer that records every event.
#[derive(Debug, Default)]
pub struct RecordingTracer {
    events: Vec<TraceEvent>,
}

impl RecordingTracer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    #[must_use]
    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }

    /// Names of the rules that were tried, in order.
    #[must_use]
    pub fn checked_rules(&self) -> Vec<&'static str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                TraceEvent::RuleChecked { rule, .. } => Some(*rule),
                _ => None,
            })
            .collect()
    }

    /// The winning rule, if any rule matched.
    #[must_use]
    pub fn matched_rule(&self) -> Option<&'static str> {
        self.events.iter().find_map(|event| match event {
            TraceEvent::RuleMatched { rule, .. } => Some(*rule),
            _ => None,
        })
    }

    #[must_use]
    pub fn probe_failures(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, TraceEvent::ProbeFailed { .. }))
            .count()
    }
}

impl InferenceTracer for RecordingTracer {
    fn on_rule_checked(&mut self, family: &'static str, rule: &'static str) {
        self.events.push(TraceEvent::RuleChecked { family, rule });
    }

    fn on_rule_matched(&mut self, family: &'static str, rule: &'static str, category: CauseCategory) {
        self.events.push(TraceEvent::RuleMatched { family, rule, category });
    }

    fn on_probe_failed(&mut self, what: &str, error: &ProbeError) {
        self.events.push(TraceEvent::ProbeFailed {
            what: what.to_owned(),
            error: error.clone(),
        });
    }

    fn on_source_unavailable(&mut self, path: &str) {
        self.events.push(TraceEvent::SourceUnavailable { path: path.to_owned() });
    }

    fn on_degraded(&mut self, reason: &str) {
        self.events.push(TraceEvent::Degraded {
            reason: reason.to_owned(),
        });
    }
}
