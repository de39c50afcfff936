//! Fault Classifier for runtime faults.
//!
//! Each fault kind owns an ordered rule table. Rules are plain function
//! pointers evaluated by [`first_match`]: the first rule returning a
//! [`Classification`] wins and no later rule runs. Table order is the
//! precedence order, so more specific explanations sit above generic ones.

mod attribute;
mod import;
mod name;
mod subject;
mod type_value;

use crate::{
    category::Classification,
    config::ExplainConfig,
    fault::{CapturedFault, FaultKind, FrameInfo, RuntimeVersion, VersionRange},
    reflect::Prober,
    tracer::InferenceTracer,
};

/// One named predicate of a rule table.
pub(crate) struct Rule<F> {
    pub name: &'static str,
    /// Runtime versions whose messages this rule understands.
    pub versions: VersionRange,
    pub check: F,
}

impl<F> Rule<F> {
    pub const fn new(name: &'static str, check: F) -> Self {
        Self {
            name,
            versions: VersionRange::ALL,
            check,
        }
    }

    pub const fn only(name: &'static str, versions: VersionRange, check: F) -> Self {
        Self { name, versions, check }
    }
}

/// Runs `rules` in order and returns the first match.
///
/// Rules whose version range excludes `version` are skipped without being
/// reported as checked.
pub(crate) fn first_match<C, F>(
    family: &'static str,
    rules: &[Rule<F>],
    ctx: &C,
    version: RuntimeVersion,
    tracer: &mut dyn InferenceTracer,
) -> Option<Classification>
where
    F: Fn(&C) -> Option<Classification>,
{
    for rule in rules {
        if !rule.versions.contains(version) {
            continue;
        }
        tracer.on_rule_checked(family, rule.name);
        if let Some(found) = (rule.check)(ctx) {
            tracer.on_rule_matched(family, rule.name, found.category);
            return Some(found);
        }
    }
    None
}

/// Inputs shared by every runtime rule.
pub(crate) struct Ctx<'c> {
    pub fault: &'c CapturedFault<'c>,
    pub config: &'c ExplainConfig,
    pub probe: &'c Prober,
    pub version: RuntimeVersion,
}

impl<'c> Ctx<'c> {
    pub fn new(fault: &'c CapturedFault<'c>, config: &'c ExplainConfig, probe: &'c Prober) -> Self {
        Self {
            fault,
            config,
            probe,
            version: fault.version.unwrap_or_else(|| config.version()),
        }
    }

    pub fn message(&self) -> &'c str {
        self.fault.raw_message
    }

    pub fn frame(&self) -> Option<&'c FrameInfo<'c>> {
        self.fault.innermost_frame()
    }

    /// Source line executing in the innermost frame.
    pub fn line_text(&self) -> Option<&'c str> {
        self.frame().and_then(|frame| frame.line_text.as_deref())
    }

    pub fn max_suggestions(&self) -> usize {
        self.config.max_suggestions()
    }
}

/// Classifies a runtime fault. Compile faults are not handled here and come
/// back as `unknown`.
pub(crate) fn classify(ctx: &Ctx<'_>, tracer: &mut dyn InferenceTracer) -> Classification {
    let found = match &ctx.fault.kind {
        FaultKind::AttributeError => attribute::classify(ctx, tracer),
        FaultKind::UnboundLocalError => name::classify_unbound_local(ctx, tracer),
        FaultKind::NameError => name::classify(ctx, tracer),
        FaultKind::TypeError => type_value::classify_type(ctx, tracer),
        FaultKind::ValueError | FaultKind::UnicodeDecodeError => type_value::classify_value(ctx, tracer),
        FaultKind::ArithmeticError | FaultKind::ZeroDivisionError | FaultKind::OverflowError => {
            type_value::classify_arithmetic(ctx, tracer)
        }
        FaultKind::LookupError | FaultKind::IndexError | FaultKind::KeyError => {
            type_value::classify_lookup(ctx, tracer)
        }
        FaultKind::RuntimeError | FaultKind::RecursionError => type_value::classify_runtime(ctx, tracer),
        FaultKind::ImportError | FaultKind::ModuleNotFoundError => import::classify(ctx, tracer),
        FaultKind::SyntaxError | FaultKind::IndentationError | FaultKind::TabError | FaultKind::Other(_) => None,
    };
    found.unwrap_or_else(Classification::unknown)
}
