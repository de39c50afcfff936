//! The engine's entry points.

use std::panic::{self, AssertUnwindSafe};

use crate::{
    category::{CauseCategory, Classification},
    classify::{self, Ctx},
    compose::{Composer, Explanation},
    config::ExplainConfig,
    fault::CapturedFault,
    locate,
    redact::{NoRedaction, Redactor},
    reflect::Prober,
    templates::{BuiltinTemplates, TemplateStore},
    tracer::{InferenceTracer, NoopTracer},
};

/// Explains faults with a fixed configuration and set of collaborators.
///
/// An `Explainer` keeps no state between calls apart from its tracer, so
/// explaining the same fault twice gives the same result.
///
/// ```
/// use lucid::{CapturedFault, CauseCategory, Explainer, FaultKind};
///
/// let fault = CapturedFault::new(FaultKind::ZeroDivisionError, "division by zero");
/// let explanation = Explainer::new().explain(&fault);
/// assert_eq!(explanation.category, CauseCategory::DivisionByZero);
/// ```
pub struct Explainer<T: InferenceTracer = NoopTracer> {
    config: ExplainConfig,
    templates: Box<dyn TemplateStore>,
    redactor: Box<dyn Redactor>,
    tracer: T,
}

impl Explainer {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ExplainConfig::new())
    }

    #[must_use]
    pub fn with_config(config: ExplainConfig) -> Self {
        Self {
            config,
            templates: Box::new(BuiltinTemplates),
            redactor: Box::new(NoRedaction),
            tracer: NoopTracer,
        }
    }
}

impl Default for Explainer {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: InferenceTracer> std::fmt::Debug for Explainer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Explainer")
            .field("config", &self.config)
            .field("tracer", &self.tracer)
            .finish_non_exhaustive()
    }
}

impl<T: InferenceTracer> Explainer<T> {
    /// Replaces the tracer, keeping everything else.
    #[must_use]
    pub fn with_tracer<U: InferenceTracer>(self, tracer: U) -> Explainer<U> {
        Explainer {
            config: self.config,
            templates: self.templates,
            redactor: self.redactor,
            tracer,
        }
    }

    #[must_use]
    pub fn with_templates(mut self, templates: impl TemplateStore + 'static) -> Self {
        self.templates = Box::new(templates);
        self
    }

    #[must_use]
    pub fn with_redactor(mut self, redactor: impl Redactor + 'static) -> Self {
        self.redactor = Box::new(redactor);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ExplainConfig {
        &self.config
    }

    #[must_use]
    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    #[must_use]
    pub fn into_tracer(self) -> T {
        self.tracer
    }

    /// Classifies and composes. Never panics and never fails: anything that
    /// goes wrong along the way, including a panicking template store or
    /// redactor, yields the `unknown` explanation.
    pub fn explain(&mut self, fault: &CapturedFault<'_>) -> Explanation {
        let found = self.classify(fault);
        let composer = Composer {
            templates: self.templates.as_ref(),
            redactor: self.redactor.as_ref(),
            lang: self.config.lang(),
        };
        let kind = &fault.kind;
        match panic::catch_unwind(AssertUnwindSafe(|| composer.compose(&found, kind))) {
            Ok(Ok(explanation)) => return explanation,
            Ok(Err(err)) => self.tracer.on_degraded(&err.to_string()),
            Err(_) => self.tracer.on_degraded("panic while composing"),
        }
        // the collaborators may panic again on the fallback text
        panic::catch_unwind(AssertUnwindSafe(|| composer.unknown(kind))).unwrap_or_else(|_| {
            self.tracer.on_degraded("panic while composing the unknown explanation");
            Composer::last_resort(kind)
        })
    }

    /// Category tag only, without composing text.
    pub fn classify_only(&mut self, fault: &CapturedFault<'_>) -> CauseCategory {
        self.classify(fault).category
    }

    /// Category and extracted parameters.
    ///
    /// Compile faults go to the Locator, everything else to the rule
    /// families. A panic inside a [`Reflect`](crate::Reflect)
    /// implementation is contained and reported as `unknown`.
    pub fn classify(&mut self, fault: &CapturedFault<'_>) -> Classification {
        let config = &self.config;
        let tracer: &mut dyn InferenceTracer = &mut self.tracer;
        let probe = Prober::default();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            if fault.kind.is_compile_fault() {
                locate::locate(fault, config, tracer)
            } else {
                classify::classify(&Ctx::new(fault, config, &probe), tracer)
            }
        }));
        for failure in probe.take_failures() {
            tracer.on_probe_failed(&failure.what, &failure.error);
        }
        outcome.unwrap_or_else(|_| {
            tracer.on_degraded("panic while classifying");
            Classification::unknown()
        })
    }
}

/// Explains `fault` with the default configuration and built-in templates.
#[must_use]
pub fn explain(fault: &CapturedFault<'_>) -> Explanation {
    Explainer::new().explain(fault)
}

/// Category of `fault` under the default configuration.
#[must_use]
pub fn classify_only(fault: &CapturedFault<'_>) -> CauseCategory {
    Explainer::new().classify_only(fault)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fault::FaultKind,
        tracer::{RecordingTracer, TraceEvent},
    };

    #[test]
    fn runtime_and_compile_faults_take_different_paths() {
        let runtime = CapturedFault::new(FaultKind::ZeroDivisionError, "division by zero");
        assert_eq!(classify_only(&runtime), CauseCategory::DivisionByZero);

        let compile = CapturedFault::new(FaultKind::SyntaxError, "'break' outside loop");
        assert_eq!(classify_only(&compile), CauseCategory::BreakOutsideLoop);
    }

    #[test]
    fn broken_template_store_degrades_to_unknown() {
        struct Broken;
        impl TemplateStore for Broken {
            fn template_for(&self, category: CauseCategory, _lang: &str) -> Option<std::borrow::Cow<'_, str>> {
                category.is_unknown().then_some("no idea".into())
            }
            fn generic_for(&self, _kind: &FaultKind, _lang: &str) -> Option<std::borrow::Cow<'_, str>> {
                None
            }
        }

        let fault = CapturedFault::new(FaultKind::ZeroDivisionError, "division by zero");
        let mut explainer = Explainer::new().with_templates(Broken).with_tracer(RecordingTracer::new());
        let explanation = explainer.explain(&fault);
        assert_eq!(explanation.category, CauseCategory::Unknown);
        assert_eq!(explanation.cause, "no idea");
        assert!(
            explainer
                .tracer()
                .events()
                .iter()
                .any(|event| matches!(event, TraceEvent::Degraded { .. }))
        );
    }
}
