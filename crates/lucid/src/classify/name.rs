//! Rules for `NameError` and `UnboundLocalError`.

use std::sync::LazyLock;

use regex::Regex;

use super::{Ctx, Rule, first_match};
use crate::{
    category::{CauseCategory, Classification},
    fault::FrameInfo,
    scope::{self, NamespaceOrigin},
    similarity::ranked_candidates,
    tracer::InferenceTracer,
};

static NOT_DEFINED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^name '(?P<name>[^']+)' is not defined").expect("static pattern"));
/// Both the pre-3.11 and the 3.11+ wording for an unassigned closure cell.
static FREE_VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:free variable '(?P<old>[^']+)' referenced before assignment|cannot access free variable '(?P<new>[^']+)' where it is not associated with a value)",
    )
    .expect("static pattern")
});
static UNBOUND_LOCAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:local variable '(?P<old>[^']+)' referenced before assignment|cannot access local variable '(?P<new>[^']+)' where it is not associated with a value)",
    )
    .expect("static pattern")
});

struct NameCtx<'c> {
    ctx: &'c Ctx<'c>,
    name: String,
    free_variable: bool,
}

impl NameCtx<'_> {
    fn classify(&self, category: CauseCategory) -> Classification {
        Classification::new(category).text("name", self.name.as_str())
    }
}

type Check = fn(&NameCtx<'_>) -> Option<Classification>;

const fn rule(name: &'static str, check: Check) -> Rule<Check> {
    Rule::new(name, check)
}

const NAME_RULES: &[Rule<Check>] = &[
    rule("free-variable-unbound", free_variable_unbound),
    rule("missing-import", missing_import),
    rule("name-typo", name_typo),
    rule("name-generic", name_generic),
];

const UNBOUND_LOCAL_RULES: &[Rule<Check>] = &[
    rule("missing-nonlocal", missing_nonlocal),
    rule("missing-global", missing_global),
    rule("unbound-local-generic", unbound_local_generic),
];

fn captured_name(regex: &Regex, message: &str) -> Option<String> {
    let caps = regex.captures(message)?;
    caps.name("old").or_else(|| caps.name("new")).map(|m| m.as_str().to_owned())
}

pub(super) fn classify(ctx: &Ctx<'_>, tracer: &mut dyn InferenceTracer) -> Option<Classification> {
    let message = ctx.message();
    let (name, free_variable) = if let Some(name) = captured_name(&FREE_VARIABLE, message) {
        (name, true)
    } else {
        let from_message = NOT_DEFINED.captures(message).map(|caps| caps["name"].to_owned());
        (from_message.or_else(|| ctx.fault.detail.name.map(str::to_owned))?, false)
    };
    let nctx = NameCtx {
        ctx,
        name,
        free_variable,
    };
    first_match("name", NAME_RULES, &nctx, ctx.version, tracer)
}

pub(super) fn classify_unbound_local(ctx: &Ctx<'_>, tracer: &mut dyn InferenceTracer) -> Option<Classification> {
    let name = captured_name(&UNBOUND_LOCAL, ctx.message()).or_else(|| ctx.fault.detail.name.map(str::to_owned))?;
    let nctx = NameCtx {
        ctx,
        name,
        free_variable: false,
    };
    first_match("unbound-local", UNBOUND_LOCAL_RULES, &nctx, ctx.version, tracer)
}

fn free_variable_unbound(n: &NameCtx<'_>) -> Option<Classification> {
    n.free_variable.then(|| n.classify(CauseCategory::FreeVariableUnbound))
}

/// `math.pi` used without `import math`.
fn missing_import(n: &NameCtx<'_>) -> Option<Classification> {
    n.ctx
        .config
        .is_stdlib_module(&n.name)
        .then(|| n.classify(CauseCategory::MissingImport))
}

/// Suggests names from the nearest scope layer holding a close match.
fn name_typo(n: &NameCtx<'_>) -> Option<Classification> {
    let fallback = FrameInfo::default();
    let frame = n.ctx.frame().unwrap_or(&fallback);
    let layers = scope::resolve(frame);
    let candidates = ranked_candidates(
        &n.name,
        &layers,
        n.ctx.max_suggestions(),
        n.ctx.config.name_threshold(),
    );
    let origin = candidates.first()?.origin.clone();
    Some(
        n.classify(CauseCategory::NameTypo)
            .text("origin", origin_label(&origin))
            .list("suggestions", candidates.into_iter().map(|candidate| candidate.name)),
    )
}

fn name_generic(n: &NameCtx<'_>) -> Option<Classification> {
    Some(n.classify(CauseCategory::NameGeneric))
}

/// The name exists in an enclosing function: the inner function assigns to
/// it without declaring it `nonlocal`.
fn missing_nonlocal(n: &NameCtx<'_>) -> Option<Classification> {
    let frame = n.ctx.frame()?;
    frame
        .enclosing
        .iter()
        .any(|namespace| namespace.contains_key(&n.name))
        .then(|| n.classify(CauseCategory::UnboundLocalNonlocal))
}

fn missing_global(n: &NameCtx<'_>) -> Option<Classification> {
    let frame = n.ctx.frame()?;
    frame
        .globals
        .contains_key(&n.name)
        .then(|| n.classify(CauseCategory::UnboundLocalGlobal))
}

fn unbound_local_generic(n: &NameCtx<'_>) -> Option<Classification> {
    Some(n.classify(CauseCategory::UnboundLocalGeneric))
}

fn origin_label(origin: &NamespaceOrigin) -> String {
    match origin {
        NamespaceOrigin::Local => "local".to_owned(),
        NamespaceOrigin::Enclosing(_) => "enclosing".to_owned(),
        NamespaceOrigin::Global => "global".to_owned(),
        NamespaceOrigin::Builtin => "builtin".to_owned(),
        NamespaceOrigin::Module => "module".to_owned(),
        NamespaceOrigin::OtherModule(module) => format!("module `{module}`"),
    }
}
