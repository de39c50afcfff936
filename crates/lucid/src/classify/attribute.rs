//! Rules for `AttributeError`.

use super::{
    Ctx, Rule, first_match,
    subject::{AttributeSubject, Receiver, call_argument, is_identifier},
};
use crate::{
    category::{CauseCategory, Classification},
    fault::VersionRange,
    reflect::{ObjectKind, Reflect},
    scope,
    similarity::{best_matches, similarity_ratio},
    tracer::InferenceTracer,
};

/// Above this score a single module-attribute candidate is offered on its own.
const CONFIDENT_MATCH: f64 = 0.9;

struct AttrCtx<'c> {
    ctx: &'c Ctx<'c>,
    subject: AttributeSubject<'c>,
}

impl AttrCtx<'_> {
    fn attr(&self) -> &str {
        &self.subject.attr
    }

    /// Base classification carrying the parameters every template uses.
    fn classify(&self, category: CauseCategory) -> Classification {
        Classification::new(category)
            .text("obj", self.subject.display_name())
            .text("attr", self.attr())
            .text("type", self.subject.type_name())
    }
}

type Check = fn(&AttrCtx<'_>) -> Option<Classification>;

const fn rule(name: &'static str, check: Check) -> Rule<Check> {
    Rule::new(name, check)
}

const RULES: &[Rule<Check>] = &[
    rule("uses-slots", uses_slots),
    rule("read-only", read_only),
    rule("none-receiver", none_receiver),
    rule("circular-import-shadowing-stdlib", circular_import_shadowing_stdlib),
    rule("circular-import", circular_import),
    rule("shadowed-stdlib-module", shadowed_stdlib_module),
    rule("module-attribute-typo", module_attribute_typo),
    rule("attribute-in-other-module", attribute_in_other_module),
    rule("module-attribute-generic", module_attribute_generic),
    rule("tuple-by-accident", tuple_by_accident),
    rule("use-builtin-function", use_builtin_function),
    rule("use-synonym", use_synonym),
    rule("use-join-with-str", use_join_with_str),
    rule("builtin-function-attribute", builtin_function_attribute),
    Rule::only("perhaps-comma", VersionRange::before(3, 10), perhaps_comma as Check),
    rule("class-name-confusion", class_name_confusion),
    rule("attribute-typo", attribute_typo),
    rule("attribute-generic", attribute_generic),
];

pub(super) fn classify(ctx: &Ctx<'_>, tracer: &mut dyn InferenceTracer) -> Option<Classification> {
    let subject = AttributeSubject::parse(ctx)?;
    let actx = AttrCtx { ctx, subject };
    first_match("attribute", RULES, &actx, ctx.version, tracer)
}

/// Assignment of a name missing from a slotted class's fixed attribute set.
fn uses_slots(a: &AttrCtx<'_>) -> Option<Classification> {
    if a.subject.read_only {
        return None;
    }
    let obj = a.subject.obj?;
    let slots = a.ctx.probe.slots(obj)?;
    if slots.iter().any(|slot| slot == a.attr()) {
        return None;
    }
    Some(a.classify(CauseCategory::UsesSlots).list("slots", slots))
}

fn read_only(a: &AttrCtx<'_>) -> Option<Classification> {
    if !a.subject.read_only {
        return None;
    }
    match a.subject.obj.and_then(|obj| a.ctx.probe.slots(obj)) {
        Some(slots) => Some(a.classify(CauseCategory::ReadOnlySlots).list("slots", slots)),
        None => Some(a.classify(CauseCategory::ReadOnlyAttribute)),
    }
}

fn none_receiver(a: &AttrCtx<'_>) -> Option<Classification> {
    let is_none = matches!(&a.subject.receiver, Receiver::Instance { type_name } if type_name == "NoneType")
        || a.subject.obj.is_some_and(|obj| obj.kind() == ObjectKind::None);
    is_none.then(|| a.classify(CauseCategory::NoneAttribute))
}

fn is_circular(a: &AttrCtx<'_>) -> bool {
    match &a.subject.receiver {
        Receiver::Module {
            partially_initialized, ..
        } => *partially_initialized || a.subject.obj.is_some_and(|obj| obj.is_initializing()),
        _ => false,
    }
}

fn circular_import_shadowing_stdlib(a: &AttrCtx<'_>) -> Option<Classification> {
    let module = a.subject.module_name()?;
    (is_circular(a) && a.ctx.config.is_stdlib_module(module))
        .then(|| a.classify(CauseCategory::CircularImportShadowingStdlib).text("module", module))
}

fn circular_import(a: &AttrCtx<'_>) -> Option<Classification> {
    let module = a.subject.module_name()?;
    is_circular(a).then(|| a.classify(CauseCategory::CircularImport).text("module", module))
}

/// A user file named like a standard-library module was imported instead.
fn shadowed_stdlib_module(a: &AttrCtx<'_>) -> Option<Classification> {
    let module = a.subject.module_name()?;
    let file = a.subject.obj?.module_file()?;
    if !a.ctx.config.is_stdlib_module(module) || a.ctx.config.is_stdlib_path(file) {
        return None;
    }
    Some(
        a.classify(CauseCategory::ShadowedStdlibModule)
            .text("module", module)
            .text("file", file),
    )
}

fn module_attribute_typo(a: &AttrCtx<'_>) -> Option<Classification> {
    let module = a.subject.module_name()?;
    let obj = a.subject.obj?;
    let members = a.ctx.probe.members(obj);
    let matches = best_matches(
        a.attr(),
        members.iter().map(String::as_str),
        a.ctx.max_suggestions(),
        a.ctx.config.module_threshold(),
    );
    let first = matches.first()?;
    let confident = |name: &String| similarity_ratio(a.attr(), name) >= CONFIDENT_MATCH;
    let single = matches.len() == 1 || (confident(first) && !matches.get(1).is_some_and(confident));
    let found = if single {
        a.classify(CauseCategory::ModuleAttributeTypo)
            .text("module", module)
            .list("suggestions", [first.clone()])
    } else {
        a.classify(CauseCategory::ModuleAttributeTypoMany)
            .text("module", module)
            .list("suggestions", matches)
    };
    Some(found)
}

/// Another module bound in scope has the attribute, e.g. `keyword.pi` when
/// `math` is imported.
fn attribute_in_other_module(a: &AttrCtx<'_>) -> Option<Classification> {
    let module = a.subject.module_name()?;
    let frame = a.ctx.frame()?;
    let mut modules: Vec<&str> = Vec::new();
    for (bound, value) in scope::bindings(frame) {
        if value.kind() != ObjectKind::Module || value.name().unwrap_or(bound) == module {
            continue;
        }
        if a.ctx.probe.surely_has(value, a.attr()) {
            modules.push(bound);
        }
    }
    match modules.as_slice() {
        [] => None,
        [other] => Some(
            a.classify(CauseCategory::AttributeInOtherModule)
                .text("module", module)
                .text("other", *other),
        ),
        many => Some(
            a.classify(CauseCategory::AttributeInOtherModules)
                .text("module", module)
                .list("modules", many.iter().copied()),
        ),
    }
}

fn module_attribute_generic(a: &AttrCtx<'_>) -> Option<Classification> {
    let module = a.subject.module_name()?;
    Some(a.classify(CauseCategory::ModuleAttributeGeneric).text("module", module))
}

/// `a = "abc",` made a one-element tuple whose element has the attribute.
fn tuple_by_accident(a: &AttrCtx<'_>) -> Option<Classification> {
    let obj = a.subject.obj?;
    if obj.type_name() != "tuple" || obj.len() != Some(1) {
        return None;
    }
    let item = obj.items()?.into_iter().next()?;
    a.ctx
        .probe
        .surely_has(item, a.attr())
        .then(|| {
            a.classify(CauseCategory::TupleByAccident)
                .value("value", a.subject.display_name(), obj.repr())
        })
}

/// Methods people expect that are builtin functions instead.
const BUILTIN_INSTEAD: &[(&str, &str)] = &[
    ("length", "len"),
    ("len", "len"),
    ("size", "len"),
    ("min", "min"),
    ("max", "max"),
    ("sum", "sum"),
    ("sorted", "sorted"),
    ("reversed", "reversed"),
];

fn use_builtin_function(a: &AttrCtx<'_>) -> Option<Classification> {
    if a.subject.module_name().is_some() {
        return None;
    }
    let (_, function) = BUILTIN_INSTEAD.iter().find(|(method, _)| *method == a.attr())?;
    let expr = a.subject.expr.as_deref()?;
    Some(
        a.classify(CauseCategory::UseBuiltinFunction)
            .text("function", *function)
            .text("call", format!("{function}({expr})")),
    )
}

/// Method names from other languages and their nearest equivalents.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("add", &["append", "extend", "update", "insert"]),
    ("push", &["append", "extend"]),
    ("push_back", &["append"]),
    ("append", &["add", "update", "extend"]),
    ("remove", &["discard", "pop"]),
    ("delete", &["remove", "pop", "discard"]),
    ("lowercase", &["lower", "casefold"]),
    ("tolower", &["lower", "casefold"]),
    ("to_lower", &["lower", "casefold"]),
    ("uppercase", &["upper"]),
    ("toupper", &["upper"]),
    ("to_upper", &["upper"]),
    ("trim", &["strip"]),
    ("ltrim", &["lstrip"]),
    ("rtrim", &["rstrip"]),
    ("contains", &["count", "find", "index"]),
    ("length", &["count"]),
];

fn use_synonym(a: &AttrCtx<'_>) -> Option<Classification> {
    let obj = a.subject.obj?;
    let (_, candidates) = SYNONYMS.iter().find(|(name, _)| *name == a.attr())?;
    let found: Vec<&str> = candidates
        .iter()
        .copied()
        .filter(|candidate| a.ctx.probe.surely_has(obj, candidate))
        .collect();
    if found.is_empty() {
        return None;
    }
    Some(a.classify(CauseCategory::UseSynonym).list("suggestions", found))
}

fn use_join_with_str(a: &AttrCtx<'_>) -> Option<Classification> {
    if a.attr() != "join" || !matches!(a.subject.type_name(), "list" | "tuple") {
        return None;
    }
    let expr = a.subject.expr.as_deref()?;
    let separator = a
        .ctx
        .line_text()
        .and_then(|line| call_argument(line, "join"))
        .unwrap_or_else(|| "''".to_owned());
    Some(
        a.classify(CauseCategory::UseJoinWithStr)
            .text("call", format!("{separator}.join({expr})")),
    )
}

/// `len.text` written for `len(text)`.
fn builtin_function_attribute(a: &AttrCtx<'_>) -> Option<Classification> {
    let is_builtin = a.subject.type_name() == "builtin_function_or_method"
        || a.subject.obj.is_some_and(|obj| obj.kind() == ObjectKind::BuiltinFunction);
    if !is_builtin {
        return None;
    }
    let function = a
        .subject
        .obj
        .and_then(|obj| obj.name())
        .or(a.subject.expr.as_deref())
        .filter(|name| is_identifier(name))?;
    Some(
        a.classify(CauseCategory::BuiltinFunctionAttribute)
            .text("function", function)
            .text("call", format!("{function}({})", a.attr())),
    )
}

/// Two names on separate lines of a collection, missing the comma:
/// `[abcd\n .defg]` parses as `abcd.defg`.
fn perhaps_comma(a: &AttrCtx<'_>) -> Option<Classification> {
    let frame = a.ctx.frame()?;
    let line = a.ctx.line_text()?;
    let expr = a.subject.expr.as_deref().filter(|expr| is_identifier(expr))?;
    let written_apart = line.trim_start().starts_with('.')
        || line
            .find(expr)
            .is_some_and(|at| line[at + expr.len()..].starts_with(char::is_whitespace));
    let attr_is_bound = scope::lookup(frame, a.attr()).is_some();
    (written_apart && attr_is_bound).then(|| a.classify(CauseCategory::PerhapsComma))
}

/// The object's class and the class bound under the same name in scope are
/// different objects.
fn class_name_confusion(a: &AttrCtx<'_>) -> Option<Classification> {
    let Receiver::Instance { type_name } = &a.subject.receiver else {
        return None;
    };
    let obj = a.subject.obj?;
    let own_class = obj.class_object()?.identity()?;
    let frame = a.ctx.frame()?;
    let visible = scope::lookup(frame, type_name)?;
    if visible.kind() != ObjectKind::Class || visible.identity()? == own_class {
        return None;
    }
    // the object's own members still hint at what was meant
    Some(
        a.classify(CauseCategory::ClassNameConfusion)
            .text("class", type_name.as_str())
            .list("suggestions", close_members(a, obj)),
    )
}

/// Members of `obj` spelled like the missing attribute.
fn close_members(a: &AttrCtx<'_>, obj: &dyn Reflect) -> Vec<String> {
    let members = a.ctx.probe.members(obj);
    best_matches(
        a.attr(),
        members.iter().map(String::as_str),
        a.ctx.max_suggestions(),
        a.ctx.config.attribute_threshold(),
    )
}

fn attribute_typo(a: &AttrCtx<'_>) -> Option<Classification> {
    let matches = close_members(a, a.subject.obj?);
    if matches.is_empty() {
        return None;
    }
    Some(a.classify(CauseCategory::AttributeTypo).list("suggestions", matches))
}

fn attribute_generic(a: &AttrCtx<'_>) -> Option<Classification> {
    let is_class = matches!(a.subject.receiver, Receiver::Class { .. })
        || a.subject.obj.is_some_and(|obj| obj.kind() == ObjectKind::Class);
    let category = if is_class {
        CauseCategory::AttributeGenericClass
    } else {
        CauseCategory::AttributeGenericInstance
    };
    Some(a.classify(category))
}
