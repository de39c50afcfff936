//! Rules for `ImportError` and `ModuleNotFoundError`.

use std::sync::LazyLock;

use regex::Regex;

use super::{Ctx, Rule, first_match};
use crate::{
    category::{CauseCategory, Classification},
    reflect::{ObjectKind, Reflect},
    scope,
    similarity::best_matches,
    tracer::InferenceTracer,
};

static CIRCULAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^cannot import name '(?P<name>[^']+)' from partially initialized module '(?P<module>[^']+)'")
        .expect("static pattern")
});
static CANNOT_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^cannot import name '(?P<name>[^']+)' from '(?P<module>[^']+)'(?: \((?P<file>[^)]*)\))?")
        .expect("static pattern")
});
static NO_MODULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^No module named '(?P<module>[^']+)'").expect("static pattern"));

/// What the import statement asked for.
struct ImportCtx<'c> {
    ctx: &'c Ctx<'c>,
    module: String,
    /// Name imported from `module`; `None` for `ModuleNotFoundError`.
    name: Option<String>,
    /// File `module` was loaded from, as reported in the message.
    file: Option<String>,
    circular: bool,
}

impl ImportCtx<'_> {
    fn classify(&self, category: CauseCategory) -> Classification {
        let found = Classification::new(category).text("module", self.module.as_str());
        match &self.name {
            Some(name) => found.text("name", name.as_str()),
            None => found,
        }
    }

    /// The module object, when the capture boundary supplied it or it is
    /// bound in scope.
    fn module_object(&self) -> Option<&dyn Reflect> {
        if let Some(obj) = self.ctx.fault.detail.obj
            && obj.kind() == ObjectKind::Module
        {
            return Some(obj);
        }
        let frame = self.ctx.frame()?;
        scope::bindings(frame)
            .map(|(_, value)| value)
            .find(|value| value.kind() == ObjectKind::Module && value.name() == Some(self.module.as_str()))
    }
}

type Check = fn(&ImportCtx<'_>) -> Option<Classification>;

const fn rule(name: &'static str, check: Check) -> Rule<Check> {
    Rule::new(name, check)
}

const RULES: &[Rule<Check>] = &[
    rule("circular-import-shadowing-stdlib", circular_import_shadowing_stdlib),
    rule("circular-import", circular_import),
    rule("shadowed-stdlib-module", shadowed_stdlib_module),
    rule("import-name-typo", import_name_typo),
    rule("import-name-generic", import_name_generic),
    rule("module-not-found-typo", module_not_found_typo),
    rule("module-not-found-generic", module_not_found_generic),
];

pub(super) fn classify(ctx: &Ctx<'_>, tracer: &mut dyn InferenceTracer) -> Option<Classification> {
    let message = ctx.message();
    let ictx = if let Some(caps) = CIRCULAR.captures(message) {
        ImportCtx {
            ctx,
            module: caps["module"].to_owned(),
            name: Some(caps["name"].to_owned()),
            file: None,
            circular: true,
        }
    } else if let Some(caps) = CANNOT_IMPORT.captures(message) {
        ImportCtx {
            ctx,
            module: caps["module"].to_owned(),
            name: Some(caps["name"].to_owned()),
            file: caps
                .name("file")
                .map(|m| m.as_str())
                .filter(|file| *file != "unknown location")
                .map(str::to_owned),
            circular: false,
        }
    } else if let Some(caps) = NO_MODULE.captures(message) {
        ImportCtx {
            ctx,
            module: caps["module"].to_owned(),
            name: None,
            file: None,
            circular: false,
        }
    } else {
        return None;
    };
    first_match("import", RULES, &ictx, ctx.version, tracer)
}

fn circular_import_shadowing_stdlib(i: &ImportCtx<'_>) -> Option<Classification> {
    (i.circular && i.ctx.config.is_stdlib_module(&i.module))
        .then(|| i.classify(CauseCategory::CircularImportShadowingStdlib))
}

fn circular_import(i: &ImportCtx<'_>) -> Option<Classification> {
    i.circular.then(|| i.classify(CauseCategory::CircularImport))
}

/// `from random import randint` picking up the user's own `random.py`.
fn shadowed_stdlib_module(i: &ImportCtx<'_>) -> Option<Classification> {
    i.name.as_ref()?;
    let file = i
        .file
        .as_deref()
        .or_else(|| i.module_object().and_then(|module| module.module_file()))?;
    (i.ctx.config.is_stdlib_module(&i.module) && !i.ctx.config.is_stdlib_path(file))
        .then(|| i.classify(CauseCategory::ShadowedStdlibModule).text("file", file))
}

fn import_name_typo(i: &ImportCtx<'_>) -> Option<Classification> {
    let name = i.name.as_deref()?;
    let module = i.module_object()?;
    let members = i.ctx.probe.members(module);
    let matches = best_matches(
        name,
        members.iter().map(String::as_str),
        i.ctx.max_suggestions(),
        i.ctx.config.name_threshold(),
    );
    if matches.is_empty() {
        return None;
    }
    Some(i.classify(CauseCategory::ImportNameTypo).list("suggestions", matches))
}

fn import_name_generic(i: &ImportCtx<'_>) -> Option<Classification> {
    i.name.as_ref().map(|_| i.classify(CauseCategory::ImportNameGeneric))
}

/// `import maths`: compare against standard-library names, the injected
/// extra names and modules already bound in scope.
fn module_not_found_typo(i: &ImportCtx<'_>) -> Option<Classification> {
    if i.name.is_some() {
        return None;
    }
    let mut candidates: Vec<&str> = i.ctx.config.stdlib_names().collect();
    if let Some(frame) = i.ctx.frame() {
        candidates.extend(
            scope::bindings(frame)
                .filter(|(_, value)| value.kind() == ObjectKind::Module)
                .map(|(bound, value)| value.name().unwrap_or(bound)),
        );
    }
    let matches = best_matches(
        &i.module,
        candidates,
        i.ctx.max_suggestions(),
        i.ctx.config.name_threshold(),
    );
    if matches.is_empty() {
        return None;
    }
    Some(i.classify(CauseCategory::ModuleNotFoundTypo).list("suggestions", matches))
}

fn module_not_found_generic(i: &ImportCtx<'_>) -> Option<Classification> {
    i.name.is_none().then(|| i.classify(CauseCategory::ModuleNotFoundGeneric))
}
