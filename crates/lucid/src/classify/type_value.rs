//! Rules for type, value, arithmetic, lookup and runtime faults.
//!
//! These families are mostly message-driven: the runtime's wording already
//! names the operation and the types involved, and the rule only has to
//! recognise it and lift out the parameters.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{
    Ctx, Rule, first_match,
    subject::{self, Subscript},
};
use crate::{
    category::{CauseCategory, Classification},
    fault::FaultKind,
    reflect::Reflect,
    similarity::best_matches,
    tracer::InferenceTracer,
};

type Check = fn(&Ctx<'_>) -> Option<Classification>;

const fn rule(name: &'static str, check: Check) -> Rule<Check> {
    Rule::new(name, check)
}

macro_rules! pattern {
    ($name:ident, $re:literal) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($re).expect("static pattern"));
    };
}

pattern!(OPERAND, r"^unsupported operand type\(s\) for (?P<op>.+?): '(?P<left>[^']+)' and '(?P<right>[^']+)'");
pattern!(CONCAT, r#"^can only concatenate (?P<left>\w+) \(not "(?P<right>[^"]+)"\) to \w+"#);
pattern!(MUST_BE_STR, r"^must be str, not (?P<right>\w+)");
pattern!(UNARY, r"^bad operand type for unary (?P<op>.+?): '(?P<operand>[^']+)'");
pattern!(
    COMPARISON,
    r"^'(?P<op>[<>=!]+)' not supported between instances of '(?P<left>[^']+)' and '(?P<right>[^']+)'"
);
pattern!(NOT_CALLABLE, r"^'(?P<type>[^']+)' object is not callable");
pattern!(NOT_SUBSCRIPTABLE, r"^'(?P<type>[^']+)' object is not subscriptable");
pattern!(
    NOT_ITERABLE,
    r"^(?:'(?P<type>[^']+)' object is not iterable|cannot unpack non-iterable (?P<unpacked>\S+) object)"
);
pattern!(UNHASHABLE, r"^unhashable type: '(?P<type>[^']+)'");
pattern!(ITEM_ASSIGNMENT, r"^'(?P<type>[^']+)' object does not support item assignment");
pattern!(
    ARG_COUNT,
    r"^(?P<function>[\w.<>]+)\(\) takes (?P<expected>.+?) positional arguments? but (?P<given>\d+) (?:was|were) given"
);
pattern!(
    MISSING_ARG,
    r"^(?P<function>[\w.<>]+)\(\) missing (?P<count>\d+) required (?:positional |keyword-only )?arguments?: (?P<names>.+)$"
);
pattern!(
    UNEXPECTED_KEYWORD,
    r"^(?P<function>[\w.<>]+)\(\) got an unexpected keyword argument '(?P<keyword>[^']+)'"
);
pattern!(TOO_MANY_VALUES, r"^too many values to unpack \(expected (?P<expected>\d+)(?:, got (?P<given>\d+))?\)");
pattern!(NOT_ENOUGH_VALUES, r"^not enough values to unpack \(expected (?P<expected>\d+), got (?P<given>\d+)\)");
pattern!(INVALID_INT, r"^invalid literal for int\(\) with base (?P<base>\d+): (?P<value>.+)$");
pattern!(INVALID_FLOAT, r"^could not convert string to float: (?P<value>.+)$");
pattern!(INDEX_RANGE, r"^(?P<type>\w+) (?:assignment )?index out of range");

const TYPE_RULES: &[Rule<Check>] = &[
    rule("str-concatenation", str_concatenation),
    rule("operand-type-mismatch", operand_type_mismatch),
    rule("unary-operand-type", unary_operand_type),
    rule("comparison-type-mismatch", comparison_type_mismatch),
    rule("not-callable", not_callable),
    rule("not-subscriptable", not_subscriptable),
    rule("not-iterable", not_iterable),
    rule("unhashable", unhashable),
    rule("immutable-item-assignment", immutable_item_assignment),
    rule("wrong-argument-count", wrong_argument_count),
    rule("missing-argument", missing_argument),
    rule("unexpected-keyword", unexpected_keyword),
];

const VALUE_RULES: &[Rule<Check>] = &[
    rule("too-many-values-to-unpack", too_many_values),
    rule("not-enough-values-to-unpack", not_enough_values),
    rule("invalid-int-literal", invalid_int_literal),
    rule("invalid-float-literal", invalid_float_literal),
    rule("math-domain", math_domain),
];

const ARITHMETIC_RULES: &[Rule<Check>] = &[
    rule("modulo-by-zero", modulo_by_zero),
    rule("division-by-zero", division_by_zero),
];

const LOOKUP_RULES: &[Rule<Check>] = &[
    rule("index-out-of-range", index_out_of_range),
    rule("missing-key-typo", missing_key_typo),
    rule("missing-key", missing_key),
];

const RUNTIME_RULES: &[Rule<Check>] = &[rule("recursion-depth", recursion_depth)];

pub(super) fn classify_type(ctx: &Ctx<'_>, tracer: &mut dyn InferenceTracer) -> Option<Classification> {
    first_match("type", TYPE_RULES, ctx, ctx.version, tracer)
}

pub(super) fn classify_value(ctx: &Ctx<'_>, tracer: &mut dyn InferenceTracer) -> Option<Classification> {
    first_match("value", VALUE_RULES, ctx, ctx.version, tracer)
}

pub(super) fn classify_arithmetic(ctx: &Ctx<'_>, tracer: &mut dyn InferenceTracer) -> Option<Classification> {
    first_match("arithmetic", ARITHMETIC_RULES, ctx, ctx.version, tracer)
}

pub(super) fn classify_lookup(ctx: &Ctx<'_>, tracer: &mut dyn InferenceTracer) -> Option<Classification> {
    first_match("lookup", LOOKUP_RULES, ctx, ctx.version, tracer)
}

pub(super) fn classify_runtime(ctx: &Ctx<'_>, tracer: &mut dyn InferenceTracer) -> Option<Classification> {
    first_match("runtime", RUNTIME_RULES, ctx, ctx.version, tracer)
}

/// Copies the named groups of `caps` into text parameters.
fn with_groups(category: CauseCategory, caps: &Captures<'_>, groups: &[&str]) -> Classification {
    groups.iter().fold(Classification::new(category), |found, group| match caps.name(group) {
        Some(m) => found.text(group, m.as_str()),
        None => found,
    })
}

fn str_concatenation(ctx: &Ctx<'_>) -> Option<Classification> {
    let message = ctx.message();
    if let Some(caps) = CONCAT.captures(message) {
        return Some(with_groups(CauseCategory::StrConcatenation, &caps, &["left", "right"]));
    }
    if let Some(caps) = MUST_BE_STR.captures(message) {
        return Some(with_groups(CauseCategory::StrConcatenation, &caps, &["right"]).text("left", "str"));
    }
    let caps = OPERAND.captures(message)?;
    let involves_str = &caps["left"] == "str" || &caps["right"] == "str";
    (&caps["op"] == "+" && involves_str)
        .then(|| with_groups(CauseCategory::StrConcatenation, &caps, &["left", "right"]))
}

fn operand_type_mismatch(ctx: &Ctx<'_>) -> Option<Classification> {
    let caps = OPERAND.captures(ctx.message())?;
    Some(with_groups(CauseCategory::OperandTypeMismatch, &caps, &["op", "left", "right"]))
}

fn unary_operand_type(ctx: &Ctx<'_>) -> Option<Classification> {
    let caps = UNARY.captures(ctx.message())?;
    Some(with_groups(CauseCategory::UnaryOperandType, &caps, &["op", "operand"]))
}

fn comparison_type_mismatch(ctx: &Ctx<'_>) -> Option<Classification> {
    let caps = COMPARISON.captures(ctx.message())?;
    Some(with_groups(CauseCategory::ComparisonTypeMismatch, &caps, &["op", "left", "right"]))
}

fn not_callable(ctx: &Ctx<'_>) -> Option<Classification> {
    let caps = NOT_CALLABLE.captures(ctx.message())?;
    Some(with_groups(CauseCategory::NotCallable, &caps, &["type"]))
}

fn not_subscriptable(ctx: &Ctx<'_>) -> Option<Classification> {
    let caps = NOT_SUBSCRIPTABLE.captures(ctx.message())?;
    Some(with_groups(CauseCategory::NotSubscriptable, &caps, &["type"]))
}

fn not_iterable(ctx: &Ctx<'_>) -> Option<Classification> {
    let caps = NOT_ITERABLE.captures(ctx.message())?;
    let type_name = caps.name("type").or_else(|| caps.name("unpacked"))?.as_str();
    Some(Classification::new(CauseCategory::NotIterable).text("type", type_name))
}

fn unhashable(ctx: &Ctx<'_>) -> Option<Classification> {
    let caps = UNHASHABLE.captures(ctx.message())?;
    Some(with_groups(CauseCategory::Unhashable, &caps, &["type"]))
}

fn immutable_item_assignment(ctx: &Ctx<'_>) -> Option<Classification> {
    let caps = ITEM_ASSIGNMENT.captures(ctx.message())?;
    Some(with_groups(CauseCategory::ImmutableItemAssignment, &caps, &["type"]))
}

fn wrong_argument_count(ctx: &Ctx<'_>) -> Option<Classification> {
    let caps = ARG_COUNT.captures(ctx.message())?;
    Some(with_groups(
        CauseCategory::WrongArgumentCount,
        &caps,
        &["function", "expected", "given"],
    ))
}

fn missing_argument(ctx: &Ctx<'_>) -> Option<Classification> {
    let caps = MISSING_ARG.captures(ctx.message())?;
    Some(with_groups(CauseCategory::MissingArgument, &caps, &["function", "count", "names"]))
}

fn unexpected_keyword(ctx: &Ctx<'_>) -> Option<Classification> {
    let caps = UNEXPECTED_KEYWORD.captures(ctx.message())?;
    Some(with_groups(CauseCategory::UnexpectedKeyword, &caps, &["function", "keyword"]))
}

fn too_many_values(ctx: &Ctx<'_>) -> Option<Classification> {
    let caps = TOO_MANY_VALUES.captures(ctx.message())?;
    Some(with_groups(CauseCategory::TooManyValuesToUnpack, &caps, &["expected", "given"]))
}

fn not_enough_values(ctx: &Ctx<'_>) -> Option<Classification> {
    let caps = NOT_ENOUGH_VALUES.captures(ctx.message())?;
    Some(with_groups(CauseCategory::NotEnoughValuesToUnpack, &caps, &["expected", "given"]))
}

fn invalid_int_literal(ctx: &Ctx<'_>) -> Option<Classification> {
    let caps = INVALID_INT.captures(ctx.message())?;
    Some(with_groups(CauseCategory::InvalidIntLiteral, &caps, &["base", "value"]))
}

fn invalid_float_literal(ctx: &Ctx<'_>) -> Option<Classification> {
    let caps = INVALID_FLOAT.captures(ctx.message())?;
    Some(with_groups(CauseCategory::InvalidFloatLiteral, &caps, &["value"]))
}

fn math_domain(ctx: &Ctx<'_>) -> Option<Classification> {
    ctx.message()
        .starts_with("math domain error")
        .then(|| Classification::new(CauseCategory::MathDomain))
}

fn is_zero_division(message: &str) -> bool {
    message.contains("by zero")
}

fn modulo_by_zero(ctx: &Ctx<'_>) -> Option<Classification> {
    let message = ctx.message();
    if !is_zero_division(message) {
        return None;
    }
    let modulo = if message.contains("division or modulo") {
        ctx.line_text().is_some_and(|line| line.contains('%'))
    } else {
        message.contains("modulo by zero")
    };
    modulo.then(|| Classification::new(CauseCategory::ModuloByZero))
}

fn division_by_zero(ctx: &Ctx<'_>) -> Option<Classification> {
    is_zero_division(ctx.message()).then(|| Classification::new(CauseCategory::DivisionByZero))
}

/// The subscripted expression a lookup fault is about, and the object it
/// names when that resolves.
///
/// Structured detail wins. Otherwise the subscript nearest the frame's
/// column is taken; without a column, the first one `fails` picks out,
/// else the first on the line.
fn subscript_target<'c>(
    ctx: &Ctx<'c>,
    fails: impl Fn(&Subscript<'c>, &dyn Reflect) -> bool,
) -> Option<(&'c str, Option<&'c dyn Reflect>)> {
    let detail = &ctx.fault.detail;
    if let Some(expr) = detail.obj_expr {
        return Some((expr, detail.obj.or_else(|| subject::resolve_dotted(ctx, expr))));
    }
    let found = subject::subscripts(ctx.line_text()?);
    let resolve = |subscript: &Subscript<'c>| detail.obj.or_else(|| subject::resolve_dotted(ctx, subscript.name));
    let chosen = match ctx.frame().and_then(|frame| frame.column) {
        Some(column) => subject::subscript_at(&found, column)?,
        None => found
            .iter()
            .copied()
            .find(|subscript| resolve(subscript).is_some_and(|obj| fails(subscript, obj)))
            .or_else(|| found.first().copied())?,
    };
    Some((chosen.name, resolve(&chosen)))
}

/// Index out of range; the sequence length is added when the subscripted
/// name can be resolved.
fn index_out_of_range(ctx: &Ctx<'_>) -> Option<Classification> {
    let caps = INDEX_RANGE.captures(ctx.message())?;
    let found = with_groups(CauseCategory::IndexOutOfRange, &caps, &["type"]);
    let out_of_range = |subscript: &Subscript<'_>, obj: &dyn Reflect| match (subscript.index, obj.len()) {
        (Some(index), Some(len)) => i64::try_from(len).is_ok_and(|len| index >= len || index < -len),
        _ => false,
    };
    let Some((sequence, obj)) = subscript_target(ctx, out_of_range) else {
        return Some(found);
    };
    let found = found.text("sequence", sequence);
    Some(match obj.and_then(|obj| obj.len()) {
        Some(len) => found
            .text("length", len.to_string())
            .text("max_index", len.saturating_sub(1).to_string()),
        None => found,
    })
}

/// The key as written in the message, without its quotes when it is a
/// string key.
fn missing_key_text(message: &str) -> (&str, bool) {
    let trimmed = message.trim();
    for quote in ['\'', '"'] {
        if let Some(inner) = trimmed.strip_prefix(quote).and_then(|rest| rest.strip_suffix(quote)) {
            return (inner, true);
        }
    }
    (trimmed, false)
}

fn missing_key_typo(ctx: &Ctx<'_>) -> Option<Classification> {
    let (key, is_str) = missing_key_text(ctx.message());
    if !is_str {
        return None;
    }
    let lacks_key =
        |_: &Subscript<'_>, obj: &dyn Reflect| obj.keys().is_some_and(|keys| !keys.iter().any(|k| k == key));
    let target = subscript_target(ctx, lacks_key);
    let obj = target.and_then(|(_, obj)| obj).or(ctx.fault.detail.obj)?;
    let keys = obj.keys()?;
    let matches = best_matches(
        key,
        keys.iter().map(String::as_str),
        ctx.max_suggestions(),
        ctx.config.name_threshold(),
    );
    if matches.is_empty() {
        return None;
    }
    let mapping = target.map_or("the dict", |(name, _)| name);
    Some(
        Classification::new(CauseCategory::MissingKeyTypo)
            .text("key", key)
            .text("mapping", mapping)
            .list("suggestions", matches),
    )
}

fn missing_key(ctx: &Ctx<'_>) -> Option<Classification> {
    if ctx.fault.kind != FaultKind::KeyError {
        return None;
    }
    let (key, _) = missing_key_text(ctx.message());
    Some(Classification::new(CauseCategory::MissingKey).text("key", key))
}

fn recursion_depth(ctx: &Ctx<'_>) -> Option<Classification> {
    ctx.message()
        .starts_with("maximum recursion depth exceeded")
        .then(|| Classification::new(CauseCategory::RecursionDepth))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_strips_quotes() {
        assert_eq!(missing_key_text("'colour'"), ("colour", true));
        assert_eq!(missing_key_text("3"), ("3", false));
    }

    #[test]
    fn argument_count_pattern() {
        let caps = ARG_COUNT
            .captures("f() takes 1 positional argument but 2 were given")
            .expect("matches");
        assert_eq!(&caps["expected"], "1");
        assert_eq!(&caps["given"], "2");
    }
}
