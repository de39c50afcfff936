//! Reconstruction of what a fault is about when the runtime did not attach
//! structured detail: parsing the message, finding the source expression on
//! the offending line and resolving it through the frame.

use std::sync::LazyLock;

use regex::Regex;

use super::Ctx;
use crate::{
    reflect::{ObjectKind, Reflect},
    scope,
};

static OBJECT_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^'(?P<ty>[^']+)' object has no attribute '(?P<attr>[^']+)'").expect("static pattern")
});
static TYPE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^type object '(?P<ty>[^']+)' has no attribute '(?P<attr>[^']+)'").expect("static pattern")
});
static MODULE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<partial>partially initialized )?module '(?P<module>[^']+)' has no attribute '(?P<attr>[^']+)'")
        .expect("static pattern")
});
static READ_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^'(?P<ty>[^']+)' object attribute '(?P<attr>[^']+)' is read-only").expect("static pattern")
});

/// What the message says the attribute was looked up on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Receiver {
    /// `'T' object has no attribute ...`
    Instance { type_name: String },
    /// `type object 'T' has no attribute ...`
    Class { name: String },
    /// `module 'm' has no attribute ...`
    Module { name: String, partially_initialized: bool },
}

#[derive(Debug)]
pub(crate) struct AttributeSubject<'c> {
    pub attr: String,
    pub receiver: Receiver,
    /// The message reported a failed assignment to a read-only attribute.
    pub read_only: bool,
    pub obj: Option<&'c dyn Reflect>,
    /// Source expression that produced `obj`.
    pub expr: Option<String>,
}

impl<'c> AttributeSubject<'c> {
    pub fn parse(ctx: &Ctx<'c>) -> Option<Self> {
        let message = ctx.message();
        let (receiver, attr, read_only) = if let Some(caps) = MODULE_ATTR.captures(message) {
            let receiver = Receiver::Module {
                name: caps["module"].to_owned(),
                partially_initialized: caps.name("partial").is_some(),
            };
            (receiver, caps["attr"].to_owned(), false)
        } else if let Some(caps) = TYPE_ATTR.captures(message) {
            let receiver = Receiver::Class {
                name: caps["ty"].to_owned(),
            };
            (receiver, caps["attr"].to_owned(), false)
        } else if let Some(caps) = READ_ONLY.captures(message) {
            let receiver = Receiver::Instance {
                type_name: caps["ty"].to_owned(),
            };
            (receiver, caps["attr"].to_owned(), true)
        } else if let Some(caps) = OBJECT_ATTR.captures(message) {
            let receiver = Receiver::Instance {
                type_name: caps["ty"].to_owned(),
            };
            (receiver, caps["attr"].to_owned(), false)
        } else {
            return None;
        };

        let detail = &ctx.fault.detail;
        let attr = detail.name.map_or(attr, str::to_owned);
        let expr = detail
            .obj_expr
            .map(str::to_owned)
            .or_else(|| ctx.line_text().and_then(|line| expression_before_attr(line, &attr)));

        let obj = detail.obj.or_else(|| {
            let frame = ctx.frame()?;
            if let Some(expr) = &expr
                && let Some(found) = resolve_dotted(ctx, expr)
            {
                return Some(found);
            }
            // `import m` binds m; find it even when the line used an alias.
            if let Receiver::Module { name, .. } = &receiver {
                return scope::bindings(frame)
                    .map(|(_, value)| value)
                    .find(|value| value.kind() == ObjectKind::Module && value.name() == Some(name.as_str()));
            }
            None
        });

        Some(Self {
            attr,
            receiver,
            read_only,
            obj,
            expr,
        })
    }

    /// How the object is named in explanations: its source expression when
    /// known, otherwise its type.
    pub fn display_name(&self) -> String {
        if let Some(expr) = &self.expr {
            return expr.clone();
        }
        match &self.receiver {
            Receiver::Instance { type_name } => type_name.clone(),
            Receiver::Class { name } | Receiver::Module { name, .. } => name.clone(),
        }
    }

    pub fn type_name(&self) -> &str {
        match &self.receiver {
            Receiver::Instance { type_name } => type_name,
            Receiver::Class { .. } => "type",
            Receiver::Module { .. } => "module",
        }
    }

    pub fn module_name(&self) -> Option<&str> {
        match &self.receiver {
            Receiver::Module { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Resolves `a.b.c` through the frame's scope chain and member lookups.
pub(crate) fn resolve_dotted<'c>(ctx: &Ctx<'c>, expr: &str) -> Option<&'c dyn Reflect> {
    if !is_dotted_name(expr) {
        return None;
    }
    let frame = ctx.frame()?;
    let mut parts = expr.split('.');
    let mut current = scope::lookup(frame, parts.next()?)?;
    for part in parts {
        current = ctx.probe.member(current, part)?;
    }
    Some(current)
}

pub(crate) fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(|c| c == '_' || c.is_alphabetic()) && chars.all(|c| c == '_' || c.is_alphanumeric())
}

pub(crate) fn is_dotted_name(text: &str) -> bool {
    !text.is_empty() && text.split('.').all(is_identifier)
}

/// The expression immediately before `.attr` on `line`, e.g. `a` for
/// `x = a.appendh(4)` or `['a', '2']` for `['a', '2'].join('abc')`.
pub(crate) fn expression_before_attr(line: &str, attr: &str) -> Option<String> {
    let chars: Vec<char> = line.chars().collect();
    let attr_chars: Vec<char> = attr.chars().collect();
    let mut search_from = 0;
    while let Some(dot) = find_attr_access(&chars, &attr_chars, search_from) {
        if let Some(expr) = scan_back(&chars, dot) {
            return Some(expr);
        }
        search_from = dot + 1;
    }
    None
}

/// Index of the `.` in the first `.attr` access at or after `from`.
fn find_attr_access(chars: &[char], attr: &[char], from: usize) -> Option<usize> {
    let is_ident = |c: char| c == '_' || c.is_alphanumeric();
    (from..chars.len()).find(|&i| {
        if chars[i] != '.' {
            return false;
        }
        let mut start = i + 1;
        while start < chars.len() && chars[start] == ' ' {
            start += 1;
        }
        let end = start + attr.len();
        end <= chars.len() && chars[start..end] == *attr && chars.get(end).is_none_or(|&c| !is_ident(c))
    })
}

/// Walks backwards from the dot at `dot` over one primary expression:
/// names, attribute chains, calls, subscripts, literals in brackets and
/// string literals.
fn scan_back(chars: &[char], dot: usize) -> Option<String> {
    let is_ident = |c: char| c == '_' || c.is_alphanumeric();
    let mut end = dot;
    while end > 0 && chars[end - 1] == ' ' {
        end -= 1;
    }
    let mut start = end;
    loop {
        let Some(&last) = start.checked_sub(1).and_then(|i| chars.get(i)) else {
            break;
        };
        if is_ident(last) || last == '.' {
            start -= 1;
        } else if matches!(last, ')' | ']' | '}') {
            start = matching_open(chars, start - 1)?;
        } else if matches!(last, '\'' | '"') {
            let open = chars[..start - 1].iter().rposition(|&c| c == last)?;
            start = open;
        } else {
            break;
        }
    }
    let expr: String = chars[start..end].iter().collect();
    let expr = expr.trim();
    (!expr.is_empty() && !expr.starts_with('.')).then(|| expr.to_owned())
}

/// Index of the bracket opening the one closed at `close`.
fn matching_open(chars: &[char], close: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for i in (0..=close).rev() {
        let c = chars[i];
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            ')' | ']' | '}' => depth += 1,
            '(' | '[' | '{' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Text inside the parentheses of the first `.attr(...)` call on `line`.
pub(crate) fn call_argument(line: &str, attr: &str) -> Option<String> {
    let needle = format!(".{attr}(");
    let open = line.find(&needle)? + needle.len();
    let rest = &line[open..];
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    for (i, c) in rest.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth -= 1;
                if depth == 0 {
                    let arg = rest[..i].trim();
                    return (!arg.is_empty()).then(|| arg.to_owned());
                }
            }
            _ => {}
        }
    }
    None
}

/// One `name[...]` on a source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Subscript<'l> {
    pub name: &'l str,
    /// Byte offset of `name` in the line.
    pub start: usize,
    /// The index when it is written as an integer literal.
    pub index: Option<i64>,
}

/// Every subscripted name on `line`, left to right, e.g. `a` and `b` in
/// `x = a[0] + b[5]`.
pub(crate) fn subscripts(line: &str) -> Vec<Subscript<'_>> {
    static SUBSCRIPT: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?P<name>[A-Za-z_][\w.]*)\s*\[(?:\s*(?P<index>-?\d+)\s*\])?").expect("static pattern")
    });
    SUBSCRIPT
        .captures_iter(line)
        .filter_map(|caps| {
            let name = caps.name("name")?;
            Some(Subscript {
                name: name.as_str(),
                start: name.start(),
                index: caps.name("index").and_then(|m| m.as_str().parse().ok()),
            })
        })
        .collect()
}

/// Subscript closest to `column`: the last one starting at or before it,
/// else the first after it.
pub(crate) fn subscript_at<'l>(found: &[Subscript<'l>], column: usize) -> Option<Subscript<'l>> {
    found
        .iter()
        .rev()
        .find(|subscript| subscript.start <= column)
        .or_else(|| found.first())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_is_found_before_attribute() {
        assert_eq!(expression_before_attr("a.appendh(4)", "appendh").as_deref(), Some("a"));
        assert_eq!(
            expression_before_attr("x = self.items.lenght", "lenght").as_deref(),
            Some("self.items")
        );
        assert_eq!(
            expression_before_attr("a = ['a', '2'].join('abc') + ['b', '3'].join('\\n')", "join").as_deref(),
            Some("['a', '2']")
        );
        assert_eq!(expression_before_attr("f(x).y", "y").as_deref(), Some("f(x)"));
        assert_eq!(expression_before_attr("nothing here", "y"), None);
    }

    #[test]
    fn attribute_must_match_whole_name() {
        assert_eq!(expression_before_attr("a.bc + d.b", "b").as_deref(), Some("d"));
    }

    #[test]
    fn call_argument_is_extracted() {
        assert_eq!(call_argument("['a', '2'].join('abc')", "join").as_deref(), Some("'abc'"));
        assert_eq!(call_argument("x.join()", "join"), None);
    }

    #[test]
    fn subscripts_are_listed_in_order() {
        let found = subscripts("x = a[0] + self.b[ 5 ] + c[i]");
        let names: Vec<_> = found.iter().map(|subscript| subscript.name).collect();
        assert_eq!(names, ["a", "self.b", "c"]);
        assert_eq!(found[0].index, Some(0));
        assert_eq!(found[1].index, Some(5));
        assert_eq!(found[2].index, None);
        assert!(subscripts("x = 1").is_empty());
    }

    #[test]
    fn subscript_nearest_the_column_wins() {
        let line = "x = a[0] + b[5]";
        let found = subscripts(line);
        assert_eq!(subscript_at(&found, 11).map(|s| s.name), Some("b"));
        assert_eq!(subscript_at(&found, 13).map(|s| s.name), Some("b"));
        assert_eq!(subscript_at(&found, 4).map(|s| s.name), Some("a"));
        assert_eq!(subscript_at(&found, 0).map(|s| s.name), Some("a"));
    }
}
