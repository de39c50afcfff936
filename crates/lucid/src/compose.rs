//! Cause Composer: turns a classification into explanation text.

use std::fmt;

use crate::{
    category::{CauseCategory, Classification, ParamValue, Params},
    fault::FaultKind,
    redact::Redactor,
    templates::TemplateStore,
};

/// A composed explanation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Explanation {
    pub category: CauseCategory,
    /// What the fault kind means in general.
    pub generic: String,
    /// Why this particular fault most likely happened.
    pub cause: String,
    /// A short hint, when the category has one.
    pub suggestion: Option<String>,
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.generic)?;
        write!(f, "\n{}", self.cause)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n{suggestion}")?;
        }
        Ok(())
    }
}

/// Why composing an explanation failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ComposeError {
    NoTemplate(CauseCategory),
    MissingParam { category: CauseCategory, key: String },
    Malformed { category: CauseCategory, at: usize },
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTemplate(category) => write!(f, "no template for '{category}'"),
            Self::MissingParam { category, key } => write!(f, "template '{category}' needs missing parameter '{key}'"),
            Self::Malformed { category, at } => write!(f, "template '{category}' is malformed at byte {at}"),
        }
    }
}

impl std::error::Error for ComposeError {}

/// Text used when even the `unknown` template cannot be rendered.
const LAST_RESORT: &str = "Currently, I cannot guess the likely cause of this error.";

/// Borrowed collaborators of one composition.
pub(crate) struct Composer<'a> {
    pub templates: &'a dyn TemplateStore,
    pub redactor: &'a dyn Redactor,
    pub lang: &'a str,
}

impl Composer<'_> {
    pub fn compose(&self, found: &Classification, kind: &FaultKind) -> Result<Explanation, ComposeError> {
        let category = found.category;
        let mut params = found.params.clone();
        if !params.contains("suggestion")
            && let Some(ParamValue::List(names)) = params.get("suggestions")
            && let Some(first) = names.first()
        {
            let first = first.clone();
            params.set("suggestion", ParamValue::Text(first));
        }

        let template = self
            .templates
            .template_for(category, self.lang)
            .ok_or(ComposeError::NoTemplate(category))?;
        let cause = render(category, &template, &params, self.redactor)?;

        let suggestion = match params.get("suggestions") {
            Some(ParamValue::List(names)) if names.is_empty() => None,
            Some(ParamValue::List(names)) => self.templates.suggestion_for(category, names.len() > 1, self.lang),
            _ => self.templates.suggestion_for(category, false, self.lang),
        };
        let suggestion = suggestion
            .map(|text| render(category, &text, &params, self.redactor))
            .transpose()?;

        Ok(Explanation {
            category,
            generic: self.generic(kind),
            cause,
            suggestion,
        })
    }

    /// Explanation for `unknown`, which cannot fail.
    pub fn unknown(&self, kind: &FaultKind) -> Explanation {
        let cause = self
            .compose(&Classification::unknown(), kind)
            .map_or_else(|_| LAST_RESORT.to_owned(), |explanation| explanation.cause);
        Explanation {
            category: CauseCategory::Unknown,
            generic: self.generic(kind),
            cause,
            suggestion: None,
        }
    }

    /// Explanation built without consulting any collaborator.
    pub fn last_resort(kind: &FaultKind) -> Explanation {
        Explanation {
            category: CauseCategory::Unknown,
            generic: fallback_generic(kind),
            cause: LAST_RESORT.to_owned(),
            suggestion: None,
        }
    }

    fn generic(&self, kind: &FaultKind) -> String {
        let mut params = Params::new();
        params.set("kind", ParamValue::Text(kind.name().to_owned()));
        self.templates
            .generic_for(kind, self.lang)
            .and_then(|template| render(CauseCategory::Unknown, &template, &params, self.redactor).ok())
            .unwrap_or_else(|| fallback_generic(kind))
    }
}

fn fallback_generic(kind: &FaultKind) -> String {
    format!("An exception of type `{}` was raised.", kind.name())
}

/// Substitutes `params` into `template`.
///
/// See [`crate::templates`] for the template syntax.
pub(crate) fn render(
    category: CauseCategory,
    template: &str,
    params: &Params,
    redactor: &dyn Redactor,
) -> Result<String, ComposeError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while !rest.is_empty() {
        let offset = template.len() - rest.len();
        if let Some(after) = rest.strip_prefix("[[") {
            let end = after.find("]]").ok_or(ComposeError::Malformed { category, at: offset })?;
            match render(category, &after[..end], params, redactor) {
                Ok(section) => out.push_str(&section),
                Err(ComposeError::MissingParam { .. }) => {}
                Err(err) => return Err(err),
            }
            rest = &after[end + 2..];
        } else if let Some(after) = rest.strip_prefix("{{") {
            out.push('{');
            rest = after;
        } else if let Some(after) = rest.strip_prefix("}}") {
            out.push('}');
            rest = after;
        } else if let Some(after) = rest.strip_prefix('{') {
            let end = after.find('}').ok_or(ComposeError::Malformed { category, at: offset })?;
            let key = &after[..end];
            let value = params.get(key).ok_or_else(|| ComposeError::MissingParam {
                category,
                key: key.to_owned(),
            })?;
            push_value(&mut out, value, redactor);
            rest = &after[end + 1..];
        } else if rest.starts_with('}') {
            return Err(ComposeError::Malformed { category, at: offset });
        } else {
            let next = rest.find(['{', '}', '[']).unwrap_or(rest.len());
            // a lone `[` is ordinary text
            let next = if next == 0 { rest.chars().next().map_or(1, char::len_utf8) } else { next };
            out.push_str(&rest[..next]);
            rest = &rest[next..];
        }
    }
    Ok(out)
}

fn push_value(out: &mut String, value: &ParamValue, redactor: &dyn Redactor) {
    match value {
        ParamValue::Text(text) => out.push_str(text),
        ParamValue::Value { var, repr } => out.push_str(&redactor.redact(var, repr)),
        ParamValue::List(names) => {
            for (i, name) in names.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push('`');
                out.push_str(name);
                out.push('`');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        redact::{HIDDEN, NoRedaction, PatternRedactor},
        templates::BuiltinTemplates,
    };

    fn params(found: Classification) -> Params {
        found.params
    }

    #[test]
    fn substitutes_text_and_lists() {
        let p = params(
            Classification::new(CauseCategory::AttributeTypo)
                .text("obj", "a")
                .list("names", ["append", "extend"]),
        );
        let text = render(CauseCategory::AttributeTypo, "`{obj}`: {names}", &p, &NoRedaction).unwrap();
        assert_eq!(text, "`a`: `append`, `extend`");
    }

    #[test]
    fn missing_param_is_an_error() {
        let err = render(CauseCategory::NameGeneric, "no `{name}`", &Params::new(), &NoRedaction).unwrap_err();
        assert_eq!(
            err,
            ComposeError::MissingParam {
                category: CauseCategory::NameGeneric,
                key: "name".to_owned()
            }
        );
    }

    #[test]
    fn optional_sections_drop_when_incomplete() {
        let p = params(Classification::new(CauseCategory::IndexOutOfRange).text("type", "list"));
        let template = "bad {type} index.[[ It has {length} items.]] Done.";
        assert_eq!(
            render(CauseCategory::IndexOutOfRange, template, &p, &NoRedaction).unwrap(),
            "bad list index. Done."
        );
    }

    #[test]
    fn escaped_braces_and_lone_brackets() {
        let text = render(CauseCategory::Unknown, "f'{{x}}' and a[0]", &Params::new(), &NoRedaction).unwrap();
        assert_eq!(text, "f'{x}' and a[0]");
    }

    #[test]
    fn unclosed_placeholder_is_malformed() {
        let err = render(CauseCategory::Unknown, "oops {name", &Params::new(), &NoRedaction).unwrap_err();
        assert!(matches!(err, ComposeError::Malformed { at: 5, .. }));
    }

    #[test]
    fn values_go_through_the_redactor() {
        let p = params(Classification::new(CauseCategory::TupleByAccident).value("v", "password", "'hunter2'"));
        let text = render(CauseCategory::TupleByAccident, "value {v}", &p, &PatternRedactor::secrets()).unwrap();
        assert_eq!(text, format!("value {HIDDEN}"));
    }

    #[test]
    fn single_suggestion_uses_the_first_name() {
        let composer = Composer {
            templates: &BuiltinTemplates,
            redactor: &NoRedaction,
            lang: "en",
        };
        let found = Classification::new(CauseCategory::NameTypo)
            .text("name", "prnt")
            .text("origin", "builtin")
            .list("suggestions", ["print"]);
        let explanation = composer.compose(&found, &FaultKind::NameError).unwrap();
        assert_eq!(explanation.suggestion.as_deref(), Some("Did you mean `print`?"));
        assert!(explanation.cause.contains("`prnt`"));
    }

    #[test]
    fn several_suggestions_use_the_plural_wording() {
        let composer = Composer {
            templates: &BuiltinTemplates,
            redactor: &NoRedaction,
            lang: "en",
        };
        let found = Classification::new(CauseCategory::MissingKeyTypo)
            .text("key", "nme")
            .text("mapping", "d")
            .list("suggestions", ["name", "nm"]);
        let explanation = composer.compose(&found, &FaultKind::KeyError).unwrap();
        assert_eq!(
            explanation.suggestion.as_deref(),
            Some("Did you mean one of the following: `name`, `nm`?")
        );
    }

    #[test]
    fn other_kinds_name_themselves() {
        let composer = Composer {
            templates: &BuiltinTemplates,
            redactor: &NoRedaction,
            lang: "en",
        };
        let explanation = composer.unknown(&FaultKind::Other("OSError".to_owned()));
        assert_eq!(explanation.generic, "An exception of type `OSError` was raised.");
        assert_eq!(explanation.cause, LAST_RESORT);
    }
}
