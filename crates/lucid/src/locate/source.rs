//! Best-effort access to the source text of a compile fault.

use std::{borrow::Cow, fs};

use crate::{config::ExplainConfig, fault::SourceLocation, tracer::InferenceTracer};

/// Returns the full source text around a compile fault.
///
/// Text the capture boundary already holds is borrowed. Otherwise the file is
/// read when the configuration allows it; pseudo-files such as `<stdin>` are
/// never read. Failure is reported to the tracer and is never fatal.
pub(crate) fn load<'a>(
    location: &'a SourceLocation,
    config: &ExplainConfig,
    tracer: &mut dyn InferenceTracer,
) -> Option<Cow<'a, str>> {
    if let Some(source) = location.source.as_deref() {
        return Some(Cow::Borrowed(source));
    }
    let path = location.file_path.as_str();
    if path.is_empty() || !config.read_source_files() {
        return None;
    }
    if path.starts_with('<') {
        tracer.on_source_unavailable(path);
        return None;
    }
    match fs::read_to_string(path) {
        Ok(text) => Some(Cow::Owned(text)),
        Err(_) => {
            tracer.on_source_unavailable(path);
            None
        }
    }
}

/// 1-based line `number` of `source`, without its line ending.
pub(crate) fn line_at(source: &str, number: usize) -> Option<&str> {
    source
        .lines()
        .nth(number.checked_sub(1)?)
        .map(|line| line.trim_end_matches('\r'))
}

/// The nearest non-blank line above line `number`.
pub(crate) fn previous_code_line(source: &str, number: usize) -> Option<&str> {
    let mut lines: Vec<&str> = source.lines().take(number.checked_sub(1)?).collect();
    while let Some(line) = lines.pop() {
        let code = line.split('#').next().unwrap_or_default().trim_end();
        if !code.trim().is_empty() {
            return Some(code);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracer::RecordingTracer;

    #[test]
    fn inline_source_is_borrowed() {
        let location = SourceLocation {
            file_path: "<stdin>".to_owned(),
            source: Some("x = (\n".to_owned()),
            ..SourceLocation::default()
        };
        let mut tracer = RecordingTracer::new();
        let source = load(&location, &ExplainConfig::new(), &mut tracer);
        assert!(matches!(source, Some(Cow::Borrowed("x = (\n"))));
        assert!(tracer.events().is_empty());
    }

    #[test]
    fn unreadable_file_is_traced() {
        let location = SourceLocation {
            file_path: "/definitely/not/here.py".to_owned(),
            ..SourceLocation::default()
        };
        let mut tracer = RecordingTracer::new();
        assert!(load(&location, &ExplainConfig::new(), &mut tracer).is_none());
        assert_eq!(tracer.events().len(), 1);
    }

    #[test]
    fn disabled_reads_are_silent() {
        let location = SourceLocation {
            file_path: "/definitely/not/here.py".to_owned(),
            ..SourceLocation::default()
        };
        let mut tracer = RecordingTracer::new();
        let config = ExplainConfig::new().with_source_files(false);
        assert!(load(&location, &config, &mut tracer).is_none());
        assert!(tracer.events().is_empty());
    }

    #[test]
    fn line_helpers() {
        let source = "a = 1\n\n# note\nb = (2 +\n    3)\n";
        assert_eq!(line_at(source, 4), Some("b = (2 +"));
        assert_eq!(line_at(source, 0), None);
        assert_eq!(previous_code_line(source, 4), Some("a = 1"));
        assert_eq!(previous_code_line(source, 5), Some("b = (2 +"));
    }
}
