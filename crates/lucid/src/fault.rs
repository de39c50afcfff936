//! Captured fault records handed to the engine by the capture boundary.
//!
//! Everything here borrows: a [`CapturedFault`] holds references into a frame
//! snapshot owned by the caller, and the `'a` lifetime keeps the engine from
//! storing those references past the call that explains the fault.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use strum::EnumString;

use crate::reflect::Reflect;

/// Built-in exception kinds of the host runtime that the engine knows about.
///
/// Parsing never fails: class names the engine does not model land in
/// [`FaultKind::Other`] and are explained with the `unknown` category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FaultKind {
    AttributeError,
    NameError,
    /// Subclass of NameError - local accessed before assignment.
    UnboundLocalError,
    TypeError,
    ValueError,
    /// Subclass of ValueError for undecodable bytes.
    UnicodeDecodeError,
    ArithmeticError,
    ZeroDivisionError,
    OverflowError,
    LookupError,
    IndexError,
    KeyError,
    ImportError,
    /// Subclass of ImportError - the module itself could not be located.
    ModuleNotFoundError,
    RuntimeError,
    RecursionError,
    /// Base class of every compile-time fault.
    SyntaxError,
    /// Subclass of SyntaxError for block-structure mistakes.
    IndentationError,
    /// Subclass of IndentationError for mixed tabs and spaces.
    TabError,
    /// Any exception class the engine has no dedicated model for.
    #[strum(default)]
    Other(String),
}

impl FaultKind {
    /// Checks whether `self` would be caught by `except handler:`.
    ///
    /// Only the parts of the hierarchy the rule families care about are
    /// modelled; unrelated kinds only match themselves.
    #[must_use]
    pub fn is_subclass_of(&self, handler: &Self) -> bool {
        if self == handler {
            return true;
        }
        match handler {
            Self::NameError => matches!(self, Self::UnboundLocalError),
            Self::ValueError => matches!(self, Self::UnicodeDecodeError),
            Self::ArithmeticError => matches!(self, Self::ZeroDivisionError | Self::OverflowError),
            Self::LookupError => matches!(self, Self::IndexError | Self::KeyError),
            Self::ImportError => matches!(self, Self::ModuleNotFoundError),
            Self::RuntimeError => matches!(self, Self::RecursionError),
            Self::SyntaxError => matches!(self, Self::IndentationError | Self::TabError),
            Self::IndentationError => matches!(self, Self::TabError),
            _ => false,
        }
    }

    /// True for faults raised by the compiler front end rather than at run time.
    #[must_use]
    pub fn is_compile_fault(&self) -> bool {
        self.is_subclass_of(&Self::SyntaxError)
    }

    /// The runtime's class name for this kind.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::AttributeError => "AttributeError",
            Self::NameError => "NameError",
            Self::UnboundLocalError => "UnboundLocalError",
            Self::TypeError => "TypeError",
            Self::ValueError => "ValueError",
            Self::UnicodeDecodeError => "UnicodeDecodeError",
            Self::ArithmeticError => "ArithmeticError",
            Self::ZeroDivisionError => "ZeroDivisionError",
            Self::OverflowError => "OverflowError",
            Self::LookupError => "LookupError",
            Self::IndexError => "IndexError",
            Self::KeyError => "KeyError",
            Self::ImportError => "ImportError",
            Self::ModuleNotFoundError => "ModuleNotFoundError",
            Self::RuntimeError => "RuntimeError",
            Self::RecursionError => "RecursionError",
            Self::SyntaxError => "SyntaxError",
            Self::IndentationError => "IndentationError",
            Self::TabError => "TabError",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for FaultKind {
    fn from(name: String) -> Self {
        match Self::from_str(&name) {
            Ok(kind) => kind,
            Err(_) => Self::Other(name),
        }
    }
}

impl From<FaultKind> for String {
    fn from(kind: FaultKind) -> Self {
        kind.name().to_owned()
    }
}

/// Version marker of the host runtime.
///
/// Several compile-fault messages changed wording (or stopped existing)
/// between releases, so the Locator branches on this instead of assuming one
/// fixed message set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuntimeVersion {
    pub major: u8,
    pub minor: u8,
}

impl RuntimeVersion {
    #[must_use]
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl Default for RuntimeVersion {
    fn default() -> Self {
        Self::new(3, 12)
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for RuntimeVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('.');
        let major = parts.next().and_then(|p| p.parse().ok());
        let minor = parts.next().and_then(|p| p.parse().ok());
        match (major, minor) {
            (Some(major), Some(minor)) => Ok(Self::new(major, minor)),
            _ => Err(format!("invalid runtime version '{s}', expected MAJOR.MINOR")),
        }
    }
}

impl TryFrom<String> for RuntimeVersion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RuntimeVersion> for String {
    fn from(version: RuntimeVersion) -> Self {
        version.to_string()
    }
}

/// Half-open range of runtime versions: `min` inclusive, `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
    pub min: Option<RuntimeVersion>,
    pub max: Option<RuntimeVersion>,
}

impl VersionRange {
    /// Applies to every version.
    pub const ALL: Self = Self { min: None, max: None };

    #[must_use]
    pub const fn since(major: u8, minor: u8) -> Self {
        Self {
            min: Some(RuntimeVersion::new(major, minor)),
            max: None,
        }
    }

    #[must_use]
    pub const fn before(major: u8, minor: u8) -> Self {
        Self {
            min: None,
            max: Some(RuntimeVersion::new(major, minor)),
        }
    }

    #[must_use]
    pub fn contains(&self, version: RuntimeVersion) -> bool {
        self.min.is_none_or(|min| version >= min) && self.max.is_none_or(|max| version < max)
    }
}

/// One namespace: insertion-ordered name bindings of a frame.
pub type Namespace<'a> = IndexMap<String, &'a dyn Reflect>;

/// Read-only snapshot of one call-stack level.
#[derive(Default)]
pub struct FrameInfo<'a> {
    pub file_path: String,
    pub line_number: usize,
    pub function_name: String,
    /// Source text of the line being executed, when the capture boundary has it.
    pub line_text: Option<String>,
    /// 0-based column in `line_text` of the expression that faulted, on
    /// runtimes that report one.
    pub column: Option<usize>,
    pub locals: Namespace<'a>,
    /// Namespaces of the enclosing function scopes, innermost first.
    pub enclosing: Vec<Namespace<'a>>,
    pub globals: Namespace<'a>,
    /// Built-in namespace; when absent the engine falls back to the runtime's
    /// well-known builtin names.
    pub builtins: Option<Namespace<'a>>,
}

impl<'a> FrameInfo<'a> {
    #[must_use]
    pub fn new(file_path: impl Into<String>, line_number: usize, function_name: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            line_number,
            function_name: function_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_line_text(mut self, text: impl Into<String>) -> Self {
        self.line_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    #[must_use]
    pub fn with_local(mut self, name: impl Into<String>, value: &'a dyn Reflect) -> Self {
        self.locals.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn with_global(mut self, name: impl Into<String>, value: &'a dyn Reflect) -> Self {
        self.globals.insert(name.into(), value);
        self
    }

    /// Pushes an enclosing scope; the first pushed is the innermost one.
    #[must_use]
    pub fn with_enclosing(mut self, namespace: Namespace<'a>) -> Self {
        self.enclosing.push(namespace);
        self
    }

    #[must_use]
    pub fn with_builtins(mut self, namespace: Namespace<'a>) -> Self {
        self.builtins = Some(namespace);
        self
    }

    /// True when this frame executes module-level code, where locals and
    /// globals are the same namespace.
    #[must_use]
    pub fn is_module_level(&self) -> bool {
        self.function_name == "<module>"
    }
}

impl fmt::Debug for FrameInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameInfo")
            .field("file_path", &self.file_path)
            .field("line_number", &self.line_number)
            .field("function_name", &self.function_name)
            .field("locals", &self.locals.keys().collect::<Vec<_>>())
            .field("globals", &self.globals.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Where the compiler front end reported a compile fault.
///
/// Every positional field is optional: depending on the runtime version the
/// compiler may omit the column, the end offset, or the line text.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SourceLocation {
    pub file_path: String,
    pub line_number: Option<usize>,
    /// 1-based column as reported by the compiler.
    pub column_offset: Option<usize>,
    pub line_text: Option<String>,
    pub end_offset: Option<usize>,
    /// Full source text, when the capture boundary already holds it
    /// (interactive input has no file to read back).
    #[serde(default)]
    pub source: Option<String>,
}

/// Structured detail the runtime attaches to some faults.
///
/// Newer runtimes expose the inspected object and the missing name directly on
/// the exception; older ones only have the message, in which case the
/// classifier reconstructs these fields from the message and source line.
#[derive(Default, Clone, Copy)]
pub struct FaultDetail<'a> {
    pub name: Option<&'a str>,
    pub obj: Option<&'a dyn Reflect>,
    /// Source expression that evaluated to `obj`, e.g. `a` in `a.appendh(4)`.
    pub obj_expr: Option<&'a str>,
}

/// A fault intercepted by the capture boundary.
pub struct CapturedFault<'a> {
    pub kind: FaultKind,
    pub raw_message: &'a str,
    /// Call stack snapshot, innermost frame last.
    pub frames: &'a [FrameInfo<'a>],
    pub location: Option<&'a SourceLocation>,
    pub detail: FaultDetail<'a>,
    /// Host runtime version; `None` uses the configured default.
    pub version: Option<RuntimeVersion>,
}

impl<'a> CapturedFault<'a> {
    /// A runtime fault with no frames, location or detail.
    #[must_use]
    pub fn new(kind: FaultKind, raw_message: &'a str) -> Self {
        Self {
            kind,
            raw_message,
            frames: &[],
            location: None,
            detail: FaultDetail::default(),
            version: None,
        }
    }

    #[must_use]
    pub fn with_frames(mut self, frames: &'a [FrameInfo<'a>]) -> Self {
        self.frames = frames;
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: &'a SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: FaultDetail<'a>) -> Self {
        self.detail = detail;
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: RuntimeVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// The frame where the fault was raised.
    #[must_use]
    pub fn innermost_frame(&self) -> Option<&'a FrameInfo<'a>> {
        self.frames.last()
    }
}

impl fmt::Debug for CapturedFault<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedFault")
            .field("kind", &self.kind)
            .field("raw_message", &self.raw_message)
            .field("frames", &self.frames)
            .field("location", &self.location)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
