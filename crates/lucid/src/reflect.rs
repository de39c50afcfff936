//! Reflection interface over live program objects.
//!
//! The rule families never touch a concrete object model. They ask questions
//! through [`Reflect`], which a capture boundary implements over whatever
//! object system it is attached to. [`ObjectSnapshot`](crate::ObjectSnapshot)
//! is the serialisable implementation used by fixtures and the CLI.
//!
//! Probing a live object can itself fail (a property raises, a module is
//! half-imported). Fallible probes return [`ProbeError`]; the engine routes
//! every such call through [`Prober`], which turns errors into "inconclusive"
//! and remembers them so they can be reported to the tracer.

use std::{cell::RefCell, fmt};

/// Coarse classification of an object, enough for rule predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// The `None` singleton.
    None,
    Module,
    /// A class object (a type).
    Class,
    /// An instance of a user-defined or built-in class.
    #[default]
    Instance,
    /// A user-defined function or method.
    Function,
    /// A function implemented by the runtime, e.g. `len`.
    BuiltinFunction,
    Other,
}

/// Error raised while probing a live object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// Looking up a member raised inside the host runtime.
    MemberLookup { member: String, reason: String },
    /// The object cannot be introspected at all (e.g. its frame has unwound).
    Unavailable { what: String },
    /// A user-level `__getattr__`/`__dir__` implementation raised.
    Raised { exc_type: String, message: String },
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MemberLookup { member, reason } => write!(f, "looking up '{member}' failed: {reason}"),
            Self::Unavailable { what } => write!(f, "{what} is unavailable"),
            Self::Raised { exc_type, message } => write!(f, "probe raised {exc_type}: {message}"),
        }
    }
}

impl std::error::Error for ProbeError {}

/// Read-only view of a live object.
///
/// Infallible methods describe facts that every object model knows without
/// running user code. Methods returning `Result` may execute user code on the
/// host side and are therefore allowed to fail.
pub trait Reflect {
    /// Runtime type name, e.g. `list`, `NoneType`, `module`.
    fn type_name(&self) -> &str;

    fn kind(&self) -> ObjectKind;

    /// Name of the object itself for modules, classes and functions.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Attribute names, as `dir()` would report them.
    fn list_members(&self) -> Result<Vec<String>, ProbeError>;

    fn has_member(&self, name: &str) -> Result<bool, ProbeError> {
        Ok(self.list_members()?.iter().any(|m| m == name))
    }

    /// Attribute value, when the implementation can expose it.
    fn member(&self, _name: &str) -> Result<Option<&dyn Reflect>, ProbeError> {
        Ok(None)
    }

    fn is_callable(&self) -> bool {
        matches!(
            self.kind(),
            ObjectKind::Class | ObjectKind::Function | ObjectKind::BuiltinFunction
        )
    }

    /// Contents of `__slots__` when the object's class declares a fixed
    /// attribute set.
    fn slots(&self) -> Result<Option<Vec<String>>, ProbeError> {
        Ok(None)
    }

    /// File a module was loaded from; `None` for modules compiled into the
    /// runtime (e.g. `sys`) and for non-modules.
    fn module_file(&self) -> Option<&str> {
        None
    }

    /// True for a module still executing its body, i.e. one reached through
    /// a circular import.
    fn is_initializing(&self) -> bool {
        false
    }

    fn len(&self) -> Option<usize> {
        None
    }

    /// Elements of a sequence, when exposed.
    fn items(&self) -> Option<Vec<&dyn Reflect>> {
        None
    }

    /// String keys of a mapping, when exposed.
    fn keys(&self) -> Option<Vec<String>> {
        None
    }

    /// Identity of the object (`id()` in the host runtime).
    fn identity(&self) -> Option<u64> {
        None
    }

    /// Class object of an instance.
    fn class_object(&self) -> Option<&dyn Reflect> {
        None
    }

    /// Printable form of the object. Never shown without going through the
    /// redaction collaborator.
    fn repr(&self) -> String {
        format!("<{} object>", self.type_name())
    }
}

impl fmt::Debug for dyn Reflect + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} {:?}>", self.type_name(), self.kind())
    }
}

/// A probe failure remembered for the tracer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeFailure {
    pub what: String,
    pub error: ProbeError,
}

/// Guarded access to [`Reflect`] probes.
///
/// Every failure is swallowed into an inconclusive answer and recorded.
#[derive(Debug, Default)]
pub(crate) struct Prober {
    failures: RefCell<Vec<ProbeFailure>>,
}

impl Prober {
    fn record(&self, what: &str, error: ProbeError) {
        self.failures.borrow_mut().push(ProbeFailure {
            what: what.to_owned(),
            error,
        });
    }

    /// Members of `obj`, empty when listing fails.
    pub fn members(&self, obj: &dyn Reflect) -> Vec<String> {
        match obj.list_members() {
            Ok(members) => members,
            Err(err) => {
                self.record("list_members", err);
                Vec::new()
            }
        }
    }

    /// Whether `obj` has `name`; `None` is "inconclusive".
    pub fn has_member(&self, obj: &dyn Reflect, name: &str) -> Option<bool> {
        match obj.has_member(name) {
            Ok(found) => Some(found),
            Err(err) => {
                self.record("has_member", err);
                None
            }
        }
    }

    /// True only when `obj` is known to have `name`.
    pub fn surely_has(&self, obj: &dyn Reflect, name: &str) -> bool {
        self.has_member(obj, name) == Some(true)
    }

    pub fn member<'o>(&self, obj: &'o dyn Reflect, name: &str) -> Option<&'o dyn Reflect> {
        match obj.member(name) {
            Ok(value) => value,
            Err(err) => {
                self.record("member", err);
                None
            }
        }
    }

    pub fn slots(&self, obj: &dyn Reflect) -> Option<Vec<String>> {
        match obj.slots() {
            Ok(slots) => slots,
            Err(err) => {
                self.record("slots", err);
                None
            }
        }
    }

    /// Drains the failures recorded so far.
    pub fn take_failures(&self) -> Vec<ProbeFailure> {
        std::mem::take(&mut *self.failures.borrow_mut())
    }
}
