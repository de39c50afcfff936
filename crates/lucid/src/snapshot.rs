//! Owned, serialisable fault records.
//!
//! A capture boundary attached to a live runtime implements [`Reflect`] over
//! real objects. Everything else (the CLI, fixture tests, bug reports) needs
//! a frozen copy that can be written to and read from JSON; that is
//! [`FaultRecord`] with [`ObjectSnapshot`] values.

use std::{fmt, fs, path::Path};

use indexmap::IndexMap;

use crate::{
    fault::{CapturedFault, FaultDetail, FaultKind, FrameInfo, Namespace, RuntimeVersion, SourceLocation},
    reflect::{ObjectKind, ProbeError, Reflect},
};

/// Frozen description of one object.
///
/// Only what the rule families ask about is recorded. `members` holds
/// attributes whose value is known; `member_names` lists attributes that
/// exist but were not captured.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ObjectSnapshot {
    pub type_name: String,
    pub kind: ObjectKind,
    pub name: Option<String>,
    pub id: Option<u64>,
    pub members: IndexMap<String, ObjectSnapshot>,
    pub member_names: Vec<String>,
    pub slots: Option<Vec<String>>,
    pub callable: Option<bool>,
    pub module_file: Option<String>,
    pub initializing: bool,
    pub len: Option<usize>,
    pub items: Option<Vec<ObjectSnapshot>>,
    pub keys: Option<Vec<String>>,
    pub class: Option<Box<ObjectSnapshot>>,
    pub repr: Option<String>,
}

impl ObjectSnapshot {
    /// An instance of `type_name`.
    #[must_use]
    pub fn instance(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            kind: ObjectKind::Instance,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn none() -> Self {
        Self {
            type_name: "NoneType".to_owned(),
            kind: ObjectKind::None,
            repr: Some("None".to_owned()),
            ..Self::default()
        }
    }

    /// A module; `file` is `None` for modules built into the runtime.
    #[must_use]
    pub fn module(name: impl Into<String>, file: Option<&str>) -> Self {
        Self {
            type_name: "module".to_owned(),
            kind: ObjectKind::Module,
            name: Some(name.into()),
            module_file: file.map(str::to_owned),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            type_name: "type".to_owned(),
            kind: ObjectKind::Class,
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            type_name: "function".to_owned(),
            kind: ObjectKind::Function,
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn builtin_function(name: impl Into<String>) -> Self {
        Self {
            type_name: "builtin_function_or_method".to_owned(),
            kind: ObjectKind::BuiltinFunction,
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Adds attribute names without values.
    #[must_use]
    pub fn with_member_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.member_names.extend(names.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_member(mut self, name: impl Into<String>, value: Self) -> Self {
        self.members.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn with_slots<I, S>(mut self, slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.slots = Some(slots.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_items(mut self, items: Vec<Self>) -> Self {
        self.len = Some(items.len());
        self.items = Some(items);
        self
    }

    #[must_use]
    pub fn with_len(mut self, len: usize) -> Self {
        self.len = Some(len);
        self
    }

    #[must_use]
    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        self.len = Some(keys.len());
        self.keys = Some(keys);
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: Self) -> Self {
        self.class = Some(Box::new(class));
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_repr(mut self, repr: impl Into<String>) -> Self {
        self.repr = Some(repr.into());
        self
    }

    #[must_use]
    pub fn initializing(mut self) -> Self {
        self.initializing = true;
        self
    }
}

impl Reflect for ObjectSnapshot {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn kind(&self) -> ObjectKind {
        self.kind
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn list_members(&self) -> Result<Vec<String>, ProbeError> {
        let mut names: Vec<String> = self.member_names.clone();
        for name in self.members.keys() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        if let Some(slots) = &self.slots {
            for name in slots {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }
        // instances see their class attributes too
        if self.kind == ObjectKind::Instance
            && let Some(class) = &self.class
        {
            for name in class.list_members()? {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }

    fn member(&self, name: &str) -> Result<Option<&dyn Reflect>, ProbeError> {
        if let Some(value) = self.members.get(name) {
            return Ok(Some(value));
        }
        match &self.class {
            Some(class) if self.kind == ObjectKind::Instance => class.member(name),
            _ => Ok(None),
        }
    }

    fn is_callable(&self) -> bool {
        self.callable.unwrap_or(matches!(
            self.kind,
            ObjectKind::Class | ObjectKind::Function | ObjectKind::BuiltinFunction
        ))
    }

    fn slots(&self) -> Result<Option<Vec<String>>, ProbeError> {
        if self.slots.is_some() {
            return Ok(self.slots.clone());
        }
        match &self.class {
            Some(class) => Ok(class.slots.clone()),
            None => Ok(None),
        }
    }

    fn module_file(&self) -> Option<&str> {
        self.module_file.as_deref()
    }

    fn is_initializing(&self) -> bool {
        self.initializing
    }

    fn len(&self) -> Option<usize> {
        self.len
    }

    fn items(&self) -> Option<Vec<&dyn Reflect>> {
        self.items
            .as_ref()
            .map(|items| items.iter().map(|item| item as &dyn Reflect).collect())
    }

    fn keys(&self) -> Option<Vec<String>> {
        self.keys.clone()
    }

    fn identity(&self) -> Option<u64> {
        self.id
    }

    fn class_object(&self) -> Option<&dyn Reflect> {
        self.class.as_deref().map(|class| class as &dyn Reflect)
    }

    fn repr(&self) -> String {
        match (&self.repr, &self.name) {
            (Some(repr), _) => repr.clone(),
            (None, Some(name)) if self.kind == ObjectKind::Module => format!("<module '{name}'>"),
            (None, Some(name)) if self.kind == ObjectKind::Class => format!("<class '{name}'>"),
            _ => format!("<{} object>", self.type_name),
        }
    }
}

/// Owned copy of one frame.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FrameRecord {
    pub file_path: String,
    pub line_number: usize,
    pub function_name: String,
    pub line_text: Option<String>,
    pub column: Option<usize>,
    pub locals: IndexMap<String, ObjectSnapshot>,
    pub enclosing: Vec<IndexMap<String, ObjectSnapshot>>,
    pub globals: IndexMap<String, ObjectSnapshot>,
    pub builtins: Option<IndexMap<String, ObjectSnapshot>>,
}

fn borrow_namespace(namespace: &IndexMap<String, ObjectSnapshot>) -> Namespace<'_> {
    namespace
        .iter()
        .map(|(name, value)| (name.clone(), value as &dyn Reflect))
        .collect()
}

impl FrameRecord {
    /// Lends a [`FrameInfo`] view over this record.
    #[must_use]
    pub fn as_frame(&self) -> FrameInfo<'_> {
        FrameInfo {
            file_path: self.file_path.clone(),
            line_number: self.line_number,
            function_name: self.function_name.clone(),
            line_text: self.line_text.clone(),
            column: self.column,
            locals: borrow_namespace(&self.locals),
            enclosing: self.enclosing.iter().map(borrow_namespace).collect(),
            globals: borrow_namespace(&self.globals),
            builtins: self.builtins.as_ref().map(borrow_namespace),
        }
    }
}

/// Owned copy of [`FaultDetail`].
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DetailRecord {
    pub name: Option<String>,
    pub obj: Option<ObjectSnapshot>,
    pub obj_expr: Option<String>,
}

/// Owned, serialisable copy of a [`CapturedFault`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FaultRecord {
    pub kind: FaultKind,
    pub message: String,
    #[serde(default)]
    pub frames: Vec<FrameRecord>,
    #[serde(default)]
    pub location: Option<SourceLocation>,
    #[serde(default)]
    pub detail: Option<DetailRecord>,
    #[serde(default)]
    pub version: Option<RuntimeVersion>,
}

impl FaultRecord {
    #[must_use]
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            frames: Vec::new(),
            location: None,
            detail: None,
            version: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a record from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|error| RecordError::Io {
            path: path.display().to_string(),
            error,
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Lends a [`CapturedFault`] over this record for the duration of `f`.
    ///
    /// The borrowed frame views exist only inside the closure, which is the
    /// same acquire-inspect-release shape a live capture boundary follows.
    pub fn with_fault<R>(&self, f: impl FnOnce(&CapturedFault<'_>) -> R) -> R {
        let frames: Vec<FrameInfo<'_>> = self.frames.iter().map(FrameRecord::as_frame).collect();
        let detail = self.detail.as_ref().map_or_else(FaultDetail::default, |detail| FaultDetail {
            name: detail.name.as_deref(),
            obj: detail.obj.as_ref().map(|obj| obj as &dyn Reflect),
            obj_expr: detail.obj_expr.as_deref(),
        });
        let fault = CapturedFault {
            kind: self.kind.clone(),
            raw_message: &self.message,
            frames: &frames,
            location: self.location.as_ref(),
            detail,
            version: self.version,
        };
        f(&fault)
    }
}

/// Error loading a [`FaultRecord`].
#[derive(Debug)]
pub enum RecordError {
    Io { path: String, error: std::io::Error },
    Json(serde_json::Error),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, error } => write!(f, "cannot read fault record {path}: {error}"),
            Self::Json(error) => write!(f, "invalid fault record: {error}"),
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { error, .. } => Some(error),
            Self::Json(error) => Some(error),
        }
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error)
    }
}
