//! Scope resolution over a captured frame.
//!
//! A frame exposes its namespaces as ordered lookup layers: locals, each
//! enclosing function scope (innermost first), module globals, builtins.
//! Everything here is read-only; a namespace the capture boundary could not
//! provide is simply an empty layer.

use ahash::AHashSet;

use crate::{fault::FrameInfo, reflect::Reflect, stdlib::BUILTIN_NAMES};

/// Which namespace a name was found in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceOrigin {
    Local,
    /// Enclosing function scope; `0` is the innermost one.
    Enclosing(usize),
    Global,
    Builtin,
    /// Members of the object or module being inspected.
    Module,
    /// Members of a different module bound in scope.
    OtherModule(String),
}

/// One lookup layer of the scope chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeLayer {
    pub origin: NamespaceOrigin,
    pub names: Vec<String>,
}

impl ScopeLayer {
    #[must_use]
    pub fn new(origin: NamespaceOrigin, names: Vec<String>) -> Self {
        Self { origin, names }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// Lookup layers of `frame` in resolution order.
///
/// At module level locals and globals are one namespace, so the local layer
/// is left empty and every binding is reported as global.
#[must_use]
pub fn resolve(frame: &FrameInfo<'_>) -> Vec<ScopeLayer> {
    let mut layers = Vec::with_capacity(frame.enclosing.len() + 3);

    let (locals, mut globals): (Vec<String>, Vec<String>) = if frame.is_module_level() {
        (Vec::new(), frame.locals.keys().cloned().collect())
    } else {
        (frame.locals.keys().cloned().collect(), Vec::new())
    };
    layers.push(ScopeLayer::new(NamespaceOrigin::Local, locals));

    for (depth, namespace) in frame.enclosing.iter().enumerate() {
        layers.push(ScopeLayer::new(
            NamespaceOrigin::Enclosing(depth),
            namespace.keys().cloned().collect(),
        ));
    }

    for name in frame.globals.keys() {
        if !globals.contains(name) {
            globals.push(name.clone());
        }
    }
    layers.push(ScopeLayer::new(NamespaceOrigin::Global, globals));

    let builtins = match &frame.builtins {
        Some(namespace) => namespace.keys().cloned().collect(),
        None => BUILTIN_NAMES.iter().map(|&name| name.to_owned()).collect(),
    };
    layers.push(ScopeLayer::new(NamespaceOrigin::Builtin, builtins));

    layers
}

/// Every name visible from `frame`, except `exclude`.
#[must_use]
pub fn nearby_names(frame: &FrameInfo<'_>, exclude: &str) -> AHashSet<String> {
    resolve(frame)
        .into_iter()
        .flat_map(|layer| layer.names)
        .filter(|name| name != exclude)
        .collect()
}

/// Resolves `name` through the scope chain, the way the runtime would.
#[must_use]
pub fn lookup<'a>(frame: &FrameInfo<'a>, name: &str) -> Option<&'a dyn Reflect> {
    if let Some(&value) = frame.locals.get(name) {
        return Some(value);
    }
    for namespace in &frame.enclosing {
        if let Some(&value) = namespace.get(name) {
            return Some(value);
        }
    }
    if let Some(&value) = frame.globals.get(name) {
        return Some(value);
    }
    frame
        .builtins
        .as_ref()
        .and_then(|namespace| namespace.get(name).copied())
}

/// The layer that binds `name`, if any.
#[must_use]
pub fn origin_of(frame: &FrameInfo<'_>, name: &str) -> Option<NamespaceOrigin> {
    resolve(frame)
        .into_iter()
        .find(|layer| layer.contains(name))
        .map(|layer| layer.origin)
}

/// Bindings visible without going through builtins, nearest first; a name
/// shadowed by a nearer scope is reported once.
pub fn bindings<'f, 'a>(frame: &'f FrameInfo<'a>) -> impl Iterator<Item = (&'f str, &'a dyn Reflect)> + 'f {
    let mut seen: AHashSet<&String> = AHashSet::new();
    frame
        .locals
        .iter()
        .chain(frame.enclosing.iter().flat_map(|namespace| namespace.iter()))
        .chain(frame.globals.iter())
        .filter(move |(name, _)| seen.insert(*name))
        .map(|(name, &value)| (name.as_str(), value))
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::snapshot::ObjectSnapshot;

    #[test]
    fn layers_are_ordered_local_to_builtin() {
        let int = ObjectSnapshot::instance("int");
        let mut enclosing = IndexMap::new();
        enclosing.insert("outer".to_owned(), &int as &dyn Reflect);
        let frame = FrameInfo::new("t.py", 3, "inner")
            .with_local("x", &int)
            .with_enclosing(enclosing)
            .with_global("g", &int);

        let origins: Vec<_> = resolve(&frame).into_iter().map(|layer| layer.origin).collect();
        assert_eq!(
            origins,
            vec![
                NamespaceOrigin::Local,
                NamespaceOrigin::Enclosing(0),
                NamespaceOrigin::Global,
                NamespaceOrigin::Builtin,
            ]
        );
        assert_eq!(origin_of(&frame, "outer"), Some(NamespaceOrigin::Enclosing(0)));
        assert_eq!(origin_of(&frame, "len"), Some(NamespaceOrigin::Builtin));
    }

    #[test]
    fn module_level_locals_are_globals() {
        let int = ObjectSnapshot::instance("int");
        let frame = FrameInfo::new("t.py", 1, "<module>").with_local("x", &int);
        let layers = resolve(&frame);
        assert!(layers[0].names.is_empty());
        assert_eq!(origin_of(&frame, "x"), Some(NamespaceOrigin::Global));
    }

    #[test]
    fn nearby_names_exclude_target() {
        let int = ObjectSnapshot::instance("int");
        let frame = FrameInfo::new("t.py", 1, "f").with_local("count", &int);
        let names = nearby_names(&frame, "count");
        assert!(!names.contains("count"));
        assert!(names.contains("print"));
    }

    #[test]
    fn empty_frame_has_empty_layers() {
        let frame = FrameInfo::default();
        let layers = resolve(&frame);
        assert!(layers[..layers.len() - 1].iter().all(|layer| layer.names.is_empty()));
        assert!(lookup(&frame, "anything").is_none());
    }
}
