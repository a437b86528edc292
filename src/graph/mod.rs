//! Module dependency graph.
//!
//! A [`Graph`] is the finalized, read-only form of a modules file. Modules
//! are stored in an insertion-ordered arena: a module's [`ModuleId`] is its
//! position, which is also its `index`. Dependencies live in a second arena
//! addressed by [`DependencyId`] and are referenced from both endpoints.
//!
//! Graphs are produced by [`GraphBuilder`]:
//!
//! ```rust
//! use modgraph::ast::{Attr, DependencyDecl, ModuleDecl};
//! use modgraph::graph::{GraphBuilder, Scope};
//!
//! let mut builder = GraphBuilder::new("modules.txt");
//! builder.define_module(&ModuleDecl::new("m1", vec![]))?;
//! builder.define_module(&ModuleDecl::new("m2", vec![Attr::flag("jvm")]))?;
//! builder.define_dependency(&DependencyDecl::new("m2", Some("m1"), vec![Attr::flag("exported")]))?;
//! let graph = builder.finish()?;
//!
//! let dep = graph.dependencies().first().expect("one edge");
//! assert_eq!(dep.scope(), Scope::Compile);
//! assert!(dep.effectively_exported());
//! # Ok::<(), modgraph::graph::BuildError>(())
//! ```

mod builder;
mod cycle;
mod error;

pub use builder::{GraphBuilder, PendingDependency};
pub use error::BuildError;

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

use crate::platform::{PlatformKind, PlatformSettings};

/// Position of a module in its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ModuleId(usize);

impl ModuleId {
    /// The 0-based position, equal to the module's index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Position of a dependency in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct DependencyId(usize);

impl DependencyId {
    /// The 0-based position in the graph's dependency list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Visibility of a dependency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Needed to compile and run.
    #[default]
    Compile,
    /// Needed only by tests.
    Test,
    /// Needed only at run time.
    Runtime,
    /// Supplied by the environment.
    Provided,
}

impl Scope {
    /// Map a dependency attribute key onto a scope.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "compile" => Some(Self::Compile),
            "test" => Some(Self::Test),
            "runtime" => Some(Self::Runtime),
            "provided" => Some(Self::Provided),
            _ => None,
        }
    }

    /// Token used for this scope in modules files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compile => "compile",
            Self::Test => "test",
            Self::Runtime => "runtime",
            Self::Provided => "provided",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognized boolean module flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleFlag {
    /// Sources of the module are edited by the scenario.
    Edit,
    /// JVM-specific sources are edited.
    EditJvm,
    /// Both `expect` and `actual` sources are edited.
    EditExpectActual,
}

impl ModuleFlag {
    /// Every recognized flag, in declaration order.
    pub const ALL: [Self; 3] = [Self::Edit, Self::EditJvm, Self::EditExpectActual];

    /// Map a module attribute key onto a flag.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.key() == key)
    }

    /// Key used for this flag in modules files.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::EditJvm => "editJvm",
            Self::EditExpectActual => "editExpectActual",
        }
    }
}

/// Boolean switches set by bare module attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleFlags {
    edit: bool,
    edit_jvm: bool,
    edit_expect_actual: bool,
}

impl ModuleFlags {
    /// Turn a flag on.
    pub const fn set(&mut self, flag: ModuleFlag) {
        match flag {
            ModuleFlag::Edit => self.edit = true,
            ModuleFlag::EditJvm => self.edit_jvm = true,
            ModuleFlag::EditExpectActual => self.edit_expect_actual = true,
        }
    }

    /// Whether a flag is on.
    #[must_use]
    pub const fn contains(self, flag: ModuleFlag) -> bool {
        match flag {
            ModuleFlag::Edit => self.edit,
            ModuleFlag::EditJvm => self.edit_jvm,
            ModuleFlag::EditExpectActual => self.edit_expect_actual,
        }
    }

    /// Flags that are on, in declaration order.
    pub fn iter(self) -> impl Iterator<Item = ModuleFlag> {
        ModuleFlag::ALL
            .into_iter()
            .filter(move |flag| self.contains(*flag))
    }
}

/// A build unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    name: String,
    index: usize,
    defined: bool,
    platform: PlatformKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    settings: Option<PlatformSettings>,
    flags: ModuleFlags,
    dependencies: Vec<DependencyId>,
    usages: Vec<DependencyId>,
}

impl Module {
    /// Placeholder for a module referenced before (or without) its definition.
    pub(crate) fn placeholder(name: String) -> Self {
        Self {
            name,
            index: 0,
            defined: false,
            platform: PlatformKind::None,
            settings: None,
            flags: ModuleFlags::default(),
            dependencies: Vec::new(),
            usages: Vec::new(),
        }
    }

    pub(crate) fn defined(name: String) -> Self {
        let mut module = Self::placeholder(name);
        module.defined = true;
        module
    }

    pub(crate) fn set_platform(&mut self, kind: PlatformKind) {
        self.platform = kind;
        self.settings = Some(PlatformSettings::for_kind(kind));
    }

    pub(crate) fn flags_mut(&mut self) -> &mut ModuleFlags {
        &mut self.flags
    }

    /// Module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index assigned at finalization.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Identifier of this module in its graph.
    #[must_use]
    pub const fn id(&self) -> ModuleId {
        ModuleId(self.index)
    }

    /// Sortable display name: two-digit index, underscore, name.
    ///
    /// ```rust
    /// # use modgraph::manifest;
    /// let graph = manifest::from_str("a\nb\n")?;
    /// let names: Vec<_> = graph.modules().map(|m| m.indexed_name()).collect();
    /// assert_eq!(names, ["00_a", "01_b"]);
    /// # Ok::<(), modgraph::manifest::ManifestError>(())
    /// ```
    #[must_use]
    pub fn indexed_name(&self) -> String {
        format!("{:02}_{}", self.index, self.name)
    }

    /// Whether a definition line was seen for this module.
    #[must_use]
    pub const fn is_defined(&self) -> bool {
        self.defined
    }

    /// Platform classification.
    #[must_use]
    pub const fn platform(&self) -> PlatformKind {
        self.platform
    }

    /// Facet settings, present when a platform attribute was given.
    #[must_use]
    pub const fn settings(&self) -> Option<&PlatformSettings> {
        self.settings.as_ref()
    }

    /// Flag switches.
    #[must_use]
    pub const fn flags(&self) -> ModuleFlags {
        self.flags
    }

    /// Whether the module holds common (`expect`) code.
    #[must_use]
    pub fn is_common_module(&self) -> bool {
        self.platform == PlatformKind::Common
    }

    /// Whether the module targets the JVM.
    #[must_use]
    pub fn is_jvm_module(&self) -> bool {
        self.platform == PlatformKind::Jvm
    }

    /// Whether the module targets JavaScript.
    #[must_use]
    pub fn is_js_module(&self) -> bool {
        self.platform == PlatformKind::Js
    }

    /// Outgoing edges, in declaration order.
    #[must_use]
    pub fn dependencies(&self) -> &[DependencyId] {
        &self.dependencies
    }

    /// Incoming edges, in declaration order.
    #[must_use]
    pub fn usages(&self) -> &[DependencyId] {
        &self.usages
    }
}

/// A directed, scoped edge between two modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    from: ModuleId,
    to: ModuleId,
    scope: Scope,
    expected_by: bool,
    exported: bool,
}

impl Dependency {
    /// Dependent module.
    #[must_use]
    pub const fn from(&self) -> ModuleId {
        self.from
    }

    /// Module depended upon.
    #[must_use]
    pub const fn to(&self) -> ModuleId {
        self.to
    }

    /// Dependency scope.
    #[must_use]
    pub const fn scope(&self) -> Scope {
        self.scope
    }

    /// Whether `from` provides the `actual` declarations for `to`.
    #[must_use]
    pub const fn expected_by(&self) -> bool {
        self.expected_by
    }

    /// Whether the dependency is re-exported to dependents of `from`.
    #[must_use]
    pub const fn exported(&self) -> bool {
        self.exported
    }

    /// `expected_by || exported`.
    #[must_use]
    pub const fn effectively_exported(&self) -> bool {
        self.expected_by || self.exported
    }
}

/// Append `edge` to the dependency arena and to both endpoints' edge lists.
///
/// Both endpoints are checked before anything is mutated, so a failed call
/// leaves the arenas untouched.
pub(crate) fn add_edge(
    modules: &mut IndexMap<String, Module>,
    dependencies: &mut Vec<Dependency>,
    edge: Dependency,
) -> Result<DependencyId, BuildError> {
    for endpoint in [edge.from, edge.to] {
        if endpoint.index() >= modules.len() {
            return Err(BuildError::InvariantViolation {
                message: format!(
                    "dependency endpoint {} is outside the {} known modules",
                    endpoint.index(),
                    modules.len()
                ),
            });
        }
    }
    let id = DependencyId(dependencies.len());
    if let Some((_, from)) = modules.get_index_mut(edge.from.index()) {
        from.dependencies.push(id);
    }
    if let Some((_, to)) = modules.get_index_mut(edge.to.index()) {
        to.usages.push(id);
    }
    dependencies.push(edge);
    Ok(id)
}

/// A finalized module graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Graph {
    name: String,
    modules: IndexMap<String, Module>,
    dependencies: Vec<Dependency>,
}

impl Graph {
    /// File title the graph was read from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of modules, placeholders included.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Modules in index order.
    pub fn modules(&self) -> impl ExactSizeIterator<Item = &Module> {
        self.modules.values()
    }

    /// Dependencies in declaration order.
    #[must_use]
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Look up a module by id.
    #[must_use]
    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get_index(id.index()).map(|(_, module)| module)
    }

    /// Look up a module by name.
    #[must_use]
    pub fn module_by_name(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    /// Look up a dependency by id.
    #[must_use]
    pub fn dependency(&self, id: DependencyId) -> Option<&Dependency> {
        self.dependencies.get(id.index())
    }

    /// Resolve both endpoints of a dependency.
    #[must_use]
    pub fn endpoints(&self, dependency: &Dependency) -> Option<(&Module, &Module)> {
        Some((self.module(dependency.from)?, self.module(dependency.to)?))
    }

    /// Outgoing edges of a module.
    pub fn dependencies_of(&self, id: ModuleId) -> impl Iterator<Item = &Dependency> {
        self.module(id)
            .into_iter()
            .flat_map(|module| module.dependencies.iter())
            .filter_map(|dep| self.dependency(*dep))
    }

    /// Incoming edges of a module.
    pub fn usages_of(&self, id: ModuleId) -> impl Iterator<Item = &Dependency> {
        self.module(id)
            .into_iter()
            .flat_map(|module| module.usages.iter())
            .filter_map(|dep| self.dependency(*dep))
    }

    /// Modules that `id` implements through `expectedBy` edges.
    pub fn expected_by_of(&self, id: ModuleId) -> impl Iterator<Item = &Module> {
        self.dependencies_of(id)
            .filter(|dep| dep.expected_by)
            .filter_map(|dep| self.module(dep.to))
    }

    /// Find a dependency cycle, if any.
    ///
    /// The cycle is reported as module names, rotated to start at the
    /// smallest name and closed by repeating it. Cycles are not an error for
    /// the graph itself; this is a diagnostic aid.
    #[must_use]
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        cycle::find(self)
    }
}
