//! Two-pass graph construction.
//!
//! Declarations are consumed in source order. Module names are resolved
//! through an insertion-ordered table so that a dependency may name a module
//! whose definition appears later (or never). Concrete edges are only built
//! in [`GraphBuilder::finish`], once every module slot is settled.

use indexmap::IndexMap;

use super::{BuildError, Dependency, Graph, Module, ModuleFlag, ModuleId, Scope, add_edge};
use crate::ast::{Attr, Declaration, DependencyDecl, ModuleDecl};
use crate::platform::PlatformKind;

/// A dependency recorded during parsing and resolved at finalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDependency {
    /// Slot of the dependent module.
    pub from: ModuleId,
    /// Slot of the module depended upon.
    pub to: ModuleId,
    /// Scope selected by the attributes; `compile` by default.
    pub scope: Scope,
    /// `expectedBy` attribute.
    pub expected_by: bool,
    /// `exported` attribute.
    pub exported: bool,
}

/// Accumulates declarations and produces a [`Graph`].
///
/// A builder is single-use: [`finish`](Self::finish) consumes it.
#[derive(Debug)]
pub struct GraphBuilder {
    name: String,
    modules: IndexMap<String, Module>,
    pending: Vec<PendingDependency>,
}

impl GraphBuilder {
    /// Start a graph for the file titled `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modules: IndexMap::new(),
            pending: Vec::new(),
        }
    }

    /// Resolve `name` to its slot, creating an undefined placeholder on first
    /// sight.
    ///
    /// The order of first sight is the final index order.
    pub fn reference(&mut self, name: &str) -> ModuleId {
        if let Some(index) = self.modules.get_index_of(name) {
            return ModuleId(index);
        }
        let (index, _) = self
            .modules
            .insert_full(name.to_owned(), Module::placeholder(name.to_owned()));
        ModuleId(index)
    }

    /// Apply a module definition.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DuplicateDefinition`] when the module was already
    /// defined, and [`BuildError::UnknownModuleFlag`] or
    /// [`BuildError::UnknownModuleProperty`] for unrecognized attributes.
    pub fn define_module(&mut self, decl: &ModuleDecl) -> Result<ModuleId, BuildError> {
        let id = self.reference(decl.name.as_str());
        let slot = self.slot_mut(id)?;
        if slot.is_defined() {
            return Err(BuildError::DuplicateDefinition {
                name: decl.name.name.clone(),
                span: decl.name.span,
            });
        }

        let mut module = Module::defined(decl.name.name.clone());
        for attr in &decl.attrs {
            apply_module_attr(&mut module, attr)?;
        }
        *slot = module;
        Ok(id)
    }

    /// Apply a dependency declaration.
    ///
    /// A declaration without a target only ensures the source module exists
    /// and yields `None`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::AttributesNotAllowed`] when a target-less
    /// declaration carries attributes, and [`BuildError::UnknownDependencyFlag`]
    /// or [`BuildError::UnknownDependencyProperty`] for unrecognized
    /// attributes.
    pub fn define_dependency(
        &mut self,
        decl: &DependencyDecl,
    ) -> Result<Option<PendingDependency>, BuildError> {
        let from = self.reference(decl.from.as_str());
        let Some(to_ident) = &decl.to else {
            if let Some(first) = decl.attrs.first() {
                return Err(BuildError::AttributesNotAllowed {
                    module: decl.from.name.clone(),
                    span: first.span,
                });
            }
            return Ok(None);
        };
        let to = self.reference(to_ident.as_str());

        let mut pending = PendingDependency {
            from,
            to,
            scope: Scope::default(),
            expected_by: false,
            exported: false,
        };
        for attr in &decl.attrs {
            apply_dependency_attr(&mut pending, attr)?;
        }
        self.pending.push(pending);
        Ok(Some(pending))
    }

    /// Apply a single declaration of either kind.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`define_module`](Self::define_module) and
    /// [`define_dependency`](Self::define_dependency).
    pub fn push(&mut self, decl: &Declaration) -> Result<(), BuildError> {
        match decl {
            Declaration::Module(module) => self.define_module(module).map(|_| ()),
            Declaration::Dependency(dep) => self.define_dependency(dep).map(|_| ()),
        }
    }

    /// Apply declarations in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`BuildError`] encountered.
    pub fn extend<'a, I>(&mut self, decls: I) -> Result<(), BuildError>
    where
        I: IntoIterator<Item = &'a Declaration>,
    {
        decls.into_iter().try_for_each(|decl| self.push(decl))
    }

    /// Build a graph from a complete declaration sequence.
    ///
    /// # Errors
    ///
    /// Returns the first [`BuildError`] encountered.
    pub fn build<'a, I>(name: impl Into<String>, decls: I) -> Result<Graph, BuildError>
    where
        I: IntoIterator<Item = &'a Declaration>,
    {
        let mut builder = Self::new(name);
        builder.extend(decls)?;
        builder.finish()
    }

    /// Finalize the graph.
    ///
    /// Edges are built before indices are assigned, since the implemented
    /// module names of each platform module are read from its edge list.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvariantViolation`] if a pending dependency
    /// refers to a slot that does not exist.
    pub fn finish(self) -> Result<Graph, BuildError> {
        let Self {
            name,
            mut modules,
            pending,
        } = self;

        let mut dependencies = Vec::with_capacity(pending.len());
        for dep in pending {
            add_edge(
                &mut modules,
                &mut dependencies,
                Dependency {
                    from: dep.from,
                    to: dep.to,
                    scope: dep.scope,
                    expected_by: dep.expected_by,
                    exported: dep.exported,
                },
            )?;
        }

        let implemented: Vec<Option<Vec<String>>> = modules
            .values()
            .map(|module| {
                module
                    .settings
                    .as_ref()
                    .map(|_| expected_by_names(module, &modules, &dependencies))
            })
            .collect();
        for ((index, module), names) in modules.values_mut().enumerate().zip(implemented) {
            module.index = index;
            if let (Some(settings), Some(names)) = (module.settings.as_mut(), names) {
                settings.set_implemented_module_names(names);
            }
        }

        Ok(Graph {
            name,
            modules,
            dependencies,
        })
    }

    fn slot_mut(&mut self, id: ModuleId) -> Result<&mut Module, BuildError> {
        self.modules
            .get_index_mut(id.index())
            .map(|(_, module)| module)
            .ok_or_else(|| BuildError::InvariantViolation {
                message: format!("module slot {} vanished during definition", id.index()),
            })
    }
}

fn apply_module_attr(module: &mut Module, attr: &Attr) -> Result<(), BuildError> {
    if !attr.is_flag() {
        return Err(BuildError::UnknownModuleProperty {
            key: attr.key.clone(),
            span: attr.span,
        });
    }
    if let Some(kind) = PlatformKind::from_token(&attr.key) {
        module.set_platform(kind);
        return Ok(());
    }
    let flag = ModuleFlag::from_key(&attr.key).ok_or_else(|| BuildError::UnknownModuleFlag {
        key: attr.key.clone(),
        span: attr.span,
    })?;
    module.flags_mut().set(flag);
    Ok(())
}

fn apply_dependency_attr(dep: &mut PendingDependency, attr: &Attr) -> Result<(), BuildError> {
    if !attr.is_flag() {
        return Err(BuildError::UnknownDependencyProperty {
            key: attr.key.clone(),
            span: attr.span,
        });
    }
    match attr.key.as_str() {
        "exported" => dep.exported = true,
        "expectedBy" => dep.expected_by = true,
        other => {
            dep.scope = Scope::from_token(other).ok_or_else(|| {
                BuildError::UnknownDependencyFlag {
                    key: attr.key.clone(),
                    span: attr.span,
                }
            })?;
        }
    }
    Ok(())
}

fn expected_by_names(
    module: &Module,
    modules: &IndexMap<String, Module>,
    dependencies: &[Dependency],
) -> Vec<String> {
    module
        .dependencies
        .iter()
        .filter_map(|id| dependencies.get(id.index()))
        .filter(|dep| dep.expected_by)
        .filter_map(|dep| modules.get_index(dep.to.index()))
        .map(|(name, _)| name.clone())
        .collect()
}
