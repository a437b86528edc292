//! Textual renderings of a [`Graph`].
//!
//! All output is deterministic: modules appear in index order and
//! dependencies in declaration order, so renderings are stable across runs
//! and suitable for snapshot comparison.

use crate::graph::{Dependency, Graph, Module, Scope};
use itertools::Itertools;
use std::fmt::{self, Display, Formatter};

/// One line per module followed by one line per dependency.
///
/// ```rust
/// use modgraph::{manifest, render};
///
/// let graph = manifest::from_str("m1\nm2 [jvm]\nm2 -> m1 [exported]\n")?;
/// assert_eq!(
///     render::summary(&graph),
///     "00_m1\n01_m2 [jvm]\nm2 -> m1 [compile, exported]\n"
/// );
/// # Ok::<(), modgraph::manifest::ManifestError>(())
/// ```
#[must_use]
pub fn summary(graph: &Graph) -> String {
    Summary(graph).to_string()
}

/// Graphviz rendering of the graph.
///
/// Undefined modules are dotted, `expectedBy` edges dashed, exported edges
/// bold, and non-compile scopes labelled.
#[must_use]
pub fn dot(graph: &Graph) -> String {
    Dot(graph).to_string()
}

/// JSON rendering of the graph.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if serialization fails.
pub fn json(graph: &Graph, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(graph)
    } else {
        serde_json::to_string(graph)
    }
}

fn module_attrs(module: &Module) -> Vec<&'static str> {
    let platform = module
        .settings()
        .map(|settings| settings.kind().as_str());
    platform
        .into_iter()
        .chain(module.flags().iter().map(|flag| flag.key()))
        .collect()
}

fn dependency_attrs(dependency: &Dependency) -> Vec<&'static str> {
    let mut attrs = vec![dependency.scope().as_str()];
    if dependency.exported() {
        attrs.push("exported");
    }
    if dependency.expected_by() {
        attrs.push("expectedBy");
    }
    attrs
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn quote(text: &str) -> String {
    format!("\"{}\"", escape(text))
}

struct Summary<'a>(&'a Graph);

impl Display for Summary<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let graph = self.0;
        for module in graph.modules() {
            writeln!(f, "{}", SummaryModule(module))?;
        }
        for dependency in graph.dependencies() {
            if let Some((from, to)) = graph.endpoints(dependency) {
                writeln!(
                    f,
                    "{} -> {} [{}]",
                    from.name(),
                    to.name(),
                    dependency_attrs(dependency).join(", ")
                )?;
            }
        }
        Ok(())
    }
}

struct Dot<'a>(&'a Graph);

impl Display for Dot<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let graph = self.0;
        writeln!(f, "digraph {} {{", quote(graph.name()))?;
        for module in graph.modules() {
            writeln!(f, "  {};", DotModule(module))?;
        }
        for dependency in graph.dependencies() {
            if let Some((from, to)) = graph.endpoints(dependency) {
                writeln!(
                    f,
                    "  {};",
                    DotEdge {
                        from,
                        to,
                        dependency,
                    }
                )?;
            }
        }
        f.write_str("}\n")
    }
}

struct SummaryModule<'a>(&'a Module);

impl Display for SummaryModule<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let module = self.0;
        write!(f, "{}", module.indexed_name())?;
        let attrs = module_attrs(module);
        if !attrs.is_empty() {
            write!(f, " [{}]", attrs.join(", "))?;
        }
        if !module.is_defined() {
            f.write_str(" (placeholder)")?;
        }
        Ok(())
    }
}

struct DotModule<'a>(&'a Module);

impl Display for DotModule<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let module = self.0;
        write!(f, "{}", quote(module.name()))?;
        let mut attrs = Vec::new();
        let tags = module_attrs(module);
        if !tags.is_empty() {
            attrs.push(format!(
                "label=\"{}\\n{}\"",
                escape(module.name()),
                tags.join(", ")
            ));
        }
        if !module.is_defined() {
            attrs.push("style=dotted".to_owned());
        }
        if !attrs.is_empty() {
            write!(f, " [{}]", attrs.iter().join(", "))?;
        }
        Ok(())
    }
}

struct DotEdge<'a> {
    from: &'a Module,
    to: &'a Module,
    dependency: &'a Dependency,
}

impl Display for DotEdge<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", quote(self.from.name()), quote(self.to.name()))?;
        let mut attrs = Vec::new();
        if self.dependency.scope() != Scope::Compile {
            attrs.push(format!("label={}", quote(self.dependency.scope().as_str())));
        }
        if self.dependency.expected_by() {
            attrs.push("style=dashed".to_owned());
        } else if self.dependency.exported() {
            attrs.push("style=bold".to_owned());
        }
        if !attrs.is_empty() {
            write!(f, " [{}]", attrs.iter().join(", "))?;
        }
        Ok(())
    }
}
