//! Integration tests for building graphs from declaration streams.
//!
//! These drive [`GraphBuilder`] directly with constructed declarations, and
//! through the loader with the sample modules file in `tests/data`.

use anyhow::{Context, Result, ensure};
use camino::Utf8Path;
use modgraph::ast::{Attr, Declaration, DependencyDecl, ModuleDecl};
use modgraph::graph::{BuildError, Graph, GraphBuilder, ModuleFlag, Scope};
use modgraph::manifest;
use modgraph::platform::PlatformKind;
use rstest::{fixture, rstest};

fn module(name: &str, attrs: &[&str]) -> Declaration {
    ModuleDecl::new(name, attrs.iter().copied().map(Attr::flag).collect()).into()
}

fn dependency(from: &str, to: Option<&str>, attrs: &[&str]) -> Declaration {
    DependencyDecl::new(from, to, attrs.iter().copied().map(Attr::flag).collect()).into()
}

fn names(graph: &Graph) -> Vec<&str> {
    graph.modules().map(|m| m.name()).collect()
}

#[fixture]
fn sample() -> Graph {
    manifest::from_path(Utf8Path::new("tests/data/multiplatform.txt")).expect("sample graph")
}

#[rstest]
fn forward_reference_keeps_first_reference_order() -> Result<()> {
    let decls = [dependency("A", Some("B"), &[]), module("A", &[])];
    let graph = GraphBuilder::build("forward", &decls)?;
    ensure!(names(&graph) == ["A", "B"], "order: {:?}", names(&graph));
    let a = graph.module_by_name("A").context("A")?;
    let b = graph.module_by_name("B").context("B")?;
    ensure!(a.is_defined() && !b.is_defined(), "A defined, B placeholder");
    ensure!((a.index(), b.index()) == (0, 1), "indices follow order");
    Ok(())
}

#[rstest]
fn every_edge_is_registered_once_at_each_end() -> Result<()> {
    let decls = [
        dependency("a", Some("b"), &[]),
        dependency("a", Some("c"), &["test"]),
        dependency("b", Some("c"), &[]),
        dependency("a", Some("b"), &["runtime"]),
    ];
    let graph = GraphBuilder::build("edges", &decls)?;
    for (position, dep) in graph.dependencies().iter().enumerate() {
        let from = graph.module(dep.from()).context("from endpoint")?;
        let to = graph.module(dep.to()).context("to endpoint")?;
        let outgoing = from.dependencies().iter().filter(|id| id.index() == position).count();
        let incoming = to.usages().iter().filter(|id| id.index() == position).count();
        ensure!(outgoing == 1, "edge {position} listed {outgoing} times as outgoing");
        ensure!(incoming == 1, "edge {position} listed {incoming} times as incoming");
    }
    let a = graph.module_by_name("a").context("a")?;
    ensure!(a.dependencies().len() == 3, "parallel edges are kept");
    Ok(())
}

#[rstest]
fn second_definition_is_rejected() {
    let decls = [module("a", &[]), dependency("b", Some("a"), &[]), module("a", &["jvm"])];
    let err = GraphBuilder::build("dup", &decls).expect_err("duplicate");
    assert!(matches!(err, BuildError::DuplicateDefinition { ref name, .. } if name == "a"));
}

#[rstest]
fn dangling_dependency_without_attributes_adds_placeholder() -> Result<()> {
    let graph = GraphBuilder::build("dangling", &[dependency("lonely", None, &[])])?;
    ensure!(names(&graph) == ["lonely"], "placeholder only");
    ensure!(graph.dependencies().is_empty(), "no edge for a dangling dependency");
    let lonely = graph.module_by_name("lonely").context("lonely")?;
    ensure!(!lonely.is_defined(), "dangling dependency does not define");
    Ok(())
}

#[rstest]
fn dangling_dependency_with_attributes_is_rejected() {
    let err = GraphBuilder::build("dangling", &[dependency("a", None, &["exported"])])
        .expect_err("attributes without target");
    assert!(matches!(err, BuildError::AttributesNotAllowed { ref module, .. } if module == "a"));
}

#[rstest]
#[case(&[], false)]
#[case(&["exported"], true)]
#[case(&["expectedBy"], true)]
#[case(&["exported", "expectedBy"], true)]
fn effectively_exported_combines_both_flags(
    #[case] attrs: &[&str],
    #[case] expected: bool,
) -> Result<()> {
    let graph = GraphBuilder::build("export", &[dependency("a", Some("b"), attrs)])?;
    let dep = graph.dependencies().first().context("edge")?;
    ensure!(dep.effectively_exported() == expected, "attrs {attrs:?}");
    Ok(())
}

#[rstest]
fn jvm_module_with_exported_dependency() -> Result<()> {
    let decls = [
        module("m1", &[]),
        module("m2", &["jvm"]),
        dependency("m2", Some("m1"), &["exported"]),
    ];
    let graph = GraphBuilder::build("m", &decls)?;
    let m1 = graph.module_by_name("m1").context("m1")?;
    let m2 = graph.module_by_name("m2").context("m2")?;
    ensure!(m2.is_jvm_module(), "m2 targets the JVM");
    ensure!(m1.platform() == PlatformKind::None, "m1 has no platform");
    let dep = graph.dependencies_of(m2.id()).next().context("m2 edge")?;
    ensure!(dep.to() == m1.id() && dep.exported(), "m2 exports m1");
    ensure!(dep.scope() == Scope::Compile, "compile is the default scope");
    ensure!(m1.usages().len() == 1, "m1 is used once");
    Ok(())
}

#[rstest]
fn unknown_dependency_flag_is_rejected() {
    let err = GraphBuilder::build("bogus", &[dependency("a", Some("b"), &["bogus"])])
        .expect_err("bogus flag");
    assert!(matches!(err, BuildError::UnknownDependencyFlag { ref key, .. } if key == "bogus"));
}

#[rstest]
fn incremental_builder_matches_batch_build() -> Result<()> {
    let decls = [module("x", &["js"]), dependency("y", Some("x"), &["provided"])];
    let mut builder = GraphBuilder::new("inc");
    for decl in &decls {
        builder.push(decl)?;
    }
    let incremental = builder.finish()?;
    let batch = GraphBuilder::build("inc", &decls)?;
    ensure!(incremental == batch, "push and build agree");
    Ok(())
}

#[rstest]
fn sample_file_loads_platforms_and_flags(sample: Graph) -> Result<()> {
    ensure!(
        names(&sample) == ["core", "core-jvm", "core-js", "app", "testkit", "annotations"],
        "order: {:?}",
        names(&sample)
    );
    let core = sample.module_by_name("core").context("core")?;
    let core_jvm = sample.module_by_name("core-jvm").context("core-jvm")?;
    let app = sample.module_by_name("app").context("app")?;
    ensure!(core.is_common_module(), "core is common");
    ensure!(core_jvm.flags().contains(ModuleFlag::Edit), "core-jvm is editable");
    ensure!(app.flags().contains(ModuleFlag::EditJvm), "app has editJvm");
    ensure!(core.usages().len() == 2, "both platform modules implement core");
    let testkit = sample.module_by_name("testkit").context("testkit")?;
    ensure!(!testkit.is_defined(), "testkit is only referenced");
    Ok(())
}

#[rstest]
fn platform_modules_record_implemented_modules(sample: Graph) -> Result<()> {
    let core_js = sample.module_by_name("core-js").context("core-js")?;
    let settings = core_js.settings().context("core-js settings")?;
    ensure!(settings.kind() == PlatformKind::Js, "settings match platform");
    ensure!(settings.implemented_module_names() == ["core"], "implements core");
    let app = sample.module_by_name("app").context("app")?;
    let app_settings = app.settings().context("app settings")?;
    ensure!(app_settings.implemented_module_names().is_empty(), "app implements nothing");
    Ok(())
}

#[rstest]
fn sample_file_has_no_cycle(sample: Graph) {
    assert_eq!(sample.find_cycle(), None);
}

#[rstest]
fn cycles_are_reported_not_rejected() -> Result<()> {
    let decls = [
        dependency("b", Some("c"), &[]),
        dependency("c", Some("a"), &[]),
        dependency("a", Some("b"), &[]),
    ];
    let graph = GraphBuilder::build("cycle", &decls)?;
    let cycle = graph.find_cycle().context("cycle")?;
    ensure!(cycle == ["a", "b", "c", "a"], "cycle: {cycle:?}");
    Ok(())
}
