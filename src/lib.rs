//! Modgraph core library.
//!
//! Builds validated module dependency graphs from declaration streams. A
//! `modules.txt` file is parsed into [`ast::Declaration`] values, which
//! [`graph::GraphBuilder`] resolves into an indexed [`graph::Graph`] with
//! forward references, placeholder modules and bidirectional adjacency. The
//! remaining modules load files, fingerprint graphs, render them and drive the
//! command line interface.

pub mod ast;
pub mod cli;
mod diagnostics;
pub mod graph;
pub mod hasher;
pub mod manifest;
pub mod parser;
pub mod platform;
pub mod render;
pub mod runner;
