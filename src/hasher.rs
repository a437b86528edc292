//! Graph fingerprinting.
//!
//! [`GraphHasher`] computes a stable SHA-256 digest over the structure of a
//! [`Graph`]: module names, definedness, platforms, flags and every
//! dependency tuple, in index and declaration order. Orchestration layers use
//! it to tell whether a modules file changed in a way that matters. The graph
//! name is excluded, so moving a file does not change its fingerprint.
//!
//! # Examples
//!
//! ```
//! use modgraph::hasher::GraphHasher;
//! use modgraph::manifest;
//!
//! let graph = manifest::from_str("a\nb -> a\n")?;
//! let hash = GraphHasher::hash(&graph);
//! assert_eq!(hash.len(), 64);
//! # Ok::<(), modgraph::manifest::ManifestError>(())
//! ```

use sha2::{Digest, Sha256};

use crate::graph::{Dependency, Graph, Module};

/// Computes stable digests for [`Graph`] values.
pub struct GraphHasher;

impl GraphHasher {
    /// Calculate the hex-encoded digest of a graph.
    #[must_use]
    pub fn hash(graph: &Graph) -> String {
        let mut hasher = Sha256::new();
        for module in graph.modules() {
            Self::hash_module(&mut hasher, module);
        }
        for dependency in graph.dependencies() {
            Self::hash_dependency(&mut hasher, dependency);
        }
        format!("{:x}", hasher.finalize())
    }

    fn hash_module(hasher: &mut Sha256, module: &Module) {
        hasher.update(b"mod");
        Self::update_with_len(hasher, module.name().as_bytes());
        hasher.update(if module.is_defined() { b"1" } else { b"0" });
        Self::update_with_len(hasher, module.platform().as_str().as_bytes());
        for flag in module.flags().iter() {
            Self::update_with_len(hasher, flag.key().as_bytes());
        }
        hasher.update(b";");
    }

    fn hash_dependency(hasher: &mut Sha256, dependency: &Dependency) {
        hasher.update(b"dep");
        Self::update_with_len(hasher, dependency.from().index().to_string().as_bytes());
        Self::update_with_len(hasher, dependency.to().index().to_string().as_bytes());
        Self::update_with_len(hasher, dependency.scope().as_str().as_bytes());
        hasher.update(if dependency.expected_by() { b"1" } else { b"0" });
        hasher.update(if dependency.exported() { b"1" } else { b"0" });
    }

    fn update_with_len(hasher: &mut Sha256, bytes: &[u8]) {
        let len = bytes.len();
        hasher.update(format!("{len}:").as_bytes());
        hasher.update(bytes);
    }
}
