//! Platform classification and per-platform facet settings.
//!
//! A module definition may carry one of the platform tokens `common`, `jvm`
//! or `js`. The token selects a [`PlatformKind`] and creates a
//! [`PlatformSettings`] record for the module. Finalization later fills in
//! the names of the modules it implements through `expectedBy` edges.

use serde::Serialize;
use std::fmt;

/// Target environment of a module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// No platform attribute was given.
    #[default]
    None,
    /// Platform-independent `expect` declarations.
    Common,
    /// JVM target.
    Jvm,
    /// JavaScript target.
    Js,
}

impl PlatformKind {
    /// Map a module attribute key onto a platform kind.
    ///
    /// Returns `None` for keys that are not platform tokens.
    ///
    /// ```rust
    /// use modgraph::platform::PlatformKind;
    /// assert_eq!(PlatformKind::from_token("jvm"), Some(PlatformKind::Jvm));
    /// assert_eq!(PlatformKind::from_token("edit"), None);
    /// ```
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "common" => Some(Self::Common),
            "jvm" => Some(Self::Jvm),
            "js" => Some(Self::Js),
            _ => None,
        }
    }

    /// Token used for this kind in modules files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Common => "common",
            Self::Jvm => "jvm",
            Self::Js => "js",
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facet settings attached to a module with an explicit platform.
///
/// The concrete compiler arguments belong to the orchestration layer; the
/// graph only records the kind and the modules this one implements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformSettings {
    kind: PlatformKind,
    implemented_module_names: Vec<String>,
}

impl PlatformSettings {
    /// Create settings for the given platform kind.
    #[must_use]
    pub const fn for_kind(kind: PlatformKind) -> Self {
        Self {
            kind,
            implemented_module_names: Vec::new(),
        }
    }

    /// Platform kind these settings were created for.
    #[must_use]
    pub const fn kind(&self) -> PlatformKind {
        self.kind
    }

    /// Names of modules reachable through `expectedBy` edges.
    #[must_use]
    pub fn implemented_module_names(&self) -> &[String] {
        &self.implemented_module_names
    }

    /// Replace the implemented module names.
    pub fn set_implemented_module_names(&mut self, names: Vec<String>) {
        self.implemented_module_names = names;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("common", Some(PlatformKind::Common))]
    #[case("jvm", Some(PlatformKind::Jvm))]
    #[case("js", Some(PlatformKind::Js))]
    #[case("none", None)]
    #[case("JVM", None)]
    fn from_token_maps_platform_tokens(#[case] token: &str, #[case] expected: Option<PlatformKind>) {
        assert_eq!(PlatformKind::from_token(token), expected);
    }

    #[test]
    fn settings_start_without_implemented_modules() {
        let settings = PlatformSettings::for_kind(PlatformKind::Jvm);
        assert_eq!(settings.kind(), PlatformKind::Jvm);
        assert!(settings.implemented_module_names().is_empty());
    }

    #[test]
    fn settings_serialize_kind_and_implemented_modules() {
        let mut settings = PlatformSettings::for_kind(PlatformKind::Js);
        settings.set_implemented_module_names(vec!["core".to_owned()]);
        let value = serde_json::to_value(&settings).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({"kind": "js", "implemented_module_names": ["core"]})
        );
    }
}
