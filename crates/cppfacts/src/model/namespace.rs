use serde::{Deserialize, Serialize};

/// Separator between namespace segments in a fully qualified name
pub const PATH_SEPARATOR: &str = "::";

/// One open namespace on the namespace stack
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamespaceEntry {
    /// Namespace name (a single segment, never `a::b`)
    pub name: String,

    /// Scope depth inside the namespace body. The entry is stale once the
    /// current depth drops below this value.
    pub scope_depth: u32,
}

impl NamespaceEntry {
    pub fn new(name: impl Into<String>, scope_depth: u32) -> Self {
        Self {
            name: name.into(),
            scope_depth,
        }
    }

    /// True once the namespace's own closing brace has been seen
    pub fn is_stale_at(&self, depth: u32) -> bool {
        depth < self.scope_depth
    }
}

/// Join namespace segments with `::`
pub fn join_namespace<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}

/// Build a fully qualified name. An empty namespace path yields `name` alone.
pub fn qualify<S: AsRef<str>>(segments: &[S], name: &str) -> String {
    let mut qualified = String::new();
    for segment in segments {
        qualified.push_str(segment.as_ref());
        qualified.push_str(PATH_SEPARATOR);
    }
    qualified.push_str(name);
    qualified
}

/// The last segment of a fully qualified name
pub fn short_name(qualified: &str) -> &str {
    qualified
        .rsplit(PATH_SEPARATOR)
        .next()
        .unwrap_or(qualified)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify_with_namespaces() {
        assert_eq!(qualify(&["foo", "bar"], "Color"), "foo::bar::Color");
    }

    #[test]
    fn test_qualify_without_namespaces() {
        let empty: [&str; 0] = [];
        assert_eq!(qualify(&empty, "fish"), "fish");
    }

    #[test]
    fn test_join_namespace() {
        assert_eq!(join_namespace(&["a", "b", "c"]), "a::b::c");
        let empty: [String; 0] = [];
        assert_eq!(join_namespace(&empty), "");
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("foo::bar::Color"), "Color");
        assert_eq!(short_name("fish"), "fish");
    }

    #[test]
    fn test_entry_staleness() {
        let entry = NamespaceEntry::new("foo", 1);
        assert!(!entry.is_stale_at(2));
        assert!(!entry.is_stale_at(1));
        assert!(entry.is_stale_at(0));
    }
}
