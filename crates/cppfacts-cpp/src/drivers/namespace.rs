//! Namespace path tracking from scope and namespace events.

use crate::events::ParseEvent;
use cppfacts::{join_namespace, NamespaceEntry};

/// Stack of open namespaces plus the current scope depth.
///
/// Each entity driver owns one, so the path it snapshots is always the path
/// enclosing the event being handled.
#[derive(Debug, Default, Clone)]
pub struct NamespaceStack {
    entries: Vec<NamespaceEntry>,
    depth: u32,
}

impl NamespaceStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: &ParseEvent) {
        match event {
            ParseEvent::NamespaceSeen { name, depth } => {
                self.entries.push(NamespaceEntry::new(name.clone(), depth + 1));
            }
            ParseEvent::ScopePush => self.depth += 1,
            ParseEvent::ScopePop => {
                self.depth = self.depth.saturating_sub(1);
                // One brace may close several `a::b::c` segments
                while self
                    .entries
                    .last()
                    .is_some_and(|entry| entry.is_stale_at(self.depth))
                {
                    self.entries.pop();
                }
            }
            _ => {}
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn entries(&self) -> &[NamespaceEntry] {
        &self.entries
    }

    /// Names of the open namespaces, outermost first
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name.clone()).collect()
    }

    /// The `::`-joined path, empty at global scope
    pub fn path(&self) -> String {
        join_namespace(&self.names())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
