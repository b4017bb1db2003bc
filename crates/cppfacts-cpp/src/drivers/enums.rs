//! Accumulates enum and enum class declarations.

use super::{NamespaceStack, TransitionError};
use crate::events::ParseEvent;
use cppfacts::EnumData;
use log::{debug, warn};
use std::mem;

/// Whether an enum body is being read
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum EnumState {
    #[default]
    Idle,
    Open(EnumData),
}

type EnumSubscriber<'p> = Box<dyn FnMut(&str, &EnumData) + 'p>;

/// Builds one [`EnumData`] per enum body and publishes it under its fully
/// qualified name when the body closes.
///
/// The first `ScopePop` after an enum opens is always its own closing
/// brace; enum bodies contain no tracked braces.
pub struct EnumDriver<'p> {
    namespaces: NamespaceStack,
    state: EnumState,
    subscribers: Vec<EnumSubscriber<'p>>,
    violations: Vec<TransitionError>,
}

impl<'p> EnumDriver<'p> {
    pub fn new() -> Self {
        Self {
            namespaces: NamespaceStack::new(),
            state: EnumState::Idle,
            subscribers: Vec::new(),
            violations: Vec::new(),
        }
    }

    /// Call `subscriber` with `(qualified name, data)` for every finished enum
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&str, &EnumData) + 'p,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn state(&self) -> &EnumState {
        &self.state
    }

    pub fn violations(&self) -> &[TransitionError] {
        &self.violations
    }

    pub fn take_violations(&mut self) -> Vec<TransitionError> {
        mem::take(&mut self.violations)
    }

    pub fn handle(&mut self, event: &ParseEvent) {
        self.namespaces.handle(event);
        match event {
            ParseEvent::EnumSeen { name, .. } => self.open(name, false),
            ParseEvent::EnumClassSeen { name, .. } => self.open(name, true),
            ParseEvent::EnumMemberSeen { identifier, .. } => match &mut self.state {
                EnumState::Open(data) => data.identifiers.push(identifier.clone()),
                EnumState::Idle => self.violation(TransitionError::EnumMemberWhileIdle {
                    identifier: identifier.clone(),
                }),
            },
            ParseEvent::ScopePop => self.finish(),
            _ => {}
        }
    }

    fn open(&mut self, name: &str, is_class_enum: bool) {
        if let EnumState::Open(open) = &self.state {
            let error = TransitionError::EnumWhileOpen {
                name: name.to_string(),
                open: open.name.clone(),
            };
            self.violation(error);
            return;
        }
        let mut data = EnumData::new(name).with_namespaces(self.namespaces.names());
        data.is_class_enum = is_class_enum;
        self.state = EnumState::Open(data);
    }

    fn finish(&mut self) {
        let EnumState::Open(data) = mem::replace(&mut self.state, EnumState::Idle) else {
            return;
        };
        let key = data.full_name();
        debug!(
            "Publishing enum {key} with {} identifiers",
            data.identifiers.len()
        );
        for subscriber in &mut self.subscribers {
            subscriber(&key, &data);
        }
    }

    fn violation(&mut self, error: TransitionError) {
        warn!("Enum driver: {error}");
        self.violations.push(error);
    }
}

impl Default for EnumDriver<'_> {
    fn default() -> Self {
        Self::new()
    }
}
