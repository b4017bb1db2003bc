//! Accumulates class and struct declarations with their members, methods
//! and parents.

use super::{NamespaceStack, TransitionError};
use crate::annotation::AnnotationFlags;
use crate::events::ParseEvent;
use cppfacts::{ClassData, MemberData, MethodData, Visibility};
use log::{debug, warn};
use std::mem;

/// Whether a class body is being read
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum ClassState {
    #[default]
    Idle,
    Open(ClassData),
}

/// Annotation flags waiting for the next member or method.
///
/// Consumed by exactly one `MemberSeen` or `MethodSeen`; a method takes
/// them and ignores them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PendingFlags {
    pub serializable: bool,
    pub getter: bool,
    pub setter: bool,
}

impl PendingFlags {
    fn add(&mut self, flags: AnnotationFlags) {
        self.serializable |= flags.cereal;
        self.getter |= flags.get;
        self.setter |= flags.set;
    }
}

type ClassSubscriber<'p> = Box<dyn FnMut(&str, &ClassData) + 'p>;

/// Builds one [`ClassData`] per class body and publishes it at the `};`
/// that closes it.
pub struct ClassDriver<'p> {
    namespaces: NamespaceStack,
    state: ClassState,
    visibility: Visibility,
    pending: PendingFlags,
    /// `[[cereal]]` seen before the class keyword
    next_serializable: bool,
    subscribers: Vec<ClassSubscriber<'p>>,
    violations: Vec<TransitionError>,
}

impl<'p> ClassDriver<'p> {
    pub fn new() -> Self {
        Self {
            namespaces: NamespaceStack::new(),
            state: ClassState::Idle,
            visibility: Visibility::Private,
            pending: PendingFlags::default(),
            next_serializable: false,
            subscribers: Vec::new(),
            violations: Vec::new(),
        }
    }

    /// Call `subscriber` with `(qualified name, data)` for every finished class
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&str, &ClassData) + 'p,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn state(&self) -> &ClassState {
        &self.state
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn pending(&self) -> PendingFlags {
        self.pending
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
            ParseEvent::ClassSeen { name, .. } => self.open(name, false),
            ParseEvent::StructSeen { name, .. } => self.open(name, true),
            ParseEvent::AnnotationSeen { text } => self.annotate(text),
            ParseEvent::ClassPop => self.finish(event),
            ParseEvent::ParentSeen { name, .. } => {
                if let Some(class) = self.open_class(event) {
                    class.parents.push(name.clone());
                }
            }
            ParseEvent::VisibilityChange { visibility } => {
                if self.open_class(event).is_some() {
                    self.visibility = *visibility;
                }
            }
            ParseEvent::MemberSeen {
                type_name,
                name,
                is_const,
                is_static,
            } => {
                let pending = mem::take(&mut self.pending);
                let visibility = self.visibility;
                let Some(class) = self.open_class(event) else {
                    return;
                };
                let mut member = MemberData::new(type_name.clone(), name.clone())
                    .with_visibility(visibility);
                member.is_const = *is_const;
                member.is_static = *is_static;
                member.serializable = pending.serializable || class.serializable;
                member.generate_getter = pending.getter;
                member.generate_setter = pending.setter;
                class.members.push(member);
            }
            ParseEvent::MethodSeen {
                return_type,
                name,
                is_const,
                is_static,
                is_virtual,
            } => {
                self.pending = PendingFlags::default();
                let visibility = self.visibility;
                let Some(class) = self.open_class(event) else {
                    return;
                };
                let mut method = MethodData::new(return_type.clone(), name.clone())
                    .with_visibility(visibility);
                method.is_const = *is_const;
                method.is_static = *is_static;
                method.is_virtual = *is_virtual;
                class.methods.push(method);
            }
            _ => {}
        }
    }

    fn open(&mut self, name: &str, is_struct: bool) {
        if let ClassState::Open(open) = &self.state {
            let error = TransitionError::ClassWhileOpen {
                name: name.to_string(),
                open: open.name.clone(),
            };
            self.violation(error);
            return;
        }
        let mut class = ClassData::new(name).with_namespaces(self.namespaces.names());
        class.is_struct = is_struct;
        class.serializable = mem::take(&mut self.next_serializable);
        self.visibility = Visibility::default_for(is_struct);
        self.pending = PendingFlags::default();
        self.state = ClassState::Open(class);
    }

    fn annotate(&mut self, text: &str) {
        let flags = AnnotationFlags::parse(text);
        match self.state {
            ClassState::Open(_) => self.pending.add(flags),
            ClassState::Idle => self.next_serializable |= flags.cereal,
        }
    }

    fn finish(&mut self, event: &ParseEvent) {
        let state = mem::replace(&mut self.state, ClassState::Idle);
        let ClassState::Open(class) = state else {
            self.violation(TransitionError::ClassEventWhileIdle {
                event: event.kind(),
            });
            return;
        };
        let key = class.full_class_name();
        debug!(
            "Publishing {} {key} with {} members and {} methods",
            if class.is_struct { "struct" } else { "class" },
            class.members.len(),
            class.methods.len()
        );
        for subscriber in &mut self.subscribers {
            subscriber(&key, &class);
        }
        self.visibility = Visibility::Private;
        self.pending = PendingFlags::default();
    }

    /// The class being built, or a recorded violation for `event`
    fn open_class(&mut self, event: &ParseEvent) -> Option<&mut ClassData> {
        match &mut self.state {
            ClassState::Open(class) => Some(class),
            ClassState::Idle => {
                let error = TransitionError::ClassEventWhileIdle {
                    event: event.kind(),
                };
                warn!("Class driver: {error}");
                self.violations.push(error);
                None
            }
        }
    }

    fn violation(&mut self, error: TransitionError) {
        warn!("Class driver: {error}");
        self.violations.push(error);
    }
}

impl Default for ClassDriver<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::grammar::ParserDriver;

    fn classes_in(source: &str) -> Vec<(String, ClassData)> {
        let mut published = Vec::new();
        {
            let mut driver = ClassDriver::new();
            driver.subscribe(|name: &str, data: &ClassData| {
                published.push((name.to_string(), data.clone()))
            });
            let mut parser = ParserDriver::new();
            parser.subscribe(|event: &ParseEvent| driver.handle(event));
            let outcome = parser.parse(source);
            assert!(outcome.success, "remainder: {}", outcome.remainder);
        }
        published
    }

    #[test]
    fn test_public_member_and_method() {
        let published = classes_in(
            "namespace app { class Foo { public: int x; void bar(); }; }",
        );
        assert_eq!(published.len(), 1);
        let (name, class) = &published[0];
        assert_eq!(name, "app::Foo");
        assert!(!class.is_struct);
        assert_eq!(
            class.members,
            vec![MemberData::new("int", "x").with_visibility(Visibility::Public)]
        );
        assert_eq!(
            class.methods,
            vec![MethodData::new("void", "bar").with_visibility(Visibility::Public)]
        );
    }

    #[test]
    fn test_default_visibility() {
        let published = classes_in("class C { int hidden; }; struct S { int shown; };");
        assert_eq!(published[0].1.members[0].visibility, Visibility::Private);
        assert_eq!(published[1].1.members[0].visibility, Visibility::Public);
        assert!(published[1].1.is_struct);
    }

    #[test]
    fn test_class_level_cereal() {
        let published = classes_in("[[cereal]] struct Config { int a; std::string b; };");
        let class = &published[0].1;
        assert!(class.serializable);
        assert!(class.members.iter().all(|m| m.serializable));
        assert!(class.members.iter().all(|m| !m.generate_getter));
    }

    #[test]
    fn test_member_flags_are_one_shot() {
        let published = classes_in(
            "class Person { [[cereal,get,set]] std::string name; int age; [[get]] void f(); int after; };",
        );
        let class = &published[0].1;
        assert!(!class.serializable);
        let name = &class.members[0];
        assert!(name.serializable && name.generate_getter && name.generate_setter);
        let age = &class.members[1];
        assert!(!(age.serializable || age.generate_getter || age.generate_setter));
        assert!(!class.members[2].generate_getter);
    }

    #[test]
    fn test_flags_split_across_annotations() {
        let published = classes_in("class P { [[get]] [[set]] int v; };");
        let v = &published[0].1.members[0];
        assert!(v.generate_getter && v.generate_setter && !v.serializable);
    }

    #[test]
    fn test_parents_and_methods() {
        let published = classes_in(
            "struct Derived final : Base, protected virtual Mixin<int> { int get() const override; static Derived make(); };",
        );
        let class = &published[0].1;
        assert_eq!(class.parents, vec!["Base", "Mixin<int>"]);
        assert!(class.methods[0].is_const && class.methods[0].is_virtual);
        assert!(class.methods[1].is_static);
    }

    #[test]
    fn test_class_after_class_resets_state() {
        let published = classes_in("class A { public: int a; }; class B { int b; };");
        assert_eq!(published[1].1.members[0].visibility, Visibility::Private);
    }

    #[test]
    fn test_member_while_idle_is_recorded() {
        let mut driver = ClassDriver::new();
        driver.handle(&ParseEvent::MemberSeen {
            type_name: "int".into(),
            name: "x".into(),
            is_const: false,
            is_static: false,
        });
        driver.handle(&ParseEvent::ClassPop);
        assert_eq!(
            driver.take_violations(),
            vec![
                TransitionError::ClassEventWhileIdle {
                    event: EventKind::MemberSeen
                },
                TransitionError::ClassEventWhileIdle {
                    event: EventKind::ClassPop
                },
            ]
        );
    }

    #[test]
    fn test_idle_get_annotation_is_ignored() {
        let mut driver = ClassDriver::new();
        driver.handle(&ParseEvent::AnnotationSeen { text: "get".into() });
        driver.handle(&ParseEvent::ClassSeen {
            name: "X".into(),
            depth: 0,
        });
        assert_eq!(driver.pending(), PendingFlags::default());
        assert!(matches!(driver.state(), ClassState::Open(c) if !c.serializable));
        assert_eq!(driver.visibility(), Visibility::Private);
    }
}
