//! Typed parse events and the synchronous bus that delivers them.
//!
//! The grammar never mutates anything outside itself; every match it cares
//! about becomes a [`ParseEvent`] pushed through an [`EventBus`]. Listeners
//! run on the parsing call stack, in subscription order, before matching
//! continues.

use cppfacts::Visibility;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Something the grammar matched.
///
/// Serializes with an `event` tag, which makes event traces easy to dump
/// and diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ParseEvent {
    /// A tracked `{`
    ScopePush,
    /// A tracked `}`
    ScopePop,
    /// One segment of a namespace declaration, with the depth outside it
    NamespaceSeen { name: String, depth: u32 },
    EnumSeen { name: String, depth: u32 },
    EnumClassSeen { name: String, depth: u32 },
    /// An enumerator; its value, if any, is not carried
    EnumMemberSeen { enum_name: String, identifier: String },
    ClassSeen { name: String, depth: u32 },
    StructSeen { name: String, depth: u32 },
    /// The `};` closing a class or struct body
    ClassPop,
    ParentSeen { name: String, visibility: Visibility },
    VisibilityChange { visibility: Visibility },
    MemberSeen {
        type_name: String,
        name: String,
        is_const: bool,
        is_static: bool,
    },
    MethodSeen {
        return_type: String,
        name: String,
        is_const: bool,
        is_static: bool,
        is_virtual: bool,
    },
    /// Raw text between `[[` and `]]`
    AnnotationSeen { text: String },
}

/// Payload-free discriminant of [`ParseEvent`], used for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    ScopePush,
    ScopePop,
    NamespaceSeen,
    EnumSeen,
    EnumClassSeen,
    EnumMemberSeen,
    ClassSeen,
    StructSeen,
    ClassPop,
    ParentSeen,
    VisibilityChange,
    MemberSeen,
    MethodSeen,
    AnnotationSeen,
}

impl ParseEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ParseEvent::ScopePush => EventKind::ScopePush,
            ParseEvent::ScopePop => EventKind::ScopePop,
            ParseEvent::NamespaceSeen { .. } => EventKind::NamespaceSeen,
            ParseEvent::EnumSeen { .. } => EventKind::EnumSeen,
            ParseEvent::EnumClassSeen { .. } => EventKind::EnumClassSeen,
            ParseEvent::EnumMemberSeen { .. } => EventKind::EnumMemberSeen,
            ParseEvent::ClassSeen { .. } => EventKind::ClassSeen,
            ParseEvent::StructSeen { .. } => EventKind::StructSeen,
            ParseEvent::ClassPop => EventKind::ClassPop,
            ParseEvent::ParentSeen { .. } => EventKind::ParentSeen,
            ParseEvent::VisibilityChange { .. } => EventKind::VisibilityChange,
            ParseEvent::MemberSeen { .. } => EventKind::MemberSeen,
            ParseEvent::MethodSeen { .. } => EventKind::MethodSeen,
            ParseEvent::AnnotationSeen { .. } => EventKind::AnnotationSeen,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::ScopePush => "scope-push",
            EventKind::ScopePop => "scope-pop",
            EventKind::NamespaceSeen => "namespace-seen",
            EventKind::EnumSeen => "enum-seen",
            EventKind::EnumClassSeen => "enum-class-seen",
            EventKind::EnumMemberSeen => "enum-member-seen",
            EventKind::ClassSeen => "class-seen",
            EventKind::StructSeen => "struct-seen",
            EventKind::ClassPop => "class-pop",
            EventKind::ParentSeen => "parent-seen",
            EventKind::VisibilityChange => "visibility-change",
            EventKind::MemberSeen => "member-seen",
            EventKind::MethodSeen => "method-seen",
            EventKind::AnnotationSeen => "annotation-seen",
        };
        f.write_str(name)
    }
}

/// Receiver of parse events.
///
/// Implemented for any `FnMut(&ParseEvent)`. Closures passed to
/// [`EventBus::subscribe`] need the argument type spelled out
/// (`|event: &ParseEvent| ...`) so they accept every borrow lifetime.
pub trait ParseListener {
    fn on_event(&mut self, event: &ParseEvent);
}

impl<F> ParseListener for F
where
    F: FnMut(&ParseEvent),
{
    fn on_event(&mut self, event: &ParseEvent) {
        self(event)
    }
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription<'l> {
    id: SubscriptionId,
    kinds: Option<Vec<EventKind>>,
    listener: Box<dyn ParseListener + 'l>,
}

impl Subscription<'_> {
    fn wants(&self, kind: EventKind) -> bool {
        self.kinds.as_ref().map_or(true, |kinds| kinds.contains(&kind))
    }
}

/// Ordered registry of listeners.
///
/// Listeners may borrow state for `'l`; the borrow checker keeps that state
/// alive for as long as the bus can still deliver into it.
#[derive(Default)]
pub struct EventBus<'l> {
    subscriptions: Vec<Subscription<'l>>,
    next_id: u64,
}

impl<'l> EventBus<'l> {
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
            next_id: 0,
        }
    }

    /// Deliver every event to `listener`
    pub fn subscribe<L>(&mut self, listener: L) -> SubscriptionId
    where
        L: ParseListener + 'l,
    {
        self.add(None, Box::new(listener))
    }

    /// Deliver only events whose kind is in `kinds`
    pub fn subscribe_to<L>(&mut self, kinds: &[EventKind], listener: L) -> SubscriptionId
    where
        L: ParseListener + 'l,
    {
        self.add(Some(kinds.to_vec()), Box::new(listener))
    }

    fn add(
        &mut self,
        kinds: Option<Vec<EventKind>>,
        listener: Box<dyn ParseListener + 'l>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            kinds,
            listener,
        });
        id
    }

    /// Stop delivering to a listener. Returns `false` for an unknown id.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Deliver `event` to every interested listener, in subscription order
    pub fn emit(&mut self, event: &ParseEvent) {
        let kind = event.kind();
        for subscription in &mut self.subscriptions {
            if subscription.wants(kind) {
                subscription.listener.on_event(event);
            }
        }
    }
}

impl fmt::Debug for EventBus<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.subscriptions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_in_subscription_order() {
        let mut seen = Vec::new();
        {
            let seen = std::cell::RefCell::new(&mut seen);
            let mut bus = EventBus::new();
            bus.subscribe(|e: &ParseEvent| seen.borrow_mut().push(format!("a:{}", e.kind())));
            bus.subscribe(|e: &ParseEvent| seen.borrow_mut().push(format!("b:{}", e.kind())));
            bus.emit(&ParseEvent::ScopePush);
            bus.emit(&ParseEvent::ClassPop);
        }
        assert_eq!(
            seen,
            vec!["a:scope-push", "b:scope-push", "a:class-pop", "b:class-pop"]
        );
    }

    #[test]
    fn test_kind_filter() {
        let mut pops = 0;
        {
            let mut bus = EventBus::new();
            bus.subscribe_to(&[EventKind::ScopePop], |_: &ParseEvent| pops += 1);
            bus.emit(&ParseEvent::ScopePush);
            bus.emit(&ParseEvent::ScopePop);
            bus.emit(&ParseEvent::VisibilityChange {
                visibility: Visibility::Public,
            });
        }
        assert_eq!(pops, 1);
    }

    #[test]
    fn test_unsubscribe() {
        let mut count = 0;
        {
            let mut bus = EventBus::new();
            let id = bus.subscribe(|_: &ParseEvent| count += 1);
            bus.emit(&ParseEvent::ScopePush);
            assert!(bus.unsubscribe(id));
            assert!(!bus.unsubscribe(id));
            assert_eq!(bus.listener_count(), 0);
            bus.emit(&ParseEvent::ScopePush);
        }
        assert_eq!(count, 1);
    }

    #[test]
    fn test_event_kind() {
        let event = ParseEvent::MemberSeen {
            type_name: "int".into(),
            name: "x".into(),
            is_const: false,
            is_static: false,
        };
        assert_eq!(event.kind(), EventKind::MemberSeen);
        assert_eq!(EventKind::EnumClassSeen.to_string(), "enum-class-seen");
    }

    #[test]
    fn test_event_json_shape() {
        let event = ParseEvent::NamespaceSeen {
            name: "foo".into(),
            depth: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "namespaceSeen");
        assert_eq!(json["depth"], 2);

        let json = serde_json::to_value(ParseEvent::VisibilityChange {
            visibility: Visibility::Protected,
        })
        .unwrap();
        assert_eq!(json["visibility"], "protected");
        assert_eq!(
            serde_json::to_value(EventKind::ClassPop).unwrap(),
            "class-pop"
        );
    }
}
