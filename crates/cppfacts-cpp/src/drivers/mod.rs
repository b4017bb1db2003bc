//! Event listeners that turn the flat event stream into entities.
//!
//! Each driver keeps its own [`NamespaceStack`], so drivers can be
//! subscribed independently and in any order.

mod classes;
mod enums;
mod namespace;

pub use classes::{ClassDriver, ClassState, PendingFlags};
pub use enums::{EnumDriver, EnumState};
pub use namespace::NamespaceStack;

use crate::events::EventKind;
use thiserror::Error;

/// An event arrived in a state where it cannot apply.
///
/// Drivers record these and keep going; the offending event is dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("enum member `{identifier}` outside an enum body")]
    EnumMemberWhileIdle { identifier: String },

    #[error("enum `{name}` started while enum `{open}` is still open")]
    EnumWhileOpen { name: String, open: String },

    #[error("{event} event outside a class body")]
    ClassEventWhileIdle { event: EventKind },

    #[error("class `{name}` started while class `{open}` is still open")]
    ClassWhileOpen { name: String, open: String },
}
