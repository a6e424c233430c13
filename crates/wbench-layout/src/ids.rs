//! Stable identifiers for panes, tabs and documents.
//!
//! All identifiers are non-zero `u64`s so `0` can never be confused with a
//! real entity in logs or persisted layouts. Decoding a `0` fails.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u64", into = "u64")]
        pub struct $name(u64);

        impl TryFrom<u64> for $name {
            type Error = LayoutError;

            fn try_from(raw: u64) -> Result<Self, Self::Error> {
                Self::new(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl $name {
            /// Lowest valid identifier.
            pub const MIN: Self = Self(1);

            /// Create an identifier, rejecting 0.
            pub fn new(raw: u64) -> Result<Self, LayoutError> {
                if raw == 0 {
                    return Err(LayoutError::ZeroId { kind: $kind });
                }
                Ok(Self(raw))
            }

            /// Get the raw numeric value.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }

            /// Return the next identifier, or an error on overflow.
            pub fn checked_next(self) -> Result<Self, LayoutError> {
                let Some(next) = self.0.checked_add(1) else {
                    return Err(LayoutError::IdOverflow { kind: $kind });
                };
                Self::new(next)
            }
        }

        impl Id for $name {
            const MIN: Self = Self(1);

            fn checked_next(self) -> Result<Self, LayoutError> {
                $name::checked_next(self)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::MIN
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $kind, self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a node in the panel tree (leaf panes and splits alike).
    PaneId,
    "pane"
);
define_id!(
    /// Identifier of an open tab.
    TabId,
    "tab"
);
define_id!(
    /// Identifier of a document owned by the external document store.
    DocumentId,
    "doc"
);

/// Identifier kinds an [`IdAllocator`] can hand out.
pub trait Id: Copy {
    /// First identifier handed out by a fresh allocator.
    const MIN: Self;

    /// The identifier after `self`, or an error on overflow.
    fn checked_next(self) -> Result<Self, LayoutError>;
}

/// Deterministic monotonically increasing allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdAllocator<I> {
    next: I,
}

impl<I: Id> IdAllocator<I> {
    /// Start allocating from a known identifier.
    #[must_use]
    pub const fn with_next(next: I) -> Self {
        Self { next }
    }

    /// Peek at the next identifier without consuming it.
    #[must_use]
    pub const fn peek(&self) -> I {
        self.next
    }

    /// Allocate the next identifier and advance.
    pub fn allocate(&mut self) -> Result<I, LayoutError> {
        let current = self.next;
        self.next = self.next.checked_next()?;
        Ok(current)
    }
}

impl<I: Id> Default for IdAllocator<I> {
    fn default() -> Self {
        Self { next: I::MIN }
    }
}
