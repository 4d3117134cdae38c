//! Tag, State and Event traits.
//!
//! A machine works over two closed sets of names: the tags of its states and
//! the kinds of its events. Both are plain fieldless enums implementing
//! [`Tag`]. State and event values carry one of those names as their
//! discriminant, alongside whatever payload the variant holds.

use std::fmt::Debug;
use std::hash::Hash;

/// A name drawn from a closed, compile-time-known set.
///
/// Implemented by the fieldless companion enums that [`states!`](crate::states)
/// and [`events!`](crate::events) generate, or by hand.
///
/// # Example
///
/// ```rust
/// use tagmachine::core::Tag;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Light {
///     Red,
///     Green,
/// }
///
/// impl Tag for Light {
///     const ALL: &'static [Self] = &[Self::Red, Self::Green];
///
///     fn name(self) -> &'static str {
///         match self {
///             Self::Red => "Red",
///             Self::Green => "Green",
///         }
///     }
/// }
///
/// assert_eq!(Light::from_name("Green"), Some(Light::Green));
/// assert_eq!(Light::from_name("Blue"), None);
/// ```
pub trait Tag: Copy + Eq + Hash + Debug + 'static {
    /// Every member of the set, in declaration order.
    const ALL: &'static [Self];

    /// The member's name as used in logs and transition specs.
    fn name(self) -> &'static str;

    /// Look a member up by its name.
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|tag| tag.name() == name)
    }
}

/// A tagged state value.
///
/// The payload of a state is fixed when the value is constructed; the machine
/// never mutates a state, it replaces it with the value a transition returns.
///
/// # Example
///
/// ```rust
/// use tagmachine::core::{State, Tag};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum DoorTag {
///     Open,
///     Closed,
/// }
///
/// impl Tag for DoorTag {
///     const ALL: &'static [Self] = &[Self::Open, Self::Closed];
///
///     fn name(self) -> &'static str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///         }
///     }
/// }
///
/// #[derive(Debug)]
/// enum Door {
///     Open { visitors: u32 },
///     Closed,
/// }
///
/// impl State for Door {
///     type Tag = DoorTag;
///
///     fn tag(&self) -> DoorTag {
///         match self {
///             Self::Open { .. } => DoorTag::Open,
///             Self::Closed => DoorTag::Closed,
///         }
///     }
/// }
///
/// assert_eq!(Door::Open { visitors: 2 }.name(), "Open");
/// ```
pub trait State: Debug + 'static {
    /// The closed set of tags this state type draws from.
    type Tag: Tag;

    /// The discriminant of this value.
    fn tag(&self) -> Self::Tag;

    /// Name of the tag, for display and logging.
    fn name(&self) -> &'static str {
        self.tag().name()
    }
}

/// A named, parameterized request to attempt a transition.
///
/// The variant is the event's type; its fields are the event's parameters.
pub trait Event: Debug + 'static {
    /// The closed set of event kinds.
    type Kind: Tag;

    fn kind(&self) -> Self::Kind;

    fn name(&self) -> &'static str {
        self.kind().name()
    }
}
