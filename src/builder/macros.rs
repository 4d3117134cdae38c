//! Macros for declaring tagged states and events.

/// Declare a state enum together with its companion tag enum.
///
/// Each variant is a tagged constructor: building it attaches the variant's
/// tag to whatever payload it carries. Unit, tuple and struct variants are
/// accepted. The tag enum gets `Copy`, `Eq`, `Hash` and `Debug`, and its
/// members are named after the variants. The declared enum must derive (or
/// implement) `Debug`.
///
/// # Example
///
/// ```
/// use tagmachine::core::{State, Tag};
/// use tagmachine::states;
///
/// states! {
///     #[derive(Clone, Debug, PartialEq)]
///     pub enum Fetch: FetchTag {
///         Idle,
///         Loading { url: String },
///         Loaded(Vec<u8>),
///     }
/// }
///
/// let loading = Fetch::Loading { url: "/a".into() };
/// assert_eq!(loading.tag(), FetchTag::Loading);
/// assert_eq!(loading.name(), "Loading");
/// assert_eq!(FetchTag::ALL.len(), 3);
/// ```
#[macro_export]
macro_rules! states {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $tag:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
                $( ( $($tuple:ty),* $(,)? ) )?
                $( { $($field:ident : $field_ty:ty),* $(,)? } )?
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
                $( ( $($tuple),* ) )?
                $( { $($field : $field_ty),* } )?
            ),+
        }

        $crate::__tag_enum! {
            $vis $tag { $($variant),+ }
        }

        impl $crate::core::State for $name {
            type Tag = $tag;

            fn tag(&self) -> $tag {
                match self {
                    $(Self::$variant { .. } => $tag::$variant),+
                }
            }
        }
    };
}

/// Declare an event enum together with its companion kind enum.
///
/// The variant is the event's type and its fields are the event's
/// parameters.
///
/// # Example
///
/// ```
/// use tagmachine::core::{Event, Tag};
/// use tagmachine::events;
///
/// events! {
///     #[derive(Debug)]
///     pub enum FetchEvent: FetchKind {
///         Load { url: String },
///         Loaded(Vec<u8>),
///         Cancel,
///     }
/// }
///
/// assert_eq!(FetchEvent::Cancel.kind(), FetchKind::Cancel);
/// assert_eq!(FetchKind::from_name("Loaded"), Some(FetchKind::Loaded));
/// ```
#[macro_export]
macro_rules! events {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $kind:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
                $( ( $($tuple:ty),* $(,)? ) )?
                $( { $($field:ident : $field_ty:ty),* $(,)? } )?
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
                $( ( $($tuple),* ) )?
                $( { $($field : $field_ty),* } )?
            ),+
        }

        $crate::__tag_enum! {
            $vis $kind { $($variant),+ }
        }

        impl $crate::core::Event for $name {
            type Kind = $kind;

            fn kind(&self) -> $kind {
                match self {
                    $(Self::$variant { .. } => $kind::$variant),+
                }
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __tag_enum {
    ($vis:vis $tag:ident { $($variant:ident),+ }) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $tag {
            $($variant),+
        }

        impl $crate::core::Tag for $tag {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }
        }
    };
}
