//! Exact-transition specs and their `"A => E => B"` text form.

use crate::core::Tag;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

const SEPARATOR: &str = "=>";

/// Errors produced when reading transition specs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("Malformed transition spec '{spec}', expected '<state> => <event> => <state>'")]
    Malformed { spec: String },

    #[error("Unknown state '{name}' in transition spec '{spec}'")]
    UnknownState { spec: String, name: String },

    #[error("Unknown event '{name}' in transition spec '{spec}'")]
    UnknownEvent { spec: String, name: String },

    #[error("Transition spec '{spec}' starts from a state that does not handle its event")]
    Unhandled { spec: String },

    #[error("{} invalid transition specs: {}", .0.len(), list(.0))]
    Invalid(Vec<SpecError>),
}

fn list(errors: &[SpecError]) -> String {
    errors
        .iter()
        .map(SpecError::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl SpecError {
    /// Fold accumulated failures into one error.
    pub(crate) fn from_failures(errors: NonEmptyVec<SpecError>) -> Self {
        let errors: Vec<SpecError> = errors.iter().cloned().collect();
        Self::from_errors(errors).unwrap_or(Self::Invalid(Vec::new()))
    }

    /// `None` when there is nothing to report, the error itself when there is
    /// one, `Invalid` otherwise.
    pub(crate) fn from_errors(mut errors: Vec<SpecError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Invalid(errors)),
        }
    }
}

/// A realized transition to watch for: `from --event--> to`.
///
/// The text form is `"<from> => <event> => <to>"`, using tag and kind names.
/// Whitespace around each part is ignored.
///
/// # Example
///
/// ```
/// use tagmachine::router::TransitionSpec;
/// use tagmachine::{events, states};
///
/// states! {
///     #[derive(Debug)]
///     enum Door: DoorTag {
///         Open,
///         Closed,
///     }
/// }
///
/// events! {
///     #[derive(Debug)]
///     enum Action: ActionKind {
///         Close,
///     }
/// }
///
/// let spec: TransitionSpec<DoorTag, ActionKind> = "Open => Close => Closed".parse().unwrap();
/// assert_eq!(spec, TransitionSpec::new(DoorTag::Open, ActionKind::Close, DoorTag::Closed));
/// assert_eq!(spec.to_string(), "Open => Close => Closed");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TransitionSpec<T, K> {
    pub from: T,
    pub event: K,
    pub to: T,
}

impl<T: Tag, K: Tag> TransitionSpec<T, K> {
    pub fn new(from: T, event: K, to: T) -> Self {
        Self { from, event, to }
    }

    /// Whether a realized `(from, event, to)` triple is this one.
    pub fn matches(&self, from: T, event: K, to: T) -> bool {
        self.from == from && self.event == event && self.to == to
    }

    /// Parse the `"A => E => B"` form.
    pub fn parse(spec: &str) -> Result<Self, SpecError> {
        let parts: Vec<&str> = spec.split(SEPARATOR).map(str::trim).collect();
        let [from, event, to] = parts[..] else {
            return Err(SpecError::Malformed { spec: spec.into() });
        };
        if from.is_empty() || event.is_empty() || to.is_empty() {
            return Err(SpecError::Malformed { spec: spec.into() });
        }

        let state = |name: &str| {
            T::from_name(name).ok_or_else(|| SpecError::UnknownState {
                spec: spec.into(),
                name: name.into(),
            })
        };

        Ok(Self {
            from: state(from)?,
            event: K::from_name(event).ok_or_else(|| SpecError::UnknownEvent {
                spec: spec.into(),
                name: event.into(),
            })?,
            to: state(to)?,
        })
    }

    /// Parse several specs, reporting every failure rather than the first.
    pub fn parse_all<'a, I>(specs: I) -> Result<Vec<Self>, SpecError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let checks: Vec<Validation<Self, NonEmptyVec<SpecError>>> = specs
            .into_iter()
            .map(|spec| match Self::parse(spec) {
                Ok(parsed) => Validation::success(parsed),
                Err(error) => Validation::fail(error),
            })
            .collect();

        match Validation::all_vec(checks) {
            Validation::Success(parsed) => Ok(parsed),
            Validation::Failure(errors) => Err(SpecError::from_failures(errors)),
        }
    }
}

impl<T: Tag, K: Tag> fmt::Display for TransitionSpec<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {SEPARATOR} {} {SEPARATOR} {}",
            self.from.name(),
            self.event.name(),
            self.to.name()
        )
    }
}

impl<T: Tag, K: Tag> FromStr for TransitionSpec<T, K> {
    type Err = SpecError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        Self::parse(spec)
    }
}

impl<T: Tag, K: Tag> Serialize for TransitionSpec<T, K> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T: Tag, K: Tag> Deserialize<'de> for TransitionSpec<T, K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
