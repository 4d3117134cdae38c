//! A single asynchronous call modelled as a four-state machine.
//!
//! ```text
//! IDLE | RESOLVED | REJECTED --execute--> PENDING
//! PENDING --resolve--> RESOLVED
//! PENDING --reject--> REJECTED
//! ```
//!
//! The machine performs no I/O. Whoever owns the async runtime watches entry
//! into `PENDING` (see [`Machine::on_pending`]), starts the call with the
//! pending params and feeds the outcome back through [`Machine::settle`].
//!
//! # Example
//!
//! ```
//! use tagmachine::task::{task_definition, TaskState, TaskStatus};
//!
//! let machine = task_definition::<u32, String, String>().spawn(TaskState::Idle);
//!
//! machine.execute(7);
//! assert_eq!(machine.tag(), TaskStatus::Pending);
//!
//! machine.settle(Ok("done".to_string()));
//! assert_eq!(*machine.state(), TaskState::Resolved { value: "done".to_string() });
//! ```

use crate::core::{Event, State, Tag, Transition, TransitionTable};
use crate::machine::{create_machine, Definition, Machine, Subscription};
use std::fmt::Debug;

/// Bound shared by the params, value and error types of a task.
pub trait Payload: Clone + Debug + 'static {}

impl<T: Clone + Debug + 'static> Payload for T {}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TaskStatus {
    Idle,
    Pending,
    Resolved,
    Rejected,
}

impl Tag for TaskStatus {
    const ALL: &'static [Self] = &[Self::Idle, Self::Pending, Self::Resolved, Self::Rejected];

    fn name(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Pending => "PENDING",
            Self::Resolved => "RESOLVED",
            Self::Rejected => "REJECTED",
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TaskState<P, T, Err> {
    Idle,
    Pending { params: P },
    Resolved { value: T },
    Rejected { error: Err },
}

impl<P: Payload, T: Payload, Err: Payload> State for TaskState<P, T, Err> {
    type Tag = TaskStatus;

    fn tag(&self) -> TaskStatus {
        match self {
            Self::Idle => TaskStatus::Idle,
            Self::Pending { .. } => TaskStatus::Pending,
            Self::Resolved { .. } => TaskStatus::Resolved,
            Self::Rejected { .. } => TaskStatus::Rejected,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TaskEventKind {
    Execute,
    Resolve,
    Reject,
}

impl Tag for TaskEventKind {
    const ALL: &'static [Self] = &[Self::Execute, Self::Resolve, Self::Reject];

    fn name(self) -> &'static str {
        match self {
            Self::Execute => "execute",
            Self::Resolve => "resolve",
            Self::Reject => "reject",
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TaskEvent<P, T, Err> {
    Execute(P),
    Resolve(T),
    Reject(Err),
}

impl<P: Payload, T: Payload, Err: Payload> Event for TaskEvent<P, T, Err> {
    type Kind = TaskEventKind;

    fn kind(&self) -> TaskEventKind {
        match self {
            Self::Execute(_) => TaskEventKind::Execute,
            Self::Resolve(_) => TaskEventKind::Resolve,
            Self::Reject(_) => TaskEventKind::Reject,
        }
    }
}

impl<P, T, Err> From<Result<T, Err>> for TaskEvent<P, T, Err> {
    fn from(result: Result<T, Err>) -> Self {
        match result {
            Ok(value) => Self::Resolve(value),
            Err(error) => Self::Reject(error),
        }
    }
}

pub type TaskMachine<P, T, Err> = Machine<TaskState<P, T, Err>, TaskEvent<P, T, Err>>;

type TaskTransition<P, T, Err> = Transition<TaskState<P, T, Err>, TaskEvent<P, T, Err>>;

// Each helper is registered only under its own kind; the fallback arms are
// never reached through the table.
fn start<P: Payload, T: Payload, Err: Payload>() -> TaskTransition<P, T, Err> {
    TaskTransition::<P, T, Err>::with(
        |event: &TaskEvent<P, T, Err>, state: &TaskState<P, T, Err>| match event {
            TaskEvent::Execute(params) => TaskState::Pending {
                params: params.clone(),
            },
            _ => state.clone(),
        },
    )
}

fn resolve<P: Payload, T: Payload, Err: Payload>() -> TaskTransition<P, T, Err> {
    TaskTransition::<P, T, Err>::with(
        |event: &TaskEvent<P, T, Err>, state: &TaskState<P, T, Err>| match event {
            TaskEvent::Resolve(value) => TaskState::Resolved {
                value: value.clone(),
            },
            _ => state.clone(),
        },
    )
}

fn reject<P: Payload, T: Payload, Err: Payload>() -> TaskTransition<P, T, Err> {
    TaskTransition::<P, T, Err>::with(
        |event: &TaskEvent<P, T, Err>, state: &TaskState<P, T, Err>| match event {
            TaskEvent::Reject(error) => TaskState::Rejected {
                error: error.clone(),
            },
            _ => state.clone(),
        },
    )
}

/// The task transition table, built fresh on every call.
pub fn task_table<P: Payload, T: Payload, Err: Payload>(
) -> TransitionTable<TaskState<P, T, Err>, TaskEvent<P, T, Err>> {
    TransitionTable::from_entries(vec![
        (TaskStatus::Idle, TaskEventKind::Execute, start()),
        (TaskStatus::Pending, TaskEventKind::Resolve, resolve()),
        (TaskStatus::Pending, TaskEventKind::Reject, reject()),
        (TaskStatus::Resolved, TaskEventKind::Execute, start()),
        (TaskStatus::Rejected, TaskEventKind::Execute, start()),
    ])
}

/// A definition over [`task_table`], labelled `"task"`.
pub fn task_definition<P: Payload, T: Payload, Err: Payload>(
) -> Definition<TaskState<P, T, Err>, TaskEvent<P, T, Err>> {
    create_machine(task_table()).with_label("task")
}

impl<P: Payload, T: Payload, Err: Payload> Machine<TaskState<P, T, Err>, TaskEvent<P, T, Err>> {
    /// Start the call. Ignored while a call is pending.
    pub fn execute(&self, params: P) {
        self.send(TaskEvent::Execute(params));
    }

    /// Report the outcome of the pending call. Ignored unless pending.
    pub fn settle(&self, result: Result<T, Err>) {
        self.send(result.into());
    }

    /// Call `on_pending(params)` each time the machine enters `PENDING`,
    /// including right away if it already is.
    pub fn on_pending<F>(&self, on_pending: F) -> Subscription
    where
        F: Fn(&P) + 'static,
    {
        self.on_enter([TaskStatus::Pending], move |state| {
            if let TaskState::Pending { params } = state {
                on_pending(params);
            }
            None
        })
    }
}
