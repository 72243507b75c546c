// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use fleet_dispatch_domain::{DispatchId, StaffId};

#[cfg(test)]
mod tests;

/// The entity performing an action.
///
/// Dispatch commands are always issued by an administrator, identified by
/// their staff id. Maintenance tooling uses the `system` actor type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "admin", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// Creates an actor for an administrator acting under their staff id.
    #[must_use]
    pub fn admin(staff_id: StaffId) -> Self {
        Self::new(staff_id.get().to_string(), String::from("admin"))
    }

    /// Returns the staff id of an `admin` actor.
    #[must_use]
    pub fn staff_id(&self) -> Option<StaffId> {
        if self.actor_type != "admin" {
            return None;
        }
        self.id.parse::<i64>().ok().map(StaffId::new)
    }
}

/// The reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID, CLI invocation).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// The specific action performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`CreateDispatch`", "`ApproveDispatch`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A rendering of a dispatch request at one point in time.
///
/// The empty snapshot stands for "did not exist yet".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// A string representation of the state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    ///
    /// # Arguments
    ///
    /// * `data` - A string representation of the state
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// The snapshot recorded before a creation.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            data: String::new(),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// An immutable audit event representing one dispatch state transition.
///
/// Every successful transition produces exactly one audit event, recording:
/// - Who performed the action (actor)
/// - Why it was performed (cause)
/// - What action was performed (action)
/// - The state before and after the transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Assigned by persistence; `None` until stored.
    pub event_id: Option<i64>,
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
    /// The dispatch the event belongs to. `None` only while a creation is
    /// still being staged and its row id is unknown.
    pub dispatch_id: Option<DispatchId>,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    /// * `dispatch_id` - The dispatch the transition applies to, if known
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        dispatch_id: Option<DispatchId>,
    ) -> Self {
        Self {
            event_id: None,
            actor,
            cause,
            action,
            before,
            after,
            dispatch_id,
        }
    }

    /// Returns the event bound to the given dispatch.
    #[must_use]
    pub fn for_dispatch(mut self, dispatch_id: DispatchId) -> Self {
        self.dispatch_id = Some(dispatch_id);
        self
    }
}
