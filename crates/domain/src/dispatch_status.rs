// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dispatch status tracking and transition logic.
//!
//! This module defines the dispatch lifecycle states and the explicit
//! transition table. Any `(status, event)` pair that is not listed in the
//! table is rejected.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle states of a dispatch request.
///
/// The declaration order is the lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    /// Requested and holding an active claim on its staff and vehicles.
    Pending,
    /// Approved; staff and vehicles now belong to the destination station.
    Approved,
    /// Rejected; claims released.
    Rejected,
}

/// Events that drive a dispatch request through its lifecycle.
///
/// Creation is not an event here: every new request starts in
/// [`DispatchStatus::Pending`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchEvent {
    /// Re-plan the staff and vehicle links.
    Update,
    /// Confirm with an approval decision.
    Approve,
    /// Confirm with a rejection decision.
    Reject,
}

impl DispatchEvent {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

impl std::fmt::Display for DispatchEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The complete transition table.
const TRANSITIONS: [(DispatchStatus, DispatchEvent, DispatchStatus); 3] = [
    (
        DispatchStatus::Pending,
        DispatchEvent::Update,
        DispatchStatus::Pending,
    ),
    (
        DispatchStatus::Pending,
        DispatchEvent::Approve,
        DispatchStatus::Approved,
    ),
    (
        DispatchStatus::Pending,
        DispatchEvent::Reject,
        DispatchStatus::Rejected,
    ),
];

impl DispatchStatus {
    /// All states in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Approved, Self::Rejected];

    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true if no further lifecycle event is accepted.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Maps a requested confirm decision onto its event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRequest` if the decision is not
    /// `Approved` or `Rejected`.
    pub fn confirm_event(decision: Self) -> Result<DispatchEvent, DomainError> {
        match decision {
            Self::Approved => Ok(DispatchEvent::Approve),
            Self::Rejected => Ok(DispatchEvent::Reject),
            Self::Pending => Err(DomainError::InvalidRequest {
                field: String::from("status"),
                reason: String::from("confirm requires 'approved' or 'rejected'"),
            }),
        }
    }

    /// Looks up the target state for `event` in the transition table.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the pair is not
    /// listed in the table.
    pub fn apply_event(self, event: DispatchEvent) -> Result<Self, DomainError> {
        TRANSITIONS
            .iter()
            .find(|(from, ev, _)| *from == self && *ev == event)
            .map(|(_, _, to)| *to)
            .ok_or(DomainError::InvalidStatusTransition { from: self, event })
    }
}

impl std::fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DispatchStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidDispatchStatus(s.to_string())),
        }
    }
}
