// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleet_dispatch_audit::{AuditEvent, StateSnapshot};
use fleet_dispatch_domain::{DispatchLinks, DispatchRequest, StationId};

/// Work the caller must perform in the same transaction that saves the
/// new aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// Replace every staff and vehicle link of the dispatch.
    ReplaceRelations(DispatchLinks),
    /// Fail with `ResourceUnavailable` unless every linked resource is
    /// currently at this station. Emitted when the source station is first
    /// resolved at approval.
    VerifyLinksAtStation(StationId),
    /// Move every linked staff member and vehicle to the station.
    TransferToStation(StationId),
    /// The request no longer holds an active claim. The links stay in place
    /// for audit.
    ReleaseClaims,
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The aggregate after the transition.
    pub new_dispatch: DispatchRequest,
    /// Effects to run, in order, before commit.
    pub effects: Vec<SideEffect>,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

impl TransitionResult {
    /// The links this transition installs, if it replaces them.
    #[must_use]
    pub fn replaced_links(&self) -> Option<&DispatchLinks> {
        self.effects.iter().find_map(|effect| match effect {
            SideEffect::ReplaceRelations(links) => Some(links),
            _ => None,
        })
    }
}

/// Converts a dispatch request to a snapshot for audit purposes.
#[must_use]
pub fn dispatch_snapshot(dispatch: &DispatchRequest) -> StateSnapshot {
    let from: String = dispatch
        .from_station_id
        .map_or_else(|| String::from("none"), |id| id.get().to_string());
    let approved_by: String = dispatch
        .approved_admin_id
        .map_or_else(|| String::from("none"), |id| id.get().to_string());

    StateSnapshot::new(format!(
        "status={},from={},to={},approved_by={},vehicles={},staff={},deleted={}",
        dispatch.status,
        from,
        dispatch.to_station_id.get(),
        approved_by,
        dispatch
            .description
            .as_ref()
            .map_or(0, fleet_dispatch_domain::DispatchDescription::total_vehicles),
        dispatch.description.as_ref().map_or(0, |d| d.staff_count),
        dispatch.is_deleted(),
    ))
}
