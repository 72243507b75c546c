// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use fleet_dispatch_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use fleet_dispatch_domain::{
    DispatchDescription, DispatchId, DispatchRequest, DispatchStatus, StaffId, StationId,
};
use serde::{Deserialize, Serialize};

use crate::diesel_schema::{audit_events, dispatch_requests};
use crate::error::PersistenceError;

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// A `dispatch_requests` row as stored.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = dispatch_requests)]
pub struct DispatchRow {
    pub dispatch_id: i64,
    pub description: Option<String>,
    pub final_description: Option<String>,
    pub status: String,
    pub from_station_id: Option<i64>,
    pub to_station_id: i64,
    pub request_admin_id: i64,
    pub approved_admin_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

impl DispatchRow {
    /// Rebuilds the domain aggregate from the stored row.
    ///
    /// # Errors
    ///
    /// Returns an error if the status or a description cannot be parsed.
    pub fn into_domain(self) -> Result<DispatchRequest, PersistenceError> {
        let status: DispatchStatus = self
            .status
            .parse()
            .map_err(|e| PersistenceError::ReconstructionError(format!("{e}")))?;

        Ok(DispatchRequest {
            dispatch_id: Some(DispatchId::new(self.dispatch_id)),
            description: decode_description(self.description.as_deref())?,
            final_description: decode_description(self.final_description.as_deref())?,
            status,
            from_station_id: self.from_station_id.map(StationId::new),
            to_station_id: StationId::new(self.to_station_id),
            request_admin_id: StaffId::new(self.request_admin_id),
            approved_admin_id: self.approved_admin_id.map(StaffId::new),
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        })
    }
}

/// Serializes an optional description into its column value.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_description(
    description: Option<&DispatchDescription>,
) -> Result<Option<String>, PersistenceError> {
    Ok(description.map(serde_json::to_string).transpose()?)
}

fn decode_description(
    column: Option<&str>,
) -> Result<Option<DispatchDescription>, PersistenceError> {
    Ok(column.map(serde_json::from_str).transpose()?)
}

/// An `audit_events` row as stored.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = audit_events)]
pub struct AuditEventRow {
    pub event_id: i64,
    pub dispatch_id: Option<i64>,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
}

impl AuditEventRow {
    /// Rebuilds the audit event from its JSON columns.
    ///
    /// # Errors
    ///
    /// Returns an error if any column fails to deserialize.
    pub fn into_domain(self) -> Result<AuditEvent, PersistenceError> {
        let actor: ActorData = serde_json::from_str(&self.actor_json)?;
        let cause: CauseData = serde_json::from_str(&self.cause_json)?;
        let action: ActionData = serde_json::from_str(&self.action_json)?;
        let before: StateSnapshotData = serde_json::from_str(&self.before_snapshot_json)?;
        let after: StateSnapshotData = serde_json::from_str(&self.after_snapshot_json)?;

        let mut event: AuditEvent = AuditEvent::new(
            Actor::new(actor.id, actor.actor_type),
            Cause::new(cause.id, cause.description),
            Action::new(action.name, action.details),
            StateSnapshot::new(before.data),
            StateSnapshot::new(after.data),
            self.dispatch_id.map(DispatchId::new),
        );
        event.event_id = Some(self.event_id);
        Ok(event)
    }
}
