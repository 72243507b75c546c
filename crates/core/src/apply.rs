// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{Command, CreateDispatch};
use crate::error::CoreError;
use crate::state::{SideEffect, TransitionResult, dispatch_snapshot};
use fleet_dispatch_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use fleet_dispatch_domain::{
    DispatchDescription, DispatchEvent, DispatchId, DispatchRequest, DispatchStatus, DomainError,
    StaffId, StationId, validate_stations,
};

/// Applies a creation, producing the new pending aggregate and audit event.
///
/// The returned aggregate has no id yet; the caller inserts it, runs the
/// effects against the assigned id and binds the audit event to it.
///
/// # Arguments
///
/// * `command` - The creation intent, including the allocation plan
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The transition timestamp (RFC 3339)
///
/// # Errors
///
/// Returns an error if source and destination are the same station.
pub fn apply_create(
    command: CreateDispatch,
    actor: Actor,
    cause: Cause,
    now: &str,
) -> Result<TransitionResult, CoreError> {
    validate_stations(Some(command.from_station_id), command.to_station_id)?;

    let links = command.plan.links();
    let description: DispatchDescription = command.plan.description(command.note);

    let new_dispatch: DispatchRequest = DispatchRequest {
        dispatch_id: None,
        description: Some(description),
        final_description: None,
        status: DispatchStatus::Pending,
        from_station_id: Some(command.from_station_id),
        to_station_id: command.to_station_id,
        request_admin_id: command.request_admin_id,
        approved_admin_id: None,
        created_at: now.to_string(),
        updated_at: now.to_string(),
        deleted_at: None,
    };

    let action: Action = Action::new(
        String::from("CreateDispatch"),
        Some(format!(
            "Requested {} vehicle(s) and {} staff from {} to {}",
            links.vehicles.len(),
            links.staff.len(),
            command.from_station_id,
            command.to_station_id
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        StateSnapshot::empty(),
        dispatch_snapshot(&new_dispatch),
        None,
    );

    Ok(TransitionResult {
        new_dispatch,
        effects: vec![SideEffect::ReplaceRelations(links)],
        audit_event,
    })
}

/// Applies a command to an existing dispatch, producing the next aggregate,
/// its side effects and an audit event.
///
/// # Arguments
///
/// * `current` - The dispatch as loaded inside the current transaction
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The transition timestamp (RFC 3339)
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new aggregate, effects and audit event
/// * `Err(CoreError)` if the command is invalid for the current state
///
/// # Errors
///
/// Returns an error if:
/// - The dispatch is soft-deleted (`DispatchNotFound`)
/// - The transition is not in the table
/// - An approval cannot resolve its source station or lacks a final description
/// - A supplied source conflicts with the planned one
pub fn apply(
    current: &DispatchRequest,
    command: Command,
    actor: Actor,
    cause: Cause,
    now: &str,
) -> Result<TransitionResult, CoreError> {
    let Some(dispatch_id) = current.dispatch_id else {
        return Err(CoreError::DomainViolation(DomainError::InvalidRequest {
            field: String::from("id"),
            reason: String::from("dispatch has not been persisted"),
        }));
    };
    if current.is_deleted() {
        return Err(CoreError::DispatchNotFound(dispatch_id));
    }

    let action_name: &'static str = command.action_name();
    let mut next: DispatchRequest = current.clone();
    next.updated_at = now.to_string();

    let (effects, details): (Vec<SideEffect>, String) = match command {
        Command::Update {
            requested_status,
            links,
            description,
        } => {
            next.status = current.status.apply_event(DispatchEvent::Update)?;
            if requested_status != DispatchStatus::Pending {
                return Err(DomainError::UpdateRequiresPending(requested_status).into());
            }
            let details: String = format!(
                "Re-planned {dispatch_id} with {} vehicle(s) and {} staff",
                links.vehicles.len(),
                links.staff.len()
            );
            next.description = Some(description);
            (vec![SideEffect::ReplaceRelations(links)], details)
        }
        Command::Confirm {
            decision,
            approved_admin_id,
            from_station_id,
            final_description,
        } => {
            let event: DispatchEvent = DispatchStatus::confirm_event(decision)?;
            next.status = current.status.apply_event(event)?;
            next.approved_admin_id = Some(approved_admin_id);

            match event {
                DispatchEvent::Approve => approve(
                    current,
                    &mut next,
                    dispatch_id,
                    approved_admin_id,
                    from_station_id,
                    final_description,
                )?,
                _ => (
                    vec![SideEffect::ReleaseClaims],
                    format!("Rejected {dispatch_id} by {approved_admin_id}"),
                ),
            }
        }
        Command::SoftDelete => {
            next.deleted_at = Some(now.to_string());
            let effects: Vec<SideEffect> = if current.is_active_claim() {
                vec![SideEffect::ReleaseClaims]
            } else {
                Vec::new()
            };
            (
                effects,
                format!("Deleted {dispatch_id} in status '{}'", current.status),
            )
        }
    };

    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(String::from(action_name), Some(details)),
        dispatch_snapshot(current),
        dispatch_snapshot(&next),
        Some(dispatch_id),
    );

    Ok(TransitionResult {
        new_dispatch: next,
        effects,
        audit_event,
    })
}

/// Resolves the source station and final description of an approval.
fn approve(
    current: &DispatchRequest,
    next: &mut DispatchRequest,
    dispatch_id: DispatchId,
    approved_admin_id: StaffId,
    supplied_from: Option<StationId>,
    final_description: Option<DispatchDescription>,
) -> Result<(Vec<SideEffect>, String), CoreError> {
    let mut effects: Vec<SideEffect> = Vec::new();

    let from_station_id: StationId = match (current.from_station_id, supplied_from) {
        (Some(planned), Some(supplied)) if planned != supplied => {
            return Err(DomainError::SourceStationMismatch { planned, supplied }.into());
        }
        (Some(planned), _) => planned,
        (None, Some(supplied)) => {
            validate_stations(Some(supplied), current.to_station_id)?;
            // The plan was never checked against this station.
            effects.push(SideEffect::VerifyLinksAtStation(supplied));
            supplied
        }
        (None, None) => return Err(DomainError::MissingFromStation(dispatch_id).into()),
    };

    let Some(final_description) = final_description else {
        return Err(DomainError::MissingFinalDescription(dispatch_id).into());
    };

    next.from_station_id = Some(from_station_id);
    next.final_description = Some(final_description);
    effects.push(SideEffect::TransferToStation(current.to_station_id));

    Ok((
        effects,
        format!(
            "Approved {dispatch_id} by {approved_admin_id}: {from_station_id} to {}",
            current.to_station_id
        ),
    ))
}
