// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::dispatch_status::{DispatchEvent, DispatchStatus};
use crate::types::{CapacityResource, DispatchId, ResourceRef, StationId};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field is missing or malformed.
    InvalidRequest {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// Source and destination station are the same.
    SameStation(StationId),
    /// The supplied source station differs from the one the plan was made
    /// against.
    SourceStationMismatch {
        /// The source station recorded on the request.
        planned: StationId,
        /// The source station supplied by the caller.
        supplied: StationId,
    },
    /// The same staff member or vehicle was listed more than once.
    DuplicateResource(ResourceRef),
    /// A resource pool at the source station cannot satisfy the request.
    CapacityExceeded {
        /// The station whose inventory was checked.
        station_id: StationId,
        /// The first pool that fell short.
        resource: CapacityResource,
        /// How many were requested.
        requested: u32,
        /// How many were available.
        available: u32,
    },
    /// The event is not permitted from the current status.
    InvalidStatusTransition {
        /// The current status.
        from: DispatchStatus,
        /// The rejected event.
        event: DispatchEvent,
    },
    /// An update asked for a status other than `pending`.
    UpdateRequiresPending(DispatchStatus),
    /// A status string could not be parsed.
    InvalidDispatchStatus(String),
    /// Approval requires a source station and none could be resolved.
    MissingFromStation(DispatchId),
    /// Approval requires a final description and none was supplied.
    MissingFinalDescription(DispatchId),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequest { field, reason } => {
                write!(f, "Invalid request field '{field}': {reason}")
            }
            Self::SameStation(station_id) => {
                write!(
                    f,
                    "Source and destination must differ, both are {station_id}"
                )
            }
            Self::SourceStationMismatch { planned, supplied } => {
                write!(
                    f,
                    "Source {supplied} does not match the planned source {planned}"
                )
            }
            Self::DuplicateResource(resource) => {
                write!(f, "{resource} is listed more than once")
            }
            Self::CapacityExceeded {
                station_id,
                resource,
                requested,
                available,
            } => {
                write!(
                    f,
                    "Capacity exceeded at {station_id}: requested {requested} {resource}, only {available} available"
                )
            }
            Self::InvalidStatusTransition { from, event } => {
                write!(
                    f,
                    "Cannot {event} a dispatch in status '{from}': transition not permitted"
                )
            }
            Self::UpdateRequiresPending(requested) => {
                write!(
                    f,
                    "Update cannot move a dispatch to '{requested}', only 'pending' is accepted"
                )
            }
            Self::InvalidDispatchStatus(status) => {
                write!(f, "Invalid dispatch status: '{status}'")
            }
            Self::MissingFromStation(dispatch_id) => {
                write!(f, "Cannot approve {dispatch_id}: no source station")
            }
            Self::MissingFinalDescription(dispatch_id) => {
                write!(f, "Cannot approve {dispatch_id}: no final description")
            }
        }
    }
}

impl std::error::Error for DomainError {}
