// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use fleet_dispatch::CoreError;
use fleet_dispatch_domain::{DispatchStatus, DomainError, ResourceRef};
use thiserror::Error;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the caller-facing
/// contract. Every variant carries enough context to name the offending
/// station, model or id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// A request field is missing, malformed or contradicts another field.
    #[error("Invalid value for '{field}': {message}")]
    InvalidRequest {
        /// The offending request field.
        field: String,
        /// Why it was rejected.
        message: String,
    },
    /// The source station cannot satisfy the requested amount.
    #[error(
        "Capacity exceeded at station {station_id} for {resource}: requested {requested}, available {available}"
    )]
    CapacityExceeded {
        /// The source station.
        station_id: i64,
        /// The pool that fell short, e.g. `vehicles of model 3` or `staff`.
        resource: String,
        /// The requested amount.
        requested: u32,
        /// The available amount.
        available: u32,
    },
    /// A specific vehicle or staff member cannot be claimed.
    #[error("{resource_type} {resource_id} is not available")]
    ResourceUnavailable {
        /// `vehicle` or `staff`.
        resource_type: String,
        /// The first offending id.
        resource_id: i64,
    },
    /// Another writer claimed the same resources first. Safe to retry.
    #[error("Concurrent modification: {message}")]
    ConcurrentModification {
        /// What conflicted.
        message: String,
    },
    /// The dispatch is in a status that does not accept the command.
    #[error("Invalid state transition from '{from}': {message}")]
    InvalidStateTransition {
        /// The current status.
        from: String,
        /// What was attempted.
        message: String,
    },
    /// The dispatch, station or staff member does not exist.
    #[error("{resource_type} not found: {message}")]
    NotFound {
        /// The kind of resource.
        resource_type: String,
        /// A description of what was looked up.
        message: String,
    },
    /// Approval needs a source station and none is recorded or supplied.
    #[error("Dispatch {dispatch_id} has no source station")]
    MissingFromStation {
        /// The dispatch being approved.
        dispatch_id: i64,
    },
    /// Approval needs a final description.
    #[error("Dispatch {dispatch_id} cannot be approved without a final description")]
    MissingFinalDescription {
        /// The dispatch being approved.
        dispatch_id: i64,
    },
    /// Storage or other infrastructure failure. The operation was rolled back.
    #[error("Internal error: {message}")]
    Internal {
        /// Details of the failure.
        message: String,
    },
}

impl ApiError {
    /// Returns true if repeating the same call may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. })
    }

    /// A stable machine-readable name for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "invalid_request",
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::ResourceUnavailable { .. } => "resource_unavailable",
            Self::ConcurrentModification { .. } => "concurrent_modification",
            Self::InvalidStateTransition { .. } => "invalid_state_transition",
            Self::NotFound { .. } => "not_found",
            Self::MissingFromStation { .. } => "missing_from_station",
            Self::MissingFinalDescription { .. } => "missing_final_description",
            Self::Internal { .. } => "internal",
        }
    }
}

const fn resource_parts(resource: ResourceRef) -> (&'static str, i64) {
    match resource {
        ResourceRef::Vehicle(id) => ("vehicle", id.get()),
        ResourceRef::Staff(id) => ("staff", id.get()),
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidRequest { field, reason } => ApiError::InvalidRequest {
            field,
            message: reason,
        },
        DomainError::SameStation(station_id) => ApiError::InvalidRequest {
            field: String::from("fromStationId"),
            message: format!("source and destination are both {station_id}"),
        },
        DomainError::SourceStationMismatch { planned, supplied } => ApiError::InvalidRequest {
            field: String::from("fromStationId"),
            message: format!("request was planned against {planned}, got {supplied}"),
        },
        DomainError::DuplicateResource(resource) => {
            let (resource_type, resource_id) = resource_parts(resource);
            let field: &str = match resource {
                ResourceRef::Vehicle(_) => "vehicleIds",
                ResourceRef::Staff(_) => "staffIds",
            };
            ApiError::InvalidRequest {
                field: String::from(field),
                message: format!("{resource_type} {resource_id} is listed more than once"),
            }
        }
        DomainError::CapacityExceeded {
            station_id,
            resource,
            requested,
            available,
        } => ApiError::CapacityExceeded {
            station_id: station_id.get(),
            resource: resource.to_string(),
            requested,
            available,
        },
        DomainError::InvalidStatusTransition { from, event } => {
            ApiError::InvalidStateTransition {
                from: from.to_string(),
                message: format!("'{event}' is not allowed"),
            }
        }
        DomainError::UpdateRequiresPending(requested) => ApiError::InvalidStateTransition {
            from: DispatchStatus::Pending.to_string(),
            message: format!("an update cannot move a dispatch to '{requested}'"),
        },
        DomainError::InvalidDispatchStatus(value) => ApiError::InvalidRequest {
            field: String::from("status"),
            message: format!("unknown dispatch status '{value}'"),
        },
        DomainError::MissingFromStation(dispatch_id) => ApiError::MissingFromStation {
            dispatch_id: dispatch_id.get(),
        },
        DomainError::MissingFinalDescription(dispatch_id) => ApiError::MissingFinalDescription {
            dispatch_id: dispatch_id.get(),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::DispatchNotFound(dispatch_id) => ApiError::NotFound {
            resource_type: String::from("Dispatch"),
            message: format!("{dispatch_id} does not exist"),
        },
        CoreError::StationNotFound(station_id) => ApiError::NotFound {
            resource_type: String::from("Station"),
            message: format!("{station_id} does not exist"),
        },
        CoreError::StaffNotFound(staff_id) => ApiError::NotFound {
            resource_type: String::from("Staff"),
            message: format!("{staff_id} does not exist"),
        },
        CoreError::ResourceUnavailable(resource) => {
            let (resource_type, resource_id) = resource_parts(resource);
            ApiError::ResourceUnavailable {
                resource_type: String::from(resource_type),
                resource_id,
            }
        }
        CoreError::ConcurrentModification(message) => ApiError::ConcurrentModification { message },
        CoreError::Persistence(msg) => ApiError::Internal {
            message: format!("Persistence failure: {msg}"),
        },
        CoreError::Timestamp(msg) => ApiError::Internal {
            message: format!("Timestamp failure: {msg}"),
        },
    }
}
