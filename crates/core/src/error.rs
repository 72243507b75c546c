// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleet_dispatch_domain::{DispatchId, DomainError, ResourceRef, StaffId, StationId};

/// Errors that can occur during state transitions and their side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The dispatch does not exist or has been soft-deleted.
    DispatchNotFound(DispatchId),
    /// The station does not exist.
    StationNotFound(StationId),
    /// The staff member (or administrator) does not exist.
    StaffNotFound(StaffId),
    /// A specific staff member or vehicle cannot be claimed: it does not
    /// exist at the source station, is claimed elsewhere, is rented out or
    /// is on leave.
    ResourceUnavailable(ResourceRef),
    /// Another writer changed the claimed resources first.
    ConcurrentModification(String),
    /// The storage layer failed.
    Persistence(String),
    /// The transition timestamp could not be produced.
    Timestamp(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::DispatchNotFound(dispatch_id) => write!(f, "{dispatch_id} not found"),
            Self::StationNotFound(station_id) => write!(f, "{station_id} not found"),
            Self::StaffNotFound(staff_id) => write!(f, "{staff_id} not found"),
            Self::ResourceUnavailable(resource) => write!(f, "{resource} is not available"),
            Self::ConcurrentModification(reason) => {
                write!(f, "Concurrent modification: {reason}")
            }
            Self::Persistence(msg) => write!(f, "Persistence error: {msg}"),
            Self::Timestamp(msg) => write!(f, "Failed to produce timestamp: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
