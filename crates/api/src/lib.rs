// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller-facing boundary of the dispatch workflow.
//!
//! Handlers are generic over [`fleet_dispatch::UnitOfWork`], so any storage
//! adapter that can hand out a transactional [`fleet_dispatch::DispatchStore`]
//! can drive them. Authentication is out of scope: callers identify the
//! acting administrator with an [`AuthenticatedAdmin`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

use fleet_dispatch_audit::Actor;
use fleet_dispatch_domain::StaffId;

pub use error::{ApiError, translate_core_error, translate_domain_error};
pub use handlers::{
    confirm_dispatch, create_dispatch, delete_dispatch, get_dispatch, get_expanded,
    update_dispatch,
};
pub use request_response::{
    ConfirmDispatchRequest, CreateDispatchRequest, CreateDispatchResponse, DeleteDispatchResponse,
    DescriptionBody, DispatchResponse, ListDispatchesRequest, ListDispatchesResponse,
    ModelQuantityBody, StaffInfo, StationInfo, UpdateDispatchRequest, UpdateDispatchResponse,
    VehicleInfo, VehicleLineRequest,
};

/// The administrator on whose behalf a command runs.
///
/// The staff id must exist; its station is the destination of every
/// dispatch the administrator creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAdmin {
    /// The administrator's staff id.
    pub staff_id: StaffId,
}

impl AuthenticatedAdmin {
    /// Creates a new authenticated administrator.
    #[must_use]
    pub const fn new(staff_id: StaffId) -> Self {
        Self { staff_id }
    }

    /// Converts this administrator into an audit Actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::admin(self.staff_id)
    }
}
