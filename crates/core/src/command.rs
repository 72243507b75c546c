// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleet_dispatch_domain::{
    AllocationPlan, DispatchDescription, DispatchLinks, DispatchStatus, StaffId, StationId,
};

/// Intent to open a new dispatch request.
///
/// The allocation plan must already have been computed against a snapshot
/// taken inside the same transaction that will persist the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDispatch {
    /// Station the resources leave from.
    pub from_station_id: StationId,
    /// Station the resources move to (the requesting admin's station).
    pub to_station_id: StationId,
    /// The requesting administrator.
    pub request_admin_id: StaffId,
    /// The concrete vehicles and staff to claim.
    pub plan: AllocationPlan,
    /// Optional free-form remark stored in the description.
    pub note: Option<String>,
}

/// A command against an existing dispatch request, as data only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the claimed staff and vehicles of a pending request.
    Update {
        /// The status the caller asked for. Only `Pending` is accepted.
        requested_status: DispatchStatus,
        /// The new, already verified link set.
        links: DispatchLinks,
        /// The description to store for the new link set.
        description: DispatchDescription,
    },
    /// Decide a pending request.
    Confirm {
        /// `Approved` or `Rejected`.
        decision: DispatchStatus,
        /// The administrator taking the decision.
        approved_admin_id: StaffId,
        /// Source station, required at approval if none was recorded.
        from_station_id: Option<StationId>,
        /// The approved allocation, required at approval.
        final_description: Option<DispatchDescription>,
    },
    /// Mark the request as deleted. Accepted from every status.
    SoftDelete,
}

impl Command {
    /// The audit action name for this command.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::Update { .. } => "UpdateDispatch",
            Self::Confirm {
                decision: DispatchStatus::Approved,
                ..
            } => "ApproveDispatch",
            Self::Confirm { .. } => "RejectDispatch",
            Self::SoftDelete => "DeleteDispatch",
        }
    }
}
