// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The storage boundary of the dispatch workflow.
//!
//! Every [`DispatchStore`] method runs inside the transaction of the
//! [`UnitOfWork`] that handed the store out. Availability always means:
//!
//! - the resource belongs to the given station
//! - no *other* active (pending, not deleted) dispatch links it
//! - for vehicles, no active rental contract covers it
//! - for staff, the member is not on leave
//!
//! The optional `exclude` dispatch id treats that dispatch's own links as
//! released, which is how a re-plan can keep resources it already holds.

use crate::error::CoreError;
use crate::view::{AvailableVehicle, DispatchFilter, ExpandedDispatch};
use fleet_dispatch_audit::AuditEvent;
use fleet_dispatch_domain::{
    DispatchId, DispatchLinks, DispatchRequest, DispatchRequestStaff, DispatchRequestVehicle,
    ModelId, ResourceRef, StaffId, StationId, VehicleId,
};

/// Transactional access to dispatch requests and the inventory they claim.
pub trait DispatchStore {
    /// Returns the subset of `vehicle_ids` available at `station_id`,
    /// ascending by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn get_available_vehicles_by_ids(
        &mut self,
        station_id: StationId,
        vehicle_ids: &[VehicleId],
        exclude: Option<DispatchId>,
    ) -> Result<Vec<AvailableVehicle>, CoreError>;

    /// Returns the subset of `staff_ids` available at `station_id`,
    /// ascending by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn get_available_staff_by_ids(
        &mut self,
        station_id: StationId,
        staff_ids: &[StaffId],
        exclude: Option<DispatchId>,
    ) -> Result<Vec<StaffId>, CoreError>;

    /// Counts free staff at a station.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn count_available_staff_in_station(
        &mut self,
        station_id: StationId,
        exclude: Option<DispatchId>,
    ) -> Result<u32, CoreError>;

    /// Counts free vehicles of one model at a station.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn count_available_vehicles_by_model(
        &mut self,
        station_id: StationId,
        model_id: ModelId,
        exclude: Option<DispatchId>,
    ) -> Result<u32, CoreError>;

    /// Lists free vehicles of one model at a station, ascending by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn list_available_vehicles(
        &mut self,
        station_id: StationId,
        model_id: ModelId,
        exclude: Option<DispatchId>,
    ) -> Result<Vec<VehicleId>, CoreError>;

    /// Lists free staff at a station, ascending by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn list_available_staff(
        &mut self,
        station_id: StationId,
        exclude: Option<DispatchId>,
    ) -> Result<Vec<StaffId>, CoreError>;

    /// Deletes every link row of a dispatch. Returns the number of rows
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn clear_dispatch_relations(&mut self, dispatch_id: DispatchId) -> Result<usize, CoreError>;

    /// Inserts link rows. Returns the number of rows inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn add_dispatch_relations(
        &mut self,
        staff: &[DispatchRequestStaff],
        vehicles: &[DispatchRequestVehicle],
    ) -> Result<usize, CoreError>;

    /// Counts how many of the given resources are claimed by another active
    /// dispatch, plus how many of the vehicles are under an active rental.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn count_conflicting_claims(
        &mut self,
        dispatch_id: DispatchId,
        staff_ids: &[StaffId],
        vehicle_ids: &[VehicleId],
    ) -> Result<usize, CoreError>;

    /// Returns the first linked resource (vehicles first, ascending ids) that
    /// is not currently at `station_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn find_link_outside_station(
        &mut self,
        dispatch_id: DispatchId,
        station_id: StationId,
    ) -> Result<Option<ResourceRef>, CoreError>;

    /// Moves every staff member linked to the dispatch to `to_station_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn update_staff_station_for_dispatch(
        &mut self,
        dispatch_id: DispatchId,
        to_station_id: StationId,
    ) -> Result<usize, CoreError>;

    /// Moves every vehicle linked to the dispatch to `to_station_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn update_vehicle_station_for_dispatch(
        &mut self,
        dispatch_id: DispatchId,
        to_station_id: StationId,
    ) -> Result<usize, CoreError>;

    /// Serializes writers that plan against the same station. May be a
    /// no-op on backends whose transactions already hold a writer lock.
    ///
    /// # Errors
    ///
    /// Returns `StationNotFound` if the station does not exist, or an error
    /// if the underlying storage fails.
    fn lock_station(&mut self, station_id: StationId) -> Result<(), CoreError>;

    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn model_exists(&mut self, model_id: ModelId) -> Result<bool, CoreError>;

    /// Returns the station a staff member belongs to, if the staff member
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn get_staff_station(&mut self, staff_id: StaffId) -> Result<Option<StationId>, CoreError>;

    /// Inserts a new dispatch row and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn insert_dispatch(&mut self, dispatch: &DispatchRequest) -> Result<DispatchId, CoreError>;

    /// Loads a dispatch row, including soft-deleted ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn get_dispatch(&mut self, dispatch_id: DispatchId)
    -> Result<Option<DispatchRequest>, CoreError>;

    /// Writes every mutable column of an existing dispatch row. Returns the
    /// number of rows updated.
    ///
    /// # Errors
    ///
    /// Returns an error if the dispatch has no id or the underlying storage
    /// fails.
    fn save_dispatch(&mut self, dispatch: &DispatchRequest) -> Result<usize, CoreError>;

    /// Loads the link set of a dispatch, ascending ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn get_dispatch_links(&mut self, dispatch_id: DispatchId) -> Result<DispatchLinks, CoreError>;

    /// Loads the expanded view of a dispatch. Soft-deleted rows are treated
    /// as missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn get_by_id_with_full_info(
        &mut self,
        dispatch_id: DispatchId,
    ) -> Result<Option<ExpandedDispatch>, CoreError>;

    /// Loads the expanded views matching `filter`, ordered by id, without
    /// soft-deleted rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn get_all_expanded(
        &mut self,
        filter: &DispatchFilter,
    ) -> Result<Vec<ExpandedDispatch>, CoreError>;

    /// Persists an audit event and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, CoreError>;
}

/// Runs work against a [`DispatchStore`] inside one database transaction.
pub trait UnitOfWork {
    /// Runs `work` in a write transaction. The transaction commits only if
    /// `work` returns `Ok`; any error (or a panic) rolls it back.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `work`, or a `CoreError` if the
    /// transaction could not be started or committed.
    fn transaction<T, F>(&mut self, work: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn DispatchStore) -> Result<T, CoreError>;

    /// Runs `work` against a consistent read snapshot, without taking a
    /// writer lock up front.
    ///
    /// `work` must not write. Implementations roll the transaction back
    /// when `work` returns, so anything it does write is discarded.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `work`, or a `CoreError` if the
    /// snapshot could not be taken.
    fn read<T, F>(&mut self, work: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn DispatchStore) -> Result<T, CoreError>;
}
