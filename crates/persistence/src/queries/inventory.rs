// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fleet_dispatch::AvailableVehicle;
use fleet_dispatch_domain::{
    DispatchId, DispatchStatus, ModelId, ResourceRef, StaffId, StationId, VehicleId,
};
use num_traits::ToPrimitive;
use tracing::debug;

use crate::diesel_schema::{
    dispatch_request_staff, dispatch_request_vehicles, dispatch_requests, rental_contracts, staff,
    vehicle_models, vehicles,
};
use crate::error::PersistenceError;

/// No dispatch has id 0, so it excludes nothing.
const NO_EXCLUSION: i64 = 0;

fn exclusion_id(exclude: Option<DispatchId>) -> i64 {
    exclude.map_or(NO_EXCLUSION, DispatchId::get)
}

fn count_to_u32(count: i64) -> Result<u32, PersistenceError> {
    count
        .to_u32()
        .ok_or_else(|| PersistenceError::DatabaseError("Count conversion failed".to_string()))
}

fn count_to_usize(count: i64) -> Result<usize, PersistenceError> {
    count
        .to_usize()
        .ok_or_else(|| PersistenceError::DatabaseError("Count conversion failed".to_string()))
}

/// Vehicle ids linked to a pending, non-deleted dispatch other than `$exclude`.
macro_rules! claimed_vehicle_ids {
    ($exclude:expr) => {
        dispatch_request_vehicles::table
            .inner_join(dispatch_requests::table)
            .filter(dispatch_requests::status.eq(DispatchStatus::Pending.as_str()))
            .filter(dispatch_requests::deleted_at.is_null())
            .filter(dispatch_requests::dispatch_id.ne($exclude))
            .select(dispatch_request_vehicles::vehicle_id)
    };
}

/// Staff ids linked to a pending, non-deleted dispatch other than `$exclude`.
macro_rules! claimed_staff_ids {
    ($exclude:expr) => {
        dispatch_request_staff::table
            .inner_join(dispatch_requests::table)
            .filter(dispatch_requests::status.eq(DispatchStatus::Pending.as_str()))
            .filter(dispatch_requests::deleted_at.is_null())
            .filter(dispatch_requests::dispatch_id.ne($exclude))
            .select(dispatch_request_staff::staff_id)
    };
}

/// Vehicle ids under an active rental contract.
macro_rules! rented_vehicle_ids {
    () => {
        rental_contracts::table
            .filter(rental_contracts::is_active.eq(1))
            .select(rental_contracts::vehicle_id)
    };
}

backend_fn! {
/// Returns the subset of `vehicle_ids` that is free at `station_id`,
/// ascending by id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_available_vehicles_by_ids(
    conn: &mut _,
    station_id: StationId,
    vehicle_ids: &[VehicleId],
    exclude: Option<DispatchId>,
) -> Result<Vec<AvailableVehicle>, PersistenceError> {
    let exclude_id: i64 = exclusion_id(exclude);
    let ids: Vec<i64> = vehicle_ids.iter().map(|id| id.get()).collect();

    let rows: Vec<(i64, i64)> = vehicles::table
        .filter(vehicles::vehicle_id.eq_any(ids))
        .filter(vehicles::station_id.eq(station_id.get()))
        .filter(vehicles::vehicle_id.ne_all(claimed_vehicle_ids!(exclude_id)))
        .filter(vehicles::vehicle_id.ne_all(rented_vehicle_ids!()))
        .order(vehicles::vehicle_id.asc())
        .select((vehicles::vehicle_id, vehicles::model_id))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(vehicle_id, model_id)| AvailableVehicle {
            vehicle_id: VehicleId::new(vehicle_id),
            model_id: ModelId::new(model_id),
        })
        .collect())
}
}

backend_fn! {
/// Returns the subset of `staff_ids` that is free at `station_id`,
/// ascending by id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_available_staff_by_ids(
    conn: &mut _,
    station_id: StationId,
    staff_ids: &[StaffId],
    exclude: Option<DispatchId>,
) -> Result<Vec<StaffId>, PersistenceError> {
    let exclude_id: i64 = exclusion_id(exclude);
    let ids: Vec<i64> = staff_ids.iter().map(|id| id.get()).collect();

    let rows: Vec<i64> = staff::table
        .filter(staff::staff_id.eq_any(ids))
        .filter(staff::station_id.eq(station_id.get()))
        .filter(staff::is_on_leave.eq(0))
        .filter(staff::staff_id.ne_all(claimed_staff_ids!(exclude_id)))
        .order(staff::staff_id.asc())
        .select(staff::staff_id)
        .load(conn)?;

    Ok(rows.into_iter().map(StaffId::new).collect())
}
}

backend_fn! {
/// Counts the free staff at a station.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_available_staff_in_station(
    conn: &mut _,
    station_id: StationId,
    exclude: Option<DispatchId>,
) -> Result<u32, PersistenceError> {
    let exclude_id: i64 = exclusion_id(exclude);

    let count: i64 = staff::table
        .filter(staff::station_id.eq(station_id.get()))
        .filter(staff::is_on_leave.eq(0))
        .filter(staff::staff_id.ne_all(claimed_staff_ids!(exclude_id)))
        .count()
        .get_result(conn)?;

    count_to_u32(count)
}
}

backend_fn! {
/// Counts the free vehicles of one model at a station.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_available_vehicles_by_model(
    conn: &mut _,
    station_id: StationId,
    model_id: ModelId,
    exclude: Option<DispatchId>,
) -> Result<u32, PersistenceError> {
    let exclude_id: i64 = exclusion_id(exclude);

    let count: i64 = vehicles::table
        .filter(vehicles::station_id.eq(station_id.get()))
        .filter(vehicles::model_id.eq(model_id.get()))
        .filter(vehicles::vehicle_id.ne_all(claimed_vehicle_ids!(exclude_id)))
        .filter(vehicles::vehicle_id.ne_all(rented_vehicle_ids!()))
        .count()
        .get_result(conn)?;

    count_to_u32(count)
}
}

backend_fn! {
/// Lists the free vehicles of one model at a station, ascending by id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_available_vehicles(
    conn: &mut _,
    station_id: StationId,
    model_id: ModelId,
    exclude: Option<DispatchId>,
) -> Result<Vec<VehicleId>, PersistenceError> {
    let exclude_id: i64 = exclusion_id(exclude);

    let rows: Vec<i64> = vehicles::table
        .filter(vehicles::station_id.eq(station_id.get()))
        .filter(vehicles::model_id.eq(model_id.get()))
        .filter(vehicles::vehicle_id.ne_all(claimed_vehicle_ids!(exclude_id)))
        .filter(vehicles::vehicle_id.ne_all(rented_vehicle_ids!()))
        .order(vehicles::vehicle_id.asc())
        .select(vehicles::vehicle_id)
        .load(conn)?;

    debug!(
        station_id = station_id.get(),
        model_id = model_id.get(),
        available = rows.len(),
        "Listed available vehicles"
    );
    Ok(rows.into_iter().map(VehicleId::new).collect())
}
}

backend_fn! {
/// Lists the free staff at a station, ascending by id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_available_staff(
    conn: &mut _,
    station_id: StationId,
    exclude: Option<DispatchId>,
) -> Result<Vec<StaffId>, PersistenceError> {
    let exclude_id: i64 = exclusion_id(exclude);

    let rows: Vec<i64> = staff::table
        .filter(staff::station_id.eq(station_id.get()))
        .filter(staff::is_on_leave.eq(0))
        .filter(staff::staff_id.ne_all(claimed_staff_ids!(exclude_id)))
        .order(staff::staff_id.asc())
        .select(staff::staff_id)
        .load(conn)?;

    debug!(
        station_id = station_id.get(),
        available = rows.len(),
        "Listed available staff"
    );
    Ok(rows.into_iter().map(StaffId::new).collect())
}
}

backend_fn! {
/// Counts how many of the given resources another pending dispatch also
/// claims, plus how many of the vehicles are rented out.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_conflicting_claims(
    conn: &mut _,
    dispatch_id: DispatchId,
    staff_ids: &[StaffId],
    vehicle_ids: &[VehicleId],
) -> Result<usize, PersistenceError> {
    let staff_raw: Vec<i64> = staff_ids.iter().map(|id| id.get()).collect();
    let vehicle_raw: Vec<i64> = vehicle_ids.iter().map(|id| id.get()).collect();

    let staff_conflicts: i64 = dispatch_request_staff::table
        .inner_join(dispatch_requests::table)
        .filter(dispatch_request_staff::staff_id.eq_any(&staff_raw))
        .filter(dispatch_requests::dispatch_id.ne(dispatch_id.get()))
        .filter(dispatch_requests::status.eq(DispatchStatus::Pending.as_str()))
        .filter(dispatch_requests::deleted_at.is_null())
        .count()
        .get_result(conn)?;

    let vehicle_conflicts: i64 = dispatch_request_vehicles::table
        .inner_join(dispatch_requests::table)
        .filter(dispatch_request_vehicles::vehicle_id.eq_any(&vehicle_raw))
        .filter(dispatch_requests::dispatch_id.ne(dispatch_id.get()))
        .filter(dispatch_requests::status.eq(DispatchStatus::Pending.as_str()))
        .filter(dispatch_requests::deleted_at.is_null())
        .count()
        .get_result(conn)?;

    let rented: i64 = rental_contracts::table
        .filter(rental_contracts::vehicle_id.eq_any(&vehicle_raw))
        .filter(rental_contracts::is_active.eq(1))
        .count()
        .get_result(conn)?;

    count_to_usize(staff_conflicts + vehicle_conflicts + rented)
}
}

backend_fn! {
/// Returns the first linked resource not currently at `station_id`,
/// vehicles before staff, ascending ids.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_link_outside_station(
    conn: &mut _,
    dispatch_id: DispatchId,
    station_id: StationId,
) -> Result<Option<ResourceRef>, PersistenceError> {
    let vehicle: Option<i64> = dispatch_request_vehicles::table
        .inner_join(vehicles::table)
        .filter(dispatch_request_vehicles::dispatch_id.eq(dispatch_id.get()))
        .filter(vehicles::station_id.ne(station_id.get()))
        .order(vehicles::vehicle_id.asc())
        .select(vehicles::vehicle_id)
        .first(conn)
        .optional()?;
    if let Some(vehicle_id) = vehicle {
        return Ok(Some(ResourceRef::Vehicle(VehicleId::new(vehicle_id))));
    }

    let member: Option<i64> = dispatch_request_staff::table
        .inner_join(staff::table)
        .filter(dispatch_request_staff::dispatch_id.eq(dispatch_id.get()))
        .filter(staff::station_id.ne(station_id.get()))
        .order(staff::staff_id.asc())
        .select(staff::staff_id)
        .first(conn)
        .optional()?;

    Ok(member.map(|staff_id| ResourceRef::Staff(StaffId::new(staff_id))))
}
}

backend_fn! {
/// Returns true if the vehicle model exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn model_exists(conn: &mut _, model_id: ModelId) -> Result<bool, PersistenceError> {
    let count: i64 = vehicle_models::table
        .filter(vehicle_models::model_id.eq(model_id.get()))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}
}

backend_fn! {
/// Returns the station a staff member currently belongs to.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_staff_station(
    conn: &mut _,
    staff_id: StaffId,
) -> Result<Option<StationId>, PersistenceError> {
    let station: Option<i64> = staff::table
        .filter(staff::staff_id.eq(staff_id.get()))
        .select(staff::station_id)
        .first(conn)
        .optional()?;
    Ok(station.map(StationId::new))
}
}

backend_fn! {
/// Returns the station a vehicle currently belongs to.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_vehicle_station(
    conn: &mut _,
    vehicle_id: VehicleId,
) -> Result<Option<StationId>, PersistenceError> {
    let station: Option<i64> = vehicles::table
        .filter(vehicles::vehicle_id.eq(vehicle_id.get()))
        .select(vehicles::station_id)
        .first(conn)
        .optional()?;
    Ok(station.map(StationId::new))
}
}
