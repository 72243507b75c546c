// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dispatch link rows and the station transfer performed on approval.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fleet_dispatch_domain::{DispatchId, DispatchRequestStaff, DispatchRequestVehicle, StationId};
use tracing::debug;

use crate::diesel_schema::{dispatch_request_staff, dispatch_request_vehicles, staff, vehicles};
use crate::error::PersistenceError;

backend_fn! {
/// Deletes every staff and vehicle link of a dispatch.
///
/// # Returns
///
/// The number of link rows removed.
///
/// # Errors
///
/// Returns an error if a delete fails.
pub fn clear_dispatch_relations(
    conn: &mut _,
    dispatch_id: DispatchId,
) -> Result<usize, PersistenceError> {
    let staff_removed: usize = diesel::delete(
        dispatch_request_staff::table
            .filter(dispatch_request_staff::dispatch_id.eq(dispatch_id.get())),
    )
    .execute(conn)?;

    let vehicles_removed: usize = diesel::delete(
        dispatch_request_vehicles::table
            .filter(dispatch_request_vehicles::dispatch_id.eq(dispatch_id.get())),
    )
    .execute(conn)?;

    debug!(
        dispatch_id = dispatch_id.get(),
        staff_removed, vehicles_removed, "Cleared dispatch relations"
    );
    Ok(staff_removed + vehicles_removed)
}
}

backend_fn! {
/// Inserts staff and vehicle link rows.
///
/// # Returns
///
/// The number of link rows inserted.
///
/// # Errors
///
/// Returns an error if an insert fails, including a duplicate link.
pub fn add_dispatch_relations(
    conn: &mut _,
    staff_links: &[DispatchRequestStaff],
    vehicle_links: &[DispatchRequestVehicle],
) -> Result<usize, PersistenceError> {
    let mut inserted: usize = 0;

    if !staff_links.is_empty() {
        let rows: Vec<_> = staff_links
            .iter()
            .map(|link| {
                (
                    dispatch_request_staff::dispatch_id.eq(link.dispatch_id.get()),
                    dispatch_request_staff::staff_id.eq(link.staff_id.get()),
                )
            })
            .collect();
        inserted += diesel::insert_into(dispatch_request_staff::table)
            .values(rows)
            .execute(conn)?;
    }

    if !vehicle_links.is_empty() {
        let rows: Vec<_> = vehicle_links
            .iter()
            .map(|link| {
                (
                    dispatch_request_vehicles::dispatch_id.eq(link.dispatch_id.get()),
                    dispatch_request_vehicles::vehicle_id.eq(link.vehicle_id.get()),
                )
            })
            .collect();
        inserted += diesel::insert_into(dispatch_request_vehicles::table)
            .values(rows)
            .execute(conn)?;
    }

    Ok(inserted)
}
}

backend_fn! {
/// Moves every staff member linked to the dispatch to `to_station_id`.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_staff_station_for_dispatch(
    conn: &mut _,
    dispatch_id: DispatchId,
    to_station_id: StationId,
) -> Result<usize, PersistenceError> {
    let linked = dispatch_request_staff::table
        .filter(dispatch_request_staff::dispatch_id.eq(dispatch_id.get()))
        .select(dispatch_request_staff::staff_id);

    let moved: usize = diesel::update(staff::table.filter(staff::staff_id.eq_any(linked)))
        .set(staff::station_id.eq(to_station_id.get()))
        .execute(conn)?;

    Ok(moved)
}
}

backend_fn! {
/// Moves every vehicle linked to the dispatch to `to_station_id`.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_vehicle_station_for_dispatch(
    conn: &mut _,
    dispatch_id: DispatchId,
    to_station_id: StationId,
) -> Result<usize, PersistenceError> {
    let linked = dispatch_request_vehicles::table
        .filter(dispatch_request_vehicles::dispatch_id.eq(dispatch_id.get()))
        .select(dispatch_request_vehicles::vehicle_id);

    let moved: usize = diesel::update(vehicles::table.filter(vehicles::vehicle_id.eq_any(linked)))
        .set(vehicles::station_id.eq(to_station_id.get()))
        .execute(conn)?;

    Ok(moved)
}
}
