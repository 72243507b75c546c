// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Expanded dispatch views.
//!
//! Rows are loaded in one pass per table and joined in memory, so a listing
//! costs a fixed number of queries regardless of how many dispatches match.

use std::collections::{BTreeSet, HashMap};

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fleet_dispatch::{
    DispatchFilter, ExpandedDispatch, StaffSummary, StationSummary, VehicleSummary,
};
use fleet_dispatch_domain::{DispatchId, DispatchRequest, ModelId, StaffId, StationId, VehicleId};

use crate::data_models::DispatchRow;
use crate::diesel_schema::{
    dispatch_request_staff, dispatch_request_vehicles, dispatch_requests, staff, stations,
    vehicle_models, vehicles,
};
use crate::error::PersistenceError;

/// `(dispatch_id, staff_id, name, station_id)`
type StaffLinkRow = (i64, i64, String, i64);
/// `(dispatch_id, vehicle_id, license_plate, model_id, model_name, station_id)`
type VehicleLinkRow = (i64, i64, String, i64, String, i64);

backend_fn! {
/// Loads expanded views of the non-deleted dispatches matching `filter`,
/// ordered by id. `dispatch_id` narrows the result to a single row.
///
/// # Errors
///
/// Returns an error if a query fails or a referenced row is missing.
pub fn load_expanded(
    conn: &mut _,
    dispatch_id: Option<DispatchId>,
    filter: &DispatchFilter,
) -> Result<Vec<ExpandedDispatch>, PersistenceError> {
    let mut query = dispatch_requests::table
        .filter(dispatch_requests::deleted_at.is_null())
        .select(DispatchRow::as_select())
        .into_boxed();
    if let Some(id) = dispatch_id {
        query = query.filter(dispatch_requests::dispatch_id.eq(id.get()));
    }
    if let Some(from) = filter.from_station_id {
        query = query.filter(dispatch_requests::from_station_id.eq(from.get()));
    }
    if let Some(to) = filter.to_station_id {
        query = query.filter(dispatch_requests::to_station_id.eq(to.get()));
    }
    if let Some(status) = filter.status {
        query = query.filter(dispatch_requests::status.eq(status.as_str()));
    }

    let rows: Vec<DispatchRow> = query
        .order(dispatch_requests::dispatch_id.asc())
        .load(conn)?;
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let dispatch_ids: Vec<i64> = rows.iter().map(|row| row.dispatch_id).collect();
    let station_ids: BTreeSet<i64> = rows
        .iter()
        .flat_map(|row| [row.from_station_id, Some(row.to_station_id)])
        .flatten()
        .collect();
    let admin_ids: BTreeSet<i64> = rows
        .iter()
        .flat_map(|row| [Some(row.request_admin_id), row.approved_admin_id])
        .flatten()
        .collect();

    let station_rows: Vec<(i64, String)> = stations::table
        .filter(stations::station_id.eq_any(station_ids))
        .select((stations::station_id, stations::name))
        .load(conn)?;

    let admin_rows: Vec<(i64, String, i64)> = staff::table
        .filter(staff::staff_id.eq_any(admin_ids))
        .select((staff::staff_id, staff::name, staff::station_id))
        .load(conn)?;

    let staff_links: Vec<StaffLinkRow> = dispatch_request_staff::table
        .inner_join(staff::table)
        .filter(dispatch_request_staff::dispatch_id.eq_any(&dispatch_ids))
        .order((
            dispatch_request_staff::dispatch_id.asc(),
            dispatch_request_staff::staff_id.asc(),
        ))
        .select((
            dispatch_request_staff::dispatch_id,
            staff::staff_id,
            staff::name,
            staff::station_id,
        ))
        .load(conn)?;

    let vehicle_links: Vec<VehicleLinkRow> = dispatch_request_vehicles::table
        .inner_join(vehicles::table.inner_join(vehicle_models::table))
        .filter(dispatch_request_vehicles::dispatch_id.eq_any(&dispatch_ids))
        .order((
            dispatch_request_vehicles::dispatch_id.asc(),
            dispatch_request_vehicles::vehicle_id.asc(),
        ))
        .select((
            dispatch_request_vehicles::dispatch_id,
            vehicles::vehicle_id,
            vehicles::license_plate,
            vehicle_models::model_id,
            vehicle_models::name,
            vehicles::station_id,
        ))
        .load(conn)?;

    assemble(rows, &station_rows, &admin_rows, staff_links, vehicle_links)
}
}

/// Joins the loaded rows into expanded views, preserving the order of `rows`.
fn assemble(
    rows: Vec<DispatchRow>,
    station_rows: &[(i64, String)],
    admin_rows: &[(i64, String, i64)],
    staff_links: Vec<StaffLinkRow>,
    vehicle_links: Vec<VehicleLinkRow>,
) -> Result<Vec<ExpandedDispatch>, PersistenceError> {
    let station_names: HashMap<i64, &str> = station_rows
        .iter()
        .map(|(id, name)| (*id, name.as_str()))
        .collect();
    let admins: HashMap<i64, (&str, i64)> = admin_rows
        .iter()
        .map(|(id, name, station_id)| (*id, (name.as_str(), *station_id)))
        .collect();

    let mut staff_by_dispatch: HashMap<i64, Vec<StaffSummary>> = HashMap::new();
    for (dispatch_id, staff_id, name, station_id) in staff_links {
        staff_by_dispatch
            .entry(dispatch_id)
            .or_default()
            .push(StaffSummary {
                staff_id: StaffId::new(staff_id),
                name,
                station_id: StationId::new(station_id),
            });
    }

    let mut vehicles_by_dispatch: HashMap<i64, Vec<VehicleSummary>> = HashMap::new();
    for (dispatch_id, vehicle_id, license_plate, model_id, model_name, station_id) in vehicle_links
    {
        vehicles_by_dispatch
            .entry(dispatch_id)
            .or_default()
            .push(VehicleSummary {
                vehicle_id: VehicleId::new(vehicle_id),
                license_plate,
                model_id: ModelId::new(model_id),
                model_name,
                station_id: StationId::new(station_id),
            });
    }

    let station = |id: i64| -> Result<StationSummary, PersistenceError> {
        station_names
            .get(&id)
            .map(|name| StationSummary {
                station_id: StationId::new(id),
                name: (*name).to_string(),
            })
            .ok_or_else(|| PersistenceError::NotFound(format!("station {id}")))
    };
    let admin = |id: i64| -> Result<StaffSummary, PersistenceError> {
        admins
            .get(&id)
            .map(|(name, station_id)| StaffSummary {
                staff_id: StaffId::new(id),
                name: (*name).to_string(),
                station_id: StationId::new(*station_id),
            })
            .ok_or_else(|| PersistenceError::NotFound(format!("staff {id}")))
    };

    rows.into_iter()
        .map(|row| {
            let raw_id: i64 = row.dispatch_id;
            let from_station: Option<StationSummary> =
                row.from_station_id.map(station).transpose()?;
            let to_station: StationSummary = station(row.to_station_id)?;
            let request_admin: StaffSummary = admin(row.request_admin_id)?;
            let approved_admin: Option<StaffSummary> =
                row.approved_admin_id.map(admin).transpose()?;
            let dispatch: DispatchRequest = row.into_domain()?;

            Ok(ExpandedDispatch {
                dispatch_id: DispatchId::new(raw_id),
                status: dispatch.status,
                description: dispatch.description,
                final_description: dispatch.final_description,
                from_station,
                to_station,
                request_admin,
                approved_admin,
                staff: staff_by_dispatch.remove(&raw_id).unwrap_or_default(),
                vehicles: vehicles_by_dispatch.remove(&raw_id).unwrap_or_default(),
                created_at: dispatch.created_at,
                updated_at: dispatch.updated_at,
            })
        })
        .collect()
}
