// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `DispatchStore` adapters over a connection that is inside a transaction.
//!
//! One adapter is generated per backend. Each method forwards to the
//! matching `_sqlite` or `_mysql` query or mutation and converts the error
//! at the boundary.

use diesel::{MysqlConnection, SqliteConnection};
use fleet_dispatch::{AvailableVehicle, CoreError, DispatchFilter, DispatchStore, ExpandedDispatch};
use fleet_dispatch_audit::AuditEvent;
use fleet_dispatch_domain::{
    DispatchId, DispatchLinks, DispatchRequest, DispatchRequestStaff, DispatchRequestVehicle,
    ModelId, ResourceRef, StaffId, StationId, VehicleId,
};

use crate::backend::PersistenceBackend;
use crate::error::PersistenceError;
use crate::{mutations, queries};

/// Error type threaded through Diesel's transaction closures.
///
/// Diesel needs `From<diesel::result::Error>` on the closure's error type to
/// report begin and commit failures; everything else is a `CoreError`.
#[derive(Debug)]
pub(crate) enum TxError {
    Core(CoreError),
    Database(diesel::result::Error),
}

impl From<diesel::result::Error> for TxError {
    fn from(err: diesel::result::Error) -> Self {
        Self::Database(err)
    }
}

impl From<TxError> for CoreError {
    fn from(err: TxError) -> Self {
        match err {
            TxError::Core(err) => err,
            TxError::Database(err) => PersistenceError::from(err).into(),
        }
    }
}

macro_rules! dispatch_store {
    ($(#[$meta:meta])* $store:ident, $conn_ty:ty, $suffix:ident) => {
        pastey::paste! {
            $(#[$meta])*
            pub(crate) struct $store<'c> {
                conn: &'c mut $conn_ty,
            }

            impl<'c> $store<'c> {
                pub(crate) const fn new(conn: &'c mut $conn_ty) -> Self {
                    Self { conn }
                }
            }

            impl DispatchStore for $store<'_> {
                fn get_available_vehicles_by_ids(
                    &mut self,
                    station_id: StationId,
                    vehicle_ids: &[VehicleId],
                    exclude: Option<DispatchId>,
                ) -> Result<Vec<AvailableVehicle>, CoreError> {
                    Ok(queries::[<get_available_vehicles_by_ids_ $suffix>](
                        self.conn,
                        station_id,
                        vehicle_ids,
                        exclude,
                    )?)
                }

                fn get_available_staff_by_ids(
                    &mut self,
                    station_id: StationId,
                    staff_ids: &[StaffId],
                    exclude: Option<DispatchId>,
                ) -> Result<Vec<StaffId>, CoreError> {
                    Ok(queries::[<get_available_staff_by_ids_ $suffix>](
                        self.conn, station_id, staff_ids, exclude,
                    )?)
                }

                fn count_available_staff_in_station(
                    &mut self,
                    station_id: StationId,
                    exclude: Option<DispatchId>,
                ) -> Result<u32, CoreError> {
                    Ok(queries::[<count_available_staff_in_station_ $suffix>](
                        self.conn, station_id, exclude,
                    )?)
                }

                fn count_available_vehicles_by_model(
                    &mut self,
                    station_id: StationId,
                    model_id: ModelId,
                    exclude: Option<DispatchId>,
                ) -> Result<u32, CoreError> {
                    Ok(queries::[<count_available_vehicles_by_model_ $suffix>](
                        self.conn, station_id, model_id, exclude,
                    )?)
                }

                fn list_available_vehicles(
                    &mut self,
                    station_id: StationId,
                    model_id: ModelId,
                    exclude: Option<DispatchId>,
                ) -> Result<Vec<VehicleId>, CoreError> {
                    Ok(queries::[<list_available_vehicles_ $suffix>](
                        self.conn, station_id, model_id, exclude,
                    )?)
                }

                fn list_available_staff(
                    &mut self,
                    station_id: StationId,
                    exclude: Option<DispatchId>,
                ) -> Result<Vec<StaffId>, CoreError> {
                    Ok(queries::[<list_available_staff_ $suffix>](
                        self.conn, station_id, exclude,
                    )?)
                }

                fn clear_dispatch_relations(
                    &mut self,
                    dispatch_id: DispatchId,
                ) -> Result<usize, CoreError> {
                    Ok(mutations::[<clear_dispatch_relations_ $suffix>](
                        self.conn,
                        dispatch_id,
                    )?)
                }

                fn add_dispatch_relations(
                    &mut self,
                    staff: &[DispatchRequestStaff],
                    vehicles: &[DispatchRequestVehicle],
                ) -> Result<usize, CoreError> {
                    Ok(mutations::[<add_dispatch_relations_ $suffix>](
                        self.conn, staff, vehicles,
                    )?)
                }

                fn count_conflicting_claims(
                    &mut self,
                    dispatch_id: DispatchId,
                    staff_ids: &[StaffId],
                    vehicle_ids: &[VehicleId],
                ) -> Result<usize, CoreError> {
                    Ok(queries::[<count_conflicting_claims_ $suffix>](
                        self.conn,
                        dispatch_id,
                        staff_ids,
                        vehicle_ids,
                    )?)
                }

                fn find_link_outside_station(
                    &mut self,
                    dispatch_id: DispatchId,
                    station_id: StationId,
                ) -> Result<Option<ResourceRef>, CoreError> {
                    Ok(queries::[<find_link_outside_station_ $suffix>](
                        self.conn,
                        dispatch_id,
                        station_id,
                    )?)
                }

                fn update_staff_station_for_dispatch(
                    &mut self,
                    dispatch_id: DispatchId,
                    to_station_id: StationId,
                ) -> Result<usize, CoreError> {
                    Ok(mutations::[<update_staff_station_for_dispatch_ $suffix>](
                        self.conn,
                        dispatch_id,
                        to_station_id,
                    )?)
                }

                fn update_vehicle_station_for_dispatch(
                    &mut self,
                    dispatch_id: DispatchId,
                    to_station_id: StationId,
                ) -> Result<usize, CoreError> {
                    Ok(mutations::[<update_vehicle_station_for_dispatch_ $suffix>](
                        self.conn,
                        dispatch_id,
                        to_station_id,
                    )?)
                }

                fn lock_station(&mut self, station_id: StationId) -> Result<(), CoreError> {
                    if self.conn.lock_station_row(station_id.get())? {
                        Ok(())
                    } else {
                        Err(CoreError::StationNotFound(station_id))
                    }
                }

                fn model_exists(&mut self, model_id: ModelId) -> Result<bool, CoreError> {
                    Ok(queries::[<model_exists_ $suffix>](self.conn, model_id)?)
                }

                fn get_staff_station(
                    &mut self,
                    staff_id: StaffId,
                ) -> Result<Option<StationId>, CoreError> {
                    Ok(queries::[<get_staff_station_ $suffix>](self.conn, staff_id)?)
                }

                fn insert_dispatch(
                    &mut self,
                    dispatch: &DispatchRequest,
                ) -> Result<DispatchId, CoreError> {
                    Ok(mutations::[<insert_dispatch_ $suffix>](self.conn, dispatch)?)
                }

                fn get_dispatch(
                    &mut self,
                    dispatch_id: DispatchId,
                ) -> Result<Option<DispatchRequest>, CoreError> {
                    Ok(queries::[<get_dispatch_ $suffix>](self.conn, dispatch_id)?)
                }

                fn save_dispatch(
                    &mut self,
                    dispatch: &DispatchRequest,
                ) -> Result<usize, CoreError> {
                    Ok(mutations::[<save_dispatch_ $suffix>](self.conn, dispatch)?)
                }

                fn get_dispatch_links(
                    &mut self,
                    dispatch_id: DispatchId,
                ) -> Result<DispatchLinks, CoreError> {
                    Ok(queries::[<get_dispatch_links_ $suffix>](self.conn, dispatch_id)?)
                }

                fn get_by_id_with_full_info(
                    &mut self,
                    dispatch_id: DispatchId,
                ) -> Result<Option<ExpandedDispatch>, CoreError> {
                    let mut views: Vec<ExpandedDispatch> = queries::[<load_expanded_ $suffix>](
                        self.conn,
                        Some(dispatch_id),
                        &DispatchFilter::default(),
                    )?;
                    Ok(views.pop())
                }

                fn get_all_expanded(
                    &mut self,
                    filter: &DispatchFilter,
                ) -> Result<Vec<ExpandedDispatch>, CoreError> {
                    Ok(queries::[<load_expanded_ $suffix>](self.conn, None, filter)?)
                }

                fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, CoreError> {
                    Ok(mutations::[<persist_audit_event_ $suffix>](self.conn, event)?)
                }
            }
        }
    };
}

dispatch_store!(
    /// `DispatchStore` over a `SQLite` connection.
    SqliteStore,
    SqliteConnection,
    sqlite
);
dispatch_store!(
    /// `DispatchStore` over a `MySQL`/`MariaDB` connection.
    MysqlStore,
    MysqlConnection,
    mysql
);
