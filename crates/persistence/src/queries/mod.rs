// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side queries.
//!
//! Every function is generated once per backend by `backend_fn!` and only
//! reads. Availability queries treat a resource as free when it is at the
//! station, not on leave or rented, and not linked to another dispatch that
//! is still pending and not soft-deleted.

pub mod audit;
pub mod dispatch;
pub mod expanded;
pub mod inventory;

pub use audit::{get_audit_events_for_dispatch_mysql, get_audit_events_for_dispatch_sqlite};
pub use dispatch::{
    get_dispatch_links_mysql, get_dispatch_links_sqlite, get_dispatch_mysql, get_dispatch_sqlite,
};
pub use expanded::{load_expanded_mysql, load_expanded_sqlite};
pub use inventory::{
    count_available_staff_in_station_mysql, count_available_staff_in_station_sqlite,
    count_available_vehicles_by_model_mysql, count_available_vehicles_by_model_sqlite,
    count_conflicting_claims_mysql, count_conflicting_claims_sqlite,
    find_link_outside_station_mysql, find_link_outside_station_sqlite,
    get_available_staff_by_ids_mysql, get_available_staff_by_ids_sqlite,
    get_available_vehicles_by_ids_mysql, get_available_vehicles_by_ids_sqlite,
    get_staff_station_mysql, get_staff_station_sqlite, get_vehicle_station_mysql,
    get_vehicle_station_sqlite, list_available_staff_mysql, list_available_staff_sqlite,
    list_available_vehicles_mysql, list_available_vehicles_sqlite, model_exists_mysql,
    model_exists_sqlite,
};
