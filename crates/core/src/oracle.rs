// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::store::DispatchStore;
use fleet_dispatch_domain::{AvailabilitySnapshot, DispatchId, ModelId, StationId};
use tracing::debug;

/// Answers "how much is free at this station" from inside a transaction.
///
/// The oracle borrows the transaction's store, so every answer reflects the
/// same view the subsequent claim is written against.
pub struct CapacityOracle<'a> {
    store: &'a mut dyn DispatchStore,
    exclude: Option<DispatchId>,
}

impl<'a> CapacityOracle<'a> {
    /// Creates an oracle over the given store.
    ///
    /// # Arguments
    ///
    /// * `store` - The store of the current transaction
    /// * `exclude` - A dispatch whose own claims count as released
    pub fn new(store: &'a mut dyn DispatchStore, exclude: Option<DispatchId>) -> Self {
        Self { store, exclude }
    }

    /// Number of vehicles of `model_id` free at `station_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn available_vehicle_count(
        &mut self,
        station_id: StationId,
        model_id: ModelId,
    ) -> Result<u32, CoreError> {
        self.store
            .count_available_vehicles_by_model(station_id, model_id, self.exclude)
    }

    /// Number of staff free at `station_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn available_staff_count(&mut self, station_id: StationId) -> Result<u32, CoreError> {
        self.store
            .count_available_staff_in_station(station_id, self.exclude)
    }

    /// Builds the concrete availability snapshot the planner consumes.
    ///
    /// Only the listed models are read. Staff are always read.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn snapshot(
        &mut self,
        station_id: StationId,
        model_ids: &[ModelId],
    ) -> Result<AvailabilitySnapshot, CoreError> {
        let mut snapshot: AvailabilitySnapshot = AvailabilitySnapshot::new(station_id);

        for &model_id in model_ids {
            let vehicles = self
                .store
                .list_available_vehicles(station_id, model_id, self.exclude)?;
            snapshot = snapshot.with_vehicles(model_id, vehicles);
        }

        let staff = self.store.list_available_staff(station_id, self.exclude)?;
        snapshot = snapshot.with_staff(staff);

        debug!(
            station_id = station_id.get(),
            models = model_ids.len(),
            staff = snapshot.staff_count(),
            "Took availability snapshot"
        );

        Ok(snapshot)
    }
}
