// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Link replacement and side-effect execution.
//!
//! Everything here runs inside the caller's transaction. A failure at any
//! step leaves the caller with an `Err`, and the unit of work rolls back the
//! whole operation, including link rows already deleted.

use crate::error::CoreError;
use crate::state::SideEffect;
use crate::store::DispatchStore;
use fleet_dispatch_domain::{DispatchId, DispatchLinks};
use tracing::{debug, warn};

/// What running a list of side effects changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EffectOutcome {
    /// Link rows inserted by a relation replacement.
    pub links_inserted: usize,
    /// Staff members moved to another station.
    pub staff_moved: usize,
    /// Vehicles moved to another station.
    pub vehicles_moved: usize,
}

/// Replaces every link of a dispatch with `links`.
///
/// Deletes the existing rows, inserts the new set, then re-checks that none
/// of the new resources is claimed by another active dispatch or rented out.
///
/// # Arguments
///
/// * `store` - The store of the current transaction
/// * `dispatch_id` - The dispatch whose links are replaced
/// * `links` - The complete new link set
///
/// # Returns
///
/// The number of link rows inserted.
///
/// # Errors
///
/// Returns `CoreError::ConcurrentModification` if the re-check finds a
/// conflicting claim, or any error the store raises.
pub fn replace_relations(
    store: &mut dyn DispatchStore,
    dispatch_id: DispatchId,
    links: &DispatchLinks,
) -> Result<usize, CoreError> {
    let removed: usize = store.clear_dispatch_relations(dispatch_id)?;
    let inserted: usize = store.add_dispatch_relations(
        &links.staff_rows(dispatch_id),
        &links.vehicle_rows(dispatch_id),
    )?;

    let conflicts: usize =
        store.count_conflicting_claims(dispatch_id, &links.staff, &links.vehicles)?;
    if conflicts > 0 {
        warn!(
            dispatch_id = dispatch_id.get(),
            conflicts, "Claimed resources changed since the availability snapshot"
        );
        return Err(CoreError::ConcurrentModification(format!(
            "{conflicts} resource(s) of {dispatch_id} were claimed by another writer"
        )));
    }

    debug!(
        dispatch_id = dispatch_id.get(),
        removed, inserted, "Replaced dispatch relations"
    );
    Ok(inserted)
}

/// Runs the side effects of a transition, in order.
///
/// # Errors
///
/// Returns `CoreError::ResourceUnavailable` if a deferred station check
/// fails, or any error raised by [`replace_relations`] or the store.
pub fn run_effects(
    store: &mut dyn DispatchStore,
    dispatch_id: DispatchId,
    effects: &[SideEffect],
) -> Result<EffectOutcome, CoreError> {
    let mut outcome: EffectOutcome = EffectOutcome::default();

    for effect in effects {
        match effect {
            SideEffect::ReplaceRelations(links) => {
                outcome.links_inserted += replace_relations(store, dispatch_id, links)?;
            }
            SideEffect::VerifyLinksAtStation(station_id) => {
                if let Some(resource) = store.find_link_outside_station(dispatch_id, *station_id)?
                {
                    return Err(CoreError::ResourceUnavailable(resource));
                }
            }
            SideEffect::TransferToStation(station_id) => {
                outcome.staff_moved +=
                    store.update_staff_station_for_dispatch(dispatch_id, *station_id)?;
                outcome.vehicles_moved +=
                    store.update_vehicle_station_for_dispatch(dispatch_id, *station_id)?;
            }
            SideEffect::ReleaseClaims => {
                debug!(dispatch_id = dispatch_id.get(), "Released dispatch claims");
            }
        }
    }

    Ok(outcome)
}
