use rusqlite::Connection;

use crate::db::queries;
use crate::models::{Slot, SlotCatalog};

/// Why a slot cannot be handed to the user. Display carries the exact
/// chat reply for each case.
#[derive(Debug, thiserror::Error)]
pub enum SlotError {
    #[error("❌ O horário {time} não está disponível. Escolha outro horário.")]
    SlotUnavailable { time: String },
    #[error("⚠️ Estamos com uma instabilidade no momento. Por favor, tente novamente em instantes.")]
    StorageUnavailable(anyhow::Error),
}

/// Free slots for a date key: the catalog minus the labels whose time is
/// held by a pending booking. Stored times that match no catalog entry are
/// ignored. Catalog order is preserved.
pub fn free_slots(
    conn: &Connection,
    catalog: &SlotCatalog,
    date_key: &str,
) -> Result<Vec<Slot>, SlotError> {
    let pending =
        queries::pending_by_date(conn, date_key).map_err(SlotError::StorageUnavailable)?;

    let taken: Vec<char> = pending
        .iter()
        .filter_map(|booking| catalog.label_for(&booking.time))
        .collect();

    Ok(catalog
        .slots()
        .iter()
        .filter(|slot| !taken.contains(&slot.label))
        .cloned()
        .collect())
}

/// Re-checks that a catalog label is still free for the date and returns
/// its slot. Callers have already matched the label against the catalog.
pub fn ensure_free(
    conn: &Connection,
    catalog: &SlotCatalog,
    date_key: &str,
    label: char,
) -> Result<Slot, SlotError> {
    let free = free_slots(conn, catalog, date_key)?;
    if let Some(slot) = free.into_iter().find(|s| s.label == label) {
        return Ok(slot);
    }

    let time = catalog.time_for(label).unwrap_or_default().to_string();
    Err(SlotError::SlotUnavailable { time })
}
