//! Inventory reconciliation: an ordered fold over labeled record sets.
//!
//! Later sets overwrite earlier entries for the same xname with no
//! conflict error; nothing is ever deleted. The fold order *is* the
//! precedence order, and it is spelled out at the call site because the
//! node-role normalizer reads the partially merged map (cabinets and
//! switches) as its class/role context before the final fold runs.

use tracing::debug;

use crate::model::Inventory;

/// Fold the given record sets into one inventory, in order.
pub fn fold<I>(sets: I) -> Inventory
where
    I: IntoIterator<Item = (&'static str, Inventory)>,
{
    let mut merged = Inventory::new();
    for (label, records) in sets {
        let count = records.len();
        let mut overwritten = 0usize;
        for (xname, record) in records {
            if merged.contains_key(&xname) {
                overwritten += 1;
                debug!(%xname, source = label, "overwriting earlier record");
            }
            merged.insert(xname, record);
        }
        debug!(
            source = label,
            records = count,
            overwritten,
            total = merged.len(),
            "merged source into inventory"
        );
    }
    merged
}
