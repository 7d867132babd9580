use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::models::{OwnerId, PriceAlert, SharpTurnAlert};

/// All confirmed alerts.
///
/// Price alerts are mirrored across two indexes: by owner (for listing) and
/// by symbol (so the matching loop only polls symbols with live interest).
/// Every mutation updates both under the same critical section; a price
/// alert is either in both indexes or in neither. SharpTurn alerts are
/// owner-keyed only, since the matching loop does not evaluate them.
#[derive(Default)]
pub struct AlertStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    by_owner: HashMap<OwnerId, Vec<PriceAlert>>,
    by_symbol: HashMap<String, Vec<PriceAlert>>,
    sharp_turns: HashMap<OwnerId, Vec<SharpTurnAlert>>,
}

impl AlertStore {
    pub fn new() -> AlertStore {
        AlertStore::default()
    }

    fn locked(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// No uniqueness constraint: identical alerts coexist and fire
    /// independently.
    pub fn add_price(&self, alert: PriceAlert) {
        let mut inner = self.locked();
        inner
            .by_symbol
            .entry(alert.symbol.clone())
            .or_default()
            .push(alert.clone());
        inner.by_owner.entry(alert.owner).or_default().push(alert);
    }

    /// Removes one instance of the exact tuple from both indexes. Safe
    /// no-op when the alert is already gone (a concurrent trigger or a
    /// second removal path may have won the race).
    pub fn remove_price(&self, alert: &PriceAlert) {
        let mut inner = self.locked();

        let symbol_empty = match inner.by_symbol.get_mut(&alert.symbol) {
            Some(list) => {
                if let Some(i) = list.iter().position(|a| a == alert) {
                    list.remove(i);
                }
                list.is_empty()
            }
            None => false,
        };
        if symbol_empty {
            inner.by_symbol.remove(&alert.symbol);
        }

        let owner_empty = match inner.by_owner.get_mut(&alert.owner) {
            Some(list) => {
                if let Some(i) = list.iter().position(|a| a == alert) {
                    list.remove(i);
                }
                list.is_empty()
            }
            None => false,
        };
        if owner_empty {
            inner.by_owner.remove(&alert.owner);
        }
    }

    pub fn add_sharp_turn(&self, alert: SharpTurnAlert) {
        self.locked()
            .sharp_turns
            .entry(alert.owner)
            .or_default()
            .push(alert);
    }

    /// Snapshot of everything this owner has saved, in insertion order.
    pub fn list_by_owner(&self, owner: OwnerId) -> (Vec<PriceAlert>, Vec<SharpTurnAlert>) {
        let inner = self.locked();
        (
            inner.by_owner.get(&owner).cloned().unwrap_or_default(),
            inner.sharp_turns.get(&owner).cloned().unwrap_or_default(),
        )
    }

    /// Symbols the matching loop should poll this iteration. A snapshot,
    /// so iteration never races a concurrent add/remove.
    pub fn symbols_with_active_alerts(&self) -> Vec<String> {
        self.locked().by_symbol.keys().cloned().collect()
    }

    /// Snapshot of the live price alerts for one symbol.
    pub fn alerts_for(&self, symbol: &str) -> Vec<PriceAlert> {
        self.locked()
            .by_symbol
            .get(symbol)
            .cloned()
            .unwrap_or_default()
    }
}
