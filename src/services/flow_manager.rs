use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use crate::models::{Flow, FlowKind, OwnerId};

/// In-progress alert-creation conversations, one FIFO queue per owner.
///
/// New flows are appended, never replace existing ones. Plain text only
/// ever steps the queue head; button callbacks address a specific flow by
/// id. Queues stay short (a handful of concurrently open flows at most),
/// so linear scans are fine.
#[derive(Default)]
pub struct FlowManager {
    inner: Mutex<HashMap<OwnerId, VecDeque<Flow>>>,
}

impl FlowManager {
    pub fn new() -> FlowManager {
        FlowManager::default()
    }

    fn locked(&self) -> MutexGuard<'_, HashMap<OwnerId, VecDeque<Flow>>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Creates a flow in its initial state, appends it to the owner's
    /// queue and returns a copy.
    pub fn start(&self, owner: OwnerId, kind: FlowKind) -> Flow {
        let flow = Flow::new(kind);
        self.locked().entry(owner).or_default().push_back(flow.clone());
        flow
    }

    pub fn head(&self, owner: OwnerId) -> Option<Flow> {
        self.locked().get(&owner).and_then(|q| q.front().cloned())
    }

    pub fn find(&self, owner: OwnerId, flow_id: &str) -> Option<Flow> {
        self.locked()
            .get(&owner)
            .and_then(|q| q.iter().find(|f| f.id == flow_id).cloned())
    }

    /// Applies `mutation` to the flow with this id while the queue lock is
    /// held, so the caller's state check cannot race another event
    /// advancing the same flow from the same stale state. The mutation
    /// returns `None` to reject, in which case it must leave the flow
    /// untouched; `None` is also returned when the flow no longer exists.
    pub fn advance<R>(
        &self,
        owner: OwnerId,
        flow_id: &str,
        mutation: impl FnOnce(&mut Flow) -> Option<R>,
    ) -> Option<R> {
        let mut map = self.locked();
        let flow = map.get_mut(&owner)?.iter_mut().find(|f| f.id == flow_id)?;
        mutation(flow)
    }

    /// Same contract as [`advance`](Self::advance), addressed at the queue
    /// head (the only flow a plain text message may step).
    pub fn advance_head<R>(
        &self,
        owner: OwnerId,
        mutation: impl FnOnce(&mut Flow) -> Option<R>,
    ) -> Option<R> {
        let mut map = self.locked();
        let flow = map.get_mut(&owner)?.front_mut()?;
        mutation(flow)
    }

    /// Drops the flow from the owner's queue, whether it completed or was
    /// abandoned: O(1) when it is the head, linear removal by id
    /// otherwise. Returns false when it was already gone.
    pub fn remove(&self, owner: OwnerId, flow_id: &str) -> bool {
        let mut map = self.locked();
        let Some(queue) = map.get_mut(&owner) else {
            return false;
        };

        let removed = match queue.iter().position(|f| f.id == flow_id) {
            Some(0) => {
                queue.pop_front();
                true
            }
            Some(i) => {
                queue.remove(i);
                true
            }
            None => false,
        };

        if queue.is_empty() {
            map.remove(&owner);
        }
        removed
    }

    /// Number of flows currently open for this owner.
    pub fn open_flows(&self, owner: OwnerId) -> usize {
        self.locked().get(&owner).map(|q| q.len()).unwrap_or(0)
    }
}
