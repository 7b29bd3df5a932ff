// ── Reactive port collection ──
//
// Concurrent per-port storage keyed by device index, with a sorted
// snapshot pushed to subscribers through a `watch` channel.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

use crate::model::Port;

/// Port records keyed by index.
///
/// Writes go through [`update`](Self::update), which creates the port on
/// first touch. Subscribers only see changes after [`publish`](Self::publish),
/// so a multi-field merge lands as one snapshot.
pub(crate) struct PortCollection {
    by_index: DashMap<u32, Port>,

    /// Ports sorted by index, rebuilt on publish.
    snapshot: watch::Sender<Arc<Vec<Port>>>,
}

impl PortCollection {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            by_index: DashMap::new(),
            snapshot,
        }
    }

    /// Mutate the port at `index`, creating it if needed. Not published.
    pub(crate) fn update(&self, index: u32, f: impl FnOnce(&mut Port)) {
        let mut entry = self.by_index.entry(index).or_insert_with(|| Port::new(index));
        f(entry.value_mut());
    }

    /// Mutate an existing port only. Returns `false` if it does not exist.
    pub(crate) fn modify(&self, index: u32, f: impl FnOnce(&mut Port)) -> bool {
        match self.by_index.get_mut(&index) {
            Some(mut port) => {
                f(port.value_mut());
                true
            }
            None => false,
        }
    }

    pub(crate) fn get(&self, index: u32) -> Option<Port> {
        self.by_index.get(&index).map(|r| r.value().clone())
    }

    /// Current published snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Port>> {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Port>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_index.len()
    }

    /// Rebuild the sorted snapshot and notify subscribers.
    pub(crate) fn publish(&self) {
        let mut ports: Vec<Port> = self.by_index.iter().map(|r| r.value().clone()).collect();
        ports.sort_by_key(|p| p.index);
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(ports));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::PowerState;

    #[test]
    fn update_creates_port_lazily() {
        let col = PortCollection::new();
        col.update(2, |p| p.power_state = PowerState::Off);

        assert_eq!(col.len(), 1);
        let port = col.get(2).unwrap();
        assert_eq!(port.index, 2);
        assert_eq!(port.power_state, PowerState::Off);
    }

    #[test]
    fn modify_ignores_missing_port() {
        let col = PortCollection::new();
        assert!(!col.modify(0, |p| p.power_state = PowerState::Off));
        assert!(col.get(0).is_none());
    }

    #[test]
    fn snapshot_waits_for_publish_and_is_sorted() {
        let col = PortCollection::new();
        col.update(3, |_| {});
        col.update(0, |_| {});
        col.update(1, |_| {});
        assert!(col.snapshot().is_empty());

        col.publish();
        let indices: Vec<u32> = col.snapshot().iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 1, 3]);
    }

    #[test]
    fn subscribers_see_published_changes() {
        let col = PortCollection::new();
        let mut rx = col.subscribe();
        col.update(0, |_| {});
        col.publish();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
    }

    #[test]
    fn waiting_subscriber_wakes_only_on_publish() {
        let col = PortCollection::new();
        let mut rx = col.subscribe();
        let mut changed = tokio_test::task::spawn(rx.changed());

        tokio_test::assert_pending!(changed.poll());
        col.update(1, |_| {});
        tokio_test::assert_pending!(changed.poll());

        col.publish();
        assert!(changed.is_woken());
        tokio_test::assert_ready_ok!(changed.poll());
    }
}
