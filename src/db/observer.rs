//! Live queries: callers register a query plus a callback and get the fresh
//! result after every committed mutation that touches one of the watched
//! tables.

use crate::db::record::Table;
use crate::db::store::Store;
use crate::errors::AppResult;

pub type SubscriptionId = u64;

pub(crate) struct Observer {
    id: SubscriptionId,
    tables: Vec<Table>,
    deliver: Box<dyn FnMut(&Store)>,
}

impl Store {
    /// Register a live query. The callback receives the query result once
    /// right away and again after each relevant commit.
    pub fn subscribe<T, Q, C>(
        &mut self,
        tables: &[Table],
        query: Q,
        mut on_change: C,
    ) -> AppResult<SubscriptionId>
    where
        T: 'static,
        Q: Fn(&Store) -> AppResult<T> + 'static,
        C: FnMut(AppResult<T>) + 'static,
    {
        // fail early on a closed store
        self.conn()?;

        let id = self.next_subscription;
        self.next_subscription += 1;

        let mut deliver: Box<dyn FnMut(&Store)> = Box::new(move |store| on_change(query(store)));
        deliver(self);

        self.observers.push(Observer {
            id,
            tables: tables.to_vec(),
            deliver,
        });
        Ok(id)
    }

    /// Returns `false` when the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| o.id != id);
        self.observers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    /// Re-deliver every observer watching one of `changed`.
    pub(crate) fn notify(&mut self, changed: &[Table]) {
        if self.observers.is_empty() {
            return;
        }

        let mut observers = std::mem::take(&mut self.observers);
        for o in observers
            .iter_mut()
            .filter(|o| o.tables.iter().any(|t| changed.contains(t)))
        {
            (o.deliver)(self);
        }
        self.observers = observers;
    }
}
