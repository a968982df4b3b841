use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::model::{Address, MenuItem};
use crate::source::{RecordSource, SourceError};

pub(crate) fn address(id: u64) -> Address {
    Address {
        id,
        first_name: format!("First{id}"),
        last_name: format!("Last{id}"),
        street: format!("{id} Main St"),
        postcode: format!("{:04}", id),
        state: "NSW".to_string(),
        country: "Australia".to_string(),
    }
}

fn unavailable(path: String) -> SourceError {
    SourceError::Status {
        url: format!("stub://{path}"),
        status: 503,
    }
}

// in-memory inventory with scripted failures and latencies
#[derive(Debug, Default)]
pub(crate) struct StubSource {
    total: u64,
    menu: Vec<MenuItem>,
    failing: HashSet<u64>,
    delays: HashMap<u64, Duration>,
    count_failures: AtomicUsize,
    menu_failures: AtomicUsize,
    count_calls: AtomicUsize,
    menu_calls: AtomicUsize,
    address_calls: Mutex<Vec<u64>>,
}

impl StubSource {
    pub(crate) fn with_total(total: u64) -> Self {
        Self {
            total,
            menu: vec![MenuItem {
                id: "1".to_string(),
                menu_item: "Home".to_string(),
                href: "/".to_string(),
            }],
            ..Default::default()
        }
    }

    pub(crate) fn failing(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.failing.extend(ids);
        self
    }

    pub(crate) fn delayed(mut self, id: u64, delay: Duration) -> Self {
        self.delays.insert(id, delay);
        self
    }

    // the next `times` count requests fail before one succeeds
    pub(crate) fn count_fails(self, times: usize) -> Self {
        self.count_failures.store(times, Ordering::SeqCst);
        self
    }

    pub(crate) fn menu_fails(self, times: usize) -> Self {
        self.menu_failures.store(times, Ordering::SeqCst);
        self
    }

    pub(crate) fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn menu_calls(&self) -> usize {
        self.menu_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn address_calls(&self) -> Vec<u64> {
        self.address_calls.lock().unwrap().clone()
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl RecordSource for StubSource {
    async fn menu_items(&self) -> Result<Vec<MenuItem>, SourceError> {
        self.menu_calls.fetch_add(1, Ordering::SeqCst);
        if Self::take_failure(&self.menu_failures) {
            return Err(unavailable("menu_items".to_string()));
        }
        Ok(self.menu.clone())
    }

    async fn total_count(&self) -> Result<u64, SourceError> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        if Self::take_failure(&self.count_failures) {
            return Err(unavailable("customer_numbers".to_string()));
        }
        Ok(self.total)
    }

    async fn address(&self, id: u64) -> Result<Address, SourceError> {
        self.address_calls.lock().unwrap().push(id);
        if let Some(delay) = self.delays.get(&id) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(&id) || id == 0 || id > self.total {
            return Err(unavailable(format!("address_inventory/{id}")));
        }
        Ok(address(id))
    }
}
