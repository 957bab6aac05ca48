#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use stockroom_activity::Ledger;
use stockroom_activity::LedgerConfig;
use stockroom_activity::LedgerEvent;
use stockroom_activity::clock::Clock;
use stockroom_activity::factory::Backend;
use stockroom_activity::factory::open_storage;

pub fn backends() -> Vec<Backend> {
    #[cfg(feature = "sqlite")]
    {
        vec![Backend::File, Backend::Sqlite]
    }
    #[cfg(not(feature = "sqlite"))]
    {
        vec![Backend::File]
    }
}

/// Clock that advances one second on every reading.
pub struct StepClock {
    next: Mutex<DateTime<Utc>>,
}

impl StepClock {
    pub fn starting_at(start: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            next: Mutex::new(start),
        })
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap();
        let now = *next;
        *next = now + Duration::seconds(1);
        now
    }
}

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap()
}

pub fn ledger_in(dir: &Path, backend: Backend) -> Arc<Ledger> {
    let storage = open_storage(dir, Some(backend)).unwrap();
    Arc::new(Ledger::new(storage, LedgerConfig::default()).with_clock(StepClock::starting_at(epoch())))
}

/// Collect every event the ledger emits.
pub fn capture(ledger: &Ledger) -> Arc<Mutex<Vec<LedgerEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    ledger.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
    events
}
