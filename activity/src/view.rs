//! Headless view state for screens that show the activity log.
//!
//! A view keeps its own filter criteria and page window over the ledger
//! and refreshes itself when the ledger broadcasts a change. Views that are
//! not attached simply miss notifications and catch up on their next
//! [`LedgerObserver::refresh`].

use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::Weak;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ExportError;
use crate::export;
use crate::export::ExportOutcome;
use crate::filter::FilterCriteria;
use crate::ledger::Ledger;
use crate::notify::LedgerEvent;
use crate::notify::SubscriptionId;
use crate::pagination::Paginator;
use crate::types::ActivityRecord;

/// Page size of the full activity log screen.
pub const FULL_PAGE_SIZE: usize = 20;
/// Page size of the side drawer.
pub const DRAWER_PAGE_SIZE: usize = 3;
/// Number of records in the bottom "recent activity" strip.
pub const RECENT_PANEL_LIMIT: usize = 10;

/// Something that mirrors ledger state and reacts to its events.
pub trait LedgerObserver {
    fn refresh(&mut self, ledger: &Ledger);
    fn handle(&mut self, ledger: &Ledger, event: &LedgerEvent);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewSummary {
    pub total: usize,
    pub filtered: usize,
    pub current_page: usize,
    /// At least 1, even for an empty result.
    pub total_pages: usize,
}

/// Filterable, paginated list of activities.
#[derive(Debug, Clone)]
pub struct ActivityView {
    criteria: FilterCriteria,
    paginator: Paginator,
    total: usize,
    filtered: Vec<ActivityRecord>,
}

impl ActivityView {
    pub fn new(page_size: usize) -> Self {
        Self {
            criteria: FilterCriteria::default(),
            paginator: Paginator::new(page_size),
            total: 0,
            filtered: Vec::new(),
        }
    }

    pub fn full_page() -> Self {
        Self::new(FULL_PAGE_SIZE)
    }

    pub fn drawer() -> Self {
        Self::new(DRAWER_PAGE_SIZE)
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Apply new criteria; the view jumps back to page 1.
    pub fn set_criteria(&mut self, ledger: &Ledger, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.paginator.reset();
        self.refresh(ledger);
    }

    pub fn clear_criteria(&mut self, ledger: &Ledger) {
        self.set_criteria(ledger, FilterCriteria::default());
    }

    /// All records matching the criteria, newest first.
    pub fn filtered(&self) -> &[ActivityRecord] {
        &self.filtered
    }

    /// Records on the current page.
    pub fn visible(&self) -> &[ActivityRecord] {
        self.paginator.page(&self.filtered)
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn set_page(&mut self, page: usize) {
        self.paginator.set_page(page);
        self.paginator.clamp(self.filtered.len());
    }

    pub fn next_page(&mut self) -> bool {
        self.paginator.next_page(self.filtered.len())
    }

    pub fn prev_page(&mut self) -> bool {
        self.paginator.prev_page()
    }

    pub fn summary(&self) -> ViewSummary {
        ViewSummary {
            total: self.total,
            filtered: self.filtered.len(),
            current_page: self.paginator.current_page(),
            total_pages: self.paginator.total_pages(self.filtered.len()).max(1),
        }
    }

    /// Export the filtered records (not just the visible page).
    pub fn export_to(&self, dir: &Path, date: NaiveDate) -> Result<ExportOutcome, ExportError> {
        export::write_export(dir, &self.filtered, date)
    }
}

impl LedgerObserver for ActivityView {
    fn refresh(&mut self, ledger: &Ledger) {
        let all = ledger.list();
        self.total = all.len();
        self.filtered = self.criteria.apply(all);
        self.paginator.clamp(self.filtered.len());
    }

    fn handle(&mut self, ledger: &Ledger, event: &LedgerEvent) {
        match event {
            LedgerEvent::Cleared => {
                self.total = 0;
                self.filtered.clear();
                self.paginator.reset();
            }
            LedgerEvent::RecordAdded(_) | LedgerEvent::Imported { .. } => self.refresh(ledger),
        }
    }
}

/// The newest few records, unfiltered.
#[derive(Debug, Clone)]
pub struct RecentPanel {
    limit: usize,
    records: Vec<ActivityRecord>,
}

impl RecentPanel {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }
}

impl Default for RecentPanel {
    fn default() -> Self {
        Self::new(RECENT_PANEL_LIMIT)
    }
}

impl LedgerObserver for RecentPanel {
    fn refresh(&mut self, ledger: &Ledger) {
        self.records = ledger.recent(self.limit);
    }

    fn handle(&mut self, ledger: &Ledger, event: &LedgerEvent) {
        match event {
            LedgerEvent::Cleared => self.records.clear(),
            LedgerEvent::RecordAdded(_) | LedgerEvent::Imported { .. } => self.refresh(ledger),
        }
    }
}

/// An observer subscribed to a ledger for as long as this handle lives.
///
/// Dropping the handle unsubscribes. The ledger is held weakly so the
/// subscription does not keep it alive. Do not write to the ledger from
/// inside [`LiveView::with`]: the notification would wait on the view lock.
pub struct LiveView<V> {
    view: Arc<Mutex<V>>,
    ledger: Weak<Ledger>,
    subscription: SubscriptionId,
}

impl<V> LiveView<V>
where
    V: LedgerObserver + Send + 'static,
{
    /// Load `view` from the ledger and keep it current.
    pub fn attach(ledger: &Arc<Ledger>, mut view: V) -> Self {
        view.refresh(ledger);
        let view = Arc::new(Mutex::new(view));
        let weak_ledger = Arc::downgrade(ledger);
        let target = Arc::clone(&view);
        let callback_ledger = weak_ledger.clone();
        let subscription = ledger.subscribe(move |event| {
            let Some(ledger) = callback_ledger.upgrade() else {
                return;
            };
            target
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .handle(&ledger, event);
        });
        Self {
            view,
            ledger: weak_ledger,
            subscription,
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        let mut view = self.view.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut view)
    }
}

impl<V> Drop for LiveView<V> {
    fn drop(&mut self) {
        if let Some(ledger) = self.ledger.upgrade() {
            ledger.unsubscribe(self.subscription);
        }
    }
}
