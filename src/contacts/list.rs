use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use crate::api::{ApiError, ContactApi, ContactPage, ContactRecord};

/// Records requested per page.
pub const PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListState {
    #[default]
    Idle,
    Loading,
    Loaded,
    LoadingMore,
    Error,
}

impl ListState {
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Loading | Self::LoadingMore)
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: ListState,
    records: Vec<ContactRecord>,
    after: Option<String>,
    error: Option<String>,
    /// Ids confirmed deleted since the current page request went out. That
    /// response may still carry them.
    deleted: HashSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Merge {
    Replace,
    Append,
}

/// Paginated, accumulating view of the remote collection.
///
/// All methods take `&self`: the engine lives on the UI thread behind an
/// `Rc`, and no borrow is held across an `.await`. At most one page request
/// is in flight; a load requested while another is pending is dropped.
/// The change callback runs synchronously after every state transition.
pub struct ContactList<A> {
    api: A,
    inner: RefCell<Inner>,
    generation: Cell<u64>,
    active: Cell<bool>,
    on_change: RefCell<Option<Rc<dyn Fn()>>>,
}

impl<A: ContactApi> ContactList<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            inner: RefCell::new(Inner::default()),
            generation: Cell::new(0),
            active: Cell::new(true),
            on_change: RefCell::new(None),
        }
    }

    /// Fetches the first page and replaces everything held so far. On failure
    /// the previous records stay visible next to the error.
    pub async fn load_first_page(&self) {
        let Some(ticket) = self.begin(ListState::Loading) else { return };
        let result = self.api.list_contacts(PAGE_SIZE, None).await;
        self.finish(ticket, result, Merge::Replace);
    }

    /// Fetches the page after the held cursor and appends it. Does nothing
    /// when the end of the collection was reached or a load is pending.
    pub async fn load_next_page(&self) {
        let Some(cursor) = self.inner.borrow().after.clone() else {
            log::debug!("no continuation cursor; end of collection");
            return;
        };
        let Some(ticket) = self.begin(ListState::LoadingMore) else { return };
        let result = self.api.list_contacts(PAGE_SIZE, Some(&cursor)).await;
        self.finish(ticket, result, Merge::Append);
    }

    /// Deletes `id` remotely, then drops it from the local list. A failure is
    /// handed back to the caller and leaves the list as it was.
    pub async fn remove_record(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete_contact(id).await?;
        if !self.active.get() {
            log::debug!("contact {id} deleted after the list was torn down");
            return Ok(());
        }
        {
            let mut inner = self.inner.borrow_mut();
            let before = inner.records.len();
            inner.records.retain(|r| r.id != id);
            inner.deleted.insert(id.to_string());
            log::info!("deleted contact {id} ({} local record(s) removed)", before - inner.records.len());
        }
        self.notify();
        Ok(())
    }

    /// Detaches the engine from its view. Responses still in flight are
    /// discarded when they arrive.
    pub fn deactivate(&self) {
        self.active.set(false);
        self.generation.set(self.generation.get() + 1);
        self.on_change.replace(None);
    }

    fn begin(&self, next: ListState) -> Option<u64> {
        if !self.active.get() {
            return None;
        }
        {
            let mut inner = self.inner.borrow_mut();
            if inner.state.is_busy() {
                log::debug!("page request ignored; one is already in flight");
                return None;
            }
            inner.state = next;
            inner.error = None;
            inner.deleted.clear();
        }
        self.notify();
        Some(self.generation.get())
    }

    fn finish(&self, ticket: u64, result: Result<ContactPage, ApiError>, merge: Merge) {
        if ticket != self.generation.get() || !self.active.get() {
            log::debug!("discarding page response for a torn-down list");
            return;
        }
        self.apply(result, merge);
        self.notify();
    }

    fn apply(&self, result: Result<ContactPage, ApiError>, merge: Merge) {
        let mut inner = self.inner.borrow_mut();
        match result {
            Ok(page) => {
                if merge == Merge::Replace {
                    inner.records.clear();
                }
                let received = page.results.len();
                for record in page.results {
                    if inner.deleted.contains(&record.id) {
                        log::debug!("skipping contact {} deleted during the request", record.id);
                        continue;
                    }
                    if inner.records.iter().any(|r| r.id == record.id) {
                        log::debug!("skipping duplicate contact {}", record.id);
                        continue;
                    }
                    inner.records.push(record);
                }
                inner.after = page.after;
                inner.state = ListState::Loaded;
                log::debug!(
                    "loaded {received} contact(s), holding {}, more: {}",
                    inner.records.len(),
                    inner.after.is_some()
                );
            }
            Err(e) => {
                log::warn!("failed to load contacts: {e}");
                inner.state = ListState::Error;
                inner.error = Some(e.to_string());
            }
        }
    }
}

impl<A> ContactList<A> {
    pub fn connect_changed(&self, callback: impl Fn() + 'static) {
        self.on_change.replace(Some(Rc::new(callback)));
    }

    fn notify(&self) {
        let callback = self.on_change.borrow().clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    pub fn state(&self) -> ListState {
        self.inner.borrow().state
    }

    pub fn is_busy(&self) -> bool {
        self.state().is_busy()
    }

    pub fn records(&self) -> Vec<ContactRecord> {
        self.inner.borrow().records.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cursor(&self) -> Option<String> {
        self.inner.borrow().after.clone()
    }

    pub fn has_more(&self) -> bool {
        self.inner.borrow().after.is_some()
    }

    pub fn error(&self) -> Option<String> {
        self.inner.borrow().error.clone()
    }
}

/// How a record is named in the delete confirmation: email, else id.
pub fn delete_target(record: &ContactRecord) -> &str {
    record.email().unwrap_or(&record.id)
}
