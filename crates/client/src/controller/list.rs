//! Per-page list state and mutation reconciliation.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use domain::models::{HasStatus, OrderDirection, ProductEvent, Record, Sortable};
use domain::services::{
    derive_view, order_position, EntityForm, FieldErrors, ListQuery, ListView, OrderPosition,
    SortDirection,
};
use shared::pagination::DEFAULT_PAGE_SIZE;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::ServiceError;
use crate::services::{DraftOf, EntityService, OrderMutator, RestEntity, StatusMutator};

/// Outcome of a mutating controller call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation<T> {
    /// The call went through and the list was reconciled.
    Applied(T),
    /// Another mutation was in flight; nothing was sent.
    Busy,
    /// Nothing to do (unknown target, closed form, order already at 1).
    Skipped,
}

impl<T> Mutation<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Mutation::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Mutation::Applied(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Form has invalid fields: {0}")]
    Invalid(FieldErrors),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Clears a flag when dropped, so a failed call cannot leave it set.
struct FlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlagGuard<'a> {
    /// Sets the flag if it is clear.
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Counts in-flight loads; `is_loading` holds until the last one finishes.
struct LoadGuard<'a> {
    count: &'a AtomicUsize,
}

impl<'a> LoadGuard<'a> {
    fn enter(count: &'a AtomicUsize) -> Self {
        count.fetch_add(1, Ordering::AcqRel);
        Self { count }
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.count.fetch_sub(1, Ordering::AcqRel);
    }
}

struct ListState<E: Sortable> {
    /// Server order as returned by the last successful load.
    items: Vec<E>,
    query: ListQuery<E::SortKey>,
    pending_removal: Option<E>,
}

/// State and operations behind one entity list page.
///
/// Mutations are serialized: while one is in flight every other mutation
/// returns [`Mutation::Busy`] without touching the network. The state lock is
/// never held across a service call.
pub struct ListController<S: EntityService> {
    service: S,
    state: Mutex<ListState<S::Entity>>,
    loading: AtomicUsize,
    mutating: AtomicBool,
}

impl<S: EntityService> ListController<S> {
    pub fn new(service: S) -> Self {
        Self::with_page_size(service, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(service: S, page_size: usize) -> Self {
        let query = ListQuery::new(<S::Entity as Sortable>::default_sort_key())
            .with_page_size(page_size);
        Self {
            service,
            state: Mutex::new(ListState {
                items: Vec::new(),
                query,
                pending_removal: None,
            }),
            loading: AtomicUsize::new(0),
            mutating: AtomicBool::new(false),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    fn state(&self) -> MutexGuard<'_, ListState<S::Entity>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire) > 0
    }

    pub fn is_mutating(&self) -> bool {
        self.mutating.load(Ordering::Acquire)
    }

    pub fn items(&self) -> Vec<S::Entity> {
        self.state().items.clone()
    }

    pub fn find(&self, id: i64) -> Option<S::Entity> {
        self.state().items.iter().find(|item| item.id() == id).cloned()
    }

    /// Edits loaded items in place, e.g. to fill in nested display data.
    pub fn update_items<F: FnOnce(&mut Vec<S::Entity>)>(&self, change: F) {
        change(&mut self.state().items);
    }

    /// Loads every record, replacing the list. On failure the previous items
    /// are kept.
    pub async fn refresh(&self) -> Result<usize, ServiceError> {
        let _loading = LoadGuard::enter(&self.loading);

        match self.service.list().await {
            Ok(items) => {
                let count = items.len();
                self.state().items = items;
                Ok(count)
            }
            Err(e) => {
                warn!(
                    resource = <S::Entity as RestEntity>::RESOURCE.key,
                    kept = self.state().items.len(),
                    "Refresh failed, keeping previous items"
                );
                Err(e)
            }
        }
    }

    // List state

    pub fn query(&self) -> ListQuery<<S::Entity as Sortable>::SortKey> {
        self.state().query.clone()
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.state().query.set_query(query);
    }

    pub fn set_sort(&self, key: <S::Entity as Sortable>::SortKey, direction: SortDirection) {
        self.state().query.set_sort(key, direction);
    }

    pub fn toggle_sort(&self, key: <S::Entity as Sortable>::SortKey) {
        self.state().query.toggle_sort(key);
    }

    pub fn set_page(&self, page: usize) {
        self.state().query.set_page(page);
    }

    /// The filtered, sorted and paginated rows for the current state.
    pub fn view(&self) -> ListView<S::Entity> {
        let state = self.state();
        derive_view(&state.items, &state.query)
    }

    // Mutations

    /// Creates a record, or fully replaces `existing`.
    ///
    /// On success an edited record is replaced in place by id and a new one is
    /// appended. On failure the list is left untouched.
    pub async fn create_or_update(
        &self,
        draft: &DraftOf<S::Entity>,
        existing: Option<&S::Entity>,
    ) -> Result<Mutation<S::Entity>, ServiceError> {
        let Some(_mutating) = FlagGuard::try_acquire(&self.mutating) else {
            debug!("Mutation in flight, dropping submit");
            return Ok(Mutation::Busy);
        };

        let saved = match existing {
            Some(record) => self.service.update(record.id(), draft).await?,
            None => self.service.create(draft).await?,
        };

        self.upsert(saved.clone(), existing.map(Record::id));
        Ok(Mutation::Applied(saved))
    }

    /// Validates the form and saves it. The form closes only when the save
    /// is applied; on any failure it stays open with its fields intact.
    pub async fn submit(
        &self,
        form: &mut EntityForm<DraftOf<S::Entity>>,
    ) -> Result<Mutation<S::Entity>, SubmitError> {
        if !form.is_open() {
            return Ok(Mutation::Skipped);
        }

        let draft = form.validate().map_err(SubmitError::Invalid)?;
        let existing = form.mode().existing().cloned();

        let outcome = self.create_or_update(&draft, existing.as_ref()).await?;
        if outcome.is_applied() {
            form.close();
        }
        Ok(outcome)
    }

    /// First step of a delete: remembers the target and returns the
    /// confirmation prompt. `None` if no loaded record has `id`.
    pub fn request_remove(&self, id: i64) -> Option<String> {
        let mut state = self.state();
        let target = state.items.iter().find(|item| item.id() == id).cloned()?;
        let prompt = target.delete_prompt();
        state.pending_removal = Some(target);
        Some(prompt)
    }

    pub fn pending_removal(&self) -> Option<S::Entity> {
        self.state().pending_removal.clone()
    }

    pub fn cancel_remove(&self) {
        self.state().pending_removal = None;
    }

    /// Deletes the record from [`request_remove`](Self::request_remove).
    ///
    /// On failure the record stays in the list and stays pending.
    pub async fn confirm_remove(&self) -> Result<Mutation<i64>, ServiceError> {
        let Some(_mutating) = FlagGuard::try_acquire(&self.mutating) else {
            return Ok(Mutation::Busy);
        };

        let Some(target) = self.state().pending_removal.take() else {
            return Ok(Mutation::Skipped);
        };

        let id = target.id();
        match self.service.delete(id).await {
            Ok(()) => {
                self.state().items.retain(|item| item.id() != id);
                Ok(Mutation::Applied(id))
            }
            Err(e) => {
                self.state().pending_removal = Some(target);
                Err(e)
            }
        }
    }

    fn upsert(&self, record: S::Entity, replaced_id: Option<i64>) {
        let mut state = self.state();
        let position =
            replaced_id.and_then(|id| state.items.iter().position(|item| item.id() == id));
        match position {
            Some(index) => state.items[index] = record,
            None => state.items.push(record),
        }
    }
}

impl<S> ListController<S>
where
    S: StatusMutator,
    S::Entity: HasStatus<Status = S::Status>,
{
    /// Flips the record's status through the narrow status patch.
    pub async fn toggle_status(&self, id: i64) -> Result<Mutation<S::Entity>, ServiceError> {
        let Some(target) = self.find(id) else {
            return Ok(Mutation::Skipped);
        };
        let Some(_mutating) = FlagGuard::try_acquire(&self.mutating) else {
            return Ok(Mutation::Busy);
        };

        let updated = self
            .service
            .update_status(id, target.toggled_status())
            .await?;
        self.upsert(updated.clone(), Some(id));
        Ok(Mutation::Applied(updated))
    }
}

impl<S> ListController<S>
where
    S: OrderMutator<Entity = ProductEvent>,
{
    /// Moves a mapping one step by patching its order to `order ± 1`.
    ///
    /// Sibling mappings are not consulted; moving up from order 1 is skipped.
    pub async fn reorder(
        &self,
        id: i64,
        direction: OrderDirection,
    ) -> Result<Mutation<ProductEvent>, ServiceError> {
        let Some(target) = self.find(id) else {
            return Ok(Mutation::Skipped);
        };
        let Some(order) = target.next_order(direction) else {
            debug!(id, order = target.order, %direction, "Order cannot move further");
            return Ok(Mutation::Skipped);
        };
        let Some(_mutating) = FlagGuard::try_acquire(&self.mutating) else {
            return Ok(Mutation::Busy);
        };

        let updated = self.service.update_order(id, order).await?;
        self.upsert(updated.clone(), Some(id));
        Ok(Mutation::Applied(updated))
    }

    /// Rank of a mapping among its product's mappings.
    pub fn position(&self, id: i64) -> Option<OrderPosition> {
        order_position(&self.state().items, id)
    }
}
