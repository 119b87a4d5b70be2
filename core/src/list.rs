//! The medication list and its load/refresh/delete cycle.
//!
//! # Design
//! The collection is only ever replaced wholesale by a successful fetch;
//! nothing here inserts, patches or removes individual entries. A delete
//! that the server confirmed is reflected by the reload that follows it.
//!
//! Every fetch takes a sequence number when it is issued. A response is
//! only applied if nothing issued later has been applied already, so a
//! slow GET can never overwrite the result of a newer one.
//!
//! State sits behind a `Mutex` so the controller can be shared by `&self`
//! between the host view and the form's save callback. The lock is never
//! held across an await point.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api::Api;
use crate::error::CoreError;
use crate::notice::{self, Notice, Notifier};
use crate::types::{MedicationId, MedicationRecord};

#[derive(Debug, Default)]
struct ListState {
    items: Vec<MedicationRecord>,
    is_loading: bool,
    refreshes: u32,
    is_deleting: bool,
    pending_delete: Option<MedicationId>,
    issued_fetches: u64,
    applied_fetch: u64,
}

#[derive(Debug, Clone, Copy)]
enum Flag {
    Loading,
    Refreshing,
    Deleting,
}

impl Flag {
    fn operation(self) -> &'static str {
        match self {
            Flag::Loading => "load",
            Flag::Refreshing => "refresh",
            Flag::Deleting => "delete",
        }
    }
}

impl ListState {
    fn is_set(&self, flag: Flag) -> bool {
        match flag {
            Flag::Loading => self.is_loading,
            Flag::Refreshing => self.refreshes > 0,
            Flag::Deleting => self.is_deleting,
        }
    }

    fn set(&mut self, flag: Flag) {
        match flag {
            Flag::Loading => self.is_loading = true,
            Flag::Refreshing => self.refreshes += 1,
            Flag::Deleting => self.is_deleting = true,
        }
    }

    fn clear(&mut self, flag: Flag) {
        match flag {
            Flag::Loading => self.is_loading = false,
            Flag::Refreshing => self.refreshes = self.refreshes.saturating_sub(1),
            Flag::Deleting => self.is_deleting = false,
        }
    }
}

/// Clears its flag when dropped, whichever way the operation ends.
struct FlagReset<'a> {
    state: &'a Mutex<ListState>,
    flag: Flag,
}

impl Drop for FlagReset<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.clear(self.flag);
    }
}

/// What the host should show before a deletion goes ahead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePrompt {
    pub id: MedicationId,
    pub title: String,
    pub message: String,
    pub cancel_label: String,
    pub confirm_label: String,
}

pub struct ListController {
    api: Api,
    notifier: Arc<dyn Notifier>,
    state: Mutex<ListState>,
}

impl ListController {
    pub fn new(api: Api, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: Mutex::new(ListState::default()),
        }
    }

    /// Snapshot of the collection in server order.
    pub fn items(&self) -> Vec<MedicationRecord> {
        self.lock().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading
    }

    /// True while a pull-to-refresh or a post-write reload is in flight.
    pub fn is_refreshing(&self) -> bool {
        self.lock().refreshes > 0
    }

    pub fn is_deleting(&self) -> bool {
        self.lock().is_deleting
    }

    pub fn pending_delete(&self) -> Option<MedicationId> {
        self.lock().pending_delete.clone()
    }

    /// Initial full load.
    ///
    /// Load does not wait for a refresh in flight, nor the other way round.
    /// When their requests overlap, the list issued last is the one kept:
    /// an older response arriving late is discarded rather than applied.
    pub async fn load(&self) -> Result<(), CoreError> {
        let _loading = self.begin(Flag::Loading)?;
        self.fetch().await
    }

    /// Pull-to-refresh. A second trigger while one is in flight returns
    /// `CoreError::Busy` and sends nothing.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let _refreshing = self.begin(Flag::Refreshing)?;
        self.fetch().await
    }

    /// Refresh after a confirmed write.
    ///
    /// Always issues a new GET, even when a pull-to-refresh is already in
    /// flight: that request may have left before the write landed, and its
    /// response is discarded if it arrives after this one.
    pub async fn reload(&self) -> Result<(), CoreError> {
        let _refreshing = self.track(Flag::Refreshing);
        self.fetch().await
    }

    /// First step of a deletion. Nothing is sent until `confirm_delete`.
    pub fn request_delete(&self, id: MedicationId) -> DeletePrompt {
        self.lock().pending_delete = Some(id.clone());
        DeletePrompt {
            id,
            title: "Confirm deletion".to_string(),
            message: "Are you sure you want to delete this medication?".to_string(),
            cancel_label: "Cancel".to_string(),
            confirm_label: "Delete".to_string(),
        }
    }

    /// Returns whether a deletion was pending.
    pub fn cancel_delete(&self) -> bool {
        self.lock().pending_delete.take().is_some()
    }

    pub async fn confirm_delete(&self) -> Result<(), CoreError> {
        let _deleting = self.begin(Flag::Deleting)?;
        let id = self
            .lock()
            .pending_delete
            .take()
            .ok_or(CoreError::NothingPending)?;

        if let Err(err) = self.api.delete(&id).await {
            tracing::error!(%id, error = %err, "failed to delete medication");
            self.notifier.notify(Notice::error(notice::DELETE_FAILED));
            return Err(err.into());
        }

        tracing::info!(%id, "medication deleted");
        // A failed reload reports itself; the deletion still happened.
        let _ = self.reload().await;
        self.notifier.notify(Notice::success(notice::DELETE_SUCCEEDED));
        Ok(())
    }

    async fn fetch(&self) -> Result<(), CoreError> {
        let seq = {
            let mut state = self.lock();
            state.issued_fetches += 1;
            state.issued_fetches
        };

        match self.api.list().await {
            Ok(items) => {
                let mut state = self.lock();
                if seq < state.applied_fetch {
                    tracing::debug!(seq, applied = state.applied_fetch, "discarded stale medication list");
                } else {
                    tracing::debug!(seq, count = items.len(), "medication list replaced");
                    state.applied_fetch = seq;
                    state.items = items;
                }
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch medications");
                self.notifier.notify(Notice::error(notice::LOAD_FAILED));
                Err(err.into())
            }
        }
    }

    fn begin(&self, flag: Flag) -> Result<FlagReset<'_>, CoreError> {
        let mut state = self.lock();
        if state.is_set(flag) {
            tracing::debug!(operation = flag.operation(), "ignored duplicate trigger");
            return Err(CoreError::Busy(flag.operation()));
        }
        state.set(flag);
        Ok(FlagReset {
            state: &self.state,
            flag,
        })
    }

    fn track(&self, flag: Flag) -> FlagReset<'_> {
        self.lock().set(flag);
        FlagReset {
            state: &self.state,
            flag,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ListController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListController")
            .field("api", &self.api)
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}
