//! Create/edit form state and the single submission path.
//!
//! # Design
//! `open` is the only place a draft is populated from an existing record,
//! and `close` is the only way back to a clean default. A submit that
//! succeeds hands control to the caller's `on_save_success` continuation
//! before the form closes, so the follow-up reload can never race the
//! write that caused it. Wire it to `ListController::reload`, which always
//! sends a fresh GET even if a pull-to-refresh is already in flight.
//!
//! Every `open`/`close` starts a new session. A submit only clears or
//! closes the form if its session is still the current one when the
//! request returns.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api::Api;
use crate::error::{CoreError, ValidationError};
use crate::notice::{self, Notice, Notifier};
use crate::types::{MedicationId, MedicationPayload, MedicationRecord};

/// One of the three editable fields of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Dosage,
    Time,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Dosage, Field::Time];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Dosage => "dosage",
            Field::Time => "time",
        }
    }
}

/// Unsaved field values. Never carries an id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub dosage: String,
    pub time: String,
}

impl Draft {
    pub fn from_record(record: &MedicationRecord) -> Self {
        Self {
            name: record.name.clone(),
            dosage: record.dosage.clone(),
            time: record.time.clone(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Dosage => &self.dosage,
            Field::Time => &self.time,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Dosage => &mut self.dosage,
            Field::Time => &mut self.time,
        };
        *slot = value.into();
    }

    /// Whitespace-only values count as empty.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.get(*f).trim().is_empty())
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(missing))
        }
    }

    pub fn to_payload(&self) -> MedicationPayload {
        MedicationPayload {
            name: self.name.clone(),
            dosage: self.dosage.clone(),
            time: self.time.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(MedicationRecord),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The server's echo of the new record, when its body could be read.
    Created(Option<MedicationRecord>),
    Updated(MedicationId),
}

#[derive(Debug)]
struct FormState {
    is_open: bool,
    mode: FormMode,
    draft: Draft,
    is_submitting: bool,
    session: u64,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            is_open: false,
            mode: FormMode::Create,
            draft: Draft::default(),
            is_submitting: false,
            session: 0,
        }
    }
}

/// Clears `is_submitting` for its session when dropped.
struct SubmitReset<'a> {
    state: &'a Mutex<FormState>,
    session: u64,
}

impl Drop for SubmitReset<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.session == self.session {
            state.is_submitting = false;
        }
    }
}

pub struct FormController {
    api: Api,
    notifier: Arc<dyn Notifier>,
    state: Mutex<FormState>,
}

impl FormController {
    pub fn new(api: Api, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: Mutex::new(FormState::default()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.lock().is_open
    }

    pub fn mode(&self) -> FormMode {
        self.lock().mode.clone()
    }

    pub fn draft(&self) -> Draft {
        self.lock().draft.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().is_submitting
    }

    /// Open for editing `record`, or for creating a new one when `None`.
    pub fn open(&self, record: Option<MedicationRecord>) {
        let mut state = self.lock();
        state.session += 1;
        state.is_open = true;
        state.is_submitting = false;
        match record {
            Some(record) => {
                state.draft = Draft::from_record(&record);
                state.mode = FormMode::Edit(record);
            }
            None => {
                state.draft = Draft::default();
                state.mode = FormMode::Create;
            }
        }
    }

    pub fn update_field(&self, field: Field, value: impl Into<String>) {
        self.lock().draft.set(field, value);
    }

    pub fn close(&self) {
        let mut state = self.lock();
        state.session += 1;
        state.is_open = false;
        state.is_submitting = false;
        state.mode = FormMode::Create;
        state.draft = Draft::default();
    }

    /// Validate and save the draft.
    ///
    /// On success `on_save_success` is awaited before the form closes. On
    /// any failure the form stays open with the draft untouched.
    pub async fn submit<F, Fut>(&self, on_save_success: F) -> Result<SubmitOutcome, CoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        let (session, mode, payload) = {
            let mut state = self.lock();
            if !state.is_open {
                return Err(CoreError::FormClosed);
            }
            if state.is_submitting {
                tracing::debug!("ignored duplicate submit");
                return Err(CoreError::Busy("submit"));
            }
            let validation = state.draft.validate();
            if let Err(err) = validation {
                drop(state);
                tracing::debug!(error = %err, "draft rejected");
                self.notifier.notify(Notice::error(notice::FIELDS_REQUIRED));
                return Err(err.into());
            }
            state.is_submitting = true;
            (state.session, state.mode.clone(), state.draft.to_payload())
        };
        let _submitting = SubmitReset {
            state: &self.state,
            session,
        };

        let saved = match &mode {
            FormMode::Edit(record) => self
                .api
                .update(&record.id, &payload)
                .await
                .map(|()| SubmitOutcome::Updated(record.id.clone())),
            FormMode::Create => self.api.create(&payload).await.map(SubmitOutcome::Created),
        };

        let outcome = match saved {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(error = %err, "failed to save medication");
                self.notifier.notify(Notice::error(notice::SAVE_FAILED));
                return Err(err.into());
            }
        };

        match &outcome {
            SubmitOutcome::Created(record) => {
                match record {
                    Some(record) => tracing::info!(id = %record.id, "medication created"),
                    None => tracing::info!("medication created"),
                }
                self.notifier.notify(Notice::success(notice::CREATE_SUCCEEDED));
            }
            SubmitOutcome::Updated(id) => {
                tracing::info!(%id, "medication updated");
                self.notifier.notify(Notice::success(notice::UPDATE_SUCCEEDED));
            }
        }

        {
            let mut state = self.lock();
            if state.session == session {
                state.is_submitting = false;
                state.draft = Draft::default();
            }
        }
        on_save_success().await;
        if self.lock().session == session {
            self.close();
        }

        Ok(outcome)
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("api", &self.api)
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}
