//! Client-side state core for a personal medication list.
//!
//! # Overview
//! Owns the local view of the medication collection, drives create, update
//! and delete requests against the remote REST service, and runs the
//! create/edit form that feeds a single submission path. Presentation is
//! left to the host: it renders controller state and forwards `Notice`s.
//!
//! # Design
//! - `MedicationClient` is stateless and sans-IO: `build_*` produces an
//!   `HttpRequest`, `parse_*` consumes an `HttpResponse`.
//! - `Api` is the shared call path; it runs requests through an injected
//!   `Transport` under a bounded timeout.
//! - `ListController` replaces its collection wholesale on every successful
//!   fetch. There are no optimistic updates.
//! - `FormController::submit` takes the list reload as a continuation and
//!   awaits it only after the server confirmed the write. `reload` always
//!   sends its own GET; `refresh` is the deduplicated pull-to-refresh.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use medication_core::{
//!     Api, ClientConfig, FormController, ListController, LogNotifier, ReqwestTransport,
//! };
//!
//! let config = ClientConfig::from_env()?;
//! let transport = Arc::new(ReqwestTransport::new(config.timeout)?);
//! let api = Api::new(&config, transport);
//! let notifier = Arc::new(LogNotifier);
//!
//! let list = ListController::new(api.clone(), notifier.clone());
//! let form = FormController::new(api, notifier);
//!
//! let _ = list.load().await;
//! form.open(None);
//! let _ = form.submit(|| list.reload()).await;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod list;
pub mod notice;
pub mod transport;
pub mod types;

pub use api::Api;
pub use client::MedicationClient;
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, CoreError, ValidationError};
pub use form::{Draft, Field, FormController, FormMode, SubmitOutcome};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use list::{DeletePrompt, ListController};
pub use notice::{LogNotifier, Notice, NoticeLevel, Notifier};
pub use transport::{ReqwestTransport, Transport};
pub use types::{MedicationId, MedicationPayload, MedicationRecord};
