//! Stateless HTTP request builder and response parser for the medication API.
//!
//! # Design
//! `MedicationClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. Whoever sits in between executes the round-trip, which
//! keeps this module deterministic and free of I/O.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{MedicationId, MedicationPayload, MedicationRecord};

const COLLECTION: &str = "medicamentos";

/// Synchronous, stateless client for the medication API.
#[derive(Debug, Clone)]
pub struct MedicationClient {
    base_url: String,
}

impl MedicationClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_medications(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.collection_path(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_medication(
        &self,
        input: &MedicationPayload,
    ) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.collection_path(),
            headers: json_headers(),
            body: Some(to_body(input)?),
        })
    }

    pub fn build_update_medication(
        &self,
        id: &MedicationId,
        input: &MedicationPayload,
    ) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: self.item_path(id),
            headers: json_headers(),
            body: Some(to_body(input)?),
        })
    }

    pub fn build_delete_medication(&self, id: &MedicationId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.item_path(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_medications(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<MedicationRecord>, ApiError> {
        check_status(&response)?;
        from_body(&response.body)
    }

    pub fn parse_create_medication(
        &self,
        response: HttpResponse,
    ) -> Result<MedicationRecord, ApiError> {
        check_status(&response)?;
        from_body(&response.body)
    }

    /// Servers differ on what a PUT echoes back, so the body is ignored.
    pub fn parse_update_medication(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_delete_medication(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn collection_path(&self) -> String {
        format!("{}/{COLLECTION}", self.base_url)
    }

    fn item_path(&self, id: &MedicationId) -> String {
        format!("{}/{COLLECTION}/{id}", self.base_url)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn to_body(input: &MedicationPayload) -> Result<String, ApiError> {
    serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn from_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Any 2xx is success; everything else is a uniform failure.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
