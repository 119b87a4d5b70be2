//! The shared call path used by both controllers: build, execute with a
//! bounded timeout, parse.

use std::sync::Arc;
use std::time::Duration;

use crate::client::MedicationClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{MedicationId, MedicationPayload, MedicationRecord};

#[derive(Clone)]
pub struct Api {
    client: MedicationClient,
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl Api {
    pub fn new(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            client: MedicationClient::new(&config.base_url),
            transport,
            timeout: config.timeout,
        }
    }

    pub fn client(&self) -> &MedicationClient {
        &self.client
    }

    pub async fn list(&self) -> Result<Vec<MedicationRecord>, ApiError> {
        let response = self.send(self.client.build_list_medications()).await?;
        self.client.parse_list_medications(response)
    }

    /// The status alone decides whether the record was created. A 2xx whose
    /// body is not a record still counts, and yields `None`.
    pub async fn create(
        &self,
        input: &MedicationPayload,
    ) -> Result<Option<MedicationRecord>, ApiError> {
        let request = self.client.build_create_medication(input)?;
        let response = self.send(request).await?;
        match self.client.parse_create_medication(response) {
            Ok(record) => Ok(Some(record)),
            Err(ApiError::DeserializationError(e)) => {
                tracing::warn!(error = %e, "created medication but could not read it back");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn update(
        &self,
        id: &MedicationId,
        input: &MedicationPayload,
    ) -> Result<(), ApiError> {
        let request = self.client.build_update_medication(id, input)?;
        let response = self.send(request).await?;
        self.client.parse_update_medication(response)
    }

    pub async fn delete(&self, id: &MedicationId) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete_medication(id)).await?;
        self.client.parse_delete_medication(response)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method;
        let path = request.path.clone();
        tracing::debug!(%method, %path, "sending request");

        let response = tokio::time::timeout(self.timeout, self.transport.execute(request))
            .await
            .map_err(|_| ApiError::Timeout(self.timeout))?
            .inspect_err(|e| tracing::warn!(%method, %path, error = %e, "request failed"))?;

        tracing::debug!(%method, %path, status = response.status, "received response");
        Ok(response)
    }
}

impl std::fmt::Debug for Api {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Api")
            .field("base_url", &self.client.base_url())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
