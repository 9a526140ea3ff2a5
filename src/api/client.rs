use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use super::types::{
    ActiveEvent, ArchivedEvent, CreateEventRequest, CreateEventResponse, EventFullResponse,
    FinalizeRequest, UpdateEventRequest, VoteRequest,
};
use crate::utils::logging::{log_api_error, log_api_request, log_api_success};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request to backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Operations the screens need from the events backend.
#[async_trait]
pub trait EventsApi: Send + Sync {
    /// Checks the launch init data with the backend.
    async fn validate(&self) -> Result<(), ApiError>;
    async fn create_event(&self, request: &CreateEventRequest) -> Result<CreateEventResponse, ApiError>;
    async fn update_event(&self, event_id: i64, request: &UpdateEventRequest) -> Result<(), ApiError>;
    async fn active_events(&self) -> Result<Vec<ActiveEvent>, ApiError>;
    async fn archived_events(&self) -> Result<Vec<ArchivedEvent>, ApiError>;
    async fn event(&self, event_id: i64) -> Result<EventFullResponse, ApiError>;
    async fn public_event(&self, public_id: &str) -> Result<EventFullResponse, ApiError>;
    async fn delete_event(&self, event_id: i64) -> Result<(), ApiError>;
    async fn unfinalize_event(&self, event_id: i64) -> Result<(), ApiError>;
    async fn submit_votes(&self, event_id: i64, slot_ids: &[i64]) -> Result<(), ApiError>;
    async fn finalize(&self, event_id: i64, slot_id: i64, location: Option<&str>) -> Result<(), ApiError>;
}

/// `reqwest` implementation of [`EventsApi`].
///
/// Every call carries the raw Telegram init data in `Authorization`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    init_data: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, init_data: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            init_data: init_data.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/api/{}", self.base_url, endpoint)
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        self.client
            .request(method, self.endpoint_url(endpoint))
            .header(AUTHORIZATION, self.init_data.as_str())
            .header(CONTENT_TYPE, "application/json")
    }

    /// Sends the request and returns the body of a 2xx response.
    async fn execute(&self, builder: RequestBuilder, method: &Method, endpoint: &str) -> Result<String, ApiError> {
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                log_api_error(method.as_str(), endpoint, &e.to_string());
                return Err(ApiError::Transport(e));
            }
        };

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            log_api_error(method.as_str(), endpoint, &format!("status {} - {}", status.as_u16(), body));
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        log_api_success(method.as_str(), endpoint, status.as_u16());
        Ok(body)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<String, ApiError> {
        log_api_request(method.as_str(), endpoint, None);
        let mut builder = self.request(method.clone(), endpoint);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.execute(builder, &method, endpoint).await
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let body = self.send::<()>(Method::GET, endpoint, None).await?;
        decode(endpoint, &body)
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|source| {
        log_api_error("DECODE", endpoint, &source.to_string());
        ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        }
    })
}

#[async_trait]
impl EventsApi for ApiClient {
    async fn validate(&self) -> Result<(), ApiError> {
        self.send::<()>(Method::POST, "validate", None).await?;
        Ok(())
    }

    async fn create_event(&self, request: &CreateEventRequest) -> Result<CreateEventResponse, ApiError> {
        let endpoint = "events/create";
        let body = self.send(Method::POST, endpoint, Some(request)).await?;
        decode(endpoint, &body)
    }

    async fn update_event(&self, event_id: i64, request: &UpdateEventRequest) -> Result<(), ApiError> {
        self.send(Method::PUT, &format!("events/{event_id}"), Some(request))
            .await?;
        Ok(())
    }

    async fn active_events(&self) -> Result<Vec<ActiveEvent>, ApiError> {
        self.get("events/active").await
    }

    async fn archived_events(&self) -> Result<Vec<ArchivedEvent>, ApiError> {
        self.get("events/archived").await
    }

    async fn event(&self, event_id: i64) -> Result<EventFullResponse, ApiError> {
        self.get(&format!("events/{event_id}")).await
    }

    async fn public_event(&self, public_id: &str) -> Result<EventFullResponse, ApiError> {
        self.get(&format!("events/public/{public_id}")).await
    }

    async fn delete_event(&self, event_id: i64) -> Result<(), ApiError> {
        self.send::<()>(Method::POST, &format!("events/{event_id}/delete"), None)
            .await?;
        Ok(())
    }

    async fn unfinalize_event(&self, event_id: i64) -> Result<(), ApiError> {
        self.send::<()>(Method::POST, &format!("events/{event_id}/unfinalize"), None)
            .await?;
        Ok(())
    }

    async fn submit_votes(&self, event_id: i64, slot_ids: &[i64]) -> Result<(), ApiError> {
        let request = VoteRequest {
            slot_ids: slot_ids.to_vec(),
        };
        self.send(Method::POST, &format!("events/{event_id}/votes"), Some(&request))
            .await?;
        Ok(())
    }

    async fn finalize(&self, event_id: i64, slot_id: i64, location: Option<&str>) -> Result<(), ApiError> {
        let request = FinalizeRequest {
            slot_id,
            location: location.map(str::to_string),
        };
        self.send(Method::POST, &format!("events/{event_id}/finalized"), Some(&request))
            .await?;
        Ok(())
    }
}
