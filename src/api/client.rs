use crate::api::models::{Contact, CreateContactRequest, DeleteContactResponse, MessageResponse};
use reqwest::{Client as HttpClient, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{}", describe_api_error(.status, .message))]
    Api { status: u16, message: Option<String> },
}

fn describe_api_error(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("HTTP {status}"),
    }
}

impl ClientError {
    /// The `message` field of an error body, when the server sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Talks to the contact service rooted at the contacts collection URL,
/// e.g. `http://localhost:5000/api/contacts`.
#[derive(Clone)]
pub struct ApiClient {
    http: HttpClient,
    base: Url,
}

impl ApiClient {
    pub fn new(api_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(&crate::utils::normalize_url(api_url))?;
        Ok(Self {
            http: HttpClient::new(),
            base,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    fn item_url(&self, id: Uuid) -> String {
        format!("{}/{}", self.base_url(), id)
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<T>().await?);
        }
        let message = resp
            .json::<MessageResponse>()
            .await
            .ok()
            .map(|body| body.message);
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// All contacts, newest first.
    pub async fn list(&self) -> Result<Vec<Contact>, ClientError> {
        let resp = self.http.get(self.base_url()).send().await?;
        Self::decode(resp).await
    }

    pub async fn create(&self, req: &CreateContactRequest) -> Result<Contact, ClientError> {
        let resp = self.http.post(self.base_url()).json(req).send().await?;
        Self::decode(resp).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<DeleteContactResponse, ClientError> {
        let resp = self.http.delete(self.item_url(id)).send().await?;
        Self::decode(resp).await
    }
}
