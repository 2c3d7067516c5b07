use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

use crate::models::{Booking, Conversation, WorkerProfile};

/// Page size used when walking a whole collection
const PAGE_SIZE: usize = 100;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub psws: String,
    pub bookings: String,
    pub conversations: String,
}

impl Default for AppwriteCollections {
    fn default() -> Self {
        Self {
            psws: "psws".to_string(),
            bookings: "bookings".to_string(),
            conversations: "conversations".to_string(),
        }
    }
}

/// Appwrite document API client
///
/// Workers, bookings and conversations each live in their own collection.
/// Documents are stored flat; the Appwrite `$id` doubles as the record id.
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        })
    }

    pub fn collections(&self) -> &AppwriteCollections {
        &self.collections
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
    }

    async fn check(response: Response, what: &str) -> Result<Response, AppwriteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::NOT_FOUND => Err(AppwriteError::NotFound(what.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppwriteError::Unauthorized),
            _ => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read body".to_string());
                tracing::error!("Appwrite request for {} failed: {} - {}", what, status, body);
                Err(AppwriteError::ApiError(format!("Failed to fetch {}: {}", what, status)))
            }
        }
    }

    /// List every document in a collection matching the given queries
    async fn list_documents<T>(&self, collection: &str, queries: &[String]) -> Result<Vec<T>, AppwriteError>
    where
        T: DeserializeOwned,
    {
        let mut records = Vec::new();
        let mut offset = 0;

        loop {
            let mut params: Vec<String> = queries.to_vec();
            params.push(format!("limit({})", PAGE_SIZE));
            params.push(format!("offset({})", offset));

            let query_string = params
                .iter()
                .map(|q| format!("queries[]={}", urlencoding::encode(q)))
                .collect::<Vec<_>>()
                .join("&");
            let url = format!("{}?{}", self.documents_url(collection), query_string);

            tracing::debug!("Listing {} documents from offset {}", collection, offset);

            let response = self.authorize(self.client.get(&url)).send().await?;
            let json: Value = Self::check(response, collection).await?.json().await?;

            let total = json.get("total").and_then(|t| t.as_u64()).unwrap_or(0) as usize;
            let documents = json
                .get("documents")
                .and_then(|d| d.as_array())
                .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))?;

            let page_len = documents.len();
            for doc in documents {
                match from_document(doc) {
                    Ok(record) => records.push(record),
                    Err(e) => tracing::warn!("Skipping malformed {} document: {}", collection, e),
                }
            }

            offset += page_len;
            if page_len < PAGE_SIZE || offset >= total {
                break;
            }
        }

        Ok(records)
    }

    async fn get_document<T>(&self, collection: &str, id: &str) -> Result<Option<T>, AppwriteError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.documents_url(collection), urlencoding::encode(id));
        tracing::debug!("Fetching {} document {}", collection, id);

        let response = self.authorize(self.client.get(&url)).send().await?;
        let json: Value = match Self::check(response, collection).await {
            Ok(response) => response.json().await?,
            Err(AppwriteError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        from_document(&json).map(Some)
    }

    async fn create_document<T>(&self, collection: &str, id: &str, record: &T) -> Result<(), AppwriteError>
    where
        T: Serialize,
    {
        let payload = json!({
            "documentId": id,
            "data": to_document_data(record)?,
        });

        let response = self
            .authorize(self.client.post(self.documents_url(collection)))
            .json(&payload)
            .send()
            .await?;
        Self::check(response, collection).await?;

        tracing::debug!("Created {} document {}", collection, id);
        Ok(())
    }

    async fn update_document<T>(&self, collection: &str, id: &str, record: &T) -> Result<(), AppwriteError>
    where
        T: Serialize,
    {
        let url = format!("{}/{}", self.documents_url(collection), urlencoding::encode(id));
        let payload = json!({ "data": to_document_data(record)? });

        let response = self.authorize(self.client.patch(&url)).json(&payload).send().await?;
        Self::check(response, collection).await?;

        tracing::debug!("Updated {} document {}", collection, id);
        Ok(())
    }

    pub async fn list_workers(&self) -> Result<Vec<WorkerProfile>, AppwriteError> {
        self.list_documents(&self.collections.psws, &[]).await
    }

    pub async fn get_worker(&self, id: &str) -> Result<Option<WorkerProfile>, AppwriteError> {
        self.get_document(&self.collections.psws, id).await
    }

    pub async fn create_worker(&self, worker: &WorkerProfile) -> Result<(), AppwriteError> {
        self.create_document(&self.collections.psws, &worker.id, worker).await
    }

    pub async fn create_booking(&self, booking: &Booking) -> Result<(), AppwriteError> {
        self.create_document(&self.collections.bookings, &booking.id, booking).await
    }

    pub async fn get_booking(&self, id: &str) -> Result<Option<Booking>, AppwriteError> {
        self.get_document(&self.collections.bookings, id).await
    }

    pub async fn update_booking(&self, booking: &Booking) -> Result<(), AppwriteError> {
        self.update_document(&self.collections.bookings, &booking.id, booking).await
    }

    pub async fn list_client_bookings(&self, client_id: &str) -> Result<Vec<Booking>, AppwriteError> {
        let queries = vec![equal_query("clientId", client_id)];
        self.list_documents(&self.collections.bookings, &queries).await
    }

    pub async fn create_conversation(&self, conversation: &Conversation) -> Result<(), AppwriteError> {
        self.create_document(&self.collections.conversations, &conversation.id, conversation)
            .await
    }

    pub async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, AppwriteError> {
        self.get_document(&self.collections.conversations, id).await
    }

    pub async fn update_conversation(&self, conversation: &Conversation) -> Result<(), AppwriteError> {
        self.update_document(&self.collections.conversations, &conversation.id, conversation)
            .await
    }
}

/// Decode an Appwrite document, taking the record id from `$id`
fn from_document<T: DeserializeOwned>(doc: &Value) -> Result<T, AppwriteError> {
    let data = doc.get("data").unwrap_or(doc);
    let mut fields = data
        .as_object()
        .cloned()
        .ok_or_else(|| AppwriteError::InvalidResponse("Document is not an object".into()))?;

    if let Some(id) = doc.get("$id").or_else(|| data.get("$id")).cloned() {
        fields.insert("id".to_string(), id);
    }
    fields.retain(|key, _| !key.starts_with('$'));

    serde_json::from_value(Value::Object(fields))
        .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to parse document: {}", e)))
}

/// Encode a record as document data; the id travels as `documentId` instead
fn to_document_data<T: Serialize>(record: &T) -> Result<Value, AppwriteError> {
    let mut data = serde_json::to_value(record)?;
    if let Some(obj) = data.as_object_mut() {
        obj.remove("id");
    }
    Ok(data)
}

/// Appwrite `equal` query with the attribute and value JSON-encoded
fn equal_query(attribute: &str, value: &str) -> String {
    format!("equal({}, {})", json!(attribute), json!([value]))
}
