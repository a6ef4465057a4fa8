use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

const API_VERSION: u32 = 6;

/// AnkiConnect error text for a note whose first field is already in the collection
const DUPLICATE_NOTE: &str = "cannot create note because it is a duplicate";

/// Thin client for the AnkiConnect actions the export needs
#[derive(Clone)]
pub struct AnkiConnectClient {
    url: String,
    http: reqwest::Client,
}

impl AnkiConnectClient {
    pub fn new(url: String) -> Self {
        Self {
            url,
            http: reqwest::Client::new(),
        }
    }

    /// Fails unless AnkiConnect answers, then makes sure `deck` exists
    pub async fn prepare_deck(&self, deck: &str) -> Result<()> {
        let version: u32 = self
            .invoke("version", json!({}))
            .await
            .with_context(|| format!("AnkiConnect not reachable at {}", self.url))?;
        tracing::debug!("AnkiConnect API version {}", version);

        // createDeck is a no-op for an existing deck
        let _deck_id: u64 = self.invoke("createDeck", json!({ "deck": deck })).await?;
        Ok(())
    }

    /// Upload base64 file content into the media folder, returns the stored name
    pub async fn store_media_file(&self, filename: &str, base64_data: &str) -> Result<String> {
        self.invoke(
            "storeMediaFile",
            json!({ "filename": filename, "data": base64_data }),
        )
        .await
    }

    pub async fn add_note(&self, note: &Note<'_>) -> Result<u64> {
        self.invoke("addNote", json!({ "note": note })).await
    }

    async fn invoke<T: DeserializeOwned>(&self, action: &str, params: serde_json::Value) -> Result<T> {
        let request = Request {
            action,
            version: API_VERSION,
            params,
        };

        let reply: Reply<T> = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("AnkiConnect {action} request failed"))?
            .json()
            .await
            .with_context(|| format!("AnkiConnect {action} returned malformed JSON"))?;

        reply.into_result(action)
    }
}

/// `addNote` payload for a `Front`/`Back` note type
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note<'a> {
    pub deck_name: &'a str,
    pub model_name: &'a str,
    pub fields: NoteFields,
    pub tags: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct NoteFields {
    #[serde(rename = "Front")]
    pub front: String,
    #[serde(rename = "Back")]
    pub back: String,
}

#[derive(Serialize)]
struct Request<'a> {
    action: &'a str,
    version: u32,
    params: serde_json::Value,
}

#[derive(Deserialize)]
struct Reply<T> {
    result: Option<T>,
    error: Option<String>,
}

impl<T> Reply<T> {
    fn into_result(self, action: &str) -> Result<T> {
        match (self.result, self.error) {
            (_, Some(error)) => anyhow::bail!("AnkiConnect {action}: {error}"),
            (Some(result), None) => Ok(result),
            (None, None) => anyhow::bail!("AnkiConnect {action} returned no result"),
        }
    }
}

pub fn is_duplicate_error(error: &anyhow::Error) -> bool {
    error.to_string().contains(DUPLICATE_NOTE)
}
