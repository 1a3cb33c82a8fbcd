//! Content store backed by the Sanity HTTP API.
//!
//! Reads go through `GET /data/query/<dataset>` with GROQ, writes through
//! `POST /data/mutate/<dataset>`, images through `POST /assets/images/<dataset>`.
//! All calls share one [`Gateway`], so they inherit its bearer, timeout and
//! error-to-notification policy.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::config::ContentConfig;
use crate::content::{ContentStore, Document, DocumentId, ImageRef, LocalImage};
use crate::error::{AdminError, Result};
use crate::http::Gateway;

const FIRST_OF_TYPE: &str = "*[_type == $type][0]";
const BY_ID: &str = "*[_type == $type && _id == $id][0]";
const ALL_OF_TYPE: &str = "*[_type == $type] | order(_createdAt desc)";
const COUNT_OF_TYPE: &str = "count(*[_type == $type])";

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

#[derive(Debug, Deserialize)]
struct MutationResponse {
    #[serde(default)]
    results: Vec<MutationResult>,
}

#[derive(Debug, Deserialize)]
struct MutationResult {
    id: String,
    #[serde(default)]
    document: Option<Document>,
}

#[derive(Debug, Deserialize)]
struct AssetResponse {
    document: AssetDocument,
}

#[derive(Debug, Deserialize)]
struct AssetDocument {
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Debug, Clone)]
pub struct SanityStore {
    gateway: Gateway,
    dataset: String,
}

impl SanityStore {
    /// `gateway` must already point at the versioned API root (see [`ContentConfig::api_base_url`])
    pub fn new(gateway: Gateway, dataset: impl Into<String>) -> Self {
        Self {
            gateway,
            dataset: dataset.into(),
        }
    }

    pub fn from_config(gateway: Gateway, config: &ContentConfig) -> Self {
        Self::new(gateway.with_bearer(config.token.clone()), config.dataset.clone())
    }

    /// Runs a GROQ query. A failed read resolves to `Value::Null`.
    pub async fn query(&self, groq: &str, params: &[(&str, &str)]) -> Result<Value> {
        let mut owned: Vec<(String, String)> = vec![("query".to_string(), groq.to_string())];
        for (name, value) in params {
            // GROQ parameters are passed as JSON literals
            owned.push((format!("${}", name), serde_json::to_string(value)?));
        }
        let query: Vec<(&str, String)> = owned.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();

        let path = format!("data/query/{}", self.dataset);
        let response: Option<QueryResponse> = self.gateway.get_query(&path, &query).await?;
        Ok(response.map(|r| r.result).unwrap_or(Value::Null))
    }

    async fn mutate(&self, mutation: Value) -> Result<MutationResult> {
        let path = format!("data/mutate/{}", self.dataset);
        let query = [
            ("returnIds", "true".to_string()),
            ("returnDocuments", "true".to_string()),
            ("visibility", "sync".to_string()),
        ];
        let response: MutationResponse = self
            .gateway
            .post_query(&path, &query, &json!({ "mutations": [mutation] }))
            .await?;

        response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| AdminError::unexpected("mutation returned no results"))
    }

    /// Re-reads a document the mutation did not echo back
    async fn document_or_fetch(&self, doc_type: Option<&str>, result: MutationResult) -> Result<Document> {
        if let Some(doc) = result.document {
            return Ok(doc);
        }

        let id = DocumentId::new(result.id);
        let found = match doc_type {
            Some(t) => self.fetch(t, &id).await?,
            None => self.fetch_by_id(&id).await?,
        };
        found.ok_or_else(|| AdminError::unexpected(format!("document '{}' missing after write", id)))
    }

    async fn fetch_by_id(&self, id: &DocumentId) -> Result<Option<Document>> {
        let value = self.query("*[_id == $id][0]", &[("id", id.as_str())]).await?;
        decode_optional(value)
    }
}

fn decode_optional(value: Value) -> Result<Option<Document>> {
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(value)?))
}

/// Splits a field map into Sanity `set` and `unset` parts
fn patch_body(id: &DocumentId, fields: Map<String, Value>) -> Value {
    let mut set = Map::new();
    let mut unset = Vec::new();
    for (key, value) in fields {
        if value.is_null() {
            unset.push(Value::String(key));
        } else {
            set.insert(key, value);
        }
    }

    let mut patch = json!({ "id": id.as_str() });
    if !set.is_empty() {
        patch["set"] = Value::Object(set);
    }
    if !unset.is_empty() {
        patch["unset"] = Value::Array(unset);
    }
    json!({ "patch": patch })
}

#[async_trait]
impl ContentStore for SanityStore {
    async fn fetch_first(&self, doc_type: &str) -> Result<Option<Document>> {
        let value = self.query(FIRST_OF_TYPE, &[("type", doc_type)]).await?;
        decode_optional(value)
    }

    async fn fetch(&self, doc_type: &str, id: &DocumentId) -> Result<Option<Document>> {
        let value = self
            .query(BY_ID, &[("type", doc_type), ("id", id.as_str())])
            .await?;
        decode_optional(value)
    }

    async fn list(&self, doc_type: &str) -> Result<Vec<Document>> {
        match self.query(ALL_OF_TYPE, &[("type", doc_type)]).await? {
            Value::Null => Ok(Vec::new()),
            value => Ok(serde_json::from_value(value)?),
        }
    }

    async fn count(&self, doc_type: &str) -> Result<usize> {
        let value = self.query(COUNT_OF_TYPE, &[("type", doc_type)]).await?;
        Ok(value.as_u64().unwrap_or(0) as usize)
    }

    async fn create(&self, doc_type: &str, fields: Map<String, Value>) -> Result<Document> {
        let mut doc: Map<String, Value> = fields.into_iter().filter(|(_, v)| !v.is_null()).collect();
        doc.insert("_type".to_string(), Value::String(doc_type.to_string()));

        let result = self.mutate(json!({ "create": doc })).await?;
        tracing::info!(doc_type, id = %result.id, "document created");
        self.document_or_fetch(Some(doc_type), result).await
    }

    async fn patch(&self, id: &DocumentId, fields: Map<String, Value>) -> Result<Document> {
        let result = self.mutate(patch_body(id, fields)).await?;
        tracing::info!(id = %id, "document patched");
        self.document_or_fetch(None, result).await
    }

    async fn delete(&self, id: &DocumentId) -> Result<()> {
        self.mutate(json!({ "delete": { "id": id.as_str() } })).await?;
        tracing::info!(id = %id, "document deleted");
        Ok(())
    }

    async fn upload_image(&self, image: &LocalImage) -> Result<ImageRef> {
        let path = format!("assets/images/{}", self.dataset);
        let query = [("filename", image.filename.clone())];
        let response: AssetResponse = self
            .gateway
            .upload(&path, &query, image.bytes.clone(), &image.content_type)
            .await?;
        tracing::info!(asset = %response.document.id, filename = %image.filename, "image uploaded");
        Ok(ImageRef::new(response.document.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_body_splits_set_and_unset() {
        let mut fields = Map::new();
        fields.insert("siteTitle".into(), json!("FU"));
        fields.insert("logo".into(), Value::Null);

        let body = patch_body(&DocumentId::new("setting-1"), fields);
        assert_eq!(
            body,
            json!({ "patch": { "id": "setting-1", "set": { "siteTitle": "FU" }, "unset": ["logo"] } })
        );
    }

    #[test]
    fn patch_body_omits_empty_sections() {
        let body = patch_body(&DocumentId::new("x"), Map::new());
        assert_eq!(body, json!({ "patch": { "id": "x" } }));
    }

    #[test]
    fn null_result_decodes_to_none() {
        assert_eq!(decode_optional(Value::Null).unwrap(), None);
    }
}
