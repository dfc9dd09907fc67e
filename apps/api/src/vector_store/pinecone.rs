//! Hosted Pinecone index over its REST data plane.
//!
//! Document text travels in metadata under `text` and is lifted back out on
//! query.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use super::{check_lengths, Document, Metadata, VectorStore};
use crate::embeddings::Embedder;

const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
const TEXT_KEY: &str = "text";

pub struct PineconeStore {
    client: Client,
    host: String,
    embedder: Arc<dyn Embedder>,
}

impl PineconeStore {
    /// Builds the client and resolves the index host through the control plane
    /// when `host` is not given.
    pub async fn connect(
        api_key: &str,
        index_name: &str,
        host: Option<&str>,
        embedder: Arc<dyn Embedder>,
        timeout: Duration,
    ) -> Result<Self> {
        anyhow::ensure!(!api_key.trim().is_empty(), "missing Pinecone API key");
        let mut headers = HeaderMap::new();
        headers.insert(
            "Api-Key",
            HeaderValue::from_str(api_key.trim()).context("invalid Pinecone API key")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("failed to build Pinecone HTTP client")?;

        let host = match host {
            Some(h) => normalize_host(h),
            None => {
                let url = format!("{CONTROL_PLANE_URL}/indexes/{index_name}");
                let resp = client
                    .get(&url)
                    .send()
                    .await
                    .context("failed to describe Pinecone index")?;
                let status = resp.status();
                if !status.is_success() {
                    let body = resp.text().await.unwrap_or_default();
                    anyhow::bail!("describe index '{index_name}' failed ({status}): {body}");
                }
                let described: DescribeIndexResponse = resp
                    .json()
                    .await
                    .context("failed to parse describe-index response")?;
                info!("Resolved Pinecone host {}", described.host);
                normalize_host(&described.host)
            }
        };

        Ok(Self {
            client,
            host,
            embedder,
        })
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.host, path);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Pinecone request to {path} failed"))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            anyhow::bail!("Pinecone {path} returned {status}: {body}");
        }
        Ok(resp)
    }
}

#[async_trait]
impl VectorStore for PineconeStore {
    async fn add(&self, texts: &[String], metadatas: &[Metadata]) -> Result<()> {
        check_lengths(texts, metadatas)?;
        if texts.is_empty() {
            return Ok(());
        }
        let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let embeddings = self.embedder.embed(&inputs).await?;

        let vectors: Vec<UpsertVector> = texts
            .iter()
            .zip(metadatas)
            .zip(embeddings)
            .map(|((text, metadata), values)| UpsertVector {
                id: Uuid::new_v4().to_string(),
                values,
                metadata: with_text(metadata, text),
            })
            .collect();

        self.post("/vectors/upsert", &UpsertRequest { vectors: &vectors })
            .await?;
        debug!("upserted {} vectors", vectors.len());
        Ok(())
    }

    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>> {
        let vector = self.embedder.embed_one(query).await?;
        let resp = self
            .post(
                "/query",
                &QueryRequest {
                    vector: &vector,
                    top_k: k,
                    include_metadata: true,
                },
            )
            .await?;
        let parsed: QueryResponse = resp
            .json()
            .await
            .context("failed to parse Pinecone query response")?;
        Ok(parsed
            .matches
            .into_iter()
            .map(|m| split_text(m.metadata.unwrap_or_default()))
            .collect())
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

fn with_text(metadata: &Metadata, text: &str) -> Metadata {
    let mut merged = metadata.clone();
    merged.insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
    merged
}

fn split_text(mut metadata: Metadata) -> Document {
    let text = match metadata.remove(TEXT_KEY) {
        Some(Value::String(s)) => s,
        _ => String::new(),
    };
    Document { text, metadata }
}

#[derive(Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [UpsertVector],
}

#[derive(Serialize)]
struct UpsertVector {
    id: String,
    values: Vec<f32>,
    metadata: Metadata,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    #[serde(default)]
    metadata: Option<Metadata>,
}
