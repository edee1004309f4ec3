//! Request normalization into immutable snapshots.
//!
//! # Responsibilities
//! - Capture method, URL, headers, query, body, and source IP off a request
//! - Parse the body through an ordered fallback chain (JSON → form → text)
//! - Stamp the snapshot with a millisecond id and ISO-8601 timestamp

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::http::{HeaderMap, Method, Uri};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// One or many string values, since headers and query parameters repeat.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Repeated(Vec<String>),
}

impl FieldValue {
    fn from_values(mut values: Vec<String>) -> Self {
        if values.len() == 1 {
            FieldValue::Single(values.remove(0))
        } else {
            FieldValue::Repeated(values)
        }
    }
}

/// Recorded request payload after the parse fallback chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecordedBody {
    Json(serde_json::Value),
    Form(BTreeMap<String, FieldValue>),
    Text(String),
}

/// Immutable record of one inbound request.
#[derive(Debug, Clone, Serialize)]
pub struct RequestSnapshot {
    /// Capture time in Unix milliseconds. Non-decreasing across inserts;
    /// sub-millisecond collisions are tolerated.
    pub id: i64,

    /// Capture time as an ISO-8601 string, same instant as `id`.
    pub timestamp: String,

    /// Uppercase HTTP verb.
    pub method: String,

    /// Path plus query string as received.
    pub url: String,

    /// Lowercase header name → value(s).
    pub headers: BTreeMap<String, FieldValue>,

    /// Parsed payload, absent for empty bodies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<RecordedBody>,

    /// Query parameter name → value(s).
    pub query: BTreeMap<String, FieldValue>,

    /// Best-effort client address.
    pub source_ip: String,
}

impl RequestSnapshot {
    /// Normalize an inbound request into a snapshot at the current instant.
    pub fn capture(
        method: &Method,
        uri: &Uri,
        headers: &HeaderMap,
        peer: SocketAddr,
        body: &[u8],
    ) -> Self {
        let now = Utc::now();
        Self {
            id: now.timestamp_millis(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            method: method.as_str().to_uppercase(),
            url: uri
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or_else(|| uri.path())
                .to_string(),
            headers: collect_headers(headers),
            body: parse_body(body),
            query: parse_pairs(uri.query().unwrap_or("")),
            source_ip: client_ip(headers, peer),
        }
    }
}

/// Current instant as an ISO-8601 string, millisecond precision.
pub fn iso8601_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, FieldValue> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers {
        grouped
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    grouped
        .into_iter()
        .map(|(name, values)| (name, FieldValue::from_values(values)))
        .collect()
}

fn parse_pairs(input: &str) -> BTreeMap<String, FieldValue> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in url::form_urlencoded::parse(input.as_bytes()) {
        grouped
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    grouped
        .into_iter()
        .map(|(key, values)| (key, FieldValue::from_values(values)))
        .collect()
}

/// Ordered fallback chain: JSON, then form-urlencoded, then raw text.
/// Never fails; an empty body is recorded as absent.
fn parse_body(body: &[u8]) -> Option<RecordedBody> {
    if body.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        return Some(RecordedBody::Json(value));
    }
    match std::str::from_utf8(body) {
        Ok(text) if looks_form_encoded(text) => Some(RecordedBody::Form(parse_pairs(text))),
        Ok(text) => Some(RecordedBody::Text(text.to_string())),
        Err(_) => Some(RecordedBody::Text(
            String::from_utf8_lossy(body).into_owned(),
        )),
    }
}

/// A body counts as form-encoded only if every non-empty `&`-separated pair
/// carries an explicit `=` with a non-empty key. Plain prose like "hello"
/// stays raw text instead of becoming a degenerate one-key map.
fn looks_form_encoded(text: &str) -> bool {
    if !text.contains('=') {
        return false;
    }
    text.split('&')
        .filter(|pair| !pair.is_empty())
        .all(|pair| matches!(pair.split_once('='), Some((key, _)) if !key.is_empty()))
}

/// Application-level client IP when forwarded, otherwise the socket peer.
fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    for name in ["x-forwarded-for", "x-real-ip"] {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            // x-forwarded-for lists hops client-first
            let first = value.split(',').next().unwrap_or("").trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    peer.ip().to_string()
}
