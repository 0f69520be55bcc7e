use catalog_core::{ListingPage, ToolSummary};
use catalog_logging::catalog_warn;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::FetchError;

/// The listing body shapes the backend has shipped over time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawListing {
    /// Bare JSON array of tools.
    Bare(Vec<ToolSummary>),
    /// `{ "items": [...], "total": n, "page_size": n }`.
    Envelope {
        items: Vec<ToolSummary>,
        total: Option<u64>,
        page_size: Option<u32>,
    },
}

#[derive(Deserialize)]
struct EnvelopeBody {
    items: Vec<ToolSummary>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    page_size: Option<u32>,
}

impl RawListing {
    pub fn parse(body: &[u8]) -> Result<Self, FetchError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|err| FetchError::malformed(format!("invalid json: {err}")))?;
        let is_envelope = matches!(&value, Value::Object(fields) if fields.contains_key("items"));
        match value {
            Value::Array(_) => decode_value(value).map(RawListing::Bare),
            Value::Object(_) if is_envelope => {
                let envelope: EnvelopeBody = decode_value(value)?;
                Ok(RawListing::Envelope {
                    items: envelope.items,
                    total: envelope.total,
                    page_size: envelope.page_size,
                })
            }
            other => Err(FetchError::malformed(format!(
                "expected a tool array or an items envelope, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Folds the body and the optional header total into one canonical page.
    /// An envelope total takes precedence over the header.
    pub fn into_page(self, header_total: Option<u64>, requested_page_size: u32) -> ListingPage {
        match self {
            RawListing::Bare(items) => ListingPage {
                items,
                total: header_total,
                page_size: requested_page_size,
            },
            RawListing::Envelope {
                items,
                total,
                page_size,
            } => ListingPage {
                items,
                total: total.or(header_total),
                page_size: page_size
                    .filter(|size| *size > 0)
                    .unwrap_or(requested_page_size),
            },
        }
    }
}

/// Normalizes a listing response into a [`ListingPage`].
pub fn normalize_listing(
    body: &[u8],
    header_total: Option<u64>,
    requested_page_size: u32,
) -> Result<ListingPage, FetchError> {
    RawListing::parse(body).map(|raw| raw.into_page(header_total, requested_page_size))
}

/// Parses a total-count header value. Garbage is logged and ignored.
pub fn parse_total_header(raw: &str) -> Option<u64> {
    match raw.trim().parse::<u64>() {
        Ok(total) => Some(total),
        Err(err) => {
            catalog_warn!("Ignoring unparsable total count header {:?}: {}", raw, err);
            None
        }
    }
}

pub(crate) fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, FetchError> {
    serde_json::from_slice(body).map_err(|err| FetchError::malformed(err.to_string()))
}

fn decode_value<T: DeserializeOwned>(value: Value) -> Result<T, FetchError> {
    serde_json::from_value(value).map_err(|err| FetchError::malformed(err.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object without items",
    }
}
