//! JSON wire protocol of the game-data service
//!
//! Both endpoints answer with an envelope:
//!
//! ```json
//! {"type": "success", "message": "...", "data": { ... }}
//! ```
//!
//! The bids payload embeds the inside/outside boards as JSON-encoded strings
//! and reports a declared round through `finalBidNumber`, which may be a
//! number or a string. Zero is a legitimate winning number, so presence is
//! tracked with `Option`, never by value.

use serde::{Deserialize, Serialize};

use bidboard_core::prelude::*;
use bidboard_core::{Amount, BidEntry, BoardNumber, BoardUpdate};

/// Fallback text when an error envelope carries no message.
const DEFAULT_REJECTION: &str = "Request rejected by service";

/// Body of the declare request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclareRequest {
    pub bid_number: BoardNumber,
    pub bid_amount: Amount,
}

/// Successful declare answer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeclareReceipt {
    /// Winning number reported by the service, if it sent one.
    pub declared: Option<BoardNumber>,
    pub message: Option<String>,
}

/// Value of the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ResponseKind {
    Success,
    Error,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(rename = "type")]
    kind: Option<ResponseKind>,
    message: Option<String>,
    data: Option<T>,
}

/// A number or amount as it may appear on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Int(u64),
    Float(f64),
    Text(String),
}

impl RawNumber {
    /// Interpret as a non-negative integer. Empty text is "absent".
    fn to_u64(&self, field: &str) -> Result<Option<u64>> {
        match self {
            RawNumber::Int(v) => Ok(Some(*v)),
            RawNumber::Float(f) => float_to_u64(*f, field).map(Some),
            RawNumber::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                if let Ok(v) = trimmed.parse::<u64>() {
                    return Ok(Some(v));
                }
                match trimmed.parse::<f64>() {
                    Ok(f) => float_to_u64(f, field).map(Some),
                    Err(_) => Err(Error::malformed(format!(
                        "{field}: {trimmed:?} is not a number"
                    ))),
                }
            }
        }
    }
}

fn float_to_u64(f: f64, field: &str) -> Result<u64> {
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Ok(f as u64)
    } else {
        Err(Error::malformed(format!(
            "{field}: {f} is not a non-negative whole number"
        )))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawBidEntry {
    number: RawNumber,
    #[serde(default)]
    amount: Option<RawNumber>,
}

/// Inside/outside boards: normally a JSON-encoded string, occasionally inline.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum EmbeddedEntries {
    Encoded(String),
    Inline(Vec<RawBidEntry>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBidsData {
    #[serde(default)]
    bids: Option<Vec<RawBidEntry>>,
    #[serde(default)]
    inside: Option<EmbeddedEntries>,
    #[serde(default)]
    outside: Option<EmbeddedEntries>,
    #[serde(default)]
    final_bid_number: Option<RawNumber>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDeclareData {
    #[serde(default)]
    final_bid_number: Option<RawNumber>,
}

// ─────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────

/// Parse the bids endpoint body into a [`BoardUpdate`].
///
/// Accepts both the enveloped form and a bare `{bids, inside, outside}`
/// object. An error envelope becomes [`Error::Rejected`]; anything
/// unparsable becomes [`Error::MalformedResponse`].
pub fn parse_bids_response(body: &str) -> Result<BoardUpdate> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| Error::malformed(format!("bids response is not JSON: {e}")))?;

    let is_envelope = value
        .as_object()
        .map(|o| o.contains_key("type") || o.contains_key("data"))
        .unwrap_or(false);

    let data: RawBidsData = if is_envelope {
        let envelope: Envelope<RawBidsData> = serde_json::from_value(value)
            .map_err(|e| Error::malformed(format!("bids envelope: {e}")))?;
        match envelope.kind {
            Some(ResponseKind::Error) => {
                return Err(Error::rejected(
                    envelope
                        .message
                        .unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
                ))
            }
            Some(ResponseKind::Unknown) => {
                return Err(Error::malformed("bids envelope has an unknown type"))
            }
            Some(ResponseKind::Success) | None => envelope
                .data
                .ok_or_else(|| Error::malformed("bids envelope has no data"))?,
        }
    } else {
        serde_json::from_value(value)
            .map_err(|e| Error::malformed(format!("bids payload: {e}")))?
    };

    into_board_update(data)
}

fn into_board_update(data: RawBidsData) -> Result<BoardUpdate> {
    let full = convert_entries(data.bids.unwrap_or_default(), "bids")?;
    let inside = convert_entries(decode_embedded(data.inside, "inside")?, "inside")?;
    let outside = convert_entries(decode_embedded(data.outside, "outside")?, "outside")?;
    let declared = parse_declared(data.final_bid_number.as_ref())?;

    Ok(BoardUpdate {
        full,
        inside,
        outside,
        declared,
    })
}

fn decode_embedded(raw: Option<EmbeddedEntries>, field: &str) -> Result<Vec<RawBidEntry>> {
    match raw {
        None => Ok(Vec::new()),
        Some(EmbeddedEntries::Inline(entries)) => Ok(entries),
        Some(EmbeddedEntries::Encoded(text)) => {
            if text.trim().is_empty() {
                return Ok(Vec::new());
            }
            let entries: Option<Vec<RawBidEntry>> = serde_json::from_str(&text)
                .map_err(|e| Error::malformed(format!("{field} payload: {e}")))?;
            Ok(entries.unwrap_or_default())
        }
    }
}

fn convert_entries(raw: Vec<RawBidEntry>, field: &str) -> Result<Vec<BidEntry>> {
    let mut entries = Vec::with_capacity(raw.len());
    for entry in raw {
        let Some(number) = entry.number.to_u64(field)? else {
            return Err(Error::malformed(format!("{field}: entry without a number")));
        };
        let Ok(number) = u8::try_from(number) else {
            warn!("Dropping {} entry with number {} (off the board)", field, number);
            continue;
        };
        let amount = match &entry.amount {
            Some(raw) => raw.to_u64(field)?.map(Amount::new),
            None => None,
        };
        entries.push(BidEntry { number, amount });
    }
    Ok(entries)
}

/// `finalBidNumber`: `0` and `"0"` are declared; missing, `null` and `""`
/// are not.
fn parse_declared(raw: Option<&RawNumber>) -> Result<Option<BoardNumber>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.to_u64("finalBidNumber")? {
        None => Ok(None),
        Some(value) => BoardNumber::from_u64(value).map(Some).ok_or_else(|| {
            Error::malformed(format!("finalBidNumber {value} is outside 0-99"))
        }),
    }
}

/// Parse the declare endpoint body.
///
/// Anything but an explicit error envelope counts as success.
pub fn parse_declare_response(body: &str) -> Result<DeclareReceipt> {
    let envelope: Envelope<RawDeclareData> = serde_json::from_str(body)
        .map_err(|e| Error::malformed(format!("declare response: {e}")))?;

    if envelope.kind == Some(ResponseKind::Error) {
        return Err(Error::rejected(
            envelope
                .message
                .unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
        ));
    }

    let declared = match envelope.data {
        Some(data) => parse_declared(data.final_bid_number.as_ref())?,
        None => None,
    };

    Ok(DeclareReceipt {
        declared,
        message: envelope.message,
    })
}

/// Extract the message of an error envelope, if `body` is one.
///
/// Used for non-2xx answers, which may still carry a business message.
pub fn parse_error_envelope(body: &str) -> Option<String> {
    let envelope: Envelope<serde_json::Value> = serde_json::from_str(body).ok()?;
    match envelope.kind {
        Some(ResponseKind::Error) => Some(
            envelope
                .message
                .unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
        ),
        _ => None,
    }
}
