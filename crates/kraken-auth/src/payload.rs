//! Ordered request payloads
//!
//! Kraken signs the exact form-encoded bytes that go over the wire, so a
//! payload keeps its fields in insertion order and encodes them the same way
//! for both the signature and the request body.

use crate::error::{AuthError, AuthResult};

/// Name of the field carrying the nonce
pub const NONCE_FIELD: &str = "nonce";

/// A scalar payload value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// String value
    Str(String),
    /// Signed integer value
    Int(i64),
    /// Unsigned integer value
    UInt(u64),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{}", s),
            Self::Int(n) => write!(f, "{}", n),
            Self::UInt(n) => write!(f, "{}", n),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::UInt(value as u64)
    }
}

/// Ordered field name to value mapping for a private request
///
/// # Example
///
/// ```
/// use kraken_auth::Payload;
///
/// let payload = Payload::new()
///     .with("asset", "XBT")
///     .with("amount", "0.25");
/// let stamped = payload.stamp(1616492376594);
/// assert_eq!(stamped.encode().unwrap(), "asset=XBT&amount=0.25&nonce=1616492376594");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    fields: Vec<(String, FieldValue)>,
}

impl Payload {
    /// Create an empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, builder style
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.push(key, value);
        self
    }

    /// Append a field if `value` is present
    pub fn with_opt<V: Into<FieldValue>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Append a field
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.push((key.into(), value.into()));
    }

    /// Look up a field by name
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the payload has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Append the nonce, producing a payload ready to be signed
    ///
    /// A caller-supplied `nonce` field is dropped: the nonce is always the
    /// one issued by the sequencer and always the last field.
    pub fn stamp(mut self, nonce: u64) -> StampedPayload {
        self.fields.retain(|(k, _)| k != NONCE_FIELD);
        self.fields.push((NONCE_FIELD.to_string(), FieldValue::UInt(nonce)));
        StampedPayload {
            fields: self.fields,
            nonce,
        }
    }
}

/// A payload carrying its nonce
///
/// Only produced by [`Payload::stamp`], so a signature can never be computed
/// over a payload without a nonce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampedPayload {
    fields: Vec<(String, FieldValue)>,
    nonce: u64,
}

impl StampedPayload {
    /// The nonce carried by this payload
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Look up a field by name
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Form-encode the fields in order
    ///
    /// This string is both the signed data and the request body.
    pub fn encode(&self) -> AuthResult<String> {
        let pairs: Vec<(&str, String)> = self
            .fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.to_string()))
            .collect();

        serde_urlencoded::to_string(&pairs).map_err(|e| AuthError::Encoding(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload_encodes_nonce_only() {
        let stamped = Payload::new().stamp(42);
        assert_eq!(stamped.encode().unwrap(), "nonce=42");
        assert_eq!(stamped.nonce(), 42);
    }

    #[test]
    fn test_field_order_is_preserved() {
        let stamped = Payload::new()
            .with("pair", "XBTUSD")
            .with("type", "buy")
            .with("ordertype", "market")
            .with("volume", "1.25")
            .stamp(7);

        assert_eq!(
            stamped.encode().unwrap(),
            "pair=XBTUSD&type=buy&ordertype=market&volume=1.25&nonce=7"
        );
    }

    #[test]
    fn test_form_encoding_rules() {
        let stamped = Payload::new()
            .with("key", "my wallet")
            .with("note", "a&b=c/d")
            .stamp(1);

        assert_eq!(
            stamped.encode().unwrap(),
            "key=my+wallet&note=a%26b%3Dc%2Fd&nonce=1"
        );
    }

    #[test]
    fn test_integer_fields() {
        let stamped = Payload::new()
            .with("ofs", 100u32)
            .with("start", 1_700_000_000i64)
            .stamp(3);

        assert_eq!(stamped.encode().unwrap(), "ofs=100&start=1700000000&nonce=3");
        assert_eq!(stamped.get("ofs"), Some(&FieldValue::UInt(100)));
    }

    #[test]
    fn test_caller_nonce_is_replaced() {
        let stamped = Payload::new()
            .with("nonce", 1u64)
            .with("asset", "ETH")
            .stamp(99);

        assert_eq!(stamped.encode().unwrap(), "asset=ETH&nonce=99");
    }

    #[test]
    fn test_with_opt() {
        let payload = Payload::new()
            .with_opt("start", Some(10i64))
            .with_opt::<i64>("end", None);

        assert_eq!(payload.len(), 1);
        assert!(payload.get("end").is_none());
    }
}
