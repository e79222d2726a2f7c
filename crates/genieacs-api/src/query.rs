// Query-string construction
//
// GenieACS filters are MongoDB-style JSON documents passed as a single
// `query` parameter; projections are comma-separated dotted parameter
// paths. Both are percent-encoded here so the facades only ever
// concatenate already-safe strings.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Map, Value};

use crate::error::Error;

/// Everything except RFC 3986 unreserved characters gets encoded.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Parameter path holding the WAN MAC address on TR-098 devices.
pub const WAN_MAC_PARAMETER: &str =
    "InternetGatewayDevice.WANDevice.1.WANConnectionDevice.1.WANIPConnection.1.MACAddress";

/// Percent-encode a caller-supplied value for use as a path segment or
/// query parameter value.
pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, COMPONENT).to_string()
}

/// Encode an identifier for use as one URL path segment.
///
/// `.` and `..` (raw or as `%2E`) are dot-segments that URL normalization
/// removes, so the request would reach a different resource. They are
/// rejected instead.
pub fn path_segment(id: &str) -> Result<String, Error> {
    let encoded = encode_component(id);
    if encoded == "." || encoded == ".." {
        return Err(Error::malformed(format!(
            "identifier {id:?} is not a valid path segment"
        )));
    }
    Ok(encoded)
}

// ── Filter ───────────────────────────────────────────────────────────

/// A MongoDB-style filter expression, e.g. `{"_id":"X"}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    expr: Map<String, Value>,
}

impl Filter {
    /// Filter matching documents whose `field` equals `value`.
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::default().and(field, value)
    }

    /// Add another equality condition.
    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.expr.insert(field.into(), value.into());
        self
    }

    /// `{"_id": id}`
    pub fn by_id(id: &str) -> Self {
        Self::equals("_id", id)
    }

    /// Devices whose WAN MAC address equals `mac`.
    pub fn by_mac(mac: &str) -> Self {
        Self::equals(WAN_MAC_PARAMETER, mac)
    }

    /// `{"device": id}`, used for tasks and faults.
    pub fn by_device(device_id: &str) -> Self {
        Self::equals("device", device_id)
    }

    /// Wrap an arbitrary JSON object (operators like `$ne` included).
    pub fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Object(expr) => Ok(Self { expr }),
            other => Err(Error::malformed(format!(
                "filter must be a JSON object, got {other}"
            ))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.expr.is_empty()
    }

    /// The filter as compact JSON text.
    pub fn to_json(&self) -> String {
        Value::Object(self.expr.clone()).to_string()
    }

    /// The filter as a percent-encoded `query` parameter value.
    pub fn encoded(&self) -> String {
        encode_component(&self.to_json())
    }
}

// ── Projection ───────────────────────────────────────────────────────

/// A list of dotted parameter paths the server should return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    paths: Vec<String>,
}

impl Projection {
    /// Parse a comma-separated list, trimming whitespace and skipping
    /// empty entries.
    pub fn parse(list: &str) -> Self {
        Self {
            paths: list
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Paths encoded individually and joined with literal commas.
    pub fn encoded(&self) -> String {
        self.paths
            .iter()
            .map(|p| encode_component(p))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl<S: AsRef<str>> FromIterator<S> for Projection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(|s| s.as_ref().to_owned()).collect(),
        }
    }
}

/// Build `?query=...&projection=...`, omitting whichever part is empty.
pub fn query_string(filter: Option<&Filter>, projection: Option<&Projection>) -> String {
    let mut parts = Vec::with_capacity(2);
    if let Some(f) = filter.filter(|f| !f.is_empty()) {
        parts.push(format!("query={}", f.encoded()));
    }
    if let Some(p) = projection.filter(|p| !p.is_empty()) {
        parts.push(format!("projection={}", p.encoded()));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("?{}", parts.join("&"))
    }
}
