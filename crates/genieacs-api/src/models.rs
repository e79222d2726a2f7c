// GenieACS NBI request and response types
//
// Devices, presets, objects and provisions are passed around as raw
// `serde_json::Value` documents because their shape is user-defined.
// Tasks, files and faults have a fixed server-side schema and are modelled
// here; unknown fields land in `extra` so export/import loses nothing.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString};

// ── Tasks ────────────────────────────────────────────────────────────

/// Task kinds understood by the GenieACS NBI.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum TaskName {
    RefreshObject,
    SetParameterValues,
    GetParameterValues,
    AddObject,
    Reboot,
    FactoryReset,
    Download,
}

/// A `[path, value]` or `[path, value, type]` triple as expected by
/// `setParameterValues`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterValue {
    pub path: String,
    pub value: Value,
    /// xsd type hint such as `xsd:boolean`; the server infers it when absent.
    pub value_type: Option<String>,
}

impl ParameterValue {
    pub fn new(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
            value_type: None,
        }
    }

    pub fn typed(mut self, value_type: impl Into<String>) -> Self {
        self.value_type = Some(value_type.into());
        self
    }
}

impl Serialize for ParameterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.value_type {
            Some(t) => (&self.path, &self.value, t).serialize(serializer),
            None => (&self.path, &self.value).serialize(serializer),
        }
    }
}

/// Body of `POST /devices/{id}/tasks`, tagged by task `name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum TaskRequest {
    #[serde(rename_all = "camelCase")]
    RefreshObject { object_name: String },

    #[serde(rename_all = "camelCase")]
    SetParameterValues {
        parameter_values: Vec<ParameterValue>,
    },

    #[serde(rename_all = "camelCase")]
    GetParameterValues { parameter_names: Vec<String> },

    #[serde(rename_all = "camelCase")]
    AddObject {
        object_name: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        parameter_values: Vec<ParameterValue>,
    },

    Reboot,

    FactoryReset,

    #[serde(rename_all = "camelCase")]
    Download {
        file_type: String,
        file_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        target_file_name: Option<String>,
    },
}

impl TaskRequest {
    pub fn name(&self) -> TaskName {
        match self {
            Self::RefreshObject { .. } => TaskName::RefreshObject,
            Self::SetParameterValues { .. } => TaskName::SetParameterValues,
            Self::GetParameterValues { .. } => TaskName::GetParameterValues,
            Self::AddObject { .. } => TaskName::AddObject,
            Self::Reboot => TaskName::Reboot,
            Self::FactoryReset => TaskName::FactoryReset,
            Self::Download { .. } => TaskName::Download,
        }
    }
}

/// A queued task as returned by `GET /tasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: String,
    pub device: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
    /// Task-specific fields (`objectName`, `parameterValues`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Parsed task kind, `None` for names this client doesn't know.
    pub fn kind(&self) -> Option<TaskName> {
        self.name.parse().ok()
    }
}

// ── Files ────────────────────────────────────────────────────────────

/// Metadata headers accompanying a file upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    /// e.g. `1 Firmware Upgrade Image`, `3 Vendor Configuration File`.
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub oui: String,
    #[serde(default)]
    pub product_class: String,
    #[serde(default)]
    pub version: String,
}

impl FileMetadata {
    /// Header name/value pairs for `PUT /files/{name}`.
    pub fn headers(&self) -> [(&'static str, &str); 4] {
        [
            ("fileType", self.file_type.as_str()),
            ("oui", self.oui.as_str()),
            ("productClass", self.product_class.as_str()),
            ("version", self.version.as_str()),
        ]
    }
}

/// A stored file as listed by `GET /files`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub length: Option<u64>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub metadata: FileMetadata,
}

// ── Faults ───────────────────────────────────────────────────────────

/// A device fault as returned by `GET /faults`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fault {
    #[serde(rename = "_id")]
    pub id: String,
    pub device: String,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub retries: Option<u32>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// Projection of a device down to its identifier.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DeviceIdOnly {
    #[serde(rename = "_id")]
    pub id: String,
}

/// Projection of a device down to its tags.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DeviceTags {
    #[serde(rename = "_tags", default)]
    pub tags: Vec<String>,
}
