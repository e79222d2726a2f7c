// Named-document collections: presets, objects, provisions
//
// All three share the same CRUD shape on `/{collection}[/{name}]`, keyed
// by `_id`. Provisions differ only in their PUT body, which is the raw
// JavaScript source rather than JSON.

use serde_json::Value;
use strum::{Display, EnumIter, EnumString};
use tracing::debug;

use crate::client::{GenieClient, Payload};
use crate::error::Error;
use crate::query::{Filter, path_segment, query_string};

/// Field holding a provision's script in `GET /provisions` output.
pub const SCRIPT_KEY: &str = "script";

/// Which named-document collection to operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum CollectionKind {
    Presets,
    Objects,
    Provisions,
}

impl CollectionKind {
    /// URL path of the collection, e.g. `/presets`.
    pub fn path(self) -> &'static str {
        match self {
            Self::Presets => "/presets",
            Self::Objects => "/objects",
            Self::Provisions => "/provisions",
        }
    }

    /// Convert a document body into the PUT payload for this collection.
    ///
    /// Provisions accept either a bare string or a `{"script": "..."}`
    /// object; everything else is sent as JSON.
    pub fn payload(self, body: Value) -> Result<Payload, Error> {
        match (self, body) {
            (Self::Provisions, Value::String(script)) => Ok(Payload::Text(script)),
            (Self::Provisions, Value::Object(mut map)) => match map.remove(SCRIPT_KEY) {
                Some(Value::String(script)) => Ok(Payload::Text(script)),
                _ => Err(Error::malformed(format!(
                    "provision body needs a string '{SCRIPT_KEY}' field"
                ))),
            },
            (Self::Provisions, other) => Err(Error::malformed(format!(
                "provision body must be a script string, got {other}"
            ))),
            (_, body) => Ok(Payload::Json(body)),
        }
    }
}

/// Handle on one collection of a [`GenieClient`].
#[derive(Debug, Clone, Copy)]
pub struct Collection<'a> {
    client: &'a GenieClient,
    kind: CollectionKind,
}

impl GenieClient {
    pub fn collection(&self, kind: CollectionKind) -> Collection<'_> {
        Collection { client: self, kind }
    }

    pub fn presets(&self) -> Collection<'_> {
        self.collection(CollectionKind::Presets)
    }

    pub fn objects(&self) -> Collection<'_> {
        self.collection(CollectionKind::Objects)
    }

    pub fn provisions(&self) -> Collection<'_> {
        self.collection(CollectionKind::Provisions)
    }
}

impl Collection<'_> {
    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    fn item_path(&self, name: &str) -> Result<String, Error> {
        Ok(format!("{}/{}", self.kind.path(), path_segment(name)?))
    }

    /// Every document in the collection.
    ///
    /// `GET /{collection}`
    pub fn list(&self) -> Result<Vec<Value>, Error> {
        debug!(collection = %self.kind, "listing documents");
        self.client.get(self.kind.path())
    }

    /// One document by name, `None` if it doesn't exist.
    ///
    /// `GET /{collection}?query={"_id":"{name}"}`
    pub fn get(&self, name: &str) -> Result<Option<Value>, Error> {
        let path = format!(
            "{}{}",
            self.kind.path(),
            query_string(Some(&Filter::by_id(name)), None)
        );
        let docs: Vec<Value> = self.client.get(&path)?;
        Ok(docs.into_iter().next())
    }

    /// Create or replace a document.
    ///
    /// `PUT /{collection}/{name}`
    pub fn put(&self, name: &str, body: Value) -> Result<(), Error> {
        debug!(collection = %self.kind, name, "putting document");
        let payload = self.kind.payload(body)?;
        self.client.put(&self.item_path(name)?, payload, &[])
    }

    /// Delete a document.
    ///
    /// `DELETE /{collection}/{name}`
    pub fn delete(&self, name: &str) -> Result<(), Error> {
        debug!(collection = %self.kind, name, "deleting document");
        self.client.delete(&self.item_path(name)?)
    }
}
