// genieacs-api: Blocking Rust client for the GenieACS northbound REST API

pub mod bulk;
pub mod client;
pub mod collections;
mod devices;
pub mod error;
mod faults;
mod files;
pub mod models;
pub mod params;
pub mod query;
mod tags;
mod tasks;
pub mod transport;

pub use bulk::{ImportFailure, ImportReport};
pub use client::{GenieClient, Payload};
pub use collections::{Collection, CollectionKind};
pub use error::Error;
pub use models::{FileMetadata, Fault, ParameterValue, StoredFile, Task, TaskName, TaskRequest};
pub use params::{ParamTree, build_nested, extract_leaf, project_multiple};
pub use query::{Filter, Projection};
pub use transport::{ConnectionConfig, Credentials, DEFAULT_PORT, DEFAULT_TIMEOUT};
