// File storage endpoints
//
// Firmware images and configuration files kept by the server for
// `download` tasks. Uploads carry their metadata in request headers.

use std::path::Path;

use tracing::debug;

use crate::client::{GenieClient, Payload};
use crate::error::Error;
use crate::models::{FileMetadata, StoredFile};
use crate::query::{Filter, path_segment, query_string};

impl GenieClient {
    /// Every stored file.
    ///
    /// `GET /files`
    pub fn files(&self) -> Result<Vec<StoredFile>, Error> {
        self.get("/files")
    }

    /// Metadata of one stored file, `None` if it doesn't exist.
    ///
    /// `GET /files?query={"_id":"{name}"}`
    pub fn file_metadata(&self, name: &str) -> Result<Option<StoredFile>, Error> {
        let path = format!("/files{}", query_string(Some(&Filter::by_id(name)), None));
        let files: Vec<StoredFile> = self.get(&path)?;
        Ok(files.into_iter().next())
    }

    /// Upload in-memory content under `name`.
    ///
    /// `PUT /files/{name}` with `fileType`, `oui`, `productClass` and
    /// `version` headers.
    pub fn upload_file_bytes(
        &self,
        name: &str,
        content: Vec<u8>,
        metadata: &FileMetadata,
    ) -> Result<(), Error> {
        debug!(name, bytes = content.len(), "uploading file");
        self.put(
            &file_path(name)?,
            Payload::Bytes(content),
            &metadata.headers(),
        )
    }

    /// Upload the local file at `source` under `name`.
    pub fn upload_file(
        &self,
        name: &str,
        source: &Path,
        metadata: &FileMetadata,
    ) -> Result<(), Error> {
        let content = std::fs::read(source).map_err(|e| Error::io(source, e))?;
        self.upload_file_bytes(name, content, metadata)
    }

    /// Download a stored file's content to `dest`, returning its size.
    ///
    /// `GET /files/{name}`
    pub fn download_file(&self, name: &str, dest: &Path) -> Result<usize, Error> {
        let content = self.get_bytes(&file_path(name)?)?;
        std::fs::write(dest, &content).map_err(|e| Error::io(dest, e))?;
        debug!(name, bytes = content.len(), dest = %dest.display(), "downloaded file");
        Ok(content.len())
    }

    /// Delete a stored file.
    ///
    /// `DELETE /files/{name}`
    pub fn delete_file(&self, name: &str) -> Result<(), Error> {
        debug!(name, "deleting file");
        self.delete(&file_path(name)?)
    }
}

fn file_path(name: &str) -> Result<String, Error> {
    Ok(format!("/files/{}", path_segment(name)?))
}
