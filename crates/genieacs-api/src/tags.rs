// Tag endpoints

use tracing::debug;

use crate::client::GenieClient;
use crate::error::Error;
use crate::models::DeviceTags;
use crate::query::{Filter, Projection, path_segment, query_string};

impl GenieClient {
    /// Tag a device.
    ///
    /// `POST /devices/{id}/tags/{tag}`
    pub fn assign_tag(&self, device_id: &str, tag: &str) -> Result<(), Error> {
        debug!(device_id, tag, "assigning tag");
        self.post(&tag_path(device_id, tag)?)
    }

    /// Remove a tag from a device.
    ///
    /// `DELETE /devices/{id}/tags/{tag}`
    pub fn remove_tag(&self, device_id: &str, tag: &str) -> Result<(), Error> {
        debug!(device_id, tag, "removing tag");
        self.delete(&tag_path(device_id, tag)?)
    }

    /// Tags of a device; empty if the device is unknown or untagged.
    ///
    /// `GET /devices?query={"_id":"{id}"}&projection=_tags`
    pub fn tags(&self, device_id: &str) -> Result<Vec<String>, Error> {
        let path = format!(
            "/devices{}",
            query_string(
                Some(&Filter::by_id(device_id)),
                Some(&Projection::parse("_tags"))
            )
        );
        let devices: Vec<DeviceTags> = self.get(&path)?;
        Ok(devices.into_iter().next().map(|d| d.tags).unwrap_or_default())
    }
}

fn tag_path(device_id: &str, tag: &str) -> Result<String, Error> {
    Ok(format!(
        "/devices/{}/tags/{}",
        path_segment(device_id)?,
        path_segment(tag)?
    ))
}
