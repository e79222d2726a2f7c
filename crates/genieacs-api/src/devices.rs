// Device endpoints
//
// Inventory queries via `GET /devices` with filter/projection, parameter
// lookups through the path codec, and device deletion.

use serde_json::Value;
use tracing::debug;

use crate::client::GenieClient;
use crate::error::Error;
use crate::models::DeviceIdOnly;
use crate::params::{ParamTree, extract_leaf, project_multiple};
use crate::query::{Filter, Projection, path_segment, query_string};

impl GenieClient {
    /// Query devices with an arbitrary filter and optional projection.
    ///
    /// `GET /devices?query=...&projection=...`
    pub fn devices(
        &self,
        filter: Option<&Filter>,
        projection: Option<&Projection>,
    ) -> Result<Vec<Value>, Error> {
        let path = format!("/devices{}", query_string(filter, projection));
        self.get(&path)
    }

    /// List the IDs of all known devices.
    ///
    /// `GET /devices?projection=_id`
    pub fn device_ids(&self) -> Result<Vec<String>, Error> {
        debug!("listing device ids");
        let devices: Vec<DeviceIdOnly> = self.get("/devices?projection=_id")?;
        Ok(devices.into_iter().map(|d| d.id).collect())
    }

    /// Fetch a full device document by ID. `None` if no device matches.
    pub fn device_by_id(&self, device_id: &str) -> Result<Option<Value>, Error> {
        let devices = self.devices(Some(&Filter::by_id(device_id)), None)?;
        Ok(devices.into_iter().next())
    }

    /// Fetch a full device document by WAN MAC address. `None` if no
    /// device matches.
    pub fn device_by_mac(&self, mac: &str) -> Result<Option<Value>, Error> {
        let devices = self.devices(Some(&Filter::by_mac(mac)), None)?;
        Ok(devices.into_iter().next())
    }

    /// Read a single parameter value from the server's last known state.
    ///
    /// Returns `None` if the device doesn't exist or the parameter isn't
    /// present in its data model.
    pub fn device_parameter(&self, device_id: &str, path: &str) -> Result<Option<Value>, Error> {
        let projection = Projection::parse(path);
        let devices = self.devices(Some(&Filter::by_id(device_id)), Some(&projection))?;
        Ok(devices
            .first()
            .and_then(|d| extract_leaf(d, path))
            .cloned())
    }

    /// Read several comma-separated parameters into one merged tree.
    ///
    /// An unknown device yields an empty tree; unknown parameters on a
    /// known device yield `null` leaves.
    pub fn device_parameters(&self, device_id: &str, paths: &str) -> Result<ParamTree, Error> {
        let projection = Projection::parse(paths);
        let devices = self.devices(Some(&Filter::by_id(device_id)), Some(&projection))?;
        Ok(devices
            .first()
            .map(|d| project_multiple(d, paths))
            .unwrap_or_default())
    }

    /// Remove a device and its data from the server.
    ///
    /// `DELETE /devices/{id}`
    pub fn delete_device(&self, device_id: &str) -> Result<(), Error> {
        debug!(device_id, "deleting device");
        self.delete(&format!("/devices/{}", path_segment(device_id)?))
    }
}
