// Fault endpoints

use tracing::debug;

use crate::client::GenieClient;
use crate::error::Error;
use crate::models::Fault;
use crate::query::{Filter, path_segment, query_string};

impl GenieClient {
    /// Every recorded fault.
    ///
    /// `GET /faults`
    pub fn faults(&self) -> Result<Vec<Fault>, Error> {
        self.get("/faults")
    }

    /// Faults of one device.
    ///
    /// `GET /faults?query={"device":"{id}"}`
    pub fn faults_for_device(&self, device_id: &str) -> Result<Vec<Fault>, Error> {
        let path = format!("/faults{}", query_string(Some(&Filter::by_device(device_id)), None));
        self.get(&path)
    }

    /// Clear a fault so the session can proceed.
    ///
    /// `DELETE /faults/{id}`; fault IDs look like `{device}:{channel}`.
    pub fn delete_fault(&self, fault_id: &str) -> Result<(), Error> {
        debug!(fault_id, "deleting fault");
        self.delete(&format!("/faults/{}", path_segment(fault_id)?))
    }
}
