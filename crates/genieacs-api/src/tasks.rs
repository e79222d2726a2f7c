// Task endpoints
//
// Task creation on `POST /devices/{id}/tasks`, one typed helper per task
// kind, plus listing, retry and deletion on `/tasks`.

use serde::Serialize;
use tracing::debug;

use crate::client::GenieClient;
use crate::error::Error;
use crate::models::{ParameterValue, Task, TaskRequest};
use crate::query::{Filter, path_segment, query_string};

impl GenieClient {
    /// Queue a task for a device.
    ///
    /// `POST /devices/{id}/tasks[?connection_request]`
    pub fn create_task(
        &self,
        device_id: &str,
        task: &TaskRequest,
        connection_request: bool,
    ) -> Result<(), Error> {
        debug!(device_id, task = %task.name(), "queueing task");
        self.post_raw_task(device_id, task, connection_request)
    }

    /// Queue an arbitrary task body (used when re-importing exported tasks).
    pub(crate) fn post_raw_task(
        &self,
        device_id: &str,
        body: &impl Serialize,
        connection_request: bool,
    ) -> Result<(), Error> {
        let path = format!("/devices/{}/tasks", path_segment(device_id)?);
        self.post_task(&path, body, connection_request)
    }

    /// Refresh an object (or a single parameter) from the device.
    pub fn refresh_object(
        &self,
        device_id: &str,
        object_name: &str,
        connection_request: bool,
    ) -> Result<(), Error> {
        let task = TaskRequest::RefreshObject {
            object_name: object_name.to_owned(),
        };
        self.create_task(device_id, &task, connection_request)
    }

    /// Set one or more parameter values on the device.
    pub fn set_parameter_values(
        &self,
        device_id: &str,
        parameter_values: Vec<ParameterValue>,
        connection_request: bool,
    ) -> Result<(), Error> {
        let task = TaskRequest::SetParameterValues { parameter_values };
        self.create_task(device_id, &task, connection_request)
    }

    /// Fetch current values of the named parameters from the device.
    pub fn get_parameter_values(
        &self,
        device_id: &str,
        parameter_names: Vec<String>,
        connection_request: bool,
    ) -> Result<(), Error> {
        let task = TaskRequest::GetParameterValues { parameter_names };
        self.create_task(device_id, &task, connection_request)
    }

    /// Add a new instance of a multi-instance object.
    pub fn add_object(
        &self,
        device_id: &str,
        object_name: &str,
        connection_request: bool,
    ) -> Result<(), Error> {
        let task = TaskRequest::AddObject {
            object_name: object_name.to_owned(),
            parameter_values: Vec::new(),
        };
        self.create_task(device_id, &task, connection_request)
    }

    pub fn reboot(&self, device_id: &str, connection_request: bool) -> Result<(), Error> {
        self.create_task(device_id, &TaskRequest::Reboot, connection_request)
    }

    pub fn factory_reset(&self, device_id: &str, connection_request: bool) -> Result<(), Error> {
        self.create_task(device_id, &TaskRequest::FactoryReset, connection_request)
    }

    /// Push a file stored on the server to the device.
    ///
    /// `file_type` is the TR-069 type string (e.g. `1 Firmware Upgrade Image`).
    pub fn download(
        &self,
        device_id: &str,
        file_type: &str,
        file_name: &str,
        target_file_name: Option<&str>,
        connection_request: bool,
    ) -> Result<(), Error> {
        let task = TaskRequest::Download {
            file_type: file_type.to_owned(),
            file_name: file_name.to_owned(),
            target_file_name: target_file_name.map(str::to_owned),
        };
        self.create_task(device_id, &task, connection_request)
    }

    /// List pending tasks of a device.
    ///
    /// `GET /tasks?query={"device":"{id}"}`
    pub fn tasks_for_device(&self, device_id: &str) -> Result<Vec<Task>, Error> {
        let path = format!("/tasks{}", query_string(Some(&Filter::by_device(device_id)), None));
        self.get(&path)
    }

    /// Retry a faulted task.
    ///
    /// `POST /tasks/{id}/retry`
    pub fn retry_task(&self, task_id: &str) -> Result<(), Error> {
        debug!(task_id, "retrying task");
        self.post(&format!("/tasks/{}/retry", path_segment(task_id)?))
    }

    /// Delete a task. Deleting an unknown task surfaces [`Error::Http`].
    ///
    /// `DELETE /tasks/{id}`
    pub fn delete_task(&self, task_id: &str) -> Result<(), Error> {
        debug!(task_id, "deleting task");
        self.delete(&format!("/tasks/{}", path_segment(task_id)?))
    }
}
