use serde::Serialize;
use crate::domain::models::{appointment::Appointment, service::Service, settings::HomeContent};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsResponse {
    pub date: String,
    pub service_id: String,
    pub slots: Vec<String>,
}

#[derive(Serialize)]
pub struct DataResponse {
    pub services: Vec<Service>,
    pub content: HomeContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointments: Option<Vec<Appointment>>,
}
