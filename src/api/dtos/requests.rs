use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct ServiceRequest {
    pub name: String,
    pub price: f64,
    pub duration: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub client_name: String,
    pub client_phone: String,
    pub client_instagram: Option<String>,
    pub service_id: String,
    pub date: String,
    pub time: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsQuery {
    pub date: Option<String>,
    pub service_id: Option<String>,
}

#[derive(Deserialize)]
pub struct AppointmentListQuery {
    pub date: Option<String>,
}
