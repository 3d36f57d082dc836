use serde::{Deserialize, Serialize};

pub const ADMIN_SUBJECT: &str = "admin";
pub const SESSION_AUDIENCE: &str = "salon-admin";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
    pub csrf: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub csrf_token: String,
}
