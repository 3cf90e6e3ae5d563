use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in_seconds: u64,
    pub actor: ActorView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorView {
    pub user_id: i32,
    pub username: String,
    pub is_superuser: bool,
    pub is_secretariat: bool,
    pub is_presiding_officer: bool,
    pub is_member: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SecretariatRegistrationRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
}

/// Stands in for the activation email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretariatRegistrationResponse {
    pub user_id: i32,
    pub username: String,
    pub email: Option<String>,
    pub activation_path: String,
    pub expires_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivationResponse {
    pub user_id: i32,
    pub username: String,
    pub activated: bool,
}
