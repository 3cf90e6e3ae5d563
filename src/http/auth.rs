use axum::extract::{FromRequestParts, Path, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use tracing::info;

use crate::entities::member_profile;
use crate::models::accounts::{
    ActivationResponse, ActorView, LoginRequest, LoginResponse, SecretariatRegistrationRequest,
    SecretariatRegistrationResponse,
};
use crate::registry::{self, Actor};
use crate::state::AppState;

use super::HttpError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/secretariat", post(register_secretariat))
        .route("/activate/{token}", get(activate))
}

/// The account behind the request's bearer token.
pub struct CurrentActor {
    pub actor: Actor,
    token: String,
}

impl CurrentActor {
    pub fn require_superuser(&self) -> Result<(), HttpError> {
        if !self.actor.is_superuser() {
            return Err(HttpError::forbidden(
                "Access denied. Only the superuser may perform this action.",
            ));
        }
        Ok(())
    }

    pub fn require_secretariat(&self) -> Result<(), HttpError> {
        if !self.actor.is_secretariat() {
            return Err(HttpError::forbidden(
                "Access denied. You do not belong to the Secretariat.",
            ));
        }
        Ok(())
    }

    pub fn require_presiding_officer(&self) -> Result<(), HttpError> {
        if !self.actor.is_presiding_officer() {
            return Err(HttpError::forbidden(
                "Access denied. Only the presiding officer may perform this action.",
            ));
        }
        Ok(())
    }

    pub fn require_member(&self) -> Result<&member_profile::Model, HttpError> {
        self.actor.profile.as_ref().ok_or_else(|| {
            HttpError::new(
                StatusCode::NOT_FOUND,
                format!("Account {} has no member profile", self.actor.account.username),
            )
        })
    }

    pub fn view(&self) -> ActorView {
        ActorView {
            user_id: self.actor.user_id(),
            username: self.actor.account.username.clone(),
            is_superuser: self.actor.is_superuser(),
            is_secretariat: self.actor.is_secretariat(),
            is_presiding_officer: self.actor.is_presiding_officer(),
            is_member: self.actor.profile.is_some(),
        }
    }
}

impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            HttpError::new(
                StatusCode::UNAUTHORIZED,
                "missing bearer token".to_string(),
            )
        })?;

        let user_id = state.sessions.resolve(&token).await.ok_or_else(|| {
            HttpError::new(
                StatusCode::UNAUTHORIZED,
                "session expired or unknown".to_string(),
            )
        })?;

        let actor = registry::load_actor(&state.database, user_id)
            .await?
            .filter(|actor| actor.account.is_active);
        let Some(actor) = actor else {
            state.sessions.revoke(&token).await;
            return Err(HttpError::new(
                StatusCode::UNAUTHORIZED,
                "account is no longer available".to_string(),
            ));
        };

        Ok(Self { actor, token })
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let raw = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = raw.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() || token.len() > 64 {
        return None;
    }
    Some(token.to_string())
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    if request.username.trim().is_empty() || request.password.is_empty() {
        return Err(HttpError::new(
            StatusCode::BAD_REQUEST,
            "username and password are required".to_string(),
        ));
    }

    let account = registry::authenticate(&state.database, &request.username, &request.password)
        .await?;
    let actor = registry::load_actor(&state.database, account.id)
        .await?
        .ok_or_else(|| {
            HttpError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Account {} vanished during login", account.id),
            )
        })?;

    let token = state.sessions.issue(account.id).await;
    info!("Account {} logged in", account.username);

    let current = CurrentActor { actor, token };
    Ok(Json(LoginResponse {
        token: current.token.clone(),
        expires_in_seconds: state.sessions.ttl_seconds(),
        actor: current.view(),
    }))
}

async fn logout(
    State(state): State<AppState>,
    current: CurrentActor,
) -> Result<StatusCode, HttpError> {
    state.sessions.revoke(&current.token).await;
    info!("Account {} logged out", current.actor.account.username);
    Ok(StatusCode::NO_CONTENT)
}

async fn me(current: CurrentActor) -> Result<Json<ActorView>, HttpError> {
    Ok(Json(current.view()))
}

async fn register_secretariat(
    State(state): State<AppState>,
    current: CurrentActor,
    Json(request): Json<SecretariatRegistrationRequest>,
) -> Result<(StatusCode, Json<SecretariatRegistrationResponse>), HttpError> {
    current.require_superuser()?;

    let (account, token) = registry::register_secretariat(
        &state.database,
        &request.username,
        &request.password,
        request.email.as_deref(),
        Utc::now(),
    )
    .await?;

    // Email delivery is simulated: the link goes back to the superuser
    let response = SecretariatRegistrationResponse {
        user_id: account.id,
        username: account.username,
        email: account.email,
        activation_path: format!("/auth/activate/{}", token.token),
        expires_at: token.expires_at.timestamp(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

async fn activate(
    Path(token): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ActivationResponse>, HttpError> {
    let account = registry::activate_account(&state.database, &token, Utc::now()).await?;
    Ok(Json(ActivationResponse {
        user_id: account.id,
        username: account.username,
        activated: account.is_active,
    }))
}
