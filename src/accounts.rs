use anyhow::{Result, anyhow};
use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

pub const MAX_USERNAME_LEN: usize = 150;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 256;
pub const MAX_FULL_NAME_LEN: usize = 255;
pub const MAX_CANDIDACY_NAME_LEN: usize = 100;
pub const MAX_PARTY_LEN: usize = 10;
pub const MAX_URL_LEN: usize = 512;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_SEAT_NAME_LEN: usize = 50;

pub const ACTIVATION_TOKEN_TTL_HOURS: i64 = 24;

pub const SECRETARIAT_GROUP: &str = "Secretaria Geral";
pub const PRESIDING_SEAT_NAME: &str = "Presidente";

/// Only the seat named exactly `Presidente` carries presiding powers.
pub fn is_presiding_seat(seat_name: &str) -> bool {
    seat_name == PRESIDING_SEAT_NAME
}

/// Argon2id PHC string with a random 16-byte salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|err| anyhow!("Failed to encode password salt: {err}"))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| anyhow!("Failed to hash password: {err}"))?;
    Ok(hash.to_string())
}

/// Unparseable stored hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

pub fn generate_token() -> String {
    Uuid::new_v4().hyphenated().to_string()
}

pub fn activation_expiry(created_at: DateTime<Utc>) -> DateTime<Utc> {
    created_at + Duration::hours(ACTIVATION_TOKEN_TTL_HOURS)
}

pub fn parse_token(value: &str) -> Result<String> {
    let parsed = Uuid::parse_str(value.trim())
        .map_err(|err| anyhow!("Malformed token: {err}"))?;
    Ok(parsed.hyphenated().to_string())
}

pub fn sanitize_username(value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Username cannot be empty"));
    }
    if trimmed.chars().count() > MAX_USERNAME_LEN {
        return Err(anyhow!(
            "Username exceeds {MAX_USERNAME_LEN} character limit"
        ));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '.' | '@' | '+' | '-' | '_'))
    {
        return Err(anyhow!(
            "Username may only contain letters, digits and . @ + - _"
        ));
    }
    Ok(trimmed.to_string())
}

pub fn validate_password(value: &str) -> Result<()> {
    let length = value.chars().count();
    if length < MIN_PASSWORD_LEN {
        return Err(anyhow!(
            "Password must have at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    if length > MAX_PASSWORD_LEN {
        return Err(anyhow!(
            "Password exceeds {MAX_PASSWORD_LEN} character limit"
        ));
    }
    Ok(())
}

pub fn canonicalize_email(value: Option<&str>) -> Result<Option<String>> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.len() > MAX_EMAIL_LEN {
        return Err(anyhow!("Email exceeds {MAX_EMAIL_LEN} character limit"));
    }
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {
            Ok(Some(trimmed.to_ascii_lowercase()))
        }
        _ => Err(anyhow!("Email address is malformed")),
    }
}

pub fn canonicalize_required(value: &str, label: &str, max_len: usize) -> Result<String> {
    assert!(max_len > 0, "Maximum length must be positive");
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("{label} cannot be empty"));
    }
    if trimmed.chars().count() > max_len {
        return Err(anyhow!("{label} exceeds {max_len} character limit"));
    }
    Ok(trimmed.to_string())
}

pub fn canonicalize_optional(
    value: Option<&str>,
    label: &str,
    max_len: usize,
) -> Result<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => canonicalize_required(trimmed, label, max_len).map(Some),
    }
}

pub fn canonicalize_party(value: Option<&str>) -> Result<Option<String>> {
    Ok(canonicalize_optional(value, "Party", MAX_PARTY_LEN)?.map(|p| p.to_uppercase()))
}
