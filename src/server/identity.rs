use axum::http::HeaderMap;

use crate::database::entities::Role;
use crate::errors::AuthError;
use crate::services::authorization::Identity;

/// Caller id, set by the authenticating gateway in front of the service.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Caller role: `admin`, `supervisor` or `employee`.
pub const USER_ROLE_HEADER: &str = "x-user-role";

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Read the already-verified caller identity from the request headers.
pub fn identity(headers: &HeaderMap) -> Result<Identity, AuthError> {
    let (Some(id), Some(role)) = (header(headers, USER_ID_HEADER), header(headers, USER_ROLE_HEADER)) else {
        return Err(AuthError::Unauthorized("Unauthorized".to_string()));
    };
    let id = id
        .parse::<i64>()
        .map_err(|_| AuthError::Unauthorized("Invalid identity".to_string()))?;
    let role = role
        .parse::<Role>()
        .map_err(|_| AuthError::Unauthorized("Invalid identity".to_string()))?;
    Ok(Identity::new(id, role))
}

/// Identity that must carry exactly `role`.
pub fn require(headers: &HeaderMap, role: Role) -> Result<Identity, AuthError> {
    let caller = identity(headers)?;
    caller.require_role(role)?;
    Ok(caller)
}
