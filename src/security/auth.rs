use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};

use crate::config::AppConfig;

/// True when the request carries `Authorization: Bearer <admin_token>`.
fn bearer_matches(request: &Request<'_>) -> bool {
    let expected = match request
        .rocket()
        .state::<AppConfig>()
        .and_then(|c| c.admin_token.as_deref())
    {
        Some(t) if !t.is_empty() => t,
        _ => return false,
    };

    request
        .headers()
        .get_one("Authorization")
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|token| super::constant_time_eq(token.trim().as_bytes(), expected.as_bytes()))
        .unwrap_or(false)
}

/// Guard: requires the admin bearer token.
pub struct EditorUser;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for EditorUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        if bearer_matches(request) {
            Outcome::Success(EditorUser)
        } else {
            Outcome::Forward(Status::Unauthorized)
        }
    }
}

/// Never fails; records whether the caller may edit content. Used where a
/// refused request must be ignored quietly instead of answered with an error.
pub struct EditCapability(pub bool);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for EditCapability {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        Outcome::Success(EditCapability(bearer_matches(request)))
    }
}
