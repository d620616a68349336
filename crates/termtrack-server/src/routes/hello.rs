//! Landing endpoint, used by clients to validate a stored session.

use axum::Json;
use serde_json::{Value, json};

use crate::extract::Actor;

/// `GET /` — greets the authenticated caller.
pub async fn hello(Actor(actor): Actor) -> Json<Value> {
    Json(json!({
        "response": format!("hello there {}!", actor.username),
        "admin": actor.is_admin(),
        "username": actor.username,
    }))
}
