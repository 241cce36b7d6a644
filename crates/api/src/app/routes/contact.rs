use axum::{
    extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, routing::post, Json,
    Router,
};

use crate::app::dto::{ContactAck, ContactRequest};
use crate::app::errors::{domain_error_to_response, json_rejection_to_response};

pub fn router() -> Router {
    Router::new().route("/contact", post(submit))
}

async fn submit(body: Result<Json<ContactRequest>, JsonRejection>) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return json_rejection_to_response(rejection),
    };
    if let Err(e) = body.validate() {
        return domain_error_to_response(e);
    }

    tracing::info!(
        name = body.name.as_str(),
        email = body.email.as_str(),
        message_len = body.message.chars().count(),
        "contact message received"
    );
    (StatusCode::ACCEPTED, Json(ContactAck::sent())).into_response()
}
