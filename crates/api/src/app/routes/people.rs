use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{patch, post},
    Extension, Json, Router,
};

use chambers_core::DomainError;
use chambers_people::{NewPerson, PersonId, PersonPatch};

use crate::app::dto::{validate_new_person, validate_patch, PeopleResponse, WriteOutcome};
use crate::app::errors::{domain_error_to_response, json_rejection_to_response};
use crate::app::services::AppServices;
use crate::context::AdminContext;
use crate::middleware::{require_admin, AuthState};

pub fn router(auth_state: AuthState) -> Router {
    let admin = from_fn_with_state(auth_state, require_admin);

    // `route_layer` only wraps the methods registered before it, so reads stay public.
    Router::new()
        .route(
            "/people",
            post(add_person).route_layer(admin.clone()).get(list_people),
        )
        .route(
            "/people/:id",
            patch(update_person)
                .delete(delete_person)
                .route_layer(admin)
                .get(get_person),
        )
}

async fn list_people(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(PeopleResponse {
        items: services.directory.list_people().await,
    })
}

async fn get_person(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    // An id that cannot name a document cannot name a person either.
    let Ok(id) = id.parse::<PersonId>() else {
        return domain_error_to_response(DomainError::not_found());
    };

    match services.directory.get_person(&id).await {
        Some(person) => Json(person).into_response(),
        None => domain_error_to_response(DomainError::not_found()),
    }
}

async fn add_person(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    body: Result<Json<NewPerson>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return json_rejection_to_response(rejection),
    };
    if let Err(e) = validate_new_person(&body) {
        return domain_error_to_response(e);
    }

    match services.directory.add_person(&body).await {
        Ok(id) => {
            tracing::info!(admin = admin.email(), admin_uid = admin.uid(), id = %id, kind = %body.kind, "person added");
            (StatusCode::CREATED, Json(WriteOutcome::created(&id))).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Json(WriteOutcome::failed(&e))).into_response(),
    }
}

async fn update_person(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path(id): Path<String>,
    patch: Result<Json<PersonPatch>, JsonRejection>,
) -> axum::response::Response {
    let id = match id.parse::<PersonId>() {
        Ok(id) => id,
        Err(e) => return domain_error_to_response(e),
    };
    let Json(patch) = match patch {
        Ok(patch) => patch,
        Err(rejection) => return json_rejection_to_response(rejection),
    };
    if let Err(e) = validate_patch(&patch) {
        return domain_error_to_response(e);
    }

    match services.directory.update_person(&id, &patch).await {
        Ok(()) => {
            tracing::info!(admin = admin.email(), admin_uid = admin.uid(), id = %id, "person updated");
            Json(WriteOutcome::ok()).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Json(WriteOutcome::failed(&e))).into_response(),
    }
}

async fn delete_person(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match id.parse::<PersonId>() {
        Ok(id) => id,
        Err(e) => return domain_error_to_response(e),
    };

    match services.directory.delete_person(&id).await {
        Ok(()) => {
            tracing::info!(admin = admin.email(), admin_uid = admin.uid(), id = %id, "person deleted");
            Json(WriteOutcome::ok()).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Json(WriteOutcome::failed(&e))).into_response(),
    }
}
