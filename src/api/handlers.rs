use crate::{
    api::models::*,
    auth::jwt::Claims,
    constants::DEFAULT_CALENDAR_DAYS,
    core::{
        errors::ReservationError,
        models::{
            availability::DayAvailability,
            reservation::{OccupiedSlot, Reservation},
            user::UserProfile,
        },
        services::{AuthSession, ReservationService},
    },
    infrastructure::{clock::Clock, logging::in_memory::InMemoryLogging, storage::Storage},
};
use axum::{
    Extension, Json, Router,
    extract::{Path, Query, Request, State, rejection::JsonRejection},
    http::StatusCode,
    middleware::{self, Next},
    response::IntoResponse,
};
use chrono::Duration;
use http::header;
use tracing::debug;

use std::sync::Arc;

pub type AppService = ReservationService<InMemoryLogging, Arc<dyn Storage>, Arc<dyn Clock>>;

fn malformed_body(rejection: JsonRejection) -> ApiError {
    ApiError(ReservationError::invalid("body", "Malformed request", rejection.body_text()))
}

// Middleware to validate JWT
async fn auth_middleware(
    State(service): State<Arc<AppService>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ReservationError::Unauthenticated("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ReservationError::Unauthenticated("Invalid Authorization header".to_string()))?;

    let claims = service.validate_token(token)?;
    debug!(user_id = %claims.sub, "Authenticated request");
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

// Define API routes
pub fn api_routes(service: Arc<AppService>) -> Router {
    let protected_routes = Router::new()
        .route(
            "/reservations",
            axum::routing::get(list_my_reservations).post(create_reservation),
        )
        .route("/reservations/occupied", axum::routing::get(list_occupied_slots))
        .route("/reservations/{reservation_id}", axum::routing::delete(cancel_reservation))
        .route("/availability", axum::routing::get(get_availability))
        .route("/availability/{date}", axum::routing::get(get_day_availability))
        .route_layer(middleware::from_fn_with_state(service.clone(), auth_middleware));

    Router::new()
        .route("/", axum::routing::get(|| async { "OK" }))
        .route("/auth/register", axum::routing::post(register))
        .route("/auth/login", axum::routing::post(login))
        .merge(protected_routes)
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserProfile),
        (status = 400, description = "Invalid email or password", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn register(
    State(service): State<Arc<AppService>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    let Json(req) = payload.map_err(malformed_body)?;
    let user = service.register(&req.email, &req.password).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthSession),
        (status = 400, description = "Malformed credentials", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn login(
    State(service): State<Arc<AppService>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthSession>, ApiError> {
    let Json(req) = payload.map_err(malformed_body)?;
    let session = service.authenticate(&req.email, &req.password).await?;
    Ok(Json(session))
}

#[utoipa::path(
    post,
    path = "/reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = Reservation),
        (status = 400, description = "Missing or invalid date or chair", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 409, description = "Chair already reserved for that date", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn create_reservation(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CreateReservationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Reservation>), ApiError> {
    let Json(req) = payload.map_err(malformed_body)?;
    let (date, chair_id) = req.into_parts()?;
    let reservation = service.create_reservation(&claims.sub, &date, chair_id).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

#[utoipa::path(
    get,
    path = "/reservations",
    responses(
        (status = 200, description = "The caller's reservations, latest date first", body = Vec<Reservation>),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn list_my_reservations(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Reservation>>, ApiError> {
    let reservations = service.get_user_reservations(&claims.sub).await?;
    Ok(Json(reservations))
}

#[utoipa::path(
    get,
    path = "/reservations/occupied",
    responses(
        (status = 200, description = "Every reserved (date, chair) pair, without owners", body = Vec<OccupiedSlot>),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn list_occupied_slots(
    State(service): State<Arc<AppService>>,
) -> Result<Json<Vec<OccupiedSlot>>, ApiError> {
    let slots = service.get_occupied_slots().await?;
    Ok(Json(slots))
}

#[utoipa::path(
    delete,
    path = "/reservations/{reservation_id}",
    params(
        ("reservation_id" = String, Path, description = "ID of the reservation to cancel")
    ),
    responses(
        (status = 204, description = "Reservation cancelled"),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 404, description = "Reservation not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn cancel_reservation(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Path(reservation_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.cancel_reservation(&claims.sub, &reservation_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Capacity and free chairs per day", body = Vec<DayAvailability>),
        (status = 400, description = "Invalid range", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn get_availability(
    State(service): State<Arc<AppService>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<DayAvailability>>, ApiError> {
    let from = match query.from {
        Some(ref raw) => service.parse_date(raw)?,
        None => service.today(),
    };
    let to = match query.to {
        Some(ref raw) => service.parse_date(raw)?,
        None => from
            .checked_add_signed(Duration::days(DEFAULT_CALENDAR_DAYS - 1))
            .unwrap_or(from),
    };
    let days = service.get_availability(from, to).await?;
    Ok(Json(days))
}

#[utoipa::path(
    get,
    path = "/availability/{date}",
    params(
        ("date" = String, Path, description = "Day to inspect, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Capacity, free chairs and suggested chair for the day", body = DayAvailability),
        (status = 400, description = "Invalid date", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn get_day_availability(
    State(service): State<Arc<AppService>>,
    Path(date): Path<String>,
) -> Result<Json<DayAvailability>, ApiError> {
    let date = service.parse_date(&date)?;
    let day = service.get_day_availability(date).await?;
    Ok(Json(day))
}
