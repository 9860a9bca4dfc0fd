use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{
    api::models::{CreateReservationRequest, ErrorResponse, LoginRequest, RegisterRequest},
    core::{
        models::{
            availability::DayAvailability,
            reservation::{OccupiedSlot, Reservation},
            user::UserProfile,
        },
        services::AuthSession,
    },
};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "Bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::register,
        super::handlers::login,
        super::handlers::create_reservation,
        super::handlers::list_my_reservations,
        super::handlers::list_occupied_slots,
        super::handlers::cancel_reservation,
        super::handlers::get_availability,
        super::handlers::get_day_availability
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        CreateReservationRequest,
        ErrorResponse,
        AuthSession,
        UserProfile,
        Reservation,
        OccupiedSlot,
        DayAvailability
    )),
    modifiers(&BearerAuth),
    info(
        title = "Chairbook API",
        description = "API for reserving chairs by date",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
