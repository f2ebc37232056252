//! Server construction and dependency wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use kerbside::doc::ApiDoc;
use kerbside::domain::{
    ConversationService, FavoritesService, IdentityGate, IdentityService, ListingService,
    ModerationService,
};
use kerbside::inbound::http::health::{live, ready, HealthState};
use kerbside::inbound::http::state::HttpState;
use kerbside::inbound::http::api_scope;
use kerbside::outbound::persistence::pool::DbPool;
use kerbside::outbound::persistence::{
    DieselFavoriteRepository, DieselListingRepository, DieselMessageRepository,
    DieselUserRepository,
};

/// Wire the Diesel adapters and domain services into the handler state.
pub fn build_http_state(pool: &DbPool) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let listings = Arc::new(DieselListingRepository::new(pool.clone()));
    let favorites = Arc::new(DieselFavoriteRepository::new(pool.clone()));
    let messages = Arc::new(DieselMessageRepository::new(pool.clone()));

    let identity: Arc<dyn IdentityGate> = Arc::new(IdentityService::new(users.clone()));

    HttpState {
        identity: identity.clone(),
        listings: Arc::new(ListingService::new(listings.clone(), identity.clone())),
        moderation: Arc::new(ModerationService::new(listings.clone(), identity)),
        favorites: Arc::new(FavoritesService::new(favorites)),
        conversations: Arc::new(ConversationService::new(messages, users, listings)),
    }
}

/// Assemble the application: versioned API scope, health probes, and (in
/// debug builds) Swagger UI.
pub fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .service(api_scope())
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the listener and return the running server future.
pub fn create_server(
    config: ServerConfig,
    health_state: web::Data<HealthState>,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config.pool));
    let server = HttpServer::new(move || build_app(health_state.clone(), http_state.clone()))
        .bind(config.bind_addr)?
        .run();
    Ok(server)
}
