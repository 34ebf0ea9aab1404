//! OpenAPI documentation and schema generation
//!
//! Describes the read API using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the marvel-forwarder read API
///
/// Served as JSON at `/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "marvel-forwarder read API",
        version = "0.1.0",
        description = "Read-only access to the locally synchronised Marvel character catalogue",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        // Characters
        crate::api::routes::list_characters,
        crate::api::routes::get_character,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        crate::characters::Character,
        crate::error::ApiError,
    )),
    tags(
        (name = "characters", description = "Characters - List identities and look up character details"),
        (name = "system", description = "System endpoints - Health checks, OpenAPI spec"),
    )
)]
pub struct ApiDoc;
