//! OpenAPI document served through Swagger UI.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::eduerp::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "eduerp",
        description = "Student information portal, authentication and session API"
    ),
    paths(
        handlers::health::health,
        handlers::register::register,
        handlers::login::login,
        handlers::me::me,
    ),
    components(schemas(
        crate::auth::Role,
        crate::store::PublicIdentity,
        handlers::register::RegisterRequest,
        handlers::login::LoginRequest,
        handlers::login::LoginResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and session introspection"),
        (name = "health", description = "Service metadata")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_the_auth_routes() {
        let doc = ApiDoc::openapi();
        let paths = doc.paths.paths;

        assert!(paths.contains_key("/health"));
        assert!(paths.contains_key("/api/auth/register"));
        assert!(paths.contains_key("/api/auth/login"));
        assert!(paths.contains_key("/api/auth/me"));
    }
}
