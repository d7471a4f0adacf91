//! Role-based access control
//!
//! Permissions are a static declarative table mapping (method, path
//! pattern) to the set of roles allowed to call it, evaluated by one
//! generic guard middleware. Routes not in the table are denied.

use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::Role;
use crate::utils::error::ErrorResponse;

use super::auth::AuthUser;

/// Header that unlocks mutation of seeded divisions
pub const SEEDED_OVERRIDE_HEADER: &str = "allowSeededUpdate";

/// True when the privileged-override header is present and set to "true"
pub fn seeded_override(headers: &HeaderMap) -> bool {
    headers
        .get(SEEDED_OVERRIDE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// One row of the permission table
#[derive(Debug, Clone, Copy)]
pub struct RoutePermission {
    pub method: &'static str,
    pub pattern: &'static str,
    pub roles: &'static [Role],
}

const ADMIN: &[Role] = &[Role::Admin];
const ADMIN_CHEF: &[Role] = &[Role::Admin, Role::Chef];

/// Permission table for every protected route. Literal patterns come
/// before `{id}` patterns so the first match is the most specific one.
pub static ROUTE_PERMISSIONS: &[RoutePermission] = &[
    RoutePermission { method: "GET", pattern: "/api/v1/auth/me", roles: ADMIN_CHEF },
    RoutePermission { method: "GET", pattern: "/api/v1/divisions", roles: ADMIN_CHEF },
    RoutePermission { method: "GET", pattern: "/api/v1/divisions/employees", roles: ADMIN_CHEF },
    RoutePermission { method: "GET", pattern: "/api/v1/divisions/search", roles: ADMIN_CHEF },
    RoutePermission { method: "GET", pattern: "/api/v1/divisions/{id}", roles: ADMIN_CHEF },
    RoutePermission { method: "POST", pattern: "/api/v1/divisions", roles: ADMIN },
    RoutePermission { method: "PUT", pattern: "/api/v1/divisions/{id}", roles: ADMIN },
    RoutePermission { method: "DELETE", pattern: "/api/v1/divisions/{id}", roles: ADMIN },
    RoutePermission { method: "GET", pattern: "/api/v1/employees", roles: ADMIN },
    RoutePermission { method: "GET", pattern: "/api/v1/employees/{id}", roles: ADMIN },
    RoutePermission { method: "POST", pattern: "/api/v1/employees", roles: ADMIN },
    RoutePermission { method: "PUT", pattern: "/api/v1/employees/{id}", roles: ADMIN },
    RoutePermission { method: "DELETE", pattern: "/api/v1/employees/{id}", roles: ADMIN },
    RoutePermission { method: "GET", pattern: "/api/v1/grades", roles: ADMIN_CHEF },
    RoutePermission { method: "GET", pattern: "/api/v1/grades/{id}", roles: ADMIN_CHEF },
    RoutePermission { method: "PUT", pattern: "/api/v1/grades/{id}", roles: ADMIN },
];

/// Match a request path against a pattern; `{...}` segments match any
/// single non-empty segment
fn path_matches(pattern: &str, path: &str) -> bool {
    let mut pattern_segments = pattern.trim_matches('/').split('/');
    let mut path_segments = path.trim_matches('/').split('/');

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(p), Some(s)) => {
                let wildcard = p.starts_with('{') && p.ends_with('}');
                if !wildcard && p != s {
                    return false;
                }
                if s.is_empty() {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

/// Roles allowed for a (method, path), if the route is listed
pub fn allowed_roles(method: &str, path: &str) -> Option<&'static [Role]> {
    ROUTE_PERMISSIONS
        .iter()
        .find(|p| p.method == method && path_matches(p.pattern, path))
        .map(|p| p.roles)
}

/// Check a role against the permission table
pub fn check_route(method: &str, path: &str, role: Role) -> Result<(), RbacError> {
    match allowed_roles(method, path) {
        Some(roles) if roles.contains(&role) => Ok(()),
        _ => Err(RbacError::PermissionDenied {
            role,
            method: method.to_string(),
            path: path.to_string(),
        }),
    }
}

/// RBAC error types
#[derive(Debug)]
pub enum RbacError {
    /// No authenticated principal on the request
    NotAuthenticated,
    /// Principal's role is not in the route's allow-list
    PermissionDenied {
        role: Role,
        method: String,
        path: String,
    },
}

impl IntoResponse for RbacError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            RbacError::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Authentication required".to_string(),
            ),
            RbacError::PermissionDenied { role, method, path } => (
                StatusCode::FORBIDDEN,
                "forbidden",
                format!("Role {} may not {} {}", role, method, path),
            ),
        };

        let body = ErrorResponse::new(error_type, message);

        (status, Json(body)).into_response()
    }
}

/// Route guard middleware
///
/// Runs after `auth_middleware`; looks the request up in the permission
/// table and rejects callers whose role is not allowed.
pub async fn route_guard_middleware(request: Request, next: Next) -> Result<Response, RbacError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or(RbacError::NotAuthenticated)?;

    check_route(
        request.method().as_str(),
        request.uri().path(),
        auth_user.role,
    )?;

    Ok(next.run(request).await)
}
