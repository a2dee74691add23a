/// Router Module Index
///
/// Organizes the application's routing into security-segregated modules so
/// access control is applied explicitly at the module level (via Axum
/// layers), preventing accidental exposure of protected endpoints.
///
/// There is no separate administrator router: administrators use the same
/// mutation endpoints as everyone else and are granted by the ownership
/// policy, not by a distinct route surface.

/// Routes accessible to all clients (anonymous, read-only, plus the
/// registration and login gateway).
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware.
/// Requires a verified bearer token.
pub mod authenticated;
