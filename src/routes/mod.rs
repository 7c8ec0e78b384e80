//! Routers split by access level. The token gate is attached to `protected` as a
//! route layer in `create_router`, so it never runs for public routes even where both
//! share a path.

/// Read-only routes, open to any caller.
pub mod public;

/// Mutating routes. Every handler here sits behind the `ApiToken` check.
pub mod protected;
