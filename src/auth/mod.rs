pub mod context;
pub mod csrf;
pub mod middleware;
pub mod privilege;
pub mod profile_cache;
pub mod rate_limit;
pub mod session;
pub mod validate;
