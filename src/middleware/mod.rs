/// Middleware module
///
/// The fileserver hit counter and the access-token request guard.

mod access;
mod hits;

pub use access::{api_key, bearer_token, AccessToken};
pub use hits::{FileserverHits, HitCounter};
