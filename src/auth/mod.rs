/// Authentication module
///
/// Password hashing, token issuance/authorization and the session
/// lifecycle (login, refresh, revoke) built on top of them.

mod claims;
mod jwt;
mod password;
mod session;

pub use claims::{Claims, TokenKind, ACCESS_ISSUER, REFRESH_ISSUER};
pub use jwt::{
    authorize, issue_token, token_lifetime, AuthorizedToken, ACCESS_TOKEN_TTL_SECONDS,
    REFRESH_TOKEN_TTL_DAYS,
};
pub use password::{hash_password, verify_password, HASH_COST};
pub use session::{LoginOutcome, SessionController};
