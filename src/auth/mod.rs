mod helpers;
mod middleware;
mod token;

pub use helpers::issue_token;
pub use middleware::{AuthError, RequireAdmin, RequireAuth, RequireUser};
pub use token::{GeneratedToken, TokenGenerator, parse_token};
