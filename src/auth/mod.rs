//! Session cookies and layout-level guards.
//!
//! The session is a signed JWT stored in a single `HttpOnly` cookie. It is
//! read, never mutated, by every request; the extractors here re-check it
//! inside page groups using the same policy as the edge guard.

mod cookie;
mod errors;
mod extractors;
mod reader;
mod state;
mod types;

pub use cookie::{SameSite, SessionCookie, get_cookie};
pub use errors::GuardRedirect;
pub use extractors::{GuestOnly, MaybeSession, RequireSession};
pub use reader::SessionReader;
pub use state::HasGuardState;
pub use types::{Session, SessionUser, SessionView};
