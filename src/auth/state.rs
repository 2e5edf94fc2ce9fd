//! Guard state trait and macro.

use super::reader::SessionReader;
use crate::routes::RouteTable;

/// Trait for state types that can evaluate access decisions.
pub trait HasGuardState {
    fn sessions(&self) -> &SessionReader;
    fn routes(&self) -> &RouteTable;
}

/// Macro to implement `HasGuardState` for state structs with the standard fields.
///
/// The struct must have these fields:
/// - `sessions: SessionReader`
/// - `routes: Arc<RouteTable>`
///
/// # Example
/// ```ignore
/// use crate::impl_has_guard_state;
///
/// #[derive(Clone)]
/// pub struct MyState {
///     pub sessions: SessionReader,
///     pub routes: Arc<RouteTable>,
///     // ... other fields
/// }
///
/// impl_has_guard_state!(MyState);
/// ```
#[macro_export]
macro_rules! impl_has_guard_state {
    ($state_type:ty) => {
        impl $crate::auth::HasGuardState for $state_type {
            fn sessions(&self) -> &$crate::auth::SessionReader {
                &self.sessions
            }
            fn routes(&self) -> &$crate::routes::RouteTable {
                &self.routes
            }
        }
    };
}
