//! Route classification table.
//!
//! Every request path resolves to exactly one [`Category`]. Rules are kept
//! in category priority order and the first matching rule wins; paths no
//! rule matches are [`Category::Protected`].

use crate::auth::Session;
use crate::guard::Decision;

/// Canonical page paths.
pub mod paths {
    pub const HOME: &str = "/";
    pub const LOGIN: &str = "/login";
    pub const SIGN_UP: &str = "/sign-up";
    pub const NOT_FOUND: &str = "/404";
    pub const PROFILE: &str = "/profile";
    pub const ABOUT: &str = "/about";
    pub const CONTACT: &str = "/contact";
    pub const SEARCH_RESULT: &str = "/search-result";
    pub const BLOGS: &str = "/blogs";
    pub const API: &str = "/api";
    pub const PUBLIC_ASSETS: &str = "/public";
}

/// Access policy bucket of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Framework and static internals, never guarded
    Excluded,
    /// Backend proxy routes, never guarded
    Api,
    /// Only reachable without a session (login, sign-up)
    AuthOnly,
    /// Reachable with or without a session
    Public,
    /// Requires a session
    Protected,
}

impl Category {
    /// Categories the edge guard lets through without reading the session.
    pub fn bypasses_guard(self) -> bool {
        matches!(self, Category::Excluded | Category::Api)
    }
}

/// Path matcher of a single rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches only this exact path
    Exact(String),
    /// Matches the path itself and anything below it (`/blogs`, `/blogs/x`)
    Prefix(String),
}

impl PathPattern {
    pub fn exact(path: impl Into<String>) -> Self {
        Self::Exact(path.into())
    }

    pub fn prefix(path: impl Into<String>) -> Self {
        Self::Prefix(path.into())
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(p) => path == p,
            PathPattern::Prefix(p) => match path.strip_prefix(p.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/') || p.ends_with('/'),
                None => false,
            },
        }
    }
}

/// A single classification rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub pattern: PathPattern,
    pub category: Category,
}

impl RouteRule {
    pub fn new(pattern: PathPattern, category: Category) -> Self {
        Self { pattern, category }
    }
}

/// Immutable, ordered classification table shared by all requests.
#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    /// Build a table from arbitrary rules. Rules are stably sorted by
    /// category priority, so declaration order only matters within a category.
    pub fn new(mut rules: Vec<RouteRule>) -> Self {
        rules.sort_by_key(|rule| rule.category);
        Self { rules }
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    pub fn classify(&self, path: &str) -> Category {
        self.rules
            .iter()
            .find(|rule| rule.pattern.matches(path))
            .map(|rule| rule.category)
            .unwrap_or(Category::Protected)
    }

    /// Access decision for a request path and its (optional) session.
    pub fn decide(&self, path: &str, session: Option<&Session>) -> Decision {
        Decision::for_category(self.classify(path), session.is_some(), path)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        use Category::*;
        use PathPattern as P;

        Self::new(vec![
            RouteRule::new(P::prefix("/_next"), Excluded),
            RouteRule::new(P::exact("/favicon.ico"), Excluded),
            RouteRule::new(P::prefix(paths::PUBLIC_ASSETS), Excluded),
            RouteRule::new(P::prefix(paths::API), Api),
            RouteRule::new(P::prefix(paths::LOGIN), AuthOnly),
            RouteRule::new(P::prefix(paths::SIGN_UP), AuthOnly),
            RouteRule::new(P::exact(paths::HOME), Public),
            RouteRule::new(P::prefix(paths::BLOGS), Public),
            RouteRule::new(P::prefix(paths::NOT_FOUND), Public),
            RouteRule::new(P::prefix(paths::ABOUT), Public),
            RouteRule::new(P::prefix(paths::CONTACT), Public),
            RouteRule::new(P::prefix(paths::SEARCH_RESULT), Public),
            RouteRule::new(P::prefix(paths::PROFILE), Protected),
        ])
    }
}
