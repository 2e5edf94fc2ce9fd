//! Session cookie policy and parsing.

use axum::http::header;

use crate::jwt::SESSION_DURATION_SECS;

/// Cookie name base, prefixed according to the security posture.
const COOKIE_BASE_NAME: &str = "quillgate.session-token";

/// `SameSite` attribute of the session cookie.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SameSite {
    #[default]
    Lax,
    Strict,
    None,
}

impl SameSite {
    fn as_str(self) -> &'static str {
        match self {
            SameSite::Lax => "Lax",
            SameSite::Strict => "Strict",
            SameSite::None => "None",
        }
    }
}

/// Attributes of the single session cookie.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    pub secure: bool,
    /// Explicit `Domain` attribute for sharing the cookie across subdomains
    pub domain: Option<String>,
    pub same_site: SameSite,
    pub max_age: u64,
}

impl Default for SessionCookie {
    fn default() -> Self {
        Self {
            secure: false,
            domain: None,
            same_site: SameSite::Lax,
            max_age: SESSION_DURATION_SECS,
        }
    }
}

impl SessionCookie {
    pub fn new(secure: bool, domain: Option<String>, same_site: SameSite) -> Self {
        Self {
            secure,
            domain,
            same_site,
            max_age: SESSION_DURATION_SECS,
        }
    }

    /// Cookie name. `__Host-` requires Secure, `Path=/` and no Domain;
    /// `__Secure-` only requires Secure.
    pub fn name(&self) -> &'static str {
        match (self.secure, self.domain.is_some()) {
            (true, false) => "__Host-quillgate.session-token",
            (true, true) => "__Secure-quillgate.session-token",
            (false, _) => COOKIE_BASE_NAME,
        }
    }

    /// `Set-Cookie` value storing a session token.
    pub fn set_header(&self, token: &str) -> String {
        self.build(token, self.max_age)
    }

    /// `Set-Cookie` value removing the session cookie.
    pub fn clear_header(&self) -> String {
        self.build("", 0)
    }

    fn build(&self, value: &str, max_age: u64) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite={}; Path=/; Max-Age={}",
            self.name(),
            value,
            self.same_site.as_str(),
            max_age
        );
        if let Some(domain) = &self.domain {
            cookie.push_str("; Domain=");
            cookie.push_str(domain);
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Extract a cookie value from the Cookie header.
pub fn get_cookie<'a>(headers: &'a axum::http::HeaderMap, name: &str) -> Option<&'a str> {
    for cookie_header in headers.get_all(header::COOKIE) {
        let Ok(cookie_header) = cookie_header.to_str() else {
            continue;
        };
        for part in cookie_header.split(';') {
            if let Some((key, value)) = part.trim().split_once('=') {
                if key.trim() == name {
                    return Some(value.trim());
                }
            }
        }
    }
    None
}
