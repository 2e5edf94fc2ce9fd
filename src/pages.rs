//! Page routes.
//!
//! Rendering is a bare placeholder; what matters here is which guard each
//! page group sits behind:
//! - marketing pages take [`MaybeSession`],
//! - login and sign-up take [`GuestOnly`],
//! - the profile takes [`RequireSession`].
//!
//! Forms carry a `data-endpoint` and are submitted as JSON by the client script.

use axum::{
    Router,
    extract::{Path, Query},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use crate::auth::{GuestOnly, MaybeSession, RequireSession, Session};
use crate::guard::{CALLBACK_PARAM, GuardState};
use crate::routes::paths;

pub fn router(state: GuardState) -> Router {
    Router::new()
        .route(paths::HOME, get(home))
        .route(paths::BLOGS, get(blog_list))
        .route("/blogs/{slug}", get(blog_detail))
        .route(paths::ABOUT, get(about))
        .route(paths::CONTACT, get(contact))
        .route(paths::SEARCH_RESULT, get(search_result))
        .route(paths::NOT_FOUND, get(not_found))
        .route(paths::LOGIN, get(login))
        .route(paths::SIGN_UP, get(sign_up))
        .route(paths::PROFILE, get(profile))
        .fallback(not_found)
        .with_state(state)
}

async fn home(MaybeSession(session): MaybeSession) -> Html<String> {
    render("Home", session.as_ref(), "<h1>Latest posts</h1>")
}

async fn blog_list(MaybeSession(session): MaybeSession) -> Html<String> {
    render("Blogs", session.as_ref(), "<h1>All posts</h1>")
}

async fn blog_detail(
    MaybeSession(session): MaybeSession,
    Path(slug): Path<String>,
) -> Html<String> {
    let body = format!(r#"<article data-slug="{0}"><h1>{0}</h1></article>"#, escape(&slug));
    render("Blog", session.as_ref(), &body)
}

async fn about(MaybeSession(session): MaybeSession) -> Html<String> {
    render("About", session.as_ref(), "<h1>About</h1>")
}

async fn contact(MaybeSession(session): MaybeSession) -> Html<String> {
    render("Contact", session.as_ref(), "<h1>Contact</h1>")
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

async fn search_result(
    MaybeSession(session): MaybeSession,
    Query(query): Query<SearchQuery>,
) -> Html<String> {
    let body = format!("<h1>Results for &quot;{}&quot;</h1>", escape(&query.q));
    render("Search", session.as_ref(), &body)
}

/// Also the fallback for unrouted paths, reached only when the edge guard allowed the request.
async fn not_found(MaybeSession(session): MaybeSession) -> Response {
    (
        StatusCode::NOT_FOUND,
        render("Not found", session.as_ref(), "<h1>Page not found</h1>"),
    )
        .into_response()
}

#[derive(Deserialize)]
struct LoginQuery {
    #[serde(rename = "callbackUrl", default)]
    callback_url: Option<String>,
}

async fn login(_: GuestOnly, Query(query): Query<LoginQuery>) -> Html<String> {
    let callback = query.callback_url.as_deref().unwrap_or(paths::HOME);
    let body = format!(
        r#"<h1>Sign in</h1>
<form data-endpoint="/api/auth/callback/credentials">
<input type="hidden" name="{}" value="{}">
<input name="email" type="email"><input name="password" type="password">
<button type="submit">Sign in</button>
</form>"#,
        CALLBACK_PARAM,
        escape(callback)
    );
    render("Sign in", None, &body)
}

async fn sign_up(_: GuestOnly) -> Html<String> {
    render(
        "Sign up",
        None,
        r#"<h1>Create an account</h1>
<form data-endpoint="/api/auth/sign-up">
<input name="email" type="email"><input name="fullname"><input name="password" type="password">
<button type="submit">Sign up</button>
</form>"#,
    )
}

async fn profile(RequireSession(session): RequireSession) -> Html<String> {
    let body = format!(
        r#"<h1>{}</h1><p class="email">{}</p>"#,
        escape(&session.name),
        escape(&session.email)
    );
    render("Profile", Some(&session), &body)
}

fn render(title: &str, session: Option<&Session>, body: &str) -> Html<String> {
    let nav = match session {
        Some(session) => format!(
            r#"<a href="{}">{}</a> <button data-endpoint="/api/auth/signout">Sign out</button>"#,
            paths::PROFILE,
            escape(&session.name)
        ),
        None => format!(r#"<a href="{}">Sign in</a>"#, paths::LOGIN),
    };
    Html(format!(
        concat!(
            "<!doctype html>\n",
            "<html><head><meta charset=\"utf-8\"><title>{} - Quillgate</title></head>\n",
            "<body><nav>{}</nav>\n<main>{}</main></body></html>"
        ),
        escape(title),
        nav,
        body
    ))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
