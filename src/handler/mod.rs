//! Request handler module
//!
//! Exact-path dispatch for the two form endpoints. Both accept only POST;
//! OPTIONS is answered for preflight, anything else gets a 405 in the
//! endpoint's own JSON shape. Unknown paths get a 404.

pub mod contact;
pub mod quote;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::AppState;
use crate::http;
use crate::logger;

pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: hyper::body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + Send + 'static,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let access_log = state.config.logging.access_log;
    if access_log {
        logger::log_request(&method, req.uri(), req.version());
    }
    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    let response = match path.as_str() {
        contact::PATH => match method {
            Method::POST => contact::handle(req, &state).await,
            Method::OPTIONS => http::options_response(state.config.http.enable_cors),
            _ => method_not_allowed(&method, "message"),
        },
        quote::PATH => match method {
            Method::POST => quote::handle(req, &state).await,
            Method::OPTIONS => http::options_response(state.config.http.enable_cors),
            _ => method_not_allowed(&method, "error"),
        },
        _ => http::not_found(),
    };

    if access_log {
        logger::log_handled(&path, response.status().as_u16());
    }
    Ok(response)
}

/// 405 in the shape the endpoint speaks (`message` for contact, `error`
/// for quote).
fn method_not_allowed(method: &Method, key: &str) -> Response<Full<Bytes>> {
    logger::log_warning(&format!("Method not allowed: {method}"));
    let mut body = serde_json::Map::new();
    body.insert(
        key.to_string(),
        serde_json::Value::from("Method not allowed"),
    );
    http::json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &serde_json::Value::Object(body),
    )
}
