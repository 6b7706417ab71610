//! Logger module
//!
//! Plain stdout/stderr logging helpers for the HTTP server and the form
//! handlers. Access lines are gated by `logging.access_log`; errors always
//! go to stderr.

use hyper::{Method, Uri, Version};
use std::net::SocketAddr;

use crate::config::Config;
use crate::email::OutboundEmail;

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    println!("======================================");
    println!("Lead intake server started successfully");
    println!("Listening on: http://{addr}");
    println!("Log level: {}", config.logging.level);
    if let Some(workers) = config.server.workers {
        println!("Worker threads: {workers}");
    }
    println!("Endpoints:");
    println!("  - POST http://{addr}/api/contact");
    println!("  - POST http://{addr}/api/quote-upload");
    if config.email.sendgrid_api_key.is_some() {
        println!("Email delivery: SendGrid");
    } else {
        println!("Email delivery: disabled (SENDGRID_API_KEY not set, logging bodies instead)");
    }
    println!("Upload spool directory: {}", config.upload.dir);
    println!("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    println!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}

pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    println!("[Request] {method} {uri} {version:?}");
}

pub fn log_headers_count(count: usize, show: bool) {
    if show {
        println!("[Headers] Count: {count}");
    }
}

pub fn log_handled(path: &str, status: u16) {
    println!("[Response] {path} - {status}\n");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

// ============== Handler events ==============

pub fn log_bot_detected() {
    println!("[Spam] Bot detected via honeypot");
}

pub fn log_fast_submission() {
    println!("[Spam] Suspicious fast submission");
}

pub fn log_email_sent(to: &str, subject: &str) {
    println!("[Email] Sent to {to}: {subject}");
}

/// Used by the fallback mailer when no API key is configured: the composed
/// body takes the place of a real send.
pub fn log_email_fallback(message: &OutboundEmail) {
    println!("[Email] SendGrid not configured; message to {} logged instead:", message.to);
    println!("Subject: {}", message.subject);
    if let Some(text) = &message.text {
        println!("{text}");
    } else if let Some(html) = &message.html {
        println!("{html}");
    }
}

pub fn log_confirmation_failure(err: &impl std::fmt::Display) {
    eprintln!("[ERROR] Failed to send confirmation email: {err}");
}
