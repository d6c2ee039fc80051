// Rust guideline compliant 2026-08-21

//! End-to-end tests for the error rendering pipeline.
//!
//! These tests validate handler dispatch, fallback to the default entry,
//! message fallback rules, and the special unauthenticated path.

use apikit_core::{Config, Context, Error};
use apikit_render::{
    DefaultHandler, EntryConfig, ErrorMatcher, HandlerConfig, HandlerEntry, HttpError,
    HttpErrorHandler, HttpHandlerConfig, Renderer, Unauthenticated, ValidationFailure,
};
use http::StatusCode;
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

fn context() -> Context {
    Context::new(Config {
        min_code: 100,
        max_code: 399,
        ..Config::default()
    })
    .unwrap()
}

#[derive(Debug, Error)]
#[error("boom")]
struct BoomError;

#[derive(Debug, Error)]
#[error("")]
struct SilentError;

#[test]
fn test_http_error_with_per_status_entry() {
    let ctx = context();
    let renderer = Renderer::new(&ctx).unwrap();

    let response = renderer.render(&HttpError::not_found()).unwrap();
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["success"], json!(false));
    assert_eq!(response.body["code"], json!(10));
    assert_eq!(
        response.body["message"],
        json!("Not Found"),
        "empty error message should resolve the per-status template"
    );
}

#[test]
fn test_http_error_falls_back_to_sub_default() {
    let ctx = context();
    let renderer = Renderer::new(&ctx).unwrap();

    // 410 has no per-status entry, so the HTTP handler's own default
    // sub-entry applies; the status still comes from the error itself.
    let error = HttpError::new(StatusCode::GONE, "");
    let response = renderer.render(&error).unwrap();
    assert_eq!(response.status, StatusCode::GONE);
    assert_eq!(
        response.body["code"],
        json!(12),
        "generic HTTP api code should come from the default sub-entry"
    );
}

#[test]
fn test_http_error_own_message_wins() {
    let ctx = context();
    let renderer = Renderer::new(&ctx).unwrap();

    let error = HttpError::new(StatusCode::NOT_FOUND, "missing widget");
    let response = renderer.render(&error).unwrap();
    assert_eq!(response.body["message"], json!("missing widget"));
}

#[test]
fn test_uncaught_error_uses_default_entry() {
    let ctx = context();
    let renderer = Renderer::new(&ctx).unwrap();

    let response = renderer.render(&BoomError).unwrap();
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["code"], json!(13));
    assert_eq!(response.body["message"], json!("boom"));
}

#[test]
fn test_uncaught_error_with_empty_message() {
    let ctx = context();
    let renderer = Renderer::new(&ctx).unwrap();

    let response = renderer.render(&SilentError).unwrap();
    assert_eq!(
        response.body["message"],
        json!("Uncaught error: "),
        "empty message should resolve the uncaught-error template"
    );
}

#[test]
fn test_anyhow_chain_renders_as_uncaught() {
    let ctx = context();
    let renderer = Renderer::new(&ctx).unwrap();

    let error = anyhow::anyhow!("db connection refused");
    let response = renderer.render(error.as_ref()).unwrap();
    assert_eq!(response.body["code"], json!(13));
    assert_eq!(response.body["message"], json!("db connection refused"));
}

#[test]
fn test_validation_failure_attaches_messages() {
    let ctx = context();
    let renderer = Renderer::new(&ctx).unwrap();

    let mut errors = BTreeMap::new();
    errors.insert(
        "name".to_string(),
        vec!["must not be empty".to_string()],
    );
    let response = renderer.render(&ValidationFailure::new(errors)).unwrap();

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["code"], json!(15));
    assert_eq!(response.body["message"], json!("Validation failed"));
    assert_eq!(
        response.body["data"],
        json!({"messages": {"name": ["must not be empty"]}})
    );
}

#[test]
fn test_unauthenticated_entry_point() {
    let ctx = context();
    let renderer = Renderer::new(&ctx).unwrap();

    let response = renderer
        .unauthenticated(&Unauthenticated::new(""))
        .unwrap();
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["code"], json!(14));
    assert_eq!(response.body["message"], json!("Unauthenticated"));
}

#[test]
fn test_msg_force_overrides_error_message() {
    let ctx = context();
    let renderer = Renderer::builder(&ctx)
        .entry(HandlerEntry {
            matcher: ErrorMatcher::exact::<BoomError>(),
            handler: Box::new(DefaultHandler),
            config: EntryConfig::Simple(
                HandlerConfig::new(150)
                    .http_code(StatusCode::BAD_REQUEST)
                    .msg_key("apikit.http_400")
                    .msg_force(),
            ),
            priority: 0,
        })
        .build()
        .unwrap();

    let response = renderer.render(&BoomError).unwrap();
    assert_eq!(response.body["code"], json!(150));
    assert_eq!(
        response.body["message"],
        json!("Bad Request"),
        "msg_force should suppress the error's own message"
    );
}

#[test]
fn test_custom_entry_outranks_builtin() {
    let ctx = context();
    let renderer = Renderer::builder(&ctx)
        .entry(HandlerEntry {
            matcher: ErrorMatcher::exact::<HttpError>(),
            handler: Box::new(DefaultHandler),
            config: EntryConfig::Simple(
                HandlerConfig::new(199).http_code(StatusCode::BAD_GATEWAY),
            ),
            priority: 0,
        })
        .build()
        .unwrap();

    let response = renderer.render(&HttpError::not_found()).unwrap();
    assert_eq!(
        response.body["code"],
        json!(199),
        "priority 0 entry should win over the built-in at -100"
    );
}

#[test]
fn test_declining_handler_falls_back_to_default() {
    let ctx = context();
    // Route a plain error through the HTTP handler, which declines anything
    // that is not an HttpError.
    let renderer = Renderer::builder(&ctx)
        .entry(HandlerEntry {
            matcher: ErrorMatcher::exact::<BoomError>(),
            handler: Box::new(HttpErrorHandler),
            config: EntryConfig::Http(HttpHandlerConfig {
                per_status: BTreeMap::new(),
                default: HandlerConfig::new(12).http_code(StatusCode::BAD_REQUEST),
            }),
            priority: 0,
        })
        .build()
        .unwrap();

    let response = renderer.render(&BoomError).unwrap();
    assert_eq!(
        response.body["code"],
        json!(13),
        "declined error should be handled by the default entry"
    );
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_category_matcher_applies_to_family() {
    let ctx = context();
    let renderer = Renderer::builder(&ctx)
        .entry(HandlerEntry {
            matcher: ErrorMatcher::category(|error| error.to_string().starts_with("db:")),
            handler: Box::new(DefaultHandler),
            config: EntryConfig::Simple(
                HandlerConfig::new(180).http_code(StatusCode::SERVICE_UNAVAILABLE),
            ),
            priority: 0,
        })
        .build()
        .unwrap();

    #[derive(Debug, Error)]
    #[error("db: replica lag")]
    struct DbError;

    let response = renderer.render(&DbError).unwrap();
    assert_eq!(response.body["code"], json!(180));
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[test]
fn test_low_status_floored_to_default_error_code() {
    let ctx = context();
    let renderer = Renderer::builder(&ctx)
        .entry(HandlerEntry {
            matcher: ErrorMatcher::exact::<BoomError>(),
            handler: Box::new(DefaultHandler),
            config: EntryConfig::Simple(
                HandlerConfig::new(150).http_code(StatusCode::FOUND),
            ),
            priority: 0,
        })
        .build()
        .unwrap();

    let response = renderer.render(&BoomError).unwrap();
    assert_eq!(
        response.status,
        StatusCode::BAD_REQUEST,
        "non-error statuses should be floored to the configured default"
    );
}

#[test]
fn test_debug_block_carries_location() {
    let ctx = Context::new(Config {
        min_code: 100,
        max_code: 399,
        debug: apikit_core::DebugConfig { enabled: true },
        ..Config::default()
    })
    .unwrap();
    let renderer = Renderer::new(&ctx).unwrap();

    let response = renderer.render(&HttpError::not_found()).unwrap();
    let debug = &response.body["debug"];
    assert_eq!(debug["type"], json!("http_error"));
    assert!(
        debug["file"].as_str().unwrap().ends_with("render_tests.rs"),
        "debug block should point at the raise site"
    );
    assert!(debug["line"].as_u64().unwrap() > 0);
}

#[test]
fn test_debug_block_absent_by_default() {
    let ctx = context();
    let renderer = Renderer::new(&ctx).unwrap();

    let response = renderer.render(&HttpError::not_found()).unwrap();
    assert!(response.body.get("debug").is_none());
}

#[test]
fn test_default_entry_requires_http_code() {
    let ctx = context();
    let result = Renderer::builder(&ctx)
        .default_entry(
            Box::new(DefaultHandler),
            EntryConfig::Simple(HandlerConfig::new(13)),
        )
        .build();
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_http_sub_default_requires_http_code() {
    let ctx = context();
    let result = Renderer::builder(&ctx)
        .entry(HandlerEntry {
            matcher: ErrorMatcher::exact::<HttpError>(),
            handler: Box::new(HttpErrorHandler),
            config: EntryConfig::Http(HttpHandlerConfig {
                per_status: BTreeMap::new(),
                default: HandlerConfig::new(12),
            }),
            priority: 0,
        })
        .build();
    assert!(matches!(result, Err(Error::Config(_))));
}
