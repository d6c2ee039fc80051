// Rust guideline compliant 2026-08-19

//! End-to-end tests for the response builder.
//!
//! These tests drive full envelopes through the context, converter, and
//! message resolver.

use apikit_core::convert::{ClassMapping, Converter, FieldsHandler, Matcher, Payload, Source};
use apikit_core::{Builder, Config, Context, Error};
use http::StatusCode;
use serde_json::{json, Map, Value};

fn config() -> Config {
    Config {
        min_code: 100,
        max_code: 399,
        ..Config::default()
    }
}

fn context() -> Context {
    Context::new(config()).unwrap()
}

#[derive(Debug)]
struct Item {
    val: String,
}

impl Source for Item {
    fn type_tag(&self) -> &'static str {
        "Item"
    }

    fn as_fields(&self) -> Option<Map<String, Value>> {
        let mut map = Map::new();
        map.insert("val".to_string(), Value::String(self.val.clone()));
        Some(map)
    }
}

#[test]
fn test_success_with_no_arguments() {
    let ctx = context();
    let response = Builder::success(&ctx).build().unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({
            "success": true,
            "code": 0,
            "locale": "en",
            "message": "OK",
            "data": null,
        })
    );
}

#[test]
fn test_error_with_unmapped_code() {
    let ctx = context();
    let response = Builder::error(&ctx, 150).build().unwrap();

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], json!(false));
    assert_eq!(response.body["code"], json!(150));
    assert_eq!(
        response.body["message"],
        json!("Error #150"),
        "unmapped error code should resolve the no-error-message fallback"
    );
    assert_eq!(response.body["data"], Value::Null);
}

#[test]
fn test_success_with_converted_model() {
    let converter = Converter::builder()
        .class(ClassMapping {
            matcher: Matcher::Type("Item"),
            handler: Box::new(FieldsHandler),
            key: Some("item".to_string()),
            priority: 0,
        })
        .build()
        .unwrap();
    let ctx = Context::with_converter(config(), converter).unwrap();

    let response = Builder::success(&ctx)
        .data(Payload::object(Item {
            val: "x".to_string(),
        }))
        .build()
        .unwrap();

    assert_eq!(response.body["data"], json!({"item": {"val": "x"}}));
}

#[test]
fn test_success_with_primitive_data() {
    let ctx = context();
    let response = Builder::success(&ctx)
        .data(Payload::from("hello"))
        .build()
        .unwrap();

    assert_eq!(response.body["data"], json!({"value": "hello"}));
}

#[test]
fn test_error_rejects_ok_code() {
    let ctx = context();
    let result = Builder::error(&ctx, 0).build();
    assert!(
        matches!(result, Err(Error::Validation(_))),
        "error responses must not carry the OK code"
    );
}

#[test]
fn test_invalid_api_code_rejected() {
    let ctx = context();
    assert!(matches!(
        Builder::error(&ctx, 50).build(),
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        Builder::error(&ctx, 400).build(),
        Err(Error::Validation(_))
    ));
}

#[test]
fn test_success_rejects_error_status() {
    let ctx = context();
    let result = Builder::success(&ctx)
        .http_code(StatusCode::NOT_FOUND)
        .build();
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[test]
fn test_error_rejects_success_status() {
    let ctx = context();
    let result = Builder::error(&ctx, 150)
        .http_code(StatusCode::OK)
        .build();
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[test]
fn test_error_custom_status_kept() {
    let ctx = context();
    let response = Builder::error(&ctx, 150)
        .http_code(StatusCode::CONFLICT)
        .build()
        .unwrap();
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[test]
fn test_message_override() {
    let ctx = context();
    let response = Builder::error(&ctx, 150)
        .message("nope")
        .build()
        .unwrap();
    assert_eq!(response.body["message"], json!("nope"));
}

#[test]
fn test_placeholders_reach_custom_template() {
    let mut config = config();
    config
        .map
        .insert("150".to_string(), "api.limit".to_string());
    config.messages.insert(
        "api.limit".to_string(),
        "Limit of :limit exceeded".to_string(),
    );
    let ctx = Context::new(config).unwrap();

    let response = Builder::error(&ctx, 150)
        .placeholder("limit", "10")
        .build()
        .unwrap();
    assert_eq!(response.body["message"], json!("Limit of 10 exceeded"));
}

#[test]
fn test_debug_block_only_when_attached() {
    let ctx = context();
    let plain = Builder::success(&ctx).build().unwrap();
    assert!(plain.body.get("debug").is_none());

    let with_debug = Builder::success(&ctx)
        .debug(json!({"took_ms": 3}))
        .build()
        .unwrap();
    assert_eq!(with_debug.body["debug"], json!({"took_ms": 3}));
}

#[test]
fn test_renamed_envelope_labels() {
    let mut config = config();
    config.keys.success = "ok".to_string();
    config.keys.message = "msg".to_string();
    let ctx = Context::new(config).unwrap();

    let response = Builder::success(&ctx).build().unwrap();
    assert_eq!(response.body["ok"], json!(true));
    assert_eq!(response.body["msg"], json!("OK"));
    assert!(response.body.get("success").is_none());
}

#[test]
fn test_default_error_status_from_config() {
    let mut config = config();
    config.default_error_http_code = 422;
    let ctx = Context::new(config).unwrap();

    let response = Builder::error(&ctx, 150).build().unwrap();
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn test_data_object_bypasses_converter() {
    let ctx = context();
    let mut data = Map::new();
    data.insert("raw".to_string(), json!([1, 2, 3]));
    let response = Builder::success(&ctx).data_object(data).build().unwrap();
    assert_eq!(response.body["data"], json!({"raw": [1, 2, 3]}));
}
