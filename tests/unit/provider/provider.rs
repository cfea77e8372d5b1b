use super::*;

fn failure_message(r: IconStackResult<Vec<u8>>) -> String {
    match r {
        Err(IconStackError::ProviderFailure(msg)) => msg,
        other => panic!("expected provider failure, got {other:?}"),
    }
}

#[test]
fn non_200_is_a_status_failure() {
    let msg = failure_message(classify_generate_response(429, "quota exceeded"));
    assert!(msg.starts_with("status 429"), "{msg}");
    assert!(msg.contains("quota exceeded"));
}

#[test]
fn unparsable_or_incomplete_body_is_malformed() {
    let msg = failure_message(classify_generate_response(200, "<html>"));
    assert!(msg.starts_with("malformed"), "{msg}");
    let msg = failure_message(classify_generate_response(200, r#"{"candidates":[]}"#));
    assert!(msg.starts_with("malformed"), "{msg}");
    let msg = failure_message(classify_generate_response(
        200,
        r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"image/png"}}]}}]}"#,
    ));
    assert!(msg.starts_with("malformed"), "{msg}");
}

#[test]
fn text_part_is_text_only() {
    let body = r#"{"candidates":[{"content":{"parts":[{"text":"I cannot draw that"}]}}]}"#;
    let msg = failure_message(classify_generate_response(200, body));
    assert!(msg.starts_with("text-only"), "{msg}");
    assert!(msg.contains("I cannot draw that"));
}

#[test]
fn inline_data_is_decoded() {
    let body = r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"image/png","data":"iVBORw0K"}}]}}]}"#;
    let bytes = classify_generate_response(200, body).unwrap();
    assert_eq!(bytes, vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A]);
}

#[test]
fn bad_base64_is_a_provider_failure() {
    let body = r#"{"candidates":[{"content":{"parts":[{"inlineData":{"data":"***"}}]}}]}"#;
    assert!(matches!(
        classify_generate_response(200, body),
        Err(IconStackError::ProviderFailure(_))
    ));
}

#[test]
fn long_bodies_are_truncated() {
    let body = "x".repeat(1000);
    let msg = failure_message(classify_generate_response(500, &body));
    assert!(msg.len() < 300);
}
