use super::*;

fn test_client(base_url: &str) -> HubspotClient {
    HubspotClient::with_base_url(Some("test-token"), 30, base_url)
        .expect("client construction should not fail")
}

#[test]
fn endpoint_joins_object_path() {
    let client = test_client("https://api.hubspot.com");
    assert_eq!(
        client.endpoint(&CONTACTS).as_str(),
        "https://api.hubspot.com/crm/v3/objects/contacts"
    );
}

#[test]
fn endpoint_strips_trailing_slash_and_keeps_prefix() {
    let client = test_client("http://localhost:9000/proxy/");
    assert_eq!(
        client.endpoint(&MEETINGS).as_str(),
        "http://localhost:9000/proxy/crm/v3/objects/meetings"
    );
}

#[test]
fn contact_endpoint_encodes_id() {
    let client = test_client("https://api.hubspot.com");
    assert_eq!(
        client.contact_endpoint("a/b c").as_str(),
        "https://api.hubspot.com/crm/v3/objects/contacts/a%2Fb%20c"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = HubspotClient::with_base_url(Some("t"), 30, "not a url");
    assert!(matches!(result, Err(GatewayError::InvalidBaseUrl { .. })));
}

#[test]
fn blank_token_counts_as_missing() {
    let client = HubspotClient::with_base_url(Some("  "), 30, "https://api.hubspot.com")
        .expect("client");
    assert!(!client.has_credential());
}

#[test]
fn parse_created_reads_string_and_numeric_ids() {
    let (id, props) =
        parse_created(201, r#"{"id":"42","properties":{"email":"a@b.c"}}"#.to_owned()).unwrap();
    assert_eq!(id, "42");
    assert_eq!(
        props.and_then(|p| p.get("email").cloned()).as_deref(),
        Some("a@b.c")
    );

    let (id, props) = parse_created(201, r#"{"id":7}"#.to_owned()).unwrap();
    assert_eq!(id, "7");
    assert!(props.is_none());
}

#[test]
fn parse_created_flags_ambiguous_bodies() {
    for body in ["", "   ", "<html>ok</html>", r#"{"status":"ok"}"#, r#"{"id":""}"#] {
        let err = parse_created(200, body.to_owned()).unwrap_err();
        assert!(
            matches!(err, GatewayError::AmbiguousSuccess { status: 200, .. }),
            "body {body:?} should be ambiguous, got {err:?}"
        );
    }
}
