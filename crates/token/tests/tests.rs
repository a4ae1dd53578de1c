use playground_token::{Claims, TokenCodec};

const SECRET: &[u8] = b"0123456789012345678901234567890123456789";

fn codec() -> TokenCodec {
    TokenCodec::new(SECRET)
}

#[test]
fn round_trip() {
    let codec = codec();
    let claims = Claims::new("0a1b2c3d-0000-4000-8000-000000000001");
    let token = codec.encode("htmx-playground", &claims).unwrap();
    assert_eq!(codec.decode("htmx-playground", &token).unwrap(), claims);
}

#[test]
fn tokens_are_cookie_safe() {
    let token = codec()
        .encode("htmx-playground", &Claims::new("some session id with spaces"))
        .unwrap();
    assert!(token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
}

#[test]
fn flipping_any_byte_fails_verification() {
    let codec = codec();
    let token = codec
        .encode("htmx-playground", &Claims::new("tamper-target"))
        .unwrap();

    for index in 0..token.len() {
        let mut bytes = token.as_bytes().to_vec();
        bytes[index] ^= 0x01;
        let tampered = String::from_utf8(bytes).unwrap();
        assert!(
            codec.decode("htmx-playground", &tampered).is_err(),
            "token with byte {index} flipped should not verify"
        );
    }
}

#[test]
fn name_binding() {
    let codec = codec();
    let token = codec
        .encode("htmx-playground", &Claims::new("name-bound"))
        .unwrap();
    assert!(codec.decode("some-other-cookie", &token).is_err());
    assert!(codec.decode("", &token).is_err());
}

#[test]
fn different_secrets_do_not_verify() {
    let token = codec()
        .encode("htmx-playground", &Claims::new("key-bound"))
        .unwrap();
    let other = TokenCodec::new(b"another secret that is also 32+ bytes long");
    assert!(other.decode("htmx-playground", &token).is_err());
}

#[test]
fn truncated_and_garbage_tokens_fail() {
    let codec = codec();
    let token = codec
        .encode("htmx-playground", &Claims::new("truncated"))
        .unwrap();

    assert!(codec.decode("htmx-playground", "").is_err());
    assert!(codec.decode("htmx-playground", &token[..10]).is_err());
    assert!(codec.decode("htmx-playground", &token[..43]).is_err());
    assert!(codec.decode("htmx-playground", "!!!not base64 at all!!!").is_err());
    assert!(codec.decode("htmx-playground", "日本語のクッキーではない").is_err());
}

#[test]
#[should_panic(expected = "at least 32 bytes")]
fn short_secrets_are_rejected() {
    TokenCodec::new(b"too short");
}
