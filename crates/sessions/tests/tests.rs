use futures_lite::future::block_on;
use playground_sessions::{
    FileStore, Load, SessionConnExt, SessionHandler, SessionStore, TokenCodec,
};
use std::path::Path;
use trillium::{Conn, Handler};
use trillium_cookies::{cookie::Cookie, CookiesHandler};
use trillium_testing::{prelude::*, TestConn};

const SECRET: &[u8] = b"0123456789012345678901234567890123456789";
const COOKIE_NAME: &str = "htmx-playground";

fn codec() -> TokenCodec {
    TokenCodec::new(SECRET)
}

// a handler that reports the counter without touching it
fn observer(root: &Path) -> impl Handler {
    (
        CookiesHandler::new(),
        SessionHandler::new(FileStore::new(root), codec()),
        |conn: Conn| async move {
            let count: u64 = conn.session().get("count").unwrap_or_default();
            conn.ok(format!("count: {count}"))
        },
    )
}

// a handler that increments the counter on every request
fn counter(root: &Path) -> impl Handler {
    (
        CookiesHandler::new(),
        SessionHandler::new(FileStore::new(root), codec()),
        |conn: Conn| async move {
            let count: u64 = conn.session().get("count").unwrap_or_default();
            let count = count + 1;
            conn.with_session("count", count)
                .ok(format!("count: {count}"))
        },
    )
}

fn session_cookie(conn: &TestConn) -> Cookie<'static> {
    let header = conn
        .response_headers()
        .get_str("set-cookie")
        .expect("response should set a session cookie")
        .to_owned();
    Cookie::parse_encoded(header).unwrap().into_owned()
}

fn cookie_header(cookie: &Cookie<'_>) -> String {
    format!("{}={}", cookie.name(), cookie.value())
}

#[test]
fn fresh_request_mints_an_identifier_and_persists_a_zero_record() {
    let dir = tempfile::tempdir().unwrap();
    let handler = observer(dir.path());

    let mut conn = get("/").on(&handler);
    assert_ok!(&mut conn, "count: 0");

    let cookie = session_cookie(&conn);
    assert_eq!(cookie.name(), COOKIE_NAME);

    let uuid = codec().decode(COOKIE_NAME, cookie.value()).unwrap().uuid;
    let store = FileStore::new(dir.path());
    match block_on(store.load(&uuid)) {
        Load::Found(record) => {
            assert_eq!(record.id(), uuid);
            assert_eq!(record.version(), 1);
            assert_eq!(record.get::<u64>("count"), None);
        }
        other => panic!("expected a persisted record, got {other:?}"),
    }
}

#[test]
fn sequential_requests_with_the_same_cookie_share_a_session() {
    let dir = tempfile::tempdir().unwrap();
    let handler = counter(dir.path());

    let mut conn = get("/").on(&handler);
    assert_ok!(&mut conn, "count: 1");
    let cookie = session_cookie(&conn);

    let mut conn = get("/")
        .with_request_header("cookie", cookie_header(&cookie))
        .on(&handler);
    assert_ok!(&mut conn, "count: 2");
    assert!(
        conn.response_headers().get_str("set-cookie").is_none(),
        "a returning session should not be re-issued a cookie"
    );

    assert_ok!(
        get("/")
            .with_request_header("cookie", cookie_header(&cookie))
            .on(&handler),
        "count: 3"
    );
}

#[test]
fn a_tampered_cookie_is_treated_as_no_cookie() {
    let dir = tempfile::tempdir().unwrap();
    let handler = counter(dir.path());

    let mut conn = get("/").on(&handler);
    assert_ok!(&mut conn, "count: 1");
    let cookie = session_cookie(&conn);
    let original_uuid = codec().decode(COOKIE_NAME, cookie.value()).unwrap().uuid;

    let mut tampered = cookie.value().as_bytes().to_vec();
    let middle = tampered.len() / 2;
    tampered[middle] ^= 0x01;
    let tampered = String::from_utf8(tampered).unwrap();

    let mut conn = get("/")
        .with_request_header("cookie", format!("{COOKIE_NAME}={tampered}"))
        .on(&handler);
    assert_ok!(&mut conn, "count: 1");

    let reissued = session_cookie(&conn);
    let new_uuid = codec().decode(COOKIE_NAME, reissued.value()).unwrap().uuid;
    assert_ne!(new_uuid, original_uuid);
}

#[test]
fn a_valid_cookie_with_a_missing_record_keeps_its_identifier() {
    let dir = tempfile::tempdir().unwrap();
    let handler = counter(dir.path());

    let mut conn = get("/").on(&handler);
    assert_ok!(&mut conn, "count: 1");
    let cookie = session_cookie(&conn);
    let uuid = codec().decode(COOKIE_NAME, cookie.value()).unwrap().uuid;

    // the store was reset out-of-band
    std::fs::remove_file(dir.path().join(&uuid)).unwrap();

    let mut conn = get("/")
        .with_request_header("cookie", cookie_header(&cookie))
        .on(&handler);
    assert_ok!(&mut conn, "count: 1");
    assert!(
        conn.response_headers().get_str("set-cookie").is_none(),
        "no new identifier should be minted for a verified cookie"
    );

    let store = FileStore::new(dir.path());
    assert!(matches!(block_on(store.load(&uuid)), Load::Found(_)));
}

#[test]
fn a_corrupt_record_is_reinitialized_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let handler = counter(dir.path());

    let mut conn = get("/").on(&handler);
    assert_ok!(&mut conn, "count: 1");
    let cookie = session_cookie(&conn);
    let uuid = codec().decode(COOKIE_NAME, cookie.value()).unwrap().uuid;

    std::fs::write(dir.path().join(&uuid), b"{ definitely not a record").unwrap();

    let mut conn = get("/")
        .with_request_header("cookie", cookie_header(&cookie))
        .on(&handler);
    assert_ok!(&mut conn, "count: 1");
}

#[test]
fn an_unwritable_store_fails_the_request() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("not-a-directory");
    std::fs::write(&file, b"").unwrap();

    let handler = counter(&file);
    let conn = get("/").on(&handler);
    assert_status!(conn, 500);
}
