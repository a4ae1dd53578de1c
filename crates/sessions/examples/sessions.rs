use playground_sessions::{SessionConnExt, SessionHandler};
use playground_store::FileStore;
use playground_token::TokenCodec;
use trillium::Conn;
use trillium_cookies::CookiesHandler;

pub fn main() {
    env_logger::init();

    trillium_smol::run((
        CookiesHandler::new(),
        SessionHandler::new(
            FileStore::new("./data/sessions"),
            TokenCodec::new(b"01234567890123456789012345678901123"),
        ),
        |conn: Conn| async move {
            let count: u64 = conn.session().get("count").unwrap_or_default();
            conn.with_session("count", count + 1)
                .ok(format!("count: {count}"))
        },
    ));
}
