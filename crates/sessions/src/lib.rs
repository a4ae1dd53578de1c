#![forbid(unsafe_code)]
#![warn(
    rustdoc::missing_crate_level_docs,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    unused_qualifications
)]

/*!
# session resolution for the htmx playground

[`SessionHandler`] resolves every inbound conn to a durable
[`SessionRecord`](playground_store::SessionRecord): it recovers the
session identifier from an authenticated cookie when one round-trips
through the [`TokenCodec`](playground_token::TokenCodec), mints a
fresh identifier (and cookie) when the cookie is absent or fails
verification, and lazily initializes the backing record on the first
miss. Downstream handlers read and mutate the record through
[`SessionConnExt`]; mutations are persisted after the handler chain
runs.

The handler must be sequenced after
[`CookiesHandler`](trillium_cookies::CookiesHandler).

```
use playground_sessions::{SessionConnExt, SessionHandler};
use playground_store::FileStore;
use playground_token::TokenCodec;
use trillium::Conn;
use trillium_cookies::CookiesHandler;

# let dir = tempfile::tempdir().unwrap();
# let root = dir.path();
let handler = (
    CookiesHandler::new(),
    SessionHandler::new(
        FileStore::new(root),
        TokenCodec::new(b"you should use an env var instead of a string literal"),
    ),
    |conn: Conn| async move {
        let count: u64 = conn.session().get("count").unwrap_or_default();
        conn.with_session("count", count + 1)
            .ok(format!("count: {count}"))
    },
);

use trillium_testing::prelude::*;
assert_ok!(get("/").on(&handler), "count: 0");
```
*/

mod session_conn_ext;
pub use session_conn_ext::SessionConnExt;

mod session_handler;
pub use session_handler::{sessions, SessionHandler};

pub use playground_store::{FileStore, Load, SessionRecord, SessionStore};
pub use playground_token::{Claims, TokenCodec};
