#![forbid(unsafe_code)]
#![warn(
    rustdoc::missing_crate_level_docs,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    unused_qualifications
)]

/*!
# durable session records for the htmx playground

A [`SessionRecord`] is a small versioned bag of json-typed application
state named by an opaque session identifier. A [`SessionStore`] maps
identifiers to records; the only provided implementation is
[`FileStore`], which keeps one json file per session under a
configured root directory.

Saves are upserts guarded by a compare-and-swap on the record's
version counter, so two writers racing on the same identifier produce
a [`StoreError::Conflict`] for the loser instead of a silent lost
update. Loads are infallible and return a tagged [`Load`] so callers
can distinguish a brand-new session from data loss while handling both
the same way.

```
use playground_store::{FileStore, Load, SessionRecord, SessionStore};

# futures_lite::future::block_on(async {
let dir = tempfile::tempdir().unwrap();
let store = FileStore::new(dir.path());

let mut record = SessionRecord::new("some-session-id");
record.insert("count", 1).unwrap();
store.save(&mut record).await.unwrap();

match store.load("some-session-id").await {
    Load::Found(record) => assert_eq!(record.get::<u64>("count"), Some(1)),
    _ => panic!("record should exist"),
}
# });
```
*/

mod file_store;
pub use file_store::FileStore;

mod session_record;
pub use session_record::SessionRecord;

mod session_store;
pub use session_store::{Load, SessionStore, StoreError};
