#![forbid(unsafe_code)]
#![warn(
    missing_copy_implementations,
    rustdoc::missing_crate_level_docs,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    unused_qualifications
)]

/*!
# authenticated cookie tokens for the htmx playground

This crate turns a small fixed-shape claims record into an opaque,
tamper-evident, url-safe string suitable for use as a cookie value, and
reverses that transform while rejecting anything not minted under the
same secret and purpose name.

```
use playground_token::{Claims, TokenCodec};

let codec = TokenCodec::new(b"01234567890123456789012345678901");
let token = codec.encode("htmx-playground", &Claims::new("some-session-id")).unwrap();
let claims = codec.decode("htmx-playground", &token).unwrap();
assert_eq!(claims.uuid, "some-session-id");

// a token minted for one purpose never verifies under another
assert!(codec.decode("other-cookie", &token).is_err());
```
*/

mod claims;
pub use claims::Claims;

mod codec;
pub use codec::{TokenCodec, TokenError};
