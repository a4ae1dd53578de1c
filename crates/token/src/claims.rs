use serde::{Deserialize, Serialize};

/**
The claims carried by an authenticated token.

This is deliberately a fixed-shape record rather than an open-ended
map: the only claim the playground protocol uses is the session
identifier, and a fixed schema means a token either decodes to exactly
this shape or fails verification. The wire encoding is prefixed with a
schema version byte (see [`TokenCodec`](crate::TokenCodec)) so the
shape can grow later without old servers silently misreading new
tokens.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// the opaque session identifier this token vouches for
    pub uuid: String,
}

impl Claims {
    /// constructs a claims record for the provided session identifier
    pub fn new(uuid: impl Into<String>) -> Self {
        Self { uuid: uuid.into() }
    }
}
