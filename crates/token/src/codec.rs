use crate::Claims;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt::{self, Debug, Formatter};

// unpadded url-safe base64 of a 32-byte hmac-sha256 digest
const BASE64_DIGEST_LEN: usize = 43;

// schema version of the claims payload
const TOKEN_VERSION: u8 = 1;

/// Error type for [`TokenCodec`].
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// the claims could not be serialized
    #[error("unable to serialize claims: {0}")]
    Encoding(#[from] serde_json::Error),

    /// the token failed verification: bad signature, wrong purpose
    /// name, or a malformed or truncated value
    #[error("token failed verification")]
    Authentication,
}

/**
Encodes and verifies authenticated session tokens.

A token is the url-safe base64 hmac-sha256 digest of the payload,
concatenated with the payload itself, where the payload is the base64
of a schema version byte followed by the json claims. The digest
covers the purpose `name` as well as the payload, so a token minted
for one cookie can never be replayed as another.
*/
#[derive(Clone)]
pub struct TokenCodec {
    key: Vec<u8>,
}

impl Debug for TokenCodec {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("key", &"<<secret>>")
            .finish()
    }
}

impl TokenCodec {
    /**
    Constructs a TokenCodec from the given secret. The `secret` MUST
    be at least 32 bytes long, and MUST be cryptographically random to
    be secure. It is recommended to retrieve this at runtime from the
    environment instead of compiling it into your application.

    # Panics

    TokenCodec::new will panic if the secret is fewer than 32 bytes.
    */
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();
        assert!(secret.len() >= 32, "token secret must be at least 32 bytes");
        Self {
            key: secret.to_vec(),
        }
    }

    /**
    Encodes the claims into a tamper-evident token bound to the
    purpose `name`. The result is url-safe and suitable for direct use
    as a cookie value.
    */
    pub fn encode(&self, name: &str, claims: &Claims) -> Result<String, TokenError> {
        let mut payload_bytes = vec![TOKEN_VERSION];
        serde_json::to_writer(&mut payload_bytes, claims)?;
        let payload = URL_SAFE_NO_PAD.encode(payload_bytes);

        let mut token = URL_SAFE_NO_PAD.encode(self.mac(name, &payload).finalize().into_bytes());
        token.push_str(&payload);
        Ok(token)
    }

    /**
    Verifies and decodes a token previously produced by
    [`encode`](TokenCodec::encode) under the same secret and `name`.

    Fails with [`TokenError::Authentication`] if the digest does not
    verify, if the token was minted under a different name, or if the
    value is malformed or truncated in any way.
    */
    pub fn decode(&self, name: &str, token: &str) -> Result<Claims, TokenError> {
        if !token.is_ascii() || token.len() <= BASE64_DIGEST_LEN {
            log::trace!("rejecting token: too short or not ascii");
            return Err(TokenError::Authentication);
        }

        let (digest, payload) = token.split_at(BASE64_DIGEST_LEN);
        let digest = URL_SAFE_NO_PAD
            .decode(digest)
            .map_err(|_| TokenError::Authentication)?;

        self.mac(name, payload)
            .verify_slice(&digest)
            .map_err(|_| TokenError::Authentication)?;

        let payload_bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Authentication)?;

        match payload_bytes.split_first() {
            Some((&TOKEN_VERSION, claims)) => {
                serde_json::from_slice(claims).map_err(|_| TokenError::Authentication)
            }
            _ => {
                log::trace!("rejecting token: unrecognized schema version");
                Err(TokenError::Authentication)
            }
        }
    }

    fn mac(&self, name: &str, payload: &str) -> Hmac<Sha256> {
        let mut mac =
            Hmac::<Sha256>::new_from_slice(&self.key).expect("hmac accepts keys of any length");
        mac.update(name.as_bytes());
        mac.update(&[0]);
        mac.update(payload.as_bytes());
        mac
    }
}
