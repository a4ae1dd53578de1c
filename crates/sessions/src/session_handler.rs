use playground_store::{Load, SessionRecord, SessionStore, StoreError};
use playground_token::{Claims, TokenCodec};
use std::{
    fmt::{self, Debug, Formatter},
    time::Duration,
};
use trillium::{async_trait, Conn, Handler};
use trillium_cookies::{
    cookie::{time, Cookie, SameSite},
    CookiesConnExt,
};
use uuid::Uuid;

/**
# Handler to resolve every conn to a durable session.

See crate-level docs for an overview of the resolution protocol.
*/
pub struct SessionHandler<Store> {
    store: Store,
    codec: TokenCodec,
    cookie_path: String,
    cookie_name: String,
    cookie_domain: Option<String>,
    cookie_ttl: Option<Duration>,
    same_site_policy: SameSite,
}

impl<Store: SessionStore> Debug for SessionHandler<Store> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandler")
            .field("codec", &self.codec)
            .field("cookie_path", &self.cookie_path)
            .field("cookie_name", &self.cookie_name)
            .field("cookie_domain", &self.cookie_domain)
            .field("cookie_ttl", &self.cookie_ttl)
            .field("same_site_policy", &self.same_site_policy)
            .finish()
    }
}

impl<Store: SessionStore> SessionHandler<Store> {
    /**
    Constructs a SessionHandler from the given [`SessionStore`] and
    [`TokenCodec`]. Both are injected here rather than read from any
    process-wide state, so two handlers with different stores or
    secrets can coexist in one process.

    # Defaults

    * cookie path: "/"
    * cookie name: "htmx-playground"
    * cookie max-age: one hour
    * same site: lax
    */
    pub fn new(store: Store, codec: TokenCodec) -> Self {
        Self {
            store,
            codec,
            cookie_path: "/".into(),
            cookie_name: "htmx-playground".into(),
            cookie_domain: None,
            cookie_ttl: Some(Duration::from_secs(60 * 60)),
            same_site_policy: SameSite::Lax,
        }
    }

    /// Sets a cookie path for this session handler.
    /// The default for this value is "/"
    pub fn with_cookie_path(mut self, cookie_path: impl AsRef<str>) -> Self {
        cookie_path.as_ref().clone_into(&mut self.cookie_path);
        self
    }

    /// Sets the max-age used for the session cookie.
    ///
    /// The default for this value is one hour. Set this to None to
    /// issue a cookie that lasts for the browser session.
    pub fn with_cookie_ttl(mut self, cookie_ttl: Option<Duration>) -> Self {
        self.cookie_ttl = cookie_ttl;
        self
    }

    /// Sets the name of the cookie the session identifier travels in.
    ///
    /// The token is bound to this name, so changing it invalidates
    /// all previously issued cookies. The default value is
    /// "htmx-playground".
    pub fn with_cookie_name(mut self, cookie_name: impl AsRef<str>) -> Self {
        cookie_name.as_ref().clone_into(&mut self.cookie_name);
        self
    }

    /// Sets the same site policy for the session cookie. Defaults to
    /// SameSite::Lax.
    pub fn with_same_site_policy(mut self, policy: SameSite) -> Self {
        self.same_site_policy = policy;
        self
    }

    /// Sets the domain of the cookie.
    pub fn with_cookie_domain(mut self, cookie_domain: impl AsRef<str>) -> Self {
        self.cookie_domain = Some(cookie_domain.as_ref().to_owned());
        self
    }

    //--- methods below here are private ---

    fn verified_id(&self, conn: &Conn) -> Option<String> {
        let cookie_value = conn.cookies().get(&self.cookie_name)?.value().to_owned();
        match self.codec.decode(&self.cookie_name, &cookie_value) {
            Ok(Claims { uuid }) => Some(uuid),
            Err(e) => {
                log::debug!("discarding session cookie: {e}");
                None
            }
        }
    }

    async fn initialize(&self, id: &str) -> Result<SessionRecord, StoreError> {
        let mut record = SessionRecord::new(id);
        self.store.save(&mut record).await?;
        Ok(record)
    }

    fn build_cookie(&self, secure: bool, cookie_value: String) -> Cookie<'static> {
        let mut cookie: Cookie<'static> = Cookie::build((self.cookie_name.clone(), cookie_value))
            .http_only(true)
            .same_site(self.same_site_policy)
            .secure(secure)
            .path(self.cookie_path.clone())
            .into();

        if let Some(ttl) = self.cookie_ttl {
            cookie.set_max_age(time::Duration::seconds(ttl.as_secs() as i64));
        }

        if let Some(cookie_domain) = self.cookie_domain.clone() {
            cookie.set_domain(cookie_domain)
        }

        cookie
    }
}

#[async_trait]
impl<Store: SessionStore> Handler for SessionHandler<Store> {
    async fn run(&self, mut conn: Conn) -> Conn {
        // absent and unverifiable cookies are deliberately
        // indistinguishable: both mint a fresh identifier and cookie
        let id = match self.verified_id(&conn) {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4().to_string();
                match self.codec.encode(&self.cookie_name, &Claims::new(&id)) {
                    Ok(token) => {
                        let secure = conn.is_secure();
                        let cookie = self.build_cookie(secure, token);
                        conn.cookies_mut().add(cookie);
                    }
                    Err(e) => {
                        log::error!("could not encode session token: {e}");
                        return conn.with_status(500).halt();
                    }
                }
                id
            }
        };

        let resolved = match self.store.load(&id).await {
            Load::Found(record) => Ok(record),
            Load::Absent => self.initialize(&id).await,
            Load::Corrupt(reason) => {
                log::warn!("session {id} was unreadable, reinitializing: {reason}");
                self.initialize(&id).await
            }
        };

        match resolved {
            Ok(record) => conn.with_state(record),
            Err(e) => {
                log::error!("could not initialize session {id}: {e}");
                conn.with_status(500).halt()
            }
        }
    }

    async fn before_send(&self, mut conn: Conn) -> Conn {
        let Some(mut record) = conn.take_state::<SessionRecord>() else {
            return conn;
        };

        if record.data_changed() {
            if let Err(e) = self.store.save(&mut record).await {
                log::error!("could not persist session {}: {e}", record.id());
                return conn.with_state(record).with_status(500);
            }
            record.reset_data_changed();
        }

        conn.with_state(record)
    }
}

/// Alias for [`SessionHandler::new`]
pub fn sessions<Store>(store: Store, codec: TokenCodec) -> SessionHandler<Store>
where
    Store: SessionStore,
{
    SessionHandler::new(store, codec)
}
