/*!
The htmx playground demo application: a per-session counter backed by
the session stack, plus a minimal file-backed wiki. See the crate-level
README for the cast of crates involved.
*/

use playground_sessions::{SessionConnExt, SessionHandler};
use playground_store::FileStore;
use playground_token::TokenCodec;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use trillium::{Conn, Handler};
use trillium_cookies::CookiesHandler;
use trillium_logger::Logger;
use trillium_router::{Router, RouterConnExt};
use trillium_tera::{TeraConnExt, TeraHandler};

/**
Everything the application needs, gathered in one place and passed in
at construction time. Nothing in the handler stack reads process-wide
state.
*/
#[derive(Debug, Clone)]
pub struct AppConfig {
    secret: Vec<u8>,
    session_root: PathBuf,
    wiki_root: PathBuf,
}

impl AppConfig {
    /// Builds a config from explicit parts. The secret must be at
    /// least 32 bytes of cryptographically random data.
    pub fn new(
        secret: impl Into<Vec<u8>>,
        session_root: impl Into<PathBuf>,
        wiki_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            secret: secret.into(),
            session_root: session_root.into(),
            wiki_root: wiki_root.into(),
        }
    }

    /// Reads `PLAYGROUND_SECRET`, `PLAYGROUND_SESSION_ROOT` and
    /// `PLAYGROUND_WIKI_ROOT` from the environment, with
    /// demo-friendly defaults for everything but production use.
    pub fn from_env() -> Self {
        let secret = std::env::var("PLAYGROUND_SECRET").unwrap_or_else(|_| {
            log::warn!("PLAYGROUND_SECRET not set, using a hardcoded demo secret");
            String::from("an insecure demo secret that is 32+ bytes long")
        });
        let session_root =
            std::env::var("PLAYGROUND_SESSION_ROOT").unwrap_or_else(|_| "data/sessions".into());
        let wiki_root =
            std::env::var("PLAYGROUND_WIKI_ROOT").unwrap_or_else(|_| "data/wiki".into());
        Self::new(secret.into_bytes(), session_root, wiki_root)
    }
}

/// Assembles the full handler stack for the application.
pub fn handler(config: AppConfig) -> impl Handler {
    let wiki = Wiki::new(&config.wiki_root);
    let view_wiki = wiki.clone();
    let edit_wiki = wiki.clone();
    let save_wiki = wiki;

    (
        Logger::new(),
        CookiesHandler::new(),
        SessionHandler::new(
            FileStore::new(&config.session_root),
            TokenCodec::new(&config.secret),
        ),
        TeraHandler::new(&*templates_glob()),
        Router::new()
            .get("/", index)
            .post("/increment", |conn: Conn| async move { adjust(conn, 1) })
            .post("/decrement", |conn: Conn| async move { adjust(conn, -1) })
            .get("/view/:title", move |conn: Conn| {
                let wiki = view_wiki.clone();
                async move { view(conn, wiki).await }
            })
            .get("/edit/:title", move |conn: Conn| {
                let wiki = edit_wiki.clone();
                async move { edit(conn, wiki).await }
            })
            .post("/save/:title", move |conn: Conn| {
                let wiki = save_wiki.clone();
                async move { save(conn, wiki).await }
            }),
    )
}

fn templates_glob() -> String {
    format!("{}/templates/**/*.html", env!("CARGO_MANIFEST_DIR"))
}

async fn index(conn: Conn) -> Conn {
    let count: i64 = conn.session().get("count").unwrap_or_default();
    let uuid = conn.session().id().to_owned();
    conn.assign("count", count)
        .assign("uuid", uuid)
        .render("index.html")
}

fn adjust(conn: Conn, delta: i64) -> Conn {
    let count: i64 = conn.session().get("count").unwrap_or_default();
    let count = count + delta;
    conn.with_session("count", count)
        .assign("count", count)
        .render("counter.html")
}

/// One text file per page under the wiki root, named `<title>.txt`
/// like the original playground.
#[derive(Debug, Clone)]
struct Wiki {
    root: PathBuf,
}

impl Wiki {
    fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, title: &str) -> Option<PathBuf> {
        if title.is_empty() || !title.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(self.root.join(format!("{title}.txt")))
    }

    async fn read(&self, path: &Path) -> Result<Option<String>, std::io::Error> {
        match async_fs::read_to_string(path).await {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn write(&self, path: &Path, body: &str) -> Result<(), std::io::Error> {
        async_fs::create_dir_all(&self.root).await?;
        async_fs::write(path, body).await
    }
}

async fn view(conn: Conn, wiki: Wiki) -> Conn {
    let Some(title) = conn.param("title").map(String::from) else {
        return conn.with_status(404).halt();
    };
    let Some(path) = wiki.path_for(&title) else {
        return conn.with_status(404).halt();
    };

    match wiki.read(&path).await {
        // a missing page drops straight into the editor
        Ok(None) => conn
            .assign("title", title)
            .assign("body", "")
            .render("edit.html"),
        Ok(Some(body)) => conn
            .assign("title", title)
            .assign("body", body)
            .render("view.html"),
        Err(e) => {
            log::error!("could not read wiki page {title}: {e}");
            conn.with_status(500).halt()
        }
    }
}

async fn edit(conn: Conn, wiki: Wiki) -> Conn {
    let Some(title) = conn.param("title").map(String::from) else {
        return conn.with_status(404).halt();
    };
    let Some(path) = wiki.path_for(&title) else {
        return conn.with_status(404).halt();
    };

    match wiki.read(&path).await {
        Ok(body) => conn
            .assign("title", title)
            .assign("body", body.unwrap_or_default())
            .render("edit.html"),
        Err(e) => {
            log::error!("could not read wiki page {title}: {e}");
            conn.with_status(500).halt()
        }
    }
}

async fn save(mut conn: Conn, wiki: Wiki) -> Conn {
    let Some(title) = conn.param("title").map(String::from) else {
        return conn.with_status(404).halt();
    };
    let Some(path) = wiki.path_for(&title) else {
        return conn.with_status(404).halt();
    };

    let form = match conn.request_body_string().await {
        Ok(form) => form,
        Err(e) => {
            log::error!("could not read request body: {e}");
            return conn.with_status(500).halt();
        }
    };

    let body = form_urlencoded::parse(form.as_bytes())
        .find(|(name, _)| name == "body")
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default();

    match wiki.write(&path, &body).await {
        Ok(()) => conn
            .assign("title", title)
            .assign("body", body)
            .render("view.html"),
        Err(e) => {
            log::error!("could not save wiki page {title}: {e}");
            conn.with_status(500).halt()
        }
    }
}
