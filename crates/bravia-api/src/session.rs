// Session state: host, hardware address and the auth cookie jar.
//
// The set hands out an `auth` cookie on registration and expects it back on
// every later call. reqwest's own cookie store is not used; the jar is plain
// data updated through `CookieJar::merged` so each update is inspectable.

use indexmap::IndexMap;

use crate::wol::MacAddress;

/// Name of the session cookie issued by `actRegister`.
pub const AUTH_COOKIE: &str = "auth";

/// Opaque name -> value cookie store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: IndexMap<String, String>,
}

impl CookieJar {
    /// Overlay `incoming` on top of the current cookies.
    ///
    /// Cookies not present in `incoming` are kept, so a held `auth` cookie
    /// survives responses that don't re-issue it.
    pub fn merged<I, K, V>(&self, incoming: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut cookies = self.cookies.clone();
        for (name, value) in incoming {
            cookies.insert(name.into(), value.into());
        }
        Self { cookies }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn clear(&mut self) {
        self.cookies.clear();
    }

    /// Render as a `Cookie` request header value (`a=1; b=2`).
    pub fn header_value(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Per-client connection state.
#[derive(Debug, Clone)]
pub struct Session {
    pub host: String,
    pub mac: Option<MacAddress>,
    pub cookies: CookieJar,
}

impl Session {
    pub fn new(host: impl Into<String>, mac: Option<MacAddress>) -> Self {
        Self {
            host: host.into(),
            mac,
            cookies: CookieJar::default(),
        }
    }

    /// `true` once the device has handed out its auth cookie.
    pub fn is_authenticated(&self) -> bool {
        self.cookies.get(AUTH_COOKIE).is_some()
    }
}
