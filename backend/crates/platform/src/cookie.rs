//! Cookies
//!
//! `Set-Cookie` construction and `Cookie` header parsing shared by the
//! session and CSRF layers.

use axum::http::{HeaderMap, HeaderValue, header};

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes of one named cookie
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    /// `None` makes it a browser-session cookie
    pub max_age_secs: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "userid".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

impl CookieConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_max_age(mut self, secs: i64) -> Self {
        self.max_age_secs = Some(secs);
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    fn push_attributes(&self, cookie: &mut String) {
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));
        cookie.push_str(&format!("; Path={}", self.path));
    }

    /// `Set-Cookie` value storing `value`
    pub fn build_set_cookie(&self, value: &str) -> String {
        let mut cookie = format!("{}={}", self.name, value);
        self.push_attributes(&mut cookie);

        if let Some(max_age) = self.max_age_secs {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }

        cookie
    }

    /// `Set-Cookie` value that expires the cookie immediately
    pub fn build_delete_cookie(&self) -> String {
        let mut cookie = format!("{}=", self.name);
        self.push_attributes(&mut cookie);
        cookie.push_str("; Max-Age=0");
        cookie
    }
}

/// Extract a cookie value from request headers
///
/// Looks through every `Cookie` header; the first match wins.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name).then(|| value.trim_matches('"').to_string())
        })
}

/// Append a `Set-Cookie` header storing `value`
///
/// Values that are not valid header text are skipped; tokens produced by
/// this workspace are always URL-safe.
pub fn append_set_cookie(headers: &mut HeaderMap, config: &CookieConfig, value: &str) {
    if let Ok(header_value) = HeaderValue::from_str(&config.build_set_cookie(value)) {
        headers.append(header::SET_COOKIE, header_value);
    }
}

/// Append a `Set-Cookie` header deleting the cookie
pub fn append_delete_cookie(headers: &mut HeaderMap, config: &CookieConfig) {
    if let Ok(header_value) = HeaderValue::from_str(&config.build_delete_cookie()) {
        headers.append(header::SET_COOKIE, header_value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_config_build() {
        let config = CookieConfig {
            name: "csrftoken".to_string(),
            secure: true,
            http_only: false,
            same_site: SameSite::Lax,
            path: "/api".to_string(),
            max_age_secs: Some(3600),
        };

        let cookie = config.build_set_cookie("value123");
        assert!(cookie.starts_with("csrftoken=value123"));
        assert!(!cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/api"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn test_delete_cookie_keeps_attributes() {
        let config = CookieConfig::named("userid").with_secure(false);
        let cookie = config.build_delete_cookie();
        assert!(cookie.starts_with("userid=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("HttpOnly"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; userid=abc.123; quoted=\"q\""),
        );
        headers.append(header::COOKIE, HeaderValue::from_static("csrftoken=tok"));

        assert_eq!(extract_cookie(&headers, "userid"), Some("abc.123".to_string()));
        assert_eq!(extract_cookie(&headers, "foo"), Some("bar".to_string()));
        assert_eq!(extract_cookie(&headers, "quoted"), Some("q".to_string()));
        assert_eq!(extract_cookie(&headers, "csrftoken"), Some("tok".to_string()));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_append_set_cookie() {
        let mut headers = HeaderMap::new();
        append_set_cookie(&mut headers, &CookieConfig::named("a"), "1");
        append_delete_cookie(&mut headers, &CookieConfig::named("b"));
        let values: Vec<_> = headers.get_all(header::SET_COOKIE).iter().collect();
        assert_eq!(values.len(), 2);
        assert!(values[0].to_str().unwrap().starts_with("a=1"));
        assert!(values[1].to_str().unwrap().starts_with("b=;"));
    }
}
