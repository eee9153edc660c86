//! Backend location.
//!
//! The default is an empty base, so every request goes to a relative
//! `/api/...` path and the dev server proxies it to the backend. Setting
//! `COMPLIANCE_API_BASE` at build time (e.g. `http://127.0.0.1:8000`) points
//! the client at the backend directly.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Reads the base baked in at compile time, empty when unset.
    pub fn from_build_env() -> Self {
        Self::new(option_env!("COMPLIANCE_API_BASE").unwrap_or_default())
    }

    /// Joins an absolute API path (`/api/...`) onto the base.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_base_keeps_paths_relative() {
        let cfg = ApiConfig::default();
        assert_eq!(cfg.url("/api/companies/"), "/api/companies/");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let cfg = ApiConfig::new(" http://127.0.0.1:8000/ ");
        assert_eq!(
            cfg.url("/api/companies-spa/4/dashboard/"),
            "http://127.0.0.1:8000/api/companies-spa/4/dashboard/"
        );
    }
}
