use url::form_urlencoded;

use crate::client::endpoints;

pub const DEFAULT_THRESHOLD: u32 = 80;
pub const MAX_THRESHOLD: u32 = 100;

/// Sector choices offered by the list view, `(query value, label)`.
/// The empty value means "all sectors".
pub const SECTORS: [(&str, &str); 5] = [
    ("", "Tümü"),
    ("yazilim", "yazılım"),
    ("imalat", "imalat"),
    ("perakende", "perakende"),
    ("lojistik", "lojistik"),
];

/// Filter controls of the company list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListFilter {
    pub sector: String,
    pub risky_only: bool,
    pub threshold: u32,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            sector: String::new(),
            risky_only: false,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl ListFilter {
    /// Query string without the leading `?`. Empty when no filter applies.
    ///
    /// The threshold only travels together with `risky=true`.
    pub fn query_string(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if !self.sector.is_empty() {
            query.append_pair("sector", &self.sector);
        }
        if self.risky_only {
            query.append_pair("risky", "true");
            query.append_pair("threshold", &self.threshold.to_string());
        }
        query.finish()
    }

    /// Path of the company list request for this filter.
    pub fn list_path(&self) -> String {
        let qs = self.query_string();
        if qs.is_empty() {
            endpoints::COMPANIES.to_string()
        } else {
            format!("{}?{qs}", endpoints::COMPANIES)
        }
    }
}

/// Parses the threshold input. Empty or unparsable input falls back to the
/// default; numbers are clamped to `0..=100` and fractions truncated.
pub fn parse_threshold(input: &str) -> u32 {
    match input.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v.clamp(0.0, f64::from(MAX_THRESHOLD)) as u32,
        _ => DEFAULT_THRESHOLD,
    }
}
