use serde_json::{json, Value};

use crate::cancel::CancelToken;
use crate::config::ApiConfig;
use crate::dto::{self, Company, Dashboard};
use crate::error::FetchError;
use crate::http::{fetch_json, ApiRequest, Method, Transport};

/// Backend paths, joined onto the configured base by [`ApiConfig::url`].
pub mod endpoints {
    pub const COMPANIES: &str = "/api/companies/";

    pub fn dashboard(company_id: &str) -> String {
        format!("/api/companies-spa/{company_id}/dashboard/")
    }

    pub fn obligation_status(obligation_id: i64) -> String {
        format!("/api/obligations/{obligation_id}/status/")
    }

    /// Server-rendered HTML report, opened by the browser as-is.
    pub fn dashboard_page(company_id: i64) -> String {
        format!("/api/companies/{company_id}/dashboard-page/")
    }
}

/// Outcome of a status toggle.
#[derive(Clone, Debug, PartialEq)]
pub enum StatusUpdate {
    /// The backend answered with a fresh dashboard.
    Replaced(Dashboard),
    /// The answer carried no dashboard; the caller must fetch it again.
    Reload,
}

/// Typed access to the compliance backend over any [`Transport`].
#[derive(Clone, Debug)]
pub struct ComplianceClient<T> {
    transport: T,
    config: ApiConfig,
}

impl<T: Transport> ComplianceClient<T> {
    pub fn new(transport: T, config: ApiConfig) -> Self {
        Self { transport, config }
    }

    /// Lists companies for a path built by [`crate::filter::ListFilter::list_path`].
    /// Anything but a JSON array yields an empty list; rows that do not
    /// decode are skipped.
    pub async fn companies(&self, list_path: &str, cancel: Option<&CancelToken>) -> Result<Vec<Company>, FetchError> {
        let value: Value = fetch_json(&self.transport, ApiRequest::get(self.config.url(list_path)), cancel).await?;
        if !value.is_array() {
            tracing::debug!(path = list_path, "company list was not an array");
        }
        Ok(dto::decode_rows(value, "company"))
    }

    pub async fn dashboard(&self, company_id: &str, cancel: Option<&CancelToken>) -> Result<Dashboard, FetchError> {
        let url = self.config.url(&endpoints::dashboard(company_id));
        fetch_json(&self.transport, ApiRequest::get(url), cancel).await
    }

    /// PATCHes `{is_compliant}` for one obligation.
    ///
    /// Only the status is checked; the body may be empty or not JSON at all.
    pub async fn set_obligation_status(&self, obligation_id: i64, is_compliant: bool) -> Result<StatusUpdate, FetchError> {
        let url = self.config.url(&endpoints::obligation_status(obligation_id));
        tracing::debug!(obligation_id, is_compliant, "updating obligation status");
        let request = ApiRequest::new(Method::Patch, url).json_body(&json!({ "is_compliant": is_compliant }));
        let raw = self.transport.send(request, None).await?;
        if let Err(e) = raw.ensure_success() {
            tracing::warn!(obligation_id, status = ?e.status(), error = %e, "status update rejected");
            return Err(e);
        }

        match raw.json_lenient() {
            Some(value) if Dashboard::is_dashboard_shaped(&value) => match serde_json::from_value(value) {
                Ok(dashboard) => Ok(StatusUpdate::Replaced(dashboard)),
                Err(e) => {
                    tracing::warn!(obligation_id, error = %e, "dashboard-shaped reply did not decode");
                    Ok(StatusUpdate::Reload)
                }
            },
            _ => Ok(StatusUpdate::Reload),
        }
    }

    pub fn dashboard_page_url(&self, company_id: i64) -> String {
        self.config.url(&endpoints::dashboard_page(company_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths() {
        assert_eq!(endpoints::dashboard("3"), "/api/companies-spa/3/dashboard/");
        assert_eq!(endpoints::obligation_status(5), "/api/obligations/5/status/");
        assert_eq!(endpoints::dashboard_page(9), "/api/companies/9/dashboard-page/");
    }
}
