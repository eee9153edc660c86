use crate::client::{ComplianceClient, StatusUpdate};
use crate::dto::{self, Dashboard, Obligation};
use crate::error::FetchError;
use crate::http::Transport;
use crate::store::{LatestRun, RunTicket, Store};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Loaded,
    Failed,
}

/// State of one company's dashboard view.
///
/// `busy` is a single obligation id, not a set: a second click while an
/// update is running starts its own request and takes over the marker.
/// `company_id` is the route id the view was last asked to load; replies
/// for any other company are dropped.
#[derive(Debug)]
pub struct DetailState {
    pub dashboard: Option<Dashboard>,
    pub loading: bool,
    pub error: Option<String>,
    pub busy: Option<i64>,
    company_id: Option<String>,
    run: LatestRun,
}

impl Default for DetailState {
    fn default() -> Self {
        Self {
            dashboard: None,
            loading: true,
            error: None,
            busy: None,
            company_id: None,
            run: LatestRun::default(),
        }
    }
}

impl DetailState {
    pub fn phase(&self) -> Phase {
        match (self.loading, &self.dashboard, &self.error) {
            (true, _, _) => Phase::Loading,
            (false, Some(_), _) => Phase::Loaded,
            (false, None, Some(_)) => Phase::Failed,
            (false, None, None) => Phase::Loading,
        }
    }

    pub fn score_label(&self) -> String {
        match &self.dashboard {
            Some(d) => d.score_label(),
            None => dto::PLACEHOLDER.to_string(),
        }
    }

    pub fn todo(&self) -> &[Obligation] {
        self.dashboard.as_ref().map(|d| d.todo.as_slice()).unwrap_or_default()
    }

    pub fn completed(&self) -> &[Obligation] {
        self.dashboard.as_ref().map(|d| d.completed.as_slice()).unwrap_or_default()
    }

    pub fn is_busy(&self, obligation_id: i64) -> bool {
        self.busy == Some(obligation_id)
    }

    /// Whether the view still belongs to `company_id`.
    pub fn is_showing(&self, company_id: &str) -> bool {
        self.company_id.as_deref() == Some(company_id)
    }

    /// Enters `loading` for a new dashboard fetch, cancelling the previous one.
    /// Switching company also drops the old busy marker.
    pub fn begin_load(&mut self, company_id: &str) -> RunTicket {
        if !self.is_showing(company_id) {
            self.company_id = Some(company_id.to_string());
            self.busy = None;
        }
        self.loading = true;
        self.error = None;
        self.run.start()
    }

    pub fn commit_load(&mut self, ticket: &RunTicket, result: Result<Dashboard, FetchError>) -> bool {
        if !self.run.finish(ticket) {
            return false;
        }
        match result {
            Err(e) if e.is_abort() => return false,
            Ok(dashboard) => self.dashboard = Some(dashboard),
            Err(e) => self.error = Some(e.to_string()),
        }
        self.loading = false;
        true
    }

    pub fn begin_status_update(&mut self, obligation_id: i64) {
        self.busy = Some(obligation_id);
        self.error = None;
    }

    /// Swaps in the dashboard the backend returned with the update, unless
    /// the view has moved on to another company.
    pub fn replace_dashboard(&mut self, company_id: &str, dashboard: Dashboard) -> bool {
        if !self.is_showing(company_id) {
            return false;
        }
        self.dashboard = Some(dashboard);
        true
    }

    pub fn fail_status_update(&mut self, error: &FetchError) {
        self.error = Some(error.to_string());
    }

    pub fn finish_status_update(&mut self) {
        self.busy = None;
    }

    /// Unmount or route change: drop the in-flight fetch.
    pub fn cancel(&mut self) {
        self.run.cancel();
    }
}

/// Fetches the dashboard of `company_id` and commits it if still wanted.
pub async fn load_dashboard<T, S>(client: &ComplianceClient<T>, store: &S, company_id: &str)
where
    T: Transport,
    S: Store<DetailState>,
{
    let Some(ticket) = store.update(|s| s.begin_load(company_id)) else {
        return;
    };
    let result = client.dashboard(company_id, Some(ticket.token())).await;
    if result.as_ref().is_err_and(FetchError::is_abort) {
        tracing::debug!(company_id, "dashboard request cancelled");
        return;
    }
    store.update(|s| s.commit_load(&ticket, result));
}

/// Toggles one obligation and brings the dashboard up to date.
///
/// A dashboard in the reply is used as-is; otherwise the dashboard of
/// `company_id` is fetched again. If the view switched to another company
/// while the PATCH ran, the reply is dropped and the new company's state is
/// left alone. Otherwise the busy marker is cleared in every case.
pub async fn update_obligation_status<T, S>(
    client: &ComplianceClient<T>,
    store: &S,
    company_id: &str,
    obligation_id: i64,
    is_compliant: bool,
) where
    T: Transport,
    S: Store<DetailState>,
{
    if store.update(|s| s.begin_status_update(obligation_id)).is_none() {
        return;
    }

    let outcome = client.set_obligation_status(obligation_id, is_compliant).await;
    if store.update(|s| s.is_showing(company_id)) != Some(true) {
        tracing::debug!(obligation_id, company_id, "view left the company, dropping status reply");
        return;
    }

    match outcome {
        Ok(StatusUpdate::Replaced(dashboard)) => {
            tracing::info!(obligation_id, "dashboard replaced from status reply");
            store.update(|s| s.replace_dashboard(company_id, dashboard));
        }
        Ok(StatusUpdate::Reload) => {
            tracing::info!(obligation_id, company_id, "status reply had no dashboard, reloading");
            load_dashboard(client, store, company_id).await;
        }
        Err(e) => {
            store.update(|s| s.fail_status_update(&e));
        }
    }

    store.update(DetailState::finish_status_update);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_transitions() {
        let mut state = DetailState::default();
        assert_eq!(state.phase(), Phase::Loading);
        assert_eq!(state.score_label(), "-");

        let t = state.begin_load("1");
        assert!(state.commit_load(&t, Err(FetchError::Network("boom".into()))));
        assert_eq!(state.phase(), Phase::Failed);

        let t = state.begin_load("1");
        assert!(state.error.is_none());
        assert!(state.commit_load(&t, Ok(Dashboard::default())));
        assert_eq!(state.phase(), Phase::Loaded);
        assert!(state.todo().is_empty());
    }

    #[test]
    fn failed_update_keeps_dashboard_visible() {
        let mut state = DetailState::default();
        let t = state.begin_load("1");
        state.commit_load(&t, Ok(Dashboard::default()));

        state.begin_status_update(4);
        assert!(state.is_busy(4));
        assert!(!state.is_busy(5));
        state.fail_status_update(&FetchError::Network("offline".into()));
        state.finish_status_update();

        assert_eq!(state.phase(), Phase::Loaded);
        assert_eq!(state.error.as_deref(), Some("offline"));
        assert_eq!(state.busy, None);
    }

    #[test]
    fn route_change_discards_previous_company() {
        let mut state = DetailState::default();
        let first = state.begin_load("1");
        let second = state.begin_load("2");
        assert!(first.token().is_cancelled());

        let stale = Dashboard {
            uyum_skoru: Some(serde_json::json!(10)),
            ..Dashboard::default()
        };
        assert!(!state.commit_load(&first, Ok(stale)));
        assert!(state.dashboard.is_none());
        assert!(state.commit_load(&second, Ok(Dashboard::default())));
    }

    #[test]
    fn status_reply_for_previous_company_is_not_applied() {
        let mut state = DetailState::default();
        let t = state.begin_load("1");
        state.commit_load(&t, Ok(Dashboard::default()));
        state.begin_status_update(5);

        let t = state.begin_load("2");
        assert!(state.is_showing("2"));
        assert_eq!(state.busy, None);

        let stale = Dashboard {
            uyum_skoru: Some(serde_json::json!(10)),
            ..Dashboard::default()
        };
        assert!(!state.replace_dashboard("1", stale));
        assert!(state.commit_load(&t, Ok(Dashboard::default())));
        assert_eq!(state.score_label(), "-");
    }
}
