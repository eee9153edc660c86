use crate::client::ComplianceClient;
use crate::dto::Company;
use crate::error::FetchError;
use crate::http::Transport;
use crate::store::{LatestRun, RunTicket, Store};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Failed,
}

/// State of the company list view.
#[derive(Debug)]
pub struct ListState {
    pub companies: Vec<Company>,
    pub loading: bool,
    pub error: Option<String>,
    run: LatestRun,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            companies: Vec::new(),
            loading: true,
            error: None,
            run: LatestRun::default(),
        }
    }
}

impl ListState {
    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Failed
        } else {
            Phase::Ready
        }
    }

    /// Enters `loading`, cancelling the previous run.
    pub fn begin(&mut self) -> RunTicket {
        self.loading = true;
        self.error = None;
        self.run.start()
    }

    /// Applies a finished run. Stale or cancelled runs change nothing.
    pub fn commit(&mut self, ticket: &RunTicket, result: Result<Vec<Company>, FetchError>) -> bool {
        if !self.run.finish(ticket) {
            return false;
        }
        match result {
            Err(e) if e.is_abort() => return false,
            Ok(companies) => self.companies = companies,
            Err(e) => self.error = Some(e.to_string()),
        }
        self.loading = false;
        true
    }

    /// Unmount: drop the in-flight run.
    pub fn cancel(&mut self) {
        self.run.cancel();
    }
}

/// Fetches the list at `list_path` and commits it if still wanted.
pub async fn load_companies<T, S>(client: &ComplianceClient<T>, store: &S, list_path: &str)
where
    T: Transport,
    S: Store<ListState>,
{
    let Some(ticket) = store.update(ListState::begin) else {
        return;
    };
    let result = client.companies(list_path, Some(ticket.token())).await;
    if result.as_ref().is_err_and(FetchError::is_abort) {
        tracing::debug!(path = list_path, "company list request cancelled");
        return;
    }
    store.update(|s| s.commit(&ticket, result));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> Company {
        Company {
            id: 1,
            name: "Acme".into(),
            ..Company::default()
        }
    }

    #[test]
    fn starts_loading() {
        assert_eq!(ListState::default().phase(), Phase::Loading);
    }

    #[test]
    fn success_and_failure_transitions() {
        let mut state = ListState::default();
        let t = state.begin();
        assert!(state.commit(&t, Ok(vec![acme()])));
        assert_eq!(state.phase(), Phase::Ready);
        assert_eq!(state.companies.len(), 1);

        let t = state.begin();
        assert!(state.error.is_none());
        assert!(state.commit(&t, Err(FetchError::Network("offline".into()))));
        assert_eq!(state.phase(), Phase::Failed);
        assert_eq!(state.error.as_deref(), Some("offline"));
    }

    #[test]
    fn stale_run_is_discarded() {
        let mut state = ListState::default();
        let old = state.begin();
        let new = state.begin();

        assert!(!state.commit(&old, Ok(vec![acme()])));
        assert!(state.loading);
        assert!(state.companies.is_empty());

        assert!(state.commit(&new, Ok(Vec::new())));
        assert!(!state.loading);
    }

    #[test]
    fn cancelled_run_leaves_state_untouched() {
        let mut state = ListState::default();
        let t = state.begin();
        state.cancel();
        assert!(!state.commit(&t, Err(FetchError::Aborted)));
        assert!(state.loading);
        assert!(state.error.is_none());
    }
}
