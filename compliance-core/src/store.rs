//! Where view state lives between awaits.
//!
//! The async drivers in [`crate::list`] and [`crate::detail`] never hold a
//! borrow across a request; they go through a [`Store`] before and after. The
//! browser app backs it with a reactive signal, tests with `Rc<RefCell<_>>`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::cancel::CancelToken;

pub trait Store<S> {
    /// Applies `f` to the state. `None` once the owning view is gone, which
    /// drivers treat like a cancellation.
    fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R>;
}

impl<S> Store<S> for Rc<RefCell<S>> {
    fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

/// Ticket for one fetch run. Only the newest ticket may commit, once.
#[derive(Clone, Debug)]
pub struct RunTicket {
    token: CancelToken,
}

impl RunTicket {
    pub fn token(&self) -> &CancelToken {
        &self.token
    }
}

/// Tracks the in-flight run of a view and cancels it when superseded.
#[derive(Debug, Default)]
pub struct LatestRun {
    inflight: Option<CancelToken>,
}

impl LatestRun {
    /// Cancels whatever is in flight and hands out a fresh ticket.
    pub fn start(&mut self) -> RunTicket {
        self.cancel();
        let token = CancelToken::new();
        self.inflight = Some(token.clone());
        RunTicket { token }
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.inflight.take() {
            token.cancel();
        }
    }

    pub fn is_current(&self, ticket: &RunTicket) -> bool {
        self.inflight
            .as_ref()
            .is_some_and(|t| t.same_as(&ticket.token) && !t.is_cancelled())
    }

    /// Retires `ticket` if it is still the newest; `false` means drop the result.
    /// A retired ticket never commits again.
    pub fn finish(&mut self, ticket: &RunTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.inflight = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_run_supersedes_older() {
        let mut run = LatestRun::default();
        let first = run.start();
        let second = run.start();

        assert!(first.token().is_cancelled());
        assert!(!run.finish(&first));
        assert!(run.finish(&second));
        assert!(!run.finish(&second));
    }

    #[test]
    fn cancel_invalidates_current_ticket() {
        let mut run = LatestRun::default();
        let ticket = run.start();
        run.cancel();
        assert!(!run.is_current(&ticket));
        assert!(!run.finish(&ticket));
    }

    #[test]
    fn retired_ticket_cannot_commit_twice() {
        let mut run = LatestRun::default();
        let ticket = run.start();
        assert!(run.finish(&ticket));
        assert!(!run.is_current(&ticket));
        assert!(!run.finish(&ticket));
    }
}
