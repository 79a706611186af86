use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::ClientFetchError;
use crate::models::SearchResult;

use super::client::SuggestionSource;
use super::{SearchState, SearchView};

/// Quiet period after the last edit before a search goes out.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Holds the query/TLD input and drives searches against a [`SuggestionSource`].
///
/// Every edit restarts the debounce timer, so only the last edit inside the
/// quiet period issues a request. Each issued request captures the current
/// generation; its response is applied only if no newer search was issued
/// in the meantime, so a slow stale response can never overwrite a newer one.
///
/// Must be used from within a tokio runtime.
pub struct SearchSession<S> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    source: S,
    debounce: Duration,
    view: watch::Sender<SearchView>,
    pending: Mutex<Pending>,
}

/// The debounce timer of the latest edit. A timer only fires if its token
/// is still current; edits and firing both hold this lock while touching
/// the view.
#[derive(Default)]
struct Pending {
    token: u64,
    timer: Option<JoinHandle<()>>,
}

impl<S: SuggestionSource> SearchSession<S> {
    pub fn new(source: S) -> Self {
        Self::with_debounce(source, DEBOUNCE)
    }

    pub fn with_debounce(source: S, debounce: Duration) -> Self {
        let (view, _) = watch::channel(SearchView::default());
        Self {
            inner: Arc::new(Inner {
                source,
                debounce,
                view,
                pending: Mutex::new(Pending::default()),
            }),
        }
    }

    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.edit(|v| v.query = query);
    }

    pub fn set_tld(&self, tld: impl Into<String>) {
        let tld = tld.into();
        self.edit(|v| v.tld = tld);
    }

    pub fn snapshot(&self) -> SearchView {
        self.inner.view.borrow().clone()
    }

    /// Receiver that is notified on every view change.
    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.inner.view.subscribe()
    }

    /// Waits for the pending debounce timer, then for the search it issued
    /// to land.
    pub async fn settle(&self) {
        let timer = self.inner.lock_pending().timer.take();
        if let Some(timer) = timer {
            if timer.await.is_err() {
                log::debug!("debounce timer cancelled before firing");
            }
        }

        let mut view_rx = self.subscribe();
        if view_rx.wait_for(|v| !v.state.is_loading()).await.is_err() {
            log::debug!("search session closed while loading");
        }
    }

    fn edit(&self, modify: impl FnOnce(&mut SearchView)) {
        let mut pending = self.inner.lock_pending();
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
        pending.token += 1;
        let token = pending.token;

        self.inner.view.send_modify(modify);

        let inner = self.inner.clone();
        pending.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;
            Inner::fire(inner, token);
        }));
    }
}

impl<S> Inner<S> {
    fn lock_pending(&self) -> MutexGuard<'_, Pending> {
        match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<S: SuggestionSource> Inner<S> {
    fn fire(self: Arc<Self>, token: u64) {
        let mut issued = None;
        {
            let pending = self.lock_pending();
            if pending.token != token {
                log::debug!("debounce timer #{token} superseded");
                return;
            }
            self.view.send_modify(|v| {
                v.generation += 1;
                if v.query.trim().is_empty() {
                    v.state = SearchState::Idle;
                } else {
                    v.state = SearchState::Loading;
                    let tld = (!v.tld.is_empty()).then(|| v.tld.clone());
                    issued = Some((v.generation, v.query.clone(), tld));
                }
            });
        }

        let Some((generation, query, tld)) = issued else {
            return;
        };

        log::debug!("issuing search #{generation} for {query:?}");
        // Runs detached from the debounce timer: superseding edits do not
        // abort it, its result is just ignored if stale.
        tokio::spawn(async move {
            let outcome = self.source.search(&query, tld.as_deref()).await;
            self.apply(generation, outcome);
        });
    }

    fn apply(&self, generation: u64, outcome: Result<SearchResult, ClientFetchError>) {
        let applied = self.view.send_if_modified(|v| {
            if v.generation != generation {
                return false;
            }
            v.state = match outcome {
                Ok(result) => SearchState::Success(result.suggestions),
                Err(e) => {
                    log::error!("domain search #{generation} failed: {e}");
                    SearchState::Error(e.to_string())
                }
            };
            true
        });

        if !applied {
            log::debug!("discarding stale response for search #{generation}");
        }
    }
}

impl<S> Drop for SearchSession<S> {
    fn drop(&mut self) {
        if let Some(timer) = self.inner.lock_pending().timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoSource;

    impl SuggestionSource for EchoSource {
        async fn search(
            &self,
            query: &str,
            _tld: Option<&str>,
        ) -> Result<SearchResult, ClientFetchError> {
            Ok(SearchResult {
                total: 0,
                suggestions: vec![crate::models::DomainSuggestion {
                    domain: format!("{query}.com"),
                    price: None,
                    available: true,
                    premium: false,
                }],
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_timer_does_not_fire() {
        let session = SearchSession::new(EchoSource);
        session.set_query("abc");
        session.set_query("abcd");

        // a timer that already woke up for the first edit must not issue
        // a search with the newer query ahead of its own quiet period
        Inner::fire(session.inner.clone(), 1);
        let view = session.snapshot();
        assert_eq!(view.generation, 0);
        assert_eq!(view.state, SearchState::Idle);

        Inner::fire(session.inner.clone(), 2);
        assert_eq!(session.snapshot().generation, 1);
        assert!(session.snapshot().state.is_loading());
    }
}
