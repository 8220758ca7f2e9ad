//! Edit lifecycle for a single article
//!
//! ```text
//!   Loading ──ok──▶ Editing ──save──▶ Saving ──ok──▶ Done ──▶ navigate(/articles)
//!      │               ▲                 │
//!      └─err─▶ LoadFailed                └─err/timeout─▶ Failed ──edit/save──┘
//! ```
//!
//! The controller exclusively owns the working copy. `save` is its only
//! suspension point, and it takes `&mut self`, so nothing else can touch the
//! controller while a save is outstanding.

use super::routes::Route;
use crate::error::{Error, Result};
use crate::resource::{Article, Resource};
use crate::store::{find_record, ResourceStore};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// Default upper bound on one save
pub const DEFAULT_SAVE_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the controller is in the edit lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    /// Fetching the article
    Loading,
    /// The fetch failed; `load` may be retried
    LoadFailed,
    /// Working copy available for local edits
    Editing,
    /// Persist call outstanding
    Saving,
    /// Saved and navigated away
    Done,
    /// Persist rejected; working copy kept for a retry
    Failed,
}

impl fmt::Display for EditPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Loading => "loading",
            Self::LoadFailed => "load failed",
            Self::Editing => "editing",
            Self::Saving => "saving",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Marks a save as in flight; puts the phase back to `Editing` if the save
/// future is dropped before it settles
struct InFlight<'a> {
    phase: &'a mut EditPhase,
}

impl<'a> InFlight<'a> {
    fn enter(phase: &'a mut EditPhase) -> Self {
        *phase = EditPhase::Saving;
        Self { phase }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if *self.phase == EditPhase::Saving {
            *self.phase = EditPhase::Editing;
        }
    }
}

/// Drives load → edit → save → navigate for one article
pub struct EditController {
    store: Arc<dyn ResourceStore>,
    navigator: UnboundedSender<Route>,
    article_id: String,
    phase: EditPhase,
    working_copy: Option<Article>,
    failure: Option<String>,
    save_timeout: Duration,
}

impl EditController {
    /// Create a controller in `Loading` for the given article
    pub fn new(
        store: Arc<dyn ResourceStore>,
        navigator: UnboundedSender<Route>,
        article_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            navigator,
            article_id: article_id.into(),
            phase: EditPhase::Loading,
            working_copy: None,
            failure: None,
            save_timeout: DEFAULT_SAVE_TIMEOUT,
        }
    }

    /// Set the save timeout
    #[must_use]
    pub fn with_save_timeout(mut self, timeout: Duration) -> Self {
        self.save_timeout = timeout;
        self
    }

    /// Current phase
    pub fn phase(&self) -> EditPhase {
        self.phase
    }

    /// Article being edited
    pub fn article_id(&self) -> &str {
        &self.article_id
    }

    /// The local draft, once loaded
    pub fn working_copy(&self) -> Option<&Article> {
        self.working_copy.as_ref()
    }

    /// Description of the last load or save failure, for display
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Fetch the article and enter `Editing`
    ///
    /// On failure the controller moves to `LoadFailed`, keeps the reason for
    /// display and returns the error; calling `load` again retries.
    pub async fn load(&mut self) -> Result<&Article> {
        match self.phase {
            EditPhase::Loading | EditPhase::LoadFailed => {}
            other => return Err(Error::invalid_transition("load", other.to_string())),
        }
        self.phase = EditPhase::Loading;
        debug!(id = %self.article_id, "Loading article");

        let fetched = find_record::<Article>(self.store.as_ref(), &self.article_id).await;
        match fetched {
            Ok(article) => {
                info!(id = %self.article_id, "Article loaded, editing");
                self.failure = None;
                self.phase = EditPhase::Editing;
                Ok(self.working_copy.insert(article))
            }
            Err(e) => {
                warn!(id = %self.article_id, "Failed to load article: {}", e);
                self.failure = Some(e.to_string());
                self.phase = EditPhase::LoadFailed;
                Err(e)
            }
        }
    }

    /// Apply a local change to the working copy
    ///
    /// Identity and authorship are not editable and are restored after `f`
    /// runs. Editing after a failed save returns the controller to `Editing`.
    pub fn edit<F: FnOnce(&mut Article)>(&mut self, f: F) -> Result<()> {
        match self.phase {
            EditPhase::Editing | EditPhase::Failed => {}
            other => return Err(Error::invalid_transition("edit", other.to_string())),
        }
        let Some(draft) = self.working_copy.as_mut() else {
            return Err(Error::invalid_transition("edit", "nothing is loaded"));
        };

        let author_id = draft.author_id.clone();
        f(draft);
        draft.id.clone_from(&self.article_id);
        draft.author_id = author_id;

        self.failure = None;
        self.phase = EditPhase::Editing;
        Ok(())
    }

    /// Replace the title
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        self.edit(|draft| draft.title = title)
    }

    /// Replace the body
    pub fn set_body(&mut self, body: impl Into<String>) -> Result<()> {
        let body = body.into();
        self.edit(|draft| draft.body = body)
    }

    /// Persist the working copy
    ///
    /// On success the working copy becomes the acknowledged record, the
    /// phase becomes `Done` and exactly one `Route::Articles` event is sent.
    /// On rejection or timeout the phase becomes `Failed`, the working copy
    /// is left exactly as edited, nothing is sent and the error is returned.
    pub async fn save(&mut self) -> Result<()> {
        match self.phase {
            EditPhase::Editing | EditPhase::Failed => {}
            EditPhase::Saving => return Err(Error::SaveInFlight),
            other => return Err(Error::invalid_transition("save", other.to_string())),
        }
        let patch = match self.working_copy.as_ref() {
            Some(draft) => draft.to_patch(),
            None => return Err(Error::invalid_transition("save", "nothing is loaded")),
        };

        let store = Arc::clone(&self.store);
        let save_timeout = self.save_timeout;
        self.failure = None;
        info!(id = %self.article_id, "Saving article");

        let outcome = {
            let _in_flight = InFlight::enter(&mut self.phase);
            match tokio::time::timeout(save_timeout, store.save(patch)).await {
                Ok(result) => result.and_then(Article::from_resource),
                Err(_) => Err(Error::Timeout {
                    timeout_ms: save_timeout.as_millis() as u64,
                }),
            }
        };

        match outcome {
            Ok(saved) => {
                info!(id = %self.article_id, "Article saved");
                self.working_copy = Some(saved);
                self.phase = EditPhase::Done;
                self.navigate(Route::Articles);
                Ok(())
            }
            Err(e) => {
                warn!(id = %self.article_id, "Save failed, keeping draft: {}", e);
                self.failure = Some(e.to_string());
                self.phase = EditPhase::Failed;
                Err(e)
            }
        }
    }

    fn navigate(&self, route: Route) {
        debug!(%route, "Navigating");
        if self.navigator.send(route).is_err() {
            warn!("Navigation receiver is gone, transition dropped");
        }
    }
}

impl fmt::Debug for EditController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditController")
            .field("article_id", &self.article_id)
            .field("phase", &self.phase)
            .field("working_copy", &self.working_copy)
            .field("failure", &self.failure)
            .field("save_timeout", &self.save_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_save_rejected_while_in_flight() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut controller = EditController::new(Arc::new(MemoryStore::new()), tx, "1");
        controller.phase = EditPhase::Saving;

        assert!(matches!(controller.save().await, Err(Error::SaveInFlight)));
        assert_eq!(controller.phase(), EditPhase::Saving);
    }

    #[test]
    fn test_in_flight_guard_restores_editing() {
        let mut phase = EditPhase::Editing;
        {
            let guard = InFlight::enter(&mut phase);
            assert_eq!(*guard.phase, EditPhase::Saving);
        }
        assert_eq!(phase, EditPhase::Editing);

        let mut phase = EditPhase::Editing;
        {
            let mut guard = InFlight::enter(&mut phase);
            *guard.phase = EditPhase::Done;
        }
        assert_eq!(phase, EditPhase::Done);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(EditPhase::LoadFailed.to_string(), "load failed");
        assert_eq!(EditPhase::Saving.to_string(), "saving");
    }
}
