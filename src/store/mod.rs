//! Uniform receipt CRUD over a remote or a local backend.
//!
//! The backend is chosen once by [`ReceiptStore::connect`]. Any failure while
//! connecting downgrades the session to local mode for the lifetime of the
//! process; callers never branch on the mode themselves.

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;

use crate::db::establish_connection_pool;
use crate::domain::receipt::{Receipt, ReceiptDraft, ReceiptEdit, ReceiptOwner};
use crate::domain::types::{AppId, ReceiptId, TypeConstraintError};
use crate::repository::{
    DieselRepository, MockRepository, ReceiptReader, ReceiptRepository, ReceiptWriter,
    RepositoryError,
};

pub mod auth;
pub mod feed;

use auth::Credentials;
use feed::{ReceiptChange, ReceiptSnapshot, apply_update};

/// Errors reported by [`ReceiptStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend connection parameters are missing or unusable.
    #[error("backend is not configured: {0}")]
    Configuration(String),
    #[error("sign-in failed: {0}")]
    Authentication(String),
    #[error(transparent)]
    Validation(#[from] TypeConstraintError),
    /// Local mode only; the remote backend reports missing ids as [`StoreError::Backend`].
    #[error("receipt {0} not found")]
    NotFound(String),
    #[error("backend error: {0}")]
    Backend(#[from] RepositoryError),
}

/// Which backend the session runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    Remote,
    Local,
}

/// Remote backend parameters. Missing values select local mode.
#[derive(Debug, Clone, Default)]
pub struct StoreSettings {
    pub database_url: Option<String>,
    pub app_id: Option<String>,
    pub auth_token: Option<String>,
}

pub struct ReceiptStore {
    repo: Box<dyn ReceiptRepository>,
    mode: StoreMode,
    owner: ReceiptOwner,
    banner: Option<String>,
    feed: watch::Sender<Vec<Receipt>>,
}

impl ReceiptStore {
    /// Connects to the remote backend, falling back to local mode on any
    /// failure.
    pub fn connect(settings: &StoreSettings) -> Self {
        match Self::try_connect(settings) {
            Ok(store) => {
                log::info!("Receipts are stored remotely for {}", store.owner.user_id);
                store
            }
            Err(e) => {
                log::warn!("Falling back to local receipts: {e}");
                Self::local(Some(local_mode_banner(&e)))
            }
        }
    }

    /// Remote connection without the fallback.
    pub fn try_connect(settings: &StoreSettings) -> Result<Self, StoreError> {
        let (Some(database_url), Some(app_id)) = (
            non_blank(settings.database_url.as_deref()),
            non_blank(settings.app_id.as_deref()),
        ) else {
            return Err(StoreError::Configuration(
                "database_url and app_id are required".to_string(),
            ));
        };

        let app_id = AppId::new(app_id).map_err(|e| StoreError::Configuration(e.to_string()))?;
        let pool = establish_connection_pool(database_url).map_err(RepositoryError::from)?;
        let repo = DieselRepository::new(pool);

        let credentials = Credentials::from_token(settings.auth_token.as_deref());
        let user_id = auth::sign_in(&repo, &app_id, &credentials)?;

        Self::remote(repo, ReceiptOwner::new(app_id, user_id))
    }

    /// Remote-mode store over `repo`. Fails when the initial listing fails.
    pub fn remote<R>(repo: R, owner: ReceiptOwner) -> Result<Self, StoreError>
    where
        R: ReceiptRepository + 'static,
    {
        let initial = repo.list_receipts(&owner)?;
        let store = Self::new(Box::new(repo), StoreMode::Remote, owner, None);
        store.publish(ReceiptSnapshot::Full(initial));
        Ok(store)
    }

    /// Local-mode store seeded with the example receipts.
    pub fn local(banner: Option<String>) -> Self {
        let repo = MockRepository::seeded();
        let owner = ReceiptOwner::mock();
        let initial = repo.list_receipts(&owner).unwrap_or_default();
        let store = Self::new(Box::new(repo), StoreMode::Local, owner, banner);
        store.publish(ReceiptSnapshot::Full(initial));
        store
    }

    fn new(
        repo: Box<dyn ReceiptRepository>,
        mode: StoreMode,
        owner: ReceiptOwner,
        banner: Option<String>,
    ) -> Self {
        let (feed, _) = watch::channel(Vec::new());
        Self {
            repo,
            mode,
            owner,
            banner,
            feed,
        }
    }

    pub fn mode(&self) -> StoreMode {
        self.mode
    }

    pub fn owner(&self) -> &ReceiptOwner {
        &self.owner
    }

    /// Why the session runs locally, if it was downgraded.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Live list; every value is sorted by date, newest first.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Receipt>> {
        self.feed.subscribe()
    }

    /// Current value of the live list.
    pub fn list(&self) -> Vec<Receipt> {
        self.feed.borrow().clone()
    }

    /// Re-reads the remote backend and publishes the result. No-op locally.
    pub fn refresh(&self) -> Result<(), StoreError> {
        if self.mode == StoreMode::Local {
            return Ok(());
        }
        let receipts = self.repo.list_receipts(&self.owner)?;
        self.publish(ReceiptSnapshot::Full(receipts));
        Ok(())
    }

    pub fn add(&self, draft: ReceiptDraft) -> Result<Receipt, StoreError> {
        let new_receipt = draft.into_new_receipt(self.owner.clone(), Utc::now().naive_utc())?;
        let stored = self.repo.create_receipt(&new_receipt)?;
        self.after_write(ReceiptChange::Added(stored.clone()));
        Ok(stored)
    }

    /// Replaces the receipt `id` with the result of `edit`.
    pub fn update(&self, id: &ReceiptId, edit: ReceiptEdit) -> Result<Receipt, StoreError> {
        let current = self
            .repo
            .get_receipt_by_id(id, &self.owner)?
            .ok_or_else(|| self.missing(id))?;
        let updated = current.apply_edit(edit)?;

        if self.repo.update_receipt(&updated, &self.owner)? == 0 {
            return Err(self.missing(id));
        }
        self.after_write(ReceiptChange::Modified(updated.clone()));
        Ok(updated)
    }

    /// Removes the receipt `id`. Removing an absent id is a no-op locally.
    pub fn delete(&self, id: &ReceiptId) -> Result<(), StoreError> {
        if self.repo.delete_receipt(id, &self.owner)? == 0 {
            return match self.mode {
                StoreMode::Local => Ok(()),
                StoreMode::Remote => Err(self.missing(id)),
            };
        }
        self.after_write(ReceiptChange::Removed(id.clone()));
        Ok(())
    }

    fn missing(&self, id: &ReceiptId) -> StoreError {
        match self.mode {
            StoreMode::Local => StoreError::NotFound(id.to_string()),
            StoreMode::Remote => StoreError::Backend(RepositoryError::NotFound),
        }
    }

    /// Local writes are echoed at once; remote ones only after a re-read.
    fn after_write(&self, change: ReceiptChange) {
        match self.mode {
            StoreMode::Local => self.publish(ReceiptSnapshot::Changes(vec![change])),
            StoreMode::Remote => {
                if let Err(e) = self.refresh() {
                    log::warn!("Failed to re-read receipts after a write: {e}");
                }
            }
        }
    }

    fn publish(&self, snapshot: ReceiptSnapshot) {
        self.feed
            .send_modify(|current| *current = apply_update(current, snapshot));
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn local_mode_banner(error: &StoreError) -> String {
    match error {
        StoreError::Configuration(_) => {
            "No backend is configured. Receipts are kept on this server only and will be lost on restart."
                .to_string()
        }
        other => format!(
            "Could not connect to the receipt backend ({other}). Receipts are kept on this server only and will be lost on restart."
        ),
    }
}
