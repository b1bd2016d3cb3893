use crate::db::{DbConnection, DbPool};
use crate::domain::receipt::{NewReceipt, Receipt, ReceiptOwner};
use crate::domain::types::{AppId, ReceiptId, UserId};

pub mod errors;
pub mod mock;
pub mod receipt;
pub mod user;

pub use errors::{RepositoryError, RepositoryResult};
pub use mock::MockRepository;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations for receipts.
pub trait ReceiptReader {
    /// List every receipt of `owner` in insertion order.
    fn list_receipts(&self, owner: &ReceiptOwner) -> RepositoryResult<Vec<Receipt>>;
    /// Retrieve a receipt by id, scoped to `owner`.
    fn get_receipt_by_id(
        &self,
        id: &ReceiptId,
        owner: &ReceiptOwner,
    ) -> RepositoryResult<Option<Receipt>>;
}

/// Write operations for receipts.
pub trait ReceiptWriter {
    /// Persist a new receipt and return it with its assigned id.
    fn create_receipt(&self, receipt: &NewReceipt) -> RepositoryResult<Receipt>;
    /// Replace the stored receipt with the same id. Returns affected rows.
    fn update_receipt(&self, receipt: &Receipt, owner: &ReceiptOwner) -> RepositoryResult<usize>;
    /// Delete a receipt and its items. Returns affected rows.
    fn delete_receipt(&self, id: &ReceiptId, owner: &ReceiptOwner) -> RepositoryResult<usize>;
}

/// Lookup of signed-in identities.
pub trait UserReader {
    /// Resolve the user registered for `token` within `app_id`.
    fn get_user_by_token(&self, app_id: &AppId, token: &str) -> RepositoryResult<Option<UserId>>;
}

/// Registration of new identities.
pub trait UserWriter {
    /// Register a user, optionally bound to a sign-in token.
    fn create_user(&self, app_id: &AppId, token: Option<&str>) -> RepositoryResult<UserId>;
}

/// Backend the receipt store can run on.
pub trait ReceiptRepository: ReceiptReader + ReceiptWriter + Send + Sync {}

impl<T> ReceiptRepository for T where T: ReceiptReader + ReceiptWriter + Send + Sync {}
