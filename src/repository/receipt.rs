use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::receipt::{NewReceipt, Receipt, ReceiptOwner};
use crate::domain::types::ReceiptId;
use crate::models::receipt::{
    NewReceipt as DbNewReceipt, Receipt as DbReceipt, ReceiptChanges, ReceiptItem as DbReceiptItem,
    new_items,
};
use crate::repository::{DieselRepository, ReceiptReader, ReceiptWriter, RepositoryResult};

impl ReceiptReader for DieselRepository {
    fn list_receipts(&self, owner: &ReceiptOwner) -> RepositoryResult<Vec<Receipt>> {
        use crate::schema::{receipt_items, receipts};

        let mut conn = self.conn()?;

        let rows = receipts::table
            .filter(receipts::app_id.eq(owner.app_id.as_str()))
            .filter(receipts::user_id.eq(owner.user_id.as_str()))
            .order((receipts::created_at.asc(), receipts::id.asc()))
            .load::<DbReceipt>(&mut conn)?;

        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        let mut items_by_receipt: HashMap<String, Vec<DbReceiptItem>> = HashMap::new();
        for item in receipt_items::table
            .filter(receipt_items::receipt_id.eq_any(ids))
            .load::<DbReceiptItem>(&mut conn)?
        {
            items_by_receipt
                .entry(item.receipt_id.clone())
                .or_default()
                .push(item);
        }

        // Rows that no longer satisfy the domain constraints are left out.
        let receipts = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id.clone();
                let items = items_by_receipt.remove(&id).unwrap_or_default();
                match Receipt::try_from((row, items)) {
                    Ok(receipt) => Some(receipt),
                    Err(e) => {
                        log::warn!("Skipping unreadable receipt {id}: {e}");
                        None
                    }
                }
            })
            .collect();

        Ok(receipts)
    }

    fn get_receipt_by_id(
        &self,
        id: &ReceiptId,
        owner: &ReceiptOwner,
    ) -> RepositoryResult<Option<Receipt>> {
        use crate::schema::{receipt_items, receipts};

        let mut conn = self.conn()?;

        let row = receipts::table
            .filter(receipts::id.eq(id.as_str()))
            .filter(receipts::app_id.eq(owner.app_id.as_str()))
            .filter(receipts::user_id.eq(owner.user_id.as_str()))
            .first::<DbReceipt>(&mut conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = receipt_items::table
            .filter(receipt_items::receipt_id.eq(id.as_str()))
            .load::<DbReceiptItem>(&mut conn)?;

        Ok(Some((row, items).try_into()?))
    }
}

impl ReceiptWriter for DieselRepository {
    fn create_receipt(&self, receipt: &NewReceipt) -> RepositoryResult<Receipt> {
        use crate::schema::{receipt_items, receipts};

        let mut conn = self.conn()?;
        let id = ReceiptId::new(Uuid::new_v4().to_string())?;
        let db_receipt = DbNewReceipt::new(&id, receipt);
        let db_items = new_items(&id, &receipt.items);

        conn.transaction(|conn| {
            diesel::insert_into(receipts::table)
                .values(&db_receipt)
                .execute(conn)?;
            if !db_items.is_empty() {
                diesel::insert_into(receipt_items::table)
                    .values(&db_items)
                    .execute(conn)?;
            }
            diesel::QueryResult::Ok(())
        })?;

        Ok(receipt.clone().into_receipt(id).relabel())
    }

    fn update_receipt(&self, receipt: &Receipt, owner: &ReceiptOwner) -> RepositoryResult<usize> {
        use crate::schema::{receipt_items, receipts};

        let mut conn = self.conn()?;
        let changes = ReceiptChanges::new(receipt, Utc::now().naive_utc());
        let db_items = new_items(&receipt.id, &receipt.items);

        let affected = conn.transaction(|conn| {
            let affected = diesel::update(
                receipts::table
                    .filter(receipts::id.eq(receipt.id.as_str()))
                    .filter(receipts::app_id.eq(owner.app_id.as_str()))
                    .filter(receipts::user_id.eq(owner.user_id.as_str())),
            )
            .set(&changes)
            .execute(conn)?;

            if affected > 0 {
                diesel::delete(
                    receipt_items::table.filter(receipt_items::receipt_id.eq(receipt.id.as_str())),
                )
                .execute(conn)?;
                if !db_items.is_empty() {
                    diesel::insert_into(receipt_items::table)
                        .values(&db_items)
                        .execute(conn)?;
                }
            }
            diesel::QueryResult::Ok(affected)
        })?;

        Ok(affected)
    }

    fn delete_receipt(&self, id: &ReceiptId, owner: &ReceiptOwner) -> RepositoryResult<usize> {
        use crate::schema::{receipt_items, receipts};

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            let affected = diesel::delete(
                receipts::table
                    .filter(receipts::id.eq(id.as_str()))
                    .filter(receipts::app_id.eq(owner.app_id.as_str()))
                    .filter(receipts::user_id.eq(owner.user_id.as_str())),
            )
            .execute(conn)?;

            // SQLite only cascades with foreign keys enabled per connection.
            if affected > 0 {
                diesel::delete(receipt_items::table.filter(receipt_items::receipt_id.eq(id.as_str())))
                    .execute(conn)?;
            }
            diesel::QueryResult::Ok(affected)
        })?;

        Ok(affected)
    }
}
