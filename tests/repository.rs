use chrono::Utc;
use diesel::prelude::*;
use pushkind_receipts::domain::receipt::{
    ItemInput, NewReceipt, ReceiptDraft, ReceiptEdit, ReceiptOwner,
};
use pushkind_receipts::domain::types::{AppId, ReceiptId};
use pushkind_receipts::repository::{
    DieselRepository, ReceiptReader, ReceiptWriter, UserReader, UserWriter,
};
use pushkind_receipts::schema::{receipt_items, receipts};

mod common;

fn owner(repo: &DieselRepository) -> ReceiptOwner {
    let app_id = AppId::new("receipts-app").expect("valid app id");
    let user_id = repo
        .create_user(&app_id, None)
        .expect("should create anonymous user");
    ReceiptOwner::new(app_id, user_id)
}

fn new_receipt(owner: &ReceiptOwner, title: &str, items: &[(&str, &str)]) -> NewReceipt {
    let items = items
        .iter()
        .map(|(name, price)| {
            ItemInput::new(*name, *price)
                .into_line_item()
                .expect("valid item")
        })
        .collect();
    ReceiptDraft {
        title: title.to_string(),
        category_code: "food_market".to_string(),
        amount: "10".to_string(),
        date: "2025-11-05".to_string(),
        items,
        image_ref: None,
    }
    .into_new_receipt(owner.clone(), Utc::now().naive_utc())
    .expect("valid draft")
}

#[test]
fn test_user_repository_crud() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let app_id = AppId::new("receipts-app").expect("valid app id");

    let anonymous = repo.create_user(&app_id, None).expect("should create user");
    let other = repo.create_user(&app_id, None).expect("should create user");
    assert_ne!(anonymous, other);

    let registered = repo
        .create_user(&app_id, Some("token-1"))
        .expect("should create user with token");
    let found = repo
        .get_user_by_token(&app_id, "token-1")
        .expect("lookup should succeed");
    assert_eq!(found, Some(registered));

    let other_app = AppId::new("another-app").expect("valid app id");
    assert_eq!(
        repo.get_user_by_token(&other_app, "token-1")
            .expect("lookup should succeed"),
        None
    );
    assert_eq!(
        repo.get_user_by_token(&app_id, "unknown")
            .expect("lookup should succeed"),
        None
    );
}

#[test]
fn test_receipt_repository_crud() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let owner = owner(&repo);

    let created = repo
        .create_receipt(&new_receipt(
            &owner,
            "Groceries",
            &[("Milk", "32.50"), ("Eggs", "45")],
        ))
        .expect("should create receipt");
    assert_eq!(created.amount.get(), 77.5);
    assert_eq!(created.category_label, "Food & Groceries");
    assert_eq!(created.user_id, owner.user_id);

    let loaded = repo
        .get_receipt_by_id(&created.id, &owner)
        .expect("lookup should succeed")
        .expect("receipt should exist");
    assert_eq!(loaded.title.as_str(), "Groceries");
    let names: Vec<&str> = loaded.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Milk", "Eggs"]);

    let second = repo
        .create_receipt(&new_receipt(&owner, "Bakery", &[("Bread", "15")]))
        .expect("should create receipt");
    let listed = repo.list_receipts(&owner).expect("should list receipts");
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().any(|r| r.id == second.id));

    let edited = loaded
        .apply_edit(ReceiptEdit::Items(vec![ItemInput::new("Tea", "3,20")]))
        .expect("valid edit");
    assert_eq!(
        repo.update_receipt(&edited, &owner)
            .expect("should update receipt"),
        1
    );
    let reloaded = repo
        .get_receipt_by_id(&created.id, &owner)
        .expect("lookup should succeed")
        .expect("receipt should exist");
    assert_eq!(reloaded.amount.get(), 3.2);
    assert_eq!(reloaded.items.len(), 1);
    assert_eq!(reloaded.items[0].name.as_str(), "Tea");

    assert_eq!(
        repo.delete_receipt(&created.id, &owner)
            .expect("should delete receipt"),
        1
    );
    assert!(
        repo.get_receipt_by_id(&created.id, &owner)
            .expect("lookup should succeed")
            .is_none()
    );

    let mut conn = test_db.pool().get().expect("should acquire DB connection");
    let orphaned: i64 = receipt_items::table
        .filter(receipt_items::receipt_id.eq(created.id.as_str()))
        .count()
        .get_result(&mut conn)
        .expect("should count items");
    assert_eq!(orphaned, 0);
}

#[test]
fn receipts_are_scoped_to_their_owner() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let alice = owner(&repo);
    let bob = owner(&repo);

    let receipt = repo
        .create_receipt(&new_receipt(&alice, "Groceries", &[]))
        .expect("should create receipt");
    assert_eq!(receipt.amount.get(), 10.0);

    assert!(repo.list_receipts(&bob).expect("should list").is_empty());
    assert!(
        repo.get_receipt_by_id(&receipt.id, &bob)
            .expect("lookup should succeed")
            .is_none()
    );

    let mut hijacked = receipt.clone();
    hijacked.user_id = bob.user_id.clone();
    assert_eq!(repo.update_receipt(&hijacked, &bob).expect("update runs"), 0);
    assert_eq!(repo.delete_receipt(&receipt.id, &bob).expect("delete runs"), 0);
    assert_eq!(repo.list_receipts(&alice).expect("should list").len(), 1);
}

#[test]
fn missing_receipts_affect_no_rows() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let owner = owner(&repo);
    let ghost = ReceiptId::new("ghost").expect("valid id");

    assert_eq!(repo.delete_receipt(&ghost, &owner).expect("delete runs"), 0);
    assert!(
        repo.get_receipt_by_id(&ghost, &owner)
            .expect("lookup should succeed")
            .is_none()
    );
}

#[test]
fn unreadable_rows_are_skipped_when_listing() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let owner = owner(&repo);

    let good = repo
        .create_receipt(&new_receipt(&owner, "Groceries", &[("Milk", "32.50")]))
        .expect("should create receipt");

    let mut conn = test_db.pool().get().expect("should acquire DB connection");
    diesel::insert_into(receipts::table)
        .values((
            receipts::id.eq("broken"),
            receipts::app_id.eq(owner.app_id.as_str()),
            receipts::user_id.eq(owner.user_id.as_str()),
            receipts::title.eq("   "),
            receipts::amount.eq(-5.0_f64),
            receipts::date.eq("2025-11-01"),
        ))
        .execute(&mut conn)
        .expect("should insert raw row");

    let listed = repo.list_receipts(&owner).expect("listing should succeed");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, good.id);
}
