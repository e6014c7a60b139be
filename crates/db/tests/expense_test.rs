//! Integration tests for Expense and Collaborator repositories.

use chrono::Utc;
use rust_decimal_macros::dec;
use tally_core::calendar::Period;
use tally_core::collaborator::{Collaborator, CollaboratorError, CollaboratorService};
use tally_core::expense::{CreateExpenseInput, ExpenseRecord, ExpenseService, ExpenseStatus};
use tally_db::{CollaboratorRepository, Database, DbError, ExpenseRepository};
use tally_shared::AppError;
use tally_shared::types::{CollaboratorId, ExpenseId, UserId};

fn expense(owner_id: UserId, collaborator_id: CollaboratorId, description: &str) -> ExpenseRecord {
    ExpenseService::create(
        CreateExpenseInput {
            owner_id,
            collaborator_id,
            description: description.to_string(),
            value: dec!(50),
            start: Period { year: 2025, month: 1 },
            installment_total: None,
        },
        Utc::now(),
    )
    .expect("valid expense")
}

async fn create_collaborator(db: &Database, owner_id: UserId, name: &str) -> Collaborator {
    CollaboratorRepository::new(db.clone())
        .modify_all(owner_id, |list| {
            let c = CollaboratorService::create(owner_id, name, list, Utc::now())?;
            list.push(c.clone());
            Ok::<_, AppError>(c)
        })
        .await
        .expect("Failed to create collaborator")
}

async fn delete_collaborator(
    db: &Database,
    owner_id: UserId,
    id: CollaboratorId,
) -> Result<(), AppError> {
    CollaboratorRepository::new(db.clone())
        .delete_unused(owner_id, id, |in_use| {
            CollaboratorService::ensure_deletable(in_use).map_err(AppError::from)
        })
        .await
}

#[tokio::test]
async fn test_expenses_are_scoped_to_owner() {
    let db = Database::new();
    let repo = ExpenseRepository::new(db.clone());
    let owner = UserId::new();
    let other = UserId::new();
    let ana = create_collaborator(&db, owner, "Ana").await;
    let bia = create_collaborator(&db, other, "Bia").await;

    let mine = repo
        .insert(expense(owner, ana.id, "Rent"))
        .await
        .expect("Failed to insert");
    repo.insert(expense(other, bia.id, "Gym"))
        .await
        .expect("Failed to insert");

    let listed = repo.list_by_owner(owner).await.expect("Failed to list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, mine.id);

    assert!(repo.find(other, mine.id).await.expect("find").is_none());
    assert_eq!(
        repo.delete(other, mine.id).await,
        Err(DbError::NotFound("Expense"))
    );
    assert!(repo.find(owner, mine.id).await.expect("find").is_some());
}

#[tokio::test]
async fn test_insert_requires_own_collaborator() {
    let db = Database::new();
    let repo = ExpenseRepository::new(db.clone());
    let owner = UserId::new();
    let other = UserId::new();
    let foreign = create_collaborator(&db, other, "Ana").await;

    assert_eq!(
        repo.insert(expense(owner, foreign.id, "Rent")).await,
        Err(DbError::MissingReference("Collaborator"))
    );
    assert_eq!(
        repo.insert(expense(owner, CollaboratorId::new(), "Rent"))
            .await,
        Err(DbError::MissingReference("Collaborator"))
    );
    assert!(repo.list_by_owner(owner).await.expect("list").is_empty());
}

#[tokio::test]
async fn test_insert_many_is_all_or_nothing() {
    let db = Database::new();
    let repo = ExpenseRepository::new(db.clone());
    let owner = UserId::new();
    let ana = create_collaborator(&db, owner, "Ana").await;
    let bruno = create_collaborator(&db, owner, "Bruno").await;

    let inserted = repo
        .insert_many(vec![
            expense(owner, ana.id, "Rent"),
            expense(owner, ana.id, "Power"),
            expense(owner, bruno.id, "Gym"),
        ])
        .await
        .expect("Failed to insert");
    assert_eq!(inserted, 3);

    let rejected = repo
        .insert_many(vec![
            expense(owner, ana.id, "Water"),
            expense(owner, CollaboratorId::new(), "Ghost"),
        ])
        .await;
    assert_eq!(rejected, Err(DbError::MissingReference("Collaborator")));
    assert_eq!(repo.list_by_owner(owner).await.expect("list").len(), 3);
}

#[tokio::test]
async fn test_expense_modify_applies_in_place() {
    let db = Database::new();
    let repo = ExpenseRepository::new(db.clone());
    let owner = UserId::new();
    let ana = create_collaborator(&db, owner, "Ana").await;
    let record = repo
        .insert(expense(owner, ana.id, "Rent"))
        .await
        .expect("Failed to insert");

    let status = repo
        .modify(owner, record.id, |r| {
            ExpenseService::toggle_cancel(r, None, Utc::now()).map_err(AppError::from)
        })
        .await;
    assert!(matches!(status, Ok(ExpenseStatus::Cancelled)));

    let stored = repo
        .find(owner, record.id)
        .await
        .expect("find")
        .expect("exists");
    assert_eq!(stored.status, ExpenseStatus::Cancelled);

    let missing = repo
        .modify(owner, ExpenseId::new(), |_| Ok::<_, DbError>(()))
        .await;
    assert_eq!(missing, Err(DbError::NotFound("Expense")));
}

#[tokio::test]
async fn test_modify_assigned_checks_collaborator() {
    let db = Database::new();
    let repo = ExpenseRepository::new(db.clone());
    let owner = UserId::new();
    let ana = create_collaborator(&db, owner, "Ana").await;
    let bruno = create_collaborator(&db, owner, "Bruno").await;
    let foreign = create_collaborator(&db, UserId::new(), "Carla").await;
    let record = repo
        .insert(expense(owner, ana.id, "Rent"))
        .await
        .expect("Failed to insert");

    let rejected = repo
        .modify_assigned(owner, record.id, foreign.id, |r| {
            r.collaborator_id = foreign.id;
            Ok::<_, DbError>(())
        })
        .await;
    assert_eq!(rejected, Err(DbError::MissingReference("Collaborator")));

    repo.modify_assigned(owner, record.id, bruno.id, |r| {
        r.collaborator_id = bruno.id;
        Ok::<_, DbError>(())
    })
    .await
    .expect("Failed to reassign");

    let stored = repo
        .find(owner, record.id)
        .await
        .expect("find")
        .expect("exists");
    assert_eq!(stored.collaborator_id, bruno.id);
}

#[tokio::test]
async fn test_collaborators_listed_in_manual_order() {
    let db = Database::new();
    let repo = CollaboratorRepository::new(db.clone());
    let owner = UserId::new();

    let mut ids = Vec::new();
    for name in ["Ana", "Bruno", "Carla"] {
        ids.push(create_collaborator(&db, owner, name).await.id);
    }

    let order = [ids[1], ids[2], ids[0]];
    repo.modify_all(owner, |list| {
        CollaboratorService::reorder(list, &order).map_err(AppError::from)
    })
    .await
    .expect("valid order");

    let names: Vec<String> = repo
        .list_by_owner(owner)
        .await
        .expect("Failed to list")
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Bruno", "Carla", "Ana"]);

    assert!(repo.list_by_owner(UserId::new()).await.expect("list").is_empty());
}

#[tokio::test]
async fn test_modify_all_writes_nothing_on_error() {
    let db = Database::new();
    let repo = CollaboratorRepository::new(db.clone());
    let owner = UserId::new();
    let ana = create_collaborator(&db, owner, "Ana").await;

    let result = repo
        .modify_all(owner, |list| {
            list[0].name = "Changed".to_string();
            Err::<(), _>(AppError::Validation("nope".to_string()))
        })
        .await;
    assert!(result.is_err());

    let stored = repo.find(owner, ana.id).await.expect("find").expect("exists");
    assert_eq!(stored.name, "Ana");
}

#[tokio::test]
async fn test_delete_unused_refuses_referenced_collaborator() {
    let db = Database::new();
    let expenses = ExpenseRepository::new(db.clone());
    let owner = UserId::new();
    let ana = create_collaborator(&db, owner, "Ana").await;
    let bruno = create_collaborator(&db, owner, "Bruno").await;
    expenses
        .insert(expense(owner, ana.id, "Rent"))
        .await
        .expect("Failed to insert");

    let in_use = delete_collaborator(&db, owner, ana.id).await;
    assert_eq!(
        in_use,
        Err(AppError::from(CollaboratorError::InUse { count: 1 }))
    );

    assert_eq!(
        delete_collaborator(&db, UserId::new(), bruno.id).await,
        Err(AppError::from(DbError::NotFound("Collaborator")))
    );

    delete_collaborator(&db, owner, bruno.id)
        .await
        .expect("Failed to delete");
    assert_eq!(
        delete_collaborator(&db, owner, bruno.id).await,
        Err(AppError::from(DbError::NotFound("Collaborator")))
    );

    let repo = CollaboratorRepository::new(db);
    assert!(repo.find(owner, ana.id).await.expect("find").is_some());
    assert!(repo.find(owner, bruno.id).await.expect("find").is_none());
}

#[tokio::test]
async fn test_stale_reorder_does_not_restore_deleted_collaborator() {
    let db = Database::new();
    let repo = CollaboratorRepository::new(db.clone());
    let owner = UserId::new();
    let ana = create_collaborator(&db, owner, "Ana").await;
    let bruno = create_collaborator(&db, owner, "Bruno").await;

    let stale = repo.list_by_owner(owner).await.expect("list");
    assert_eq!(stale.len(), 2);

    delete_collaborator(&db, owner, bruno.id)
        .await
        .expect("Failed to delete");

    let reordered = repo
        .modify_all(owner, |list| {
            CollaboratorService::reorder(list, &[bruno.id, ana.id]).map_err(AppError::from)
        })
        .await;
    assert_eq!(
        reordered,
        Err(AppError::from(CollaboratorError::InvalidOrder))
    );

    let names: Vec<String> = repo
        .list_by_owner(owner)
        .await
        .expect("list")
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Ana"]);
}
