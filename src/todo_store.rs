use sqlx::{query, query_as, query_scalar};
use tracing::{debug, info};

use crate::{
    db::Database,
    error::{AppError, Result},
    model::Todo,
};

/// Todos scoped to their owner. Every lookup goes through the owner's username.
#[derive(Clone)]
pub struct TodoStore {
    db: Database,
}

impl TodoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn owner_id(&self, username: &str) -> Result<i64> {
        let id: Option<i64> = self
            .db
            .run(
                query_scalar("SELECT id FROM users WHERE username = ?")
                    .bind(username)
                    .fetch_optional(&self.db.pool),
            )
            .await?;

        id.ok_or_else(|| AppError::NotFound(format!("no account with username: {}", username)))
    }

    /// Inserts a todo for `username` and returns its store-assigned id.
    pub async fn add_todo(&self, username: &str, title: &str, description: &str) -> Result<i64> {
        let owner_id = self.owner_id(username).await?;

        let todo_id = self
            .db
            .run(async {
                query_scalar::<_, i64>(
                    "INSERT INTO todos (owner_id, title, description) VALUES (?, ?, ?) RETURNING todo_id",
                )
                .bind(owner_id)
                .bind(title)
                .bind(description)
                .fetch_one(&self.db.pool)
                .await
                .map_err(|e| {
                    AppError::from_insert(e, format!("todo with title {} already exists", title))
                })
            })
            .await?;

        info!("added todo {} for {}", todo_id, username);
        Ok(todo_id)
    }

    /// All todos of `username`, oldest first.
    pub async fn list_todos(&self, username: &str) -> Result<Vec<Todo>> {
        let owner_id = self.owner_id(username).await?;

        self.db
            .run(
                query_as::<_, Todo>(
                    "SELECT todo_id, title, description FROM todos WHERE owner_id = ? ORDER BY todo_id",
                )
                .bind(owner_id)
                .fetch_all(&self.db.pool),
            )
            .await
    }

    /// Deletes only when the todo belongs to `username`.
    pub async fn remove_todo(&self, username: &str, todo_id: i64) -> Result<()> {
        let rows_affected = self
            .db
            .run(
                query(
                    "DELETE FROM todos WHERE todo_id = ? AND owner_id = (SELECT id FROM users WHERE username = ?)",
                )
                .bind(todo_id)
                .bind(username)
                .execute(&self.db.pool),
            )
            .await?
            .rows_affected();

        if rows_affected == 0 {
            debug!("{} has no todo {}", username, todo_id);
            return Err(AppError::NotFound(format!(
                "Todo with ID: {} not found",
                todo_id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::CredentialStore;

    async fn store_with_users(names: &[&str]) -> TodoStore {
        let db = Database::in_memory().await;
        let credentials = CredentialStore::new(db.clone());
        for name in names {
            credentials
                .register(name, "Secretp@ss1", "Secretp@ss1")
                .await
                .unwrap();
        }
        TodoStore::new(db)
    }

    #[tokio::test]
    async fn add_list_remove_round_trip() {
        let store = store_with_users(&["alice"]).await;

        let id = store.add_todo("alice", "Buy milk", "2%").await.unwrap();
        assert_eq!(id, 1);

        let todos = store.list_todos("alice").await.unwrap();
        assert_eq!(
            todos,
            vec![Todo {
                id: 1,
                title: "Buy milk".to_string(),
                description: "2%".to_string(),
            }]
        );

        store.remove_todo("alice", id).await.unwrap();
        assert!(store.list_todos("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let store = store_with_users(&["alice"]).await;
        for title in ["first", "second", "third"] {
            store.add_todo("alice", title, "x").await.unwrap();
        }

        let titles: Vec<String> = store
            .list_todos("alice")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn other_users_cannot_delete() {
        let store = store_with_users(&["alice", "bob"]).await;
        let id = store.add_todo("alice", "Buy milk", "2%").await.unwrap();

        let err = store.remove_todo("bob", id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let todos = store.list_todos("alice").await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, id);
        assert!(store.list_todos("bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_title_is_rejected_per_owner() {
        let store = store_with_users(&["alice", "bob"]).await;
        store.add_todo("alice", "Buy milk", "x").await.unwrap();

        let err = store.add_todo("alice", "Buy milk", "x").await.unwrap_err();
        assert!(matches!(err, AppError::Duplicate(_)));

        // Same title under a different owner is fine
        assert!(store.add_todo("bob", "Buy milk", "x").await.is_ok());
    }

    #[tokio::test]
    async fn ids_are_not_reused() {
        let store = store_with_users(&["alice"]).await;
        let first = store.add_todo("alice", "a", "x").await.unwrap();
        store.remove_todo("alice", first).await.unwrap();

        let second = store.add_todo("alice", "a", "x").await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn unknown_owner_is_not_found() {
        let store = store_with_users(&[]).await;

        assert!(matches!(
            store.add_todo("ghost", "a", "b").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            store.list_todos("ghost").await,
            Err(AppError::NotFound(_))
        ));
    }
}
