// Data model representing a Todo item owned by one user
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, serde::Serialize)]
pub struct Todo {
    #[sqlx(rename = "todo_id")]
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) description: String,
}

// Identity resolved from a valid session token or a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub(crate) username: String,
}
