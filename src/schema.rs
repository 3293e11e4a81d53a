// Struct representing the form body for creating a new Todo
#[derive(Debug, serde::Deserialize)]
pub struct CreateTodoSchema {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct RegisterSchema {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "password-repeated")]
    pub password_repeated: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct LoginSchema {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
