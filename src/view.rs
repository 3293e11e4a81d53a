use minijinja::{context, Environment};

use crate::{
    error::{AppError, Result},
    model::Todo,
};

// `.html` names keep minijinja's HTML autoescaping on for user data
const TEMPLATES: [(&str, &str); 5] = [
    ("layout.html", include_str!("../templates/layout.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("todo.html", include_str!("../templates/todo.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("register.html", include_str!("../templates/register.html")),
];

/// Page and fragment templates for the htmx front end.
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)
                .map_err(|e| AppError::Config(format!("template {}: {}", name, e)))?;
        }
        Ok(Self { env })
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String> {
        self.env
            .get_template(name)
            .and_then(|template| template.render(ctx))
            .map_err(|e| AppError::Internal(format!("rendering {}: {}", name, e)))
    }

    pub fn index(&self, username: &str, todos: &[Todo]) -> Result<String> {
        self.render("index.html", context! { username, todos })
    }

    pub fn todo(&self, todo: &Todo) -> Result<String> {
        self.render("todo.html", context! { todo })
    }

    pub fn login(&self) -> Result<String> {
        self.render("login.html", context! {})
    }

    pub fn register(&self) -> Result<String> {
        self.render("register.html", context! {})
    }
}
