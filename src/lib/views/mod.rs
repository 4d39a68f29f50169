//! HTML rendering for the todo list page.

use tera::{Context, Tera};
use crate::core::{Todo, TodoError};

const INDEX: &str = "index.html";

/// The compiled list page. Built once at startup and shared read-only.
///
/// The template name ends in `.html`, so tera escapes every interpolated
/// value, todo titles included.
#[derive(Clone)]
pub struct TodoListView {
    tera: Tera,
}

impl TodoListView {
    pub fn new() -> Result<Self, TodoError> {
        let mut tera = Tera::default();
        tera.add_raw_template(INDEX, include_str!("../../../templates/index.html"))?;
        Ok(Self { tera })
    }

    pub fn render(&self, todos: &[Todo]) -> Result<String, TodoError> {
        let completed = todos.iter().filter(|t| t.completed).count();
        let mut context = Context::new();
        context.insert("todos", todos);
        context.insert("completed", &completed);
        context.insert("open", &(todos.len() - completed));
        Ok(self.tera.render(INDEX, &context)?)
    }
}
