//! Dashboard placeholder. Makes no backend calls.

use tera::Context;

use crate::errors::AppError;
use crate::models::User;
use crate::ui;

const STATS: [&str; 4] = ["Doctors", "Patients", "Appointments", "Revenue"];

pub fn render(user: &User) -> Result<String, AppError> {
    let mut context = Context::new();
    context.insert("username", &user.username);
    context.insert("stats", &STATS);
    ui::render("dashboard.html", &context)
}
