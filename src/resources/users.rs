use tracing::info;

use super::{
    BadgeVariant, ResourceManager, actions_column, badge, next_id, required, status_column, text_of,
};
use crate::datatable::{Column, Record};
use crate::domain::{CMSError, Toast};
use crate::form::{Form, FormField, FormSpec};

pub const ROLES: &[&str] = &[
    "Administrator",
    "Editor",
    "Author",
    "Contributor",
    "Subscriber",
];

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub last_login: String,
}

impl User {
    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("name", self.name.as_str())
            .with("email", self.email.as_str())
            .with("role", self.role.as_str())
            .with("status", self.status.as_str())
            .with("lastLogin", self.last_login.as_str())
    }
}

const MOCK_USERS: [(u64, &str, &str, &str, &str, &str); 5] = [
    (1, "Admin User", "admin@example.com", "Administrator", "Active", "2025-05-12"),
    (2, "Content Editor", "editor@example.com", "Editor", "Active", "2025-05-11"),
    (3, "Marketing Manager", "marketing@example.com", "Author", "Active", "2025-05-10"),
    (4, "Support Team", "support@example.com", "Contributor", "Active", "2025-05-09"),
    (5, "Guest User", "guest@example.com", "Subscriber", "Inactive", "2025-04-20"),
];

fn role_variant(role: &str) -> BadgeVariant {
    match role {
        "Administrator" => BadgeVariant::Destructive,
        "Editor" => BadgeVariant::Default,
        "Author" => BadgeVariant::Secondary,
        _ => BadgeVariant::Outline,
    }
}

pub struct UserManager {
    users: Vec<User>,
}

impl Default for UserManager {
    fn default() -> Self {
        let users = MOCK_USERS
            .iter()
            .map(|&(id, name, email, role, status, last_login)| User {
                id,
                name: name.to_string(),
                email: email.to_string(),
                role: role.to_string(),
                status: status.to_string(),
                last_login: last_login.to_string(),
            })
            .collect();
        Self::with_users(users)
    }
}

impl UserManager {
    pub fn with_users(users: Vec<User>) -> Self {
        Self { users }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }
}

impl ResourceManager for UserManager {
    fn title(&self) -> &'static str {
        "User Management"
    }

    fn description(&self) -> &'static str {
        "Manage user accounts and permissions."
    }

    fn action_label(&self) -> &'static str {
        "Create User"
    }

    fn columns(&self) -> Vec<Column> {
        vec![
            Column::new("Name", "name"),
            Column::new("Email", "email"),
            Column::new("Role", "role").with_cell(|v| badge(text_of(v), role_variant(text_of(v)))),
            status_column("Status", "status", "Active"),
            Column::new("Last Login", "lastLogin"),
            actions_column(),
        ]
    }

    fn records(&self) -> Vec<Record> {
        self.users.iter().map(User::to_record).collect()
    }

    fn len(&self) -> usize {
        self.users.len()
    }

    fn form(&self) -> FormSpec {
        FormSpec {
            title: "Create New User",
            description: "Add a new user to the system. Press Enter to create.",
            submit_label: "Create User",
            fields: vec![
                FormField::text("name", "Name", "John Doe"),
                FormField::text("email", "Email", "john@example.com"),
                FormField::password("password", "Password", "Set a secure password"),
                FormField::select("role", "Role", ROLES, ROLES.len() - 1),
            ],
        }
    }

    /// The password is accepted but never stored.
    fn create(&mut self, form: &Form) -> Result<Toast, CMSError> {
        let name = required(form, "name", "Name is required.")?;
        let email = required(form, "email", "Email is required.")?;
        let user = User {
            id: next_id(self.users.iter().map(|u| u.id)),
            name: name.to_string(),
            email: email.to_string(),
            role: form.choice("role").to_string(),
            status: "Active".to_string(),
            last_login: "Never".to_string(),
        };
        info!("Created user {} <{}> as {}", user.id, user.email, user.role);
        let toast = Toast::info(
            "User Created",
            format!("{} has been created successfully.", user.name),
        );
        self.users.push(user);
        Ok(toast)
    }

    fn delete(&mut self, id: u64) -> Result<Toast, CMSError> {
        let idx = self
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or(CMSError::RecordNotFound(id))?;
        let user = self.users.remove(idx);
        info!("Deleted user {} <{}>", user.id, user.email);
        Ok(Toast::info(
            "User Deleted",
            "The user has been deleted successfully.",
        ))
    }
}
