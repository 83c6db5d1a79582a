use tracing::info;

use super::{ResourceManager, actions_column, next_id, slugify, status_column, today};
use crate::datatable::{Column, Record};
use crate::domain::{CMSError, Toast};
use crate::form::{Form, FormField, FormSpec};

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub published: bool,
    pub last_updated: String,
    pub author: String,
}

impl Page {
    pub fn status(&self) -> &'static str {
        if self.published { "Published" } else { "Draft" }
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("title", self.title.as_str())
            .with("slug", self.slug.as_str())
            .with("status", self.status())
            .with("lastUpdated", self.last_updated.as_str())
            .with("author", self.author.as_str())
    }
}

// id, title, slug, published, last updated, author
const MOCK_PAGES: [(u64, &str, &str, bool, &str, &str); 7] = [
    (1, "Home", "home", true, "2025-05-10", "Admin"),
    (2, "About Us", "about-us", true, "2025-05-08", "Admin"),
    (3, "Services", "services", true, "2025-05-07", "Editor"),
    (4, "Contact", "contact", true, "2025-05-06", "Admin"),
    (5, "Privacy Policy", "privacy-policy", false, "2025-05-05", "Legal"),
    (6, "Terms of Service", "terms-of-service", false, "2025-05-04", "Legal"),
    (7, "FAQ", "faq", true, "2025-05-03", "Support"),
];

pub struct PageManager {
    pages: Vec<Page>,
}

impl Default for PageManager {
    fn default() -> Self {
        let pages = MOCK_PAGES
            .iter()
            .map(|&(id, title, slug, published, last_updated, author)| Page {
                id,
                title: title.to_string(),
                slug: slug.to_string(),
                published,
                last_updated: last_updated.to_string(),
                author: author.to_string(),
            })
            .collect();
        Self::with_pages(pages)
    }
}

impl PageManager {
    pub fn with_pages(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }
}

impl ResourceManager for PageManager {
    fn title(&self) -> &'static str {
        "Pages"
    }

    fn description(&self) -> &'static str {
        "Create and manage your website pages."
    }

    fn action_label(&self) -> &'static str {
        "Create Page"
    }

    fn columns(&self) -> Vec<Column> {
        vec![
            Column::new("Title", "title"),
            Column::new("Slug", "slug"),
            status_column("Status", "status", "Published"),
            Column::new("Last Updated", "lastUpdated"),
            Column::new("Author", "author"),
            actions_column(),
        ]
    }

    fn records(&self) -> Vec<Record> {
        self.pages.iter().map(Page::to_record).collect()
    }

    fn len(&self) -> usize {
        self.pages.len()
    }

    fn form(&self) -> FormSpec {
        FormSpec {
            title: "Create New Page",
            description: "Add details for your new page. Press Enter to create.",
            submit_label: "Create Page",
            fields: vec![
                FormField::text("title", "Page Title", "Home, About Us, Contact, etc."),
                FormField::text("slug", "Slug (URL Path)", "home, about-us, contact, etc.")
                    .with_hint("Leave blank to generate from title."),
                FormField::text("content", "Content", "Page content..."),
                FormField::checkbox("published", "Publish immediately", true),
            ],
        }
    }

    fn create(&mut self, form: &Form) -> Result<Toast, CMSError> {
        // Title and slug are kept as typed, a missing slug is derived
        let title = form.text("title");
        let slug = match form.text("slug") {
            "" => slugify(title),
            slug => slug.to_string(),
        };
        let page = Page {
            id: next_id(self.pages.iter().map(|p| p.id)),
            title: title.to_string(),
            slug,
            published: form.flag("published"),
            last_updated: today(),
            author: "Admin".to_string(),
        };
        info!("Created page {} \"{}\" ({})", page.id, page.title, page.slug);
        let toast = Toast::info(
            "Page Created",
            format!("{} has been created successfully.", page.title),
        );
        self.pages.push(page);
        Ok(toast)
    }

    fn delete(&mut self, id: u64) -> Result<Toast, CMSError> {
        let idx = self
            .pages
            .iter()
            .position(|p| p.id == id)
            .ok_or(CMSError::RecordNotFound(id))?;
        let page = self.pages.remove(idx);
        info!("Deleted page {} \"{}\"", page.id, page.title);
        Ok(Toast::info(
            "Page Deleted",
            "The page has been deleted successfully.",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(manager: &PageManager, title: &str, slug: &str, published: bool) -> Form {
        let mut form = Form::new(manager.form());
        form.set_text("title", title);
        form.set_text("slug", slug);
        form.set_flag("published", published);
        form
    }

    #[test]
    fn starts_with_mock_pages() {
        let manager = PageManager::default();
        assert_eq!(manager.len(), 7);
        let status = manager.records()[4].get("status").map(|v| v.to_string());
        assert_eq!(status.as_deref(), Some("Draft"));
    }

    #[test]
    fn create_generates_slug_and_id() {
        let mut manager = PageManager::default();
        let form = form(&manager, "Our Team", "", false);
        let toast = manager.create(&form).unwrap();
        assert_eq!(toast.title, "Page Created");
        assert_eq!(toast.description, "Our Team has been created successfully.");

        let page = manager.pages().last().unwrap();
        assert_eq!(page.id, 8);
        assert_eq!(page.slug, "our-team");
        assert_eq!(page.status(), "Draft");
        assert_eq!(page.author, "Admin");
        assert_eq!(page.last_updated, today());
    }

    #[test]
    fn create_keeps_explicit_slug() {
        let mut manager = PageManager::with_pages(Vec::new());
        let form = form(&manager, "Landing", "start", true);
        manager.create(&form).unwrap();
        assert_eq!(manager.pages()[0].id, 1);
        assert_eq!(manager.pages()[0].slug, "start");
        assert!(manager.pages()[0].published);
    }

    #[test]
    fn create_keeps_input_as_typed() {
        let mut manager = PageManager::default();
        let typed = form(&manager, " Our Team ", "", true);
        manager.create(&typed).unwrap();
        let page = manager.pages().last().unwrap();
        assert_eq!(page.title, " Our Team ");
        assert_eq!(page.slug, "-our-team-");

        let untitled = form(&manager, "", " start ", true);
        manager.create(&untitled).unwrap();
        let page = manager.pages().last().unwrap();
        assert_eq!(page.title, "");
        assert_eq!(page.slug, " start ");
        assert_eq!(manager.len(), 9);
    }

    #[test]
    fn delete_removes_by_id() {
        let mut manager = PageManager::default();
        let toast = manager.delete(3).unwrap();
        assert_eq!(toast.title, "Page Deleted");
        assert!(manager.pages().iter().all(|p| p.id != 3));
        assert!(matches!(manager.delete(3), Err(CMSError::RecordNotFound(3))));
    }
}
