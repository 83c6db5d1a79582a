use tracing::info;

use super::{ResourceManager, actions_column, next_id, slugify, status_column, today};
use crate::datatable::{Column, Record};
use crate::domain::{CMSError, Toast};
use crate::form::{Form, FormField, FormSpec};

pub const CATEGORIES: &[&str] = &[
    "News",
    "Tutorials",
    "Tips & Tricks",
    "SEO",
    "Case Studies",
    "Updates",
];

pub const STATUSES: &[&str] = &["Draft", "Published"];

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub status: String,
    pub date: String,
    pub author: String,
}

impl Post {
    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("title", self.title.as_str())
            .with("slug", self.slug.as_str())
            .with("category", self.category.as_str())
            .with("status", self.status.as_str())
            .with("date", self.date.as_str())
            .with("author", self.author.as_str())
    }
}

const MOCK_POSTS: [(u64, &str, &str, &str, &str, &str, &str); 5] = [
    (
        1,
        "Getting Started with Our CMS",
        "getting-started-with-our-cms",
        "Tutorials",
        "Published",
        "2025-05-10",
        "Admin",
    ),
    (
        2,
        "10 Tips for Better Content Management",
        "10-tips-for-better-content-management",
        "Tips & Tricks",
        "Published",
        "2025-05-08",
        "Editor",
    ),
    (
        3,
        "Upcoming Features in Version 2.0",
        "upcoming-features-in-version-2",
        "News",
        "Draft",
        "2025-05-07",
        "Product Manager",
    ),
    (
        4,
        "How to Optimize Your Website Performance",
        "how-to-optimize-your-website-performance",
        "Tutorials",
        "Published",
        "2025-05-05",
        "Admin",
    ),
    (
        5,
        "Understanding SEO Basics",
        "understanding-seo-basics",
        "SEO",
        "Published",
        "2025-05-03",
        "SEO Specialist",
    ),
];

pub struct BlogManager {
    posts: Vec<Post>,
}

impl Default for BlogManager {
    fn default() -> Self {
        let posts = MOCK_POSTS
            .iter()
            .map(|&(id, title, slug, category, status, date, author)| Post {
                id,
                title: title.to_string(),
                slug: slug.to_string(),
                category: category.to_string(),
                status: status.to_string(),
                date: date.to_string(),
                author: author.to_string(),
            })
            .collect();
        Self::with_posts(posts)
    }
}

impl BlogManager {
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }
}

impl ResourceManager for BlogManager {
    fn title(&self) -> &'static str {
        "Blog Posts"
    }

    fn description(&self) -> &'static str {
        "Create, edit and manage your blog content."
    }

    fn action_label(&self) -> &'static str {
        "Create Post"
    }

    fn columns(&self) -> Vec<Column> {
        vec![
            Column::new("Title", "title"),
            Column::new("Category", "category"),
            status_column("Status", "status", "Published"),
            Column::new("Date", "date"),
            Column::new("Author", "author"),
            actions_column(),
        ]
    }

    fn records(&self) -> Vec<Record> {
        self.posts.iter().map(Post::to_record).collect()
    }

    fn len(&self) -> usize {
        self.posts.len()
    }

    fn form(&self) -> FormSpec {
        FormSpec {
            title: "Create New Blog Post",
            description: "Add details for your new blog post. Press Enter to create.",
            submit_label: "Create Post",
            fields: vec![
                FormField::text("title", "Post Title", "Enter post title"),
                FormField::text("slug", "Slug (URL Path)", "enter-post-slug")
                    .with_hint("Leave blank to generate from title."),
                FormField::select("category", "Category", CATEGORIES, 0),
                FormField::select("status", "Status", STATUSES, 0),
                FormField::text("content", "Content", "Post content..."),
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
        let post = Post {
            id: next_id(self.posts.iter().map(|p| p.id)),
            title: title.to_string(),
            slug,
            category: form.choice("category").to_string(),
            status: form.choice("status").to_string(),
            date: today(),
            author: "Admin".to_string(),
        };
        info!("Created post {} \"{}\" in {}", post.id, post.title, post.category);
        let toast = Toast::info(
            "Post Created",
            format!("{} has been created successfully.", post.title),
        );
        self.posts.push(post);
        Ok(toast)
    }

    fn delete(&mut self, id: u64) -> Result<Toast, CMSError> {
        let idx = self
            .posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(CMSError::RecordNotFound(id))?;
        let post = self.posts.remove(idx);
        info!("Deleted post {} \"{}\"", post.id, post.title);
        Ok(Toast::info(
            "Post Deleted",
            "The post has been deleted successfully.",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatable::{TableOptions, ViewState, derive};

    #[test]
    fn create_uses_selected_category_and_status() {
        let mut manager = BlogManager::default();
        let mut form = Form::new(manager.form());
        form.set_text("title", "Release Notes");
        form.set_choice("category", "Updates");
        form.set_choice("status", "Published");
        manager.create(&form).unwrap();

        let post = manager.posts().last().unwrap();
        assert_eq!(post.id, 6);
        assert_eq!(post.slug, "release-notes");
        assert_eq!(post.category, "Updates");
        assert_eq!(post.status, "Published");
    }

    #[test]
    fn new_posts_default_to_draft_news() {
        let mut manager = BlogManager::with_posts(Vec::new());
        let mut form = Form::new(manager.form());
        form.set_text("title", "Hello");
        manager.create(&form).unwrap();
        assert_eq!(manager.posts()[0].category, "News");
        assert_eq!(manager.posts()[0].status, "Draft");
    }

    #[test]
    fn empty_title_is_accepted() {
        let mut manager = BlogManager::default();
        let form = Form::new(manager.form());
        let toast = manager.create(&form).unwrap();
        assert_eq!(toast.title, "Post Created");
        let post = manager.posts().last().unwrap();
        assert_eq!(post.title, "");
        assert_eq!(post.slug, "");
        assert_eq!(manager.len(), 6);
    }

    #[test]
    fn hidden_slug_is_still_searchable() {
        let manager = BlogManager::default();
        let records = manager.records();
        let mut state = ViewState::default();
        state.set_search_query("version-2");
        let frame = derive(&manager.columns(), &records, &TableOptions::default(), &state);
        assert_eq!(frame.rows.len(), 1);
        assert_eq!(frame.rows[0][0].to_string(), "Upcoming Features in Version 2.0");
    }

    #[test]
    fn delete_unknown_post_fails() {
        let mut manager = BlogManager::default();
        assert!(manager.delete(42).is_err());
        manager.delete(1).unwrap();
        assert_eq!(manager.len(), 4);
    }
}
