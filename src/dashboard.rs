//! Overview numbers shown on the dashboard screen.

use crate::resources::{BlogManager, MediaLibrary, PageManager, ResourceManager, UserManager};

pub const PAGE_VIEWS: [(&str, u64); 7] = [
    ("Mon", 420),
    ("Tue", 380),
    ("Wed", 560),
    ("Thu", 640),
    ("Fri", 520),
    ("Sat", 380),
    ("Sun", 460),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentMonth {
    pub month: &'static str,
    pub pages: u64,
    pub posts: u64,
}

pub const CONTENT_CREATION: [ContentMonth; 6] = [
    ContentMonth {
        month: "Jan",
        pages: 4,
        posts: 8,
    },
    ContentMonth {
        month: "Feb",
        pages: 3,
        posts: 12,
    },
    ContentMonth {
        month: "Mar",
        pages: 6,
        posts: 9,
    },
    ContentMonth {
        month: "Apr",
        pages: 2,
        posts: 14,
    },
    ContentMonth {
        month: "May",
        pages: 5,
        posts: 10,
    },
    ContentMonth {
        month: "Jun",
        pages: 8,
        posts: 7,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activity {
    pub title: &'static str,
    pub description: &'static str,
    pub time: &'static str,
    pub user: &'static str,
}

pub const RECENT_ACTIVITY: [Activity; 4] = [
    Activity {
        title: "Homepage Updated",
        description: "Main hero section content was changed",
        time: "2 hours ago",
        user: "Admin",
    },
    Activity {
        title: "Blog Post Published",
        description: "New blog post 'CMS Best Practices' was published",
        time: "5 hours ago",
        user: "Editor",
    },
    Activity {
        title: "New User Registered",
        description: "A new user 'content_writer' has registered",
        time: "Yesterday",
        user: "System",
    },
    Activity {
        title: "Media Files Uploaded",
        description: "7 new images were uploaded to the media library",
        time: "3 days ago",
        user: "Admin",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: usize,
    pub change: &'static str,
}

/// One card per resource, counted from the live collections.
pub fn stat_cards(
    pages: &PageManager,
    posts: &BlogManager,
    media: &MediaLibrary,
    users: &UserManager,
) -> Vec<StatCard> {
    vec![
        StatCard {
            title: "Total Pages",
            value: pages.len(),
            change: "+2 this week",
        },
        StatCard {
            title: "Blog Posts",
            value: posts.len(),
            change: "+5 this month",
        },
        StatCard {
            title: "Media Files",
            value: media.len(),
            change: "+12 this month",
        },
        StatCard {
            title: "Users",
            value: users.len(),
            change: "+1 this month",
        },
    ]
}

pub fn peak_page_views() -> u64 {
    PAGE_VIEWS.iter().map(|(_, v)| *v).max().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cards_follow_collections() {
        let mut media = MediaLibrary::default();
        media.delete(1).unwrap();
        let cards = stat_cards(
            &PageManager::default(),
            &BlogManager::default(),
            &media,
            &UserManager::default(),
        );
        let values: Vec<usize> = cards.iter().map(|c| c.value).collect();
        assert_eq!(values, vec![7, 5, 5, 5]);
        assert_eq!(cards[2].title, "Media Files");
    }

    #[test]
    fn media_count_ignores_active_tab() {
        let mut media = MediaLibrary::default();
        media.select_tab(2);
        assert_eq!(media.len(), 6);
    }

    #[test]
    fn peak_is_thursday() {
        assert_eq!(peak_page_views(), 640);
    }
}
