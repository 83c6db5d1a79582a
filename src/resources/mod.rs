//! Resource managers own the record collections shown by the table view.
//!
//! A manager hands its rows and column descriptors to [`crate::datatable`]
//! and performs the create/delete mutations requested from the UI.

pub mod media;
pub mod pages;
pub mod posts;
pub mod settings;
pub mod users;

use chrono::Utc;
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};

use crate::datatable::{Column, Record, Value};
use crate::domain::{CMSError, Toast};
use crate::form::{Form, FormSpec};

pub use media::MediaLibrary;
pub use pages::PageManager;
pub use posts::BlogManager;
pub use settings::SettingsPanel;
pub use users::UserManager;

pub trait ResourceManager {
    fn title(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// Label of the header action that opens the creation dialog.
    fn action_label(&self) -> &'static str;
    fn columns(&self) -> Vec<Column>;
    /// Rows for the table, rebuilt from the owned collection on every call.
    fn records(&self) -> Vec<Record>;
    fn len(&self) -> usize;
    fn form(&self) -> FormSpec;
    fn create(&mut self, form: &Form) -> Result<Toast, CMSError>;
    fn delete(&mut self, id: u64) -> Result<Toast, CMSError>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sub tabs narrowing the collection before it reaches the table.
    fn tabs(&self) -> &'static [&'static str] {
        &[]
    }

    fn active_tab(&self) -> usize {
        0
    }

    fn select_tab(&mut self, _idx: usize) {}
}

/// Next free id: one above the current maximum, 1 for an empty collection.
pub fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().map_or(1, |max| max + 1)
}

/// Lower cases `title` and replaces every whitespace run with a dash.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_whitespace = false;
    for c in title.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.push(c);
            in_whitespace = false;
        }
    }
    slug
}

/// Current UTC date as `YYYY-MM-DD`.
pub fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

pub fn required<'a>(form: &'a Form, key: &str, message: &str) -> Result<&'a str, CMSError> {
    let value = form.text(key).trim();
    if value.is_empty() {
        Err(CMSError::Validation(message.to_string()))
    } else {
        Ok(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeVariant {
    Default,
    Secondary,
    Destructive,
    Outline,
}

pub fn badge(text: &str, variant: BadgeVariant) -> Line<'static> {
    let label = format!(" {text} ");
    let span = match variant {
        BadgeVariant::Default => Span::styled(label, Style::new().fg(Color::Black).bg(Color::Cyan)),
        BadgeVariant::Secondary => {
            Span::styled(label, Style::new().fg(Color::White).bg(Color::DarkGray))
        }
        BadgeVariant::Destructive => Span::styled(
            label,
            Style::new().fg(Color::White).bg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        BadgeVariant::Outline => Span::styled(format!("[{text}]"), Style::new().fg(Color::Gray)),
    };
    Line::from(span)
}

pub fn text_of(value: Option<&Value>) -> &str {
    value.and_then(Value::as_text).unwrap_or_default()
}

/// Badge column: `positive` values get the primary style, all others the
/// secondary one.
pub fn status_column(header: &str, key: &str, positive: &'static str) -> Column {
    Column::new(header, key).with_cell(move |v| {
        let text = text_of(v);
        let variant = if text == positive {
            BadgeVariant::Default
        } else {
            BadgeVariant::Secondary
        };
        badge(text, variant)
    })
}

/// Row action hints, keyed by the record id.
pub fn actions_column() -> Column {
    Column::new("Actions", "id").with_cell(|v| match v.and_then(Value::as_id) {
        Some(_) => Line::from(vec![
            "d".red().bold(),
            " delete  ".into(),
            "y".blue().bold(),
            " copy".into(),
        ]),
        None => Line::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_id_is_max_plus_one() {
        assert_eq!(next_id([3u64, 7, 5].into_iter()), 8);
        assert_eq!(next_id(std::iter::empty()), 1);
    }

    #[test]
    fn slugify_collapses_whitespace_runs() {
        assert_eq!(slugify("About Us"), "about-us");
        assert_eq!(slugify("Tips  &\tTricks"), "tips-&-tricks");
        assert_eq!(slugify(" Lead"), "-lead");
    }

    #[test]
    fn today_is_iso_date() {
        let date = today();
        assert_eq!(date.len(), 10);
        assert_eq!(&date[4..5], "-");
        assert_eq!(&date[7..8], "-");
    }

    #[test]
    fn status_column_picks_variant() {
        let column = status_column("Status", "status", "Published");
        let published = column.render(&Record::new().with("status", "Published"));
        let draft = column.render(&Record::new().with("status", "Draft"));
        assert_eq!(published.to_string(), " Published ");
        assert_ne!(published.spans[0].style, draft.spans[0].style);
    }

    #[test]
    fn actions_need_an_id() {
        let column = actions_column();
        assert!(column.render(&Record::new()).spans.is_empty());
        assert!(!column.render(&Record::new().with("id", 1u64)).spans.is_empty());
    }
}
