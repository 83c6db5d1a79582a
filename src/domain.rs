use std::fmt;
use std::io::Error;
use std::time::{Duration, Instant};

use derive_setters::Setters;
use ratatui::crossterm::event::KeyEvent;
use ratatui::style::Color;

#[derive(Debug)]
pub enum CMSError {
    IoError(Error),
    /// User input that was rejected, shown as an error toast.
    Validation(String),
    RecordNotFound(u64),
    LoggingSetup(String),
}

impl fmt::Display for CMSError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CMSError::IoError(e) => write!(f, "I/O error: {e}"),
            CMSError::Validation(msg) => write!(f, "{msg}"),
            CMSError::RecordNotFound(id) => write!(f, "No record with id {id}"),
            CMSError::LoggingSetup(msg) => write!(f, "Could not set up logging: {msg}"),
        }
    }
}

impl std::error::Error for CMSError {}

impl From<Error> for CMSError {
    fn from(err: Error) -> Self {
        CMSError::IoError(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Dashboard,
    Pages,
    Blog,
    Media,
    Users,
    Settings,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Dashboard,
        Screen::Pages,
        Screen::Blog,
        Screen::Media,
        Screen::Users,
        Screen::Settings,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::Pages => "Pages",
            Screen::Blog => "Blog Posts",
            Screen::Media => "Media Library",
            Screen::Users => "Users",
            Screen::Settings => "Settings",
        }
    }

    pub fn index(&self) -> usize {
        Screen::ALL.iter().position(|s| s == self).unwrap_or(0)
    }
}

/// Screens that can be switched off. The dashboard is always available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Setters)]
pub struct Features {
    pub pages: bool,
    pub blog: bool,
    pub media: bool,
    pub users: bool,
    pub settings: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            pages: true,
            blog: true,
            media: true,
            users: true,
            settings: true,
        }
    }
}

impl Features {
    pub fn enabled(&self, screen: Screen) -> bool {
        match screen {
            Screen::Dashboard => true,
            Screen::Pages => self.pages,
            Screen::Blog => self.blog,
            Screen::Media => self.media,
            Screen::Users => self.users,
            Screen::Settings => self.settings,
        }
    }
}

#[derive(Debug, Clone, Setters)]
pub struct CMSConfig {
    #[setters(into)]
    pub site_name: String,
    pub features: Features,
    /// Milliseconds to wait for a terminal event before redrawing.
    pub event_poll_time: u64,
    pub toast_duration_secs: u64,
    /// Highlight color for the active screen, tabs, titles and charts.
    pub accent: Color,
}

impl Default for CMSConfig {
    fn default() -> Self {
        Self {
            site_name: "Admin CMS".to_string(),
            features: Features::default(),
            event_poll_time: 100,
            toast_duration_secs: 4,
            accent: Color::Cyan,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Quit,
    MoveUp,
    MoveDown,
    NextPage,
    PrevPage,
    NextScreen,
    PrevScreen,
    GotoScreen(Screen),
    NextTab,
    PrevTab,
    Search,
    Create,
    Delete,
    CopyRow,
    Enter,
    Exit,
    Toggle,
    Save,
    Regenerate,
    ToggleSidebar,
    Help,
    RawKey(KeyEvent),
}

pub const HELP_TEXT: &str = "\
Navigation
  Tab / Shift-Tab     next / previous screen
  1 .. 6              jump to screen
  b                   collapse sidebar
  q                   quit

Tables
  Up / Down, k / j    move selection
  Left / Right, p / n previous / next page
  /                   search (Enter keeps, Esc clears)
  c                   create new item
  d                   delete selected item
  y                   copy selected row
  [ / ]               previous / next tab

Dialogs
  Tab / Shift-Tab     next / previous field
  Space               toggle checkbox
  Left / Right        change selection
  Enter               submit
  Esc                 cancel

Settings
  Enter               edit value
  Space               toggle switch
  s                   save section
  r                   regenerate API key

Press Esc to close this help.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

/// Transient notification shown in the status line.
#[derive(Debug, Clone)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub kind: ToastKind,
    pub created: Instant,
}

impl Toast {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind: ToastKind::Info,
            created: Instant::now(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            ..Self::info(title, description)
        }
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.created.elapsed() >= ttl
    }
}
