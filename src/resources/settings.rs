use rand::Rng;
use ratatui::style::Stylize;
use ratatui::text::Line;
use tracing::{debug, info};

use super::{BadgeVariant, badge};
use crate::datatable::{Column, Record, Value};
use crate::domain::{CMSError, Toast};

const API_KEY_PREFIX: &str = "sk_test_";
const API_KEY_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const API_KEY_LENGTH: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    General,
    Seo,
    Api,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::General, Section::Seo, Section::Api];
    pub const LABELS: &'static [&'static str] = &["General", "SEO", "API"];

    pub fn label(&self) -> &'static str {
        Self::LABELS[self.index()]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::General => "General Settings",
            Section::Seo => "SEO Settings",
            Section::Api => "API & Integrations",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Section::General => 0,
            Section::Seo => 1,
            Section::Api => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Text(String),
    Switch(bool),
    /// Shown but only changed through a dedicated action.
    ReadOnly(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub key: &'static str,
    pub label: &'static str,
    pub section: Section,
    pub value: SettingValue,
}

impl Setting {
    fn text(section: Section, key: &'static str, label: &'static str, value: &str) -> Self {
        Self {
            key,
            label,
            section,
            value: SettingValue::Text(value.to_string()),
        }
    }

    fn switch(section: Section, key: &'static str, label: &'static str, on: bool) -> Self {
        Self {
            key,
            label,
            section,
            value: SettingValue::Switch(on),
        }
    }

    fn to_record(&self) -> Record {
        let (value, hint) = match &self.value {
            SettingValue::Text(text) => (Value::from(text.as_str()), "Enter to edit"),
            SettingValue::Switch(on) => (Value::from(*on), "Space to toggle"),
            SettingValue::ReadOnly(text) => (Value::from(text.as_str()), "r to regenerate"),
        };
        Record::new()
            .with("key", self.key)
            .with("setting", self.label)
            .with("value", value)
            .with("hint", hint)
    }
}

pub struct SettingsPanel {
    settings: Vec<Setting>,
    section: Section,
}

impl Default for SettingsPanel {
    fn default() -> Self {
        use Section::*;
        let settings = vec![
            Setting::text(General, "siteName", "Site Name", "My CMS Website"),
            Setting::text(
                General,
                "siteDescription",
                "Site Description",
                "A modern content management system",
            ),
            Setting::text(General, "adminEmail", "Admin Email", "admin@example.com"),
            Setting::text(General, "postsPerPage", "Posts Per Page", "10"),
            Setting::text(
                Seo,
                "metaTitle",
                "Default Meta Title",
                "My CMS Website | Modern Content Management",
            ),
            Setting::text(
                Seo,
                "metaDescription",
                "Default Meta Description",
                "A powerful, easy-to-use content management system for your website.",
            ),
            Setting::switch(Seo, "enableSitemap", "Generate Sitemap", true),
            Setting::switch(Seo, "enableRobots", "Generate robots.txt", true),
            Setting::switch(Api, "enableApi", "Enable API Access", true),
            Setting {
                key: "apiKey",
                label: "API Key",
                section: Api,
                value: SettingValue::ReadOnly("sk_test_4eC39HqLyjWDarjtT1zdp7dc".to_string()),
            },
        ];
        Self {
            settings,
            section: General,
        }
    }
}

impl SettingsPanel {
    pub fn title(&self) -> &'static str {
        "Settings"
    }

    pub fn description(&self) -> &'static str {
        "Configure your CMS and website settings."
    }

    pub fn sections(&self) -> &'static [&'static str] {
        Section::LABELS
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn select_section(&mut self, idx: usize) {
        self.section = Section::ALL[idx % Section::ALL.len()];
    }

    pub fn visible(&self) -> Vec<&Setting> {
        self.settings
            .iter()
            .filter(|s| s.section == self.section)
            .collect()
    }

    pub fn columns(&self) -> Vec<Column> {
        vec![
            Column::new("Setting", "setting"),
            Column::new("Value", "value").with_cell(|v| match v {
                Some(Value::Bool(true)) => badge("On", BadgeVariant::Default),
                Some(Value::Bool(false)) => badge("Off", BadgeVariant::Secondary),
                Some(Value::Text(text)) if text.is_empty() => Line::from("(empty)".dark_gray()),
                Some(other) => other.display(),
                None => Line::default(),
            }),
            Column::new("", "hint").with_cell(|v| match v {
                Some(hint) => Line::from(hint.to_string().dark_gray().italic()),
                None => Line::default(),
            }),
        ]
    }

    pub fn records(&self) -> Vec<Record> {
        self.visible().into_iter().map(Setting::to_record).collect()
    }

    fn find(&self, key: &str) -> Result<&Setting, CMSError> {
        self.settings
            .iter()
            .find(|s| s.key == key)
            .ok_or_else(|| CMSError::Validation(format!("Unknown setting {key}")))
    }

    fn find_mut(&mut self, key: &str) -> Result<&mut Setting, CMSError> {
        self.settings
            .iter_mut()
            .find(|s| s.key == key)
            .ok_or_else(|| CMSError::Validation(format!("Unknown setting {key}")))
    }

    pub fn value(&self, key: &str) -> Option<&SettingValue> {
        self.find(key).ok().map(|s| &s.value)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.value(key) {
            Some(SettingValue::Text(text)) | Some(SettingValue::ReadOnly(text)) => Some(text),
            _ => None,
        }
    }

    pub fn set_text(&mut self, key: &str, value: &str) -> Result<(), CMSError> {
        let setting = self.find_mut(key)?;
        match &mut setting.value {
            SettingValue::Text(text) => {
                debug!("Setting {} = {:?}", key, value);
                *text = value.to_string();
                Ok(())
            }
            _ => Err(CMSError::Validation(format!(
                "{} cannot be edited.",
                setting.label
            ))),
        }
    }

    /// Flips a switch and returns its new state.
    pub fn toggle(&mut self, key: &str) -> Result<bool, CMSError> {
        let setting = self.find_mut(key)?;
        match &mut setting.value {
            SettingValue::Switch(on) => {
                *on = !*on;
                debug!("Setting {} = {}", key, on);
                Ok(*on)
            }
            _ => Err(CMSError::Validation(format!(
                "{} is not a switch.",
                setting.label
            ))),
        }
    }

    /// Validates and confirms the active section.
    pub fn save(&self) -> Result<Toast, CMSError> {
        if self.section == Section::General {
            let per_page = self.text("postsPerPage").unwrap_or_default();
            match per_page.trim().parse::<u32>() {
                Ok(n) if n > 0 => {}
                _ => {
                    return Err(CMSError::Validation(
                        "Posts per page must be a positive number.".to_string(),
                    ));
                }
            }
            if !self.text("adminEmail").unwrap_or_default().contains('@') {
                return Err(CMSError::Validation(
                    "Admin email must be an email address.".to_string(),
                ));
            }
        }
        info!("Saved {} settings", self.section.label());
        Ok(Toast::info(
            "Settings Saved",
            format!(
                "{} settings have been updated successfully.",
                self.section.label()
            ),
        ))
    }

    pub fn regenerate_api_key(&mut self) -> Result<Toast, CMSError> {
        let mut rng = rand::rng();
        let suffix: String = (0..API_KEY_LENGTH)
            .map(|_| API_KEY_CHARS[rng.random_range(0..API_KEY_CHARS.len())] as char)
            .collect();
        let setting = self.find_mut("apiKey")?;
        setting.value = SettingValue::ReadOnly(format!("{API_KEY_PREFIX}{suffix}"));
        info!("Regenerated API key");
        Ok(Toast::info(
            "API Key Regenerated",
            "A new API key has been generated.",
        ))
    }
}
