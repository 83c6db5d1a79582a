use arboard::Clipboard;
use ratatui::crossterm::event::KeyEvent;
use std::time::Duration;
use tracing::{debug, error, info, trace, warn};

use crate::dashboard::{self, StatCard};
use crate::datatable::{
    Column, Record, TableFrame, TableOptions, ViewState, derive, visible_records,
};
use crate::domain::{CMSConfig, CMSError, HELP_TEXT, Message, Screen, Toast};
use crate::form::{Form, FormEvent};
use crate::inputter::{InputResult, Inputter};
use crate::resources::settings::{Section, SettingValue};
use crate::resources::{
    BlogManager, MediaLibrary, PageManager, ResourceManager, SettingsPanel, UserManager,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ready,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modus {
    Table,
    /// Typing into the search box.
    Search,
    Dialog,
    /// Editing one text setting inline.
    Edit,
    Popup,
}

pub struct Model {
    config: CMSConfig,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    screen: Screen,
    pages: PageManager,
    posts: BlogManager,
    media: MediaLibrary,
    users: UserManager,
    settings: SettingsPanel,
    view: ViewState,
    input: Inputter,
    last_input: InputResult,
    form: Option<Form>,
    edit_key: Option<&'static str>,
    toast: Option<Toast>,
    sidebar_collapsed: bool,
    clipboard: Option<Clipboard>,
}

impl Model {
    pub fn init(config: &CMSConfig) -> Self {
        info!("Starting {} with {:?}", config.site_name, config.features);
        Self {
            config: config.clone(),
            status: Status::Ready,
            modus: Modus::Table,
            previous_modus: Modus::Table,
            screen: Screen::Dashboard,
            pages: PageManager::default(),
            posts: BlogManager::default(),
            media: MediaLibrary::default(),
            users: UserManager::default(),
            settings: SettingsPanel::default(),
            view: ViewState::default(),
            input: Inputter::default(),
            last_input: InputResult::default(),
            form: None,
            edit_key: None,
            toast: None,
            sidebar_collapsed: false,
            clipboard: None,
        }
    }

    // ------------------------- Read access for the UI ------------------------ //

    pub fn config(&self) -> &CMSConfig {
        &self.config
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn modus(&self) -> Modus {
        self.modus
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.sidebar_collapsed
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn form(&self) -> Option<&Form> {
        self.form.as_ref()
    }

    /// State of the search box or the inline settings editor.
    pub fn input(&self) -> &InputResult {
        &self.last_input
    }

    pub fn edit_key(&self) -> Option<&'static str> {
        self.edit_key
    }

    pub fn help_text(&self) -> &'static str {
        HELP_TEXT
    }

    /// Controller must forward raw key events instead of mapped commands.
    pub fn raw_keyevents(&self) -> bool {
        matches!(self.modus, Modus::Search | Modus::Dialog | Modus::Edit)
    }

    pub fn screens(&self) -> Vec<Screen> {
        Screen::ALL
            .into_iter()
            .filter(|s| self.config.features.enabled(*s))
            .collect()
    }

    /// Title, description and the create action of the current screen.
    pub fn header(&self) -> (&'static str, &'static str, Option<&'static str>) {
        match self.screen {
            Screen::Dashboard => ("Dashboard", "Welcome to your CMS dashboard overview.", None),
            Screen::Settings => (self.settings.title(), self.settings.description(), None),
            _ => match self.manager() {
                Some(m) => (m.title(), m.description(), Some(m.action_label())),
                None => (self.screen.title(), "", None),
            },
        }
    }

    /// Sub tab labels and the active one.
    pub fn tabs(&self) -> (&'static [&'static str], usize) {
        match self.screen {
            Screen::Settings => (self.settings.sections(), self.settings.section().index()),
            _ => match self.manager() {
                Some(m) => (m.tabs(), m.active_tab()),
                None => (&[], 0),
            },
        }
    }

    pub fn settings_section(&self) -> Section {
        self.settings.section()
    }

    pub fn stat_cards(&self) -> Vec<StatCard> {
        dashboard::stat_cards(&self.pages, &self.posts, &self.media, &self.users)
    }

    pub fn table_frame(&self) -> Option<TableFrame> {
        self.table_data()
            .map(|(columns, records, options)| derive(&columns, &records, &options, &self.view))
    }

    fn manager(&self) -> Option<&dyn ResourceManager> {
        match self.screen {
            Screen::Pages => Some(&self.pages),
            Screen::Blog => Some(&self.posts),
            Screen::Media => Some(&self.media),
            Screen::Users => Some(&self.users),
            Screen::Dashboard | Screen::Settings => None,
        }
    }

    fn manager_mut(&mut self) -> Option<&mut dyn ResourceManager> {
        match self.screen {
            Screen::Pages => Some(&mut self.pages),
            Screen::Blog => Some(&mut self.posts),
            Screen::Media => Some(&mut self.media),
            Screen::Users => Some(&mut self.users),
            Screen::Dashboard | Screen::Settings => None,
        }
    }

    fn table_data(&self) -> Option<(Vec<Column>, Vec<Record>, TableOptions)> {
        match self.screen {
            Screen::Dashboard => None,
            Screen::Settings => Some((
                self.settings.columns(),
                self.settings.records(),
                TableOptions::default().searchable(false).pagination(false),
            )),
            _ => self
                .manager()
                .map(|m| (m.columns(), m.records(), TableOptions::default())),
        }
    }

    fn selected_record(&self) -> Option<Record> {
        let (_, records, options) = self.table_data()?;
        let (visible, _) = visible_records(&records, &options, &self.view);
        visible.get(self.view.selected()).map(|r| (*r).clone())
    }

    // ---------------------------- State machine ------------------------------ //

    pub fn quit(&mut self) {
        info!("Quitting ...");
        self.status = Status::Quitting;
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), CMSError> {
        self.expire_toast();

        let Some(msg) = message else {
            return Ok(());
        };
        trace!("Update: Modus {:?}, Message {:?}", self.modus, msg);

        let result = match self.modus {
            Modus::Table => self.update_table(msg),
            Modus::Popup => {
                match msg {
                    Message::Quit => self.quit(),
                    Message::Exit | Message::Help => self.close_popup(),
                    _ => (),
                }
                Ok(())
            }
            Modus::Search | Modus::Dialog | Modus::Edit => match msg {
                Message::RawKey(key) => self.raw_input(key),
                _ => Ok(()),
            },
        };

        match result {
            Err(CMSError::Validation(msg)) => {
                warn!("Rejected input: {}", msg);
                self.notify(Toast::error("Error", msg));
                Ok(())
            }
            Err(e @ CMSError::RecordNotFound(_)) => {
                warn!("{}", e);
                self.notify(Toast::error("Error", e.to_string()));
                Ok(())
            }
            other => other,
        }
    }

    fn update_table(&mut self, msg: Message) -> Result<(), CMSError> {
        match msg {
            Message::Quit => self.quit(),
            Message::Help => self.show_help(),
            Message::ToggleSidebar => self.sidebar_collapsed = !self.sidebar_collapsed,
            Message::NextScreen => self.step_screen(1),
            Message::PrevScreen => self.step_screen(-1),
            Message::GotoScreen(screen) => self.goto_screen(screen),
            Message::MoveUp => self.view.select_previous(),
            Message::MoveDown => self.move_down(),
            Message::NextPage => self.next_page(),
            Message::PrevPage => {
                self.view.previous_page();
            }
            Message::NextTab => self.step_tab(1),
            Message::PrevTab => self.step_tab(-1),
            Message::Search => self.enter_search(),
            Message::Exit => self.view.set_search_query(""),
            Message::Create => self.open_dialog(),
            Message::Delete => return self.delete_selected(),
            Message::CopyRow => self.copy_selected_row(),
            Message::Enter => return self.edit_selected_setting(),
            Message::Toggle => return self.toggle_selected_setting(),
            Message::Save if self.screen == Screen::Settings => {
                let toast = self.settings.save()?;
                self.notify(toast);
            }
            Message::Regenerate
                if self.screen == Screen::Settings
                    && self.settings.section() == Section::Api =>
            {
                let toast = self.settings.regenerate_api_key()?;
                self.notify(toast);
            }
            _ => (),
        }
        Ok(())
    }

    fn raw_input(&mut self, key: KeyEvent) -> Result<(), CMSError> {
        match self.modus {
            Modus::Search => {
                self.last_input = self.input.read(key);
                if self.last_input.canceled {
                    self.view.set_search_query("");
                } else {
                    self.view.set_search_query(self.last_input.input.clone());
                }
                if self.last_input.finished {
                    debug!("Search finished with {:?}", self.view.search_query());
                    self.modus = Modus::Table;
                }
                Ok(())
            }
            Modus::Edit => {
                self.last_input = self.input.read(key);
                if !self.last_input.finished {
                    return Ok(());
                }
                self.modus = Modus::Table;
                match self.edit_key.take() {
                    Some(key) if !self.last_input.canceled => {
                        self.settings.set_text(key, &self.last_input.input)
                    }
                    _ => Ok(()),
                }
            }
            Modus::Dialog => self.dialog_input(key),
            Modus::Table | Modus::Popup => Ok(()),
        }
    }

    // -------------------------- Control handling ---------------------------- //

    fn show_help(&mut self) {
        self.previous_modus = self.modus;
        self.modus = Modus::Popup;
    }

    fn close_popup(&mut self) {
        trace!("Close popup ...");
        self.modus = self.previous_modus;
        self.previous_modus = Modus::Popup;
    }

    fn goto_screen(&mut self, screen: Screen) {
        if !self.config.features.enabled(screen) {
            debug!("Screen {:?} is disabled", screen);
            return;
        }
        if screen == self.screen {
            return;
        }
        info!("Switching to {}", screen.title());
        self.screen = screen;
        // A fresh screen starts with fresh table and tab state
        self.view = ViewState::default();
        self.media.select_tab(0);
        self.settings.select_section(0);
    }

    fn step_screen(&mut self, step: isize) {
        let screens = self.screens();
        let n = screens.len() as isize;
        let current = screens.iter().position(|s| *s == self.screen).unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(n.max(1)) as usize;
        if let Some(screen) = screens.get(next) {
            self.goto_screen(*screen);
        }
    }

    fn step_tab(&mut self, step: isize) {
        let (tabs, active) = self.tabs();
        if tabs.is_empty() {
            return;
        }
        let next = (active as isize + step).rem_euclid(tabs.len() as isize) as usize;
        debug!("Tab {} -> {}", tabs[active], tabs[next]);
        match self.screen {
            Screen::Settings => self.settings.select_section(next),
            _ => {
                if let Some(manager) = self.manager_mut() {
                    manager.select_tab(next);
                }
            }
        }
        self.view = ViewState::default();
    }

    fn move_down(&mut self) {
        if let Some(frame) = self.table_frame() {
            self.view.select_next(frame.rows.len());
        }
    }

    fn next_page(&mut self) {
        if let Some(frame) = self.table_frame()
            && frame.show_pager
        {
            self.view.next_page(frame.page_count);
        }
    }

    /// Brings page and cursor back into range after rows went away.
    fn clamp_view(&mut self) {
        if let Some(frame) = self.table_frame() {
            self.view.clamp(frame.page_count, usize::MAX);
        }
        if let Some(frame) = self.table_frame() {
            self.view.clamp(frame.page_count, frame.rows.len());
        }
    }

    fn enter_search(&mut self) {
        if !self.table_frame().is_some_and(|f| f.show_search) {
            return;
        }
        trace!("Entering search mode ...");
        self.input = Inputter::with_value(self.view.search_query());
        self.last_input = self.input.get();
        self.modus = Modus::Search;
    }

    fn open_dialog(&mut self) {
        let Some(spec) = self.manager().map(|m| m.form()) else {
            return;
        };
        debug!("Opening dialog {:?}", spec.title);
        self.form = Some(Form::new(spec));
        self.modus = Modus::Dialog;
    }

    fn dialog_input(&mut self, key: KeyEvent) -> Result<(), CMSError> {
        let Some(mut form) = self.form.take() else {
            self.modus = Modus::Table;
            return Ok(());
        };
        match form.handle_key(key) {
            FormEvent::None => {
                self.form = Some(form);
                Ok(())
            }
            FormEvent::Cancel => {
                debug!("Dialog {:?} canceled", form.spec().title);
                self.modus = Modus::Table;
                Ok(())
            }
            FormEvent::Submit => {
                let result = match self.manager_mut() {
                    Some(manager) => manager.create(&form),
                    None => Ok(Toast::info("Nothing to create", "")),
                };
                match result {
                    Ok(toast) => {
                        self.notify(toast);
                        self.modus = Modus::Table;
                        self.clamp_view();
                        Ok(())
                    }
                    Err(e) => {
                        // Keep the dialog open so the input can be fixed
                        self.form = Some(form);
                        Err(e)
                    }
                }
            }
        }
    }

    fn delete_selected(&mut self) -> Result<(), CMSError> {
        if self.manager().is_none() {
            return Ok(());
        }
        let Some(id) = self.selected_record().and_then(|r| r.id()) else {
            trace!("Nothing selected to delete");
            return Ok(());
        };
        if let Some(manager) = self.manager_mut() {
            let toast = manager.delete(id)?;
            self.notify(toast);
        }
        self.clamp_view();
        Ok(())
    }

    fn wrap_cell_content(c: &str) -> String {
        let needs_escaping = c.contains('"');
        let needs_wrapping = c.chars().any(|c| c == ' ' || c == '\t' || c == ',');
        let mut out = String::from(c);

        if needs_escaping {
            out = out.replace('"', "\"\"");
        }
        if needs_wrapping || needs_escaping {
            out = format!("\"{out}\"");
        }
        out
    }

    /// The selected row as one CSV line, in column order.
    fn selected_row_as_csv(&self) -> Option<String> {
        let (columns, _, _) = self.table_data()?;
        let record = self.selected_record()?;
        let content = columns
            .iter()
            .map(|c| {
                let value = record
                    .get(&c.accessor_key)
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                Model::wrap_cell_content(&value)
            })
            .collect::<Vec<String>>();
        Some(content.join(","))
    }

    fn copy_selected_row(&mut self) {
        let Some(row_content) = self.selected_row_as_csv() else {
            return;
        };
        trace!("Row content: {}", row_content);

        if self.clipboard.is_none() {
            match Clipboard::new() {
                Ok(clipboard) => self.clipboard = Some(clipboard),
                Err(e) => {
                    error!("Clipboard unavailable: {:?}", e);
                    self.notify(Toast::error("Copy failed", "No clipboard available."));
                    return;
                }
            }
        }
        let result = match self.clipboard.as_mut() {
            Some(clipboard) => clipboard.set_text(row_content),
            None => return,
        };
        match result {
            Ok(_) => {
                trace!("Copied row content to clipboard.");
                self.notify(Toast::info("Copied", "Row copied to clipboard."));
            }
            Err(e) => {
                error!("Error copying to clipboard: {:?}", e);
                self.notify(Toast::error("Copy failed", e.to_string()));
            }
        }
    }

    fn selected_setting(&self) -> Option<(&'static str, SettingValue)> {
        if self.screen != Screen::Settings {
            return None;
        }
        self.settings
            .visible()
            .get(self.view.selected())
            .map(|s| (s.key, s.value.clone()))
    }

    fn edit_selected_setting(&mut self) -> Result<(), CMSError> {
        match self.selected_setting() {
            Some((key, SettingValue::Text(text))) => {
                trace!("Editing setting {}", key);
                self.input = Inputter::with_value(&text);
                self.last_input = self.input.get();
                self.edit_key = Some(key);
                self.modus = Modus::Edit;
                Ok(())
            }
            Some((key, SettingValue::Switch(_))) => {
                self.settings.toggle(key)?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn toggle_selected_setting(&mut self) -> Result<(), CMSError> {
        if let Some((key, SettingValue::Switch(_))) = self.selected_setting() {
            self.settings.toggle(key)?;
        }
        Ok(())
    }

    fn notify(&mut self, toast: Toast) {
        info!("{}: {}", toast.title, toast.description);
        self.toast = Some(toast);
    }

    fn expire_toast(&mut self) {
        let ttl = Duration::from_secs(self.config.toast_duration_secs);
        if self.toast.as_ref().is_some_and(|t| t.is_expired(ttl)) {
            trace!("Toast expired");
            self.toast = None;
        }
    }
}
