use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::trace;

use crate::inputter::Inputter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Text that is masked when drawn.
    Password,
    Checkbox(bool),
    Select {
        options: &'static [&'static str],
        default: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub placeholder: &'static str,
    pub hint: Option<&'static str>,
}

impl FormField {
    pub fn text(key: &'static str, label: &'static str, placeholder: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Text,
            placeholder,
            hint: None,
        }
    }

    pub fn password(key: &'static str, label: &'static str, placeholder: &'static str) -> Self {
        Self {
            kind: FieldKind::Password,
            ..Self::text(key, label, placeholder)
        }
    }

    pub fn checkbox(key: &'static str, label: &'static str, checked: bool) -> Self {
        Self {
            kind: FieldKind::Checkbox(checked),
            ..Self::text(key, label, "")
        }
    }

    pub fn select(
        key: &'static str,
        label: &'static str,
        options: &'static [&'static str],
        default: usize,
    ) -> Self {
        Self {
            kind: FieldKind::Select { options, default },
            ..Self::text(key, label, "")
        }
    }

    pub fn with_hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }
}

/// Static description of a creation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSpec {
    pub title: &'static str,
    pub description: &'static str,
    pub submit_label: &'static str,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone)]
pub enum FieldValue {
    Text(Inputter),
    Flag(bool),
    Choice(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    None,
    Submit,
    Cancel,
}

/// An open dialog: its fields plus the values entered so far.
#[derive(Debug, Clone)]
pub struct Form {
    spec: FormSpec,
    values: Vec<FieldValue>,
    focus: usize,
}

impl Form {
    pub fn new(spec: FormSpec) -> Self {
        let values = spec
            .fields
            .iter()
            .map(|f| match f.kind {
                FieldKind::Text | FieldKind::Password => FieldValue::Text(Inputter::default()),
                FieldKind::Checkbox(checked) => FieldValue::Flag(checked),
                FieldKind::Select { default, .. } => FieldValue::Choice(default),
            })
            .collect();
        Self {
            spec,
            values,
            focus: 0,
        }
    }

    pub fn spec(&self) -> &FormSpec {
        &self.spec
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn fields(&self) -> impl Iterator<Item = (&FormField, &FieldValue)> {
        self.spec.fields.iter().zip(self.values.iter())
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.spec.fields.iter().position(|f| f.key == key)
    }

    /// Entered text, empty for unknown keys.
    pub fn text(&self, key: &str) -> &str {
        match self.position(key).map(|idx| &self.values[idx]) {
            Some(FieldValue::Text(inputter)) => inputter.value(),
            _ => "",
        }
    }

    pub fn flag(&self, key: &str) -> bool {
        matches!(
            self.position(key).map(|idx| &self.values[idx]),
            Some(FieldValue::Flag(true))
        )
    }

    /// Selected option, empty for unknown keys.
    pub fn choice(&self, key: &str) -> &'static str {
        let Some(idx) = self.position(key) else {
            return "";
        };
        match (&self.spec.fields[idx].kind, &self.values[idx]) {
            (FieldKind::Select { options, .. }, FieldValue::Choice(choice)) => {
                options.get(*choice).copied().unwrap_or_default()
            }
            _ => "",
        }
    }

    pub fn set_text(&mut self, key: &str, value: &str) {
        if let Some(FieldValue::Text(inputter)) =
            self.position(key).map(|idx| &mut self.values[idx])
        {
            inputter.set(value);
        }
    }

    pub fn set_flag(&mut self, key: &str, value: bool) {
        if let Some(FieldValue::Flag(flag)) = self.position(key).map(|idx| &mut self.values[idx]) {
            *flag = value;
        }
    }

    pub fn set_choice(&mut self, key: &str, option: &str) {
        let Some(idx) = self.position(key) else {
            return;
        };
        if let (FieldKind::Select { options, .. }, FieldValue::Choice(choice)) =
            (&self.spec.fields[idx].kind, &mut self.values[idx])
            && let Some(pos) = options.iter().position(|o| *o == option)
        {
            *choice = pos;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => return FormEvent::Cancel,
            (KeyCode::Enter, _) => return FormEvent::Submit,
            (KeyCode::Tab, _) | (KeyCode::Down, _) => self.focus_next(),
            (KeyCode::BackTab, _) | (KeyCode::Up, _) => self.focus_previous(),
            _ => self.edit_focused(key),
        }
        FormEvent::None
    }

    fn focus_next(&mut self) {
        if !self.values.is_empty() {
            self.focus = (self.focus + 1) % self.values.len();
        }
    }

    fn focus_previous(&mut self) {
        if !self.values.is_empty() {
            self.focus = (self.focus + self.values.len() - 1) % self.values.len();
        }
    }

    fn edit_focused(&mut self, key: KeyEvent) {
        let Some(field) = self.spec.fields.get(self.focus) else {
            return;
        };
        match (&field.kind, &mut self.values[self.focus]) {
            (_, FieldValue::Text(inputter)) => {
                inputter.read(key);
            }
            (_, FieldValue::Flag(flag)) => {
                if key.code == KeyCode::Char(' ') && key.modifiers == KeyModifiers::NONE {
                    *flag = !*flag;
                }
            }
            (FieldKind::Select { options, .. }, FieldValue::Choice(choice)) => {
                let n = options.len().max(1);
                match key.code {
                    KeyCode::Right | KeyCode::Char(' ') => *choice = (*choice + 1) % n,
                    KeyCode::Left => *choice = (*choice + n - 1) % n,
                    _ => {}
                }
            }
            (kind, _) => trace!("No editor for {kind:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLORS: &[&str] = &["Red", "Green", "Blue"];

    fn spec() -> FormSpec {
        FormSpec {
            title: "Test",
            description: "",
            submit_label: "Create",
            fields: vec![
                FormField::text("name", "Name", ""),
                FormField::checkbox("flag", "Flag", true),
                FormField::select("color", "Color", COLORS, 1),
            ],
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn defaults_come_from_field_kinds() {
        let form = Form::new(spec());
        assert_eq!(form.text("name"), "");
        assert!(form.flag("flag"));
        assert_eq!(form.choice("color"), "Green");
        assert_eq!(form.choice("missing"), "");
    }

    #[test]
    fn keys_edit_the_focused_field() {
        let mut form = Form::new(spec());
        for c in "Bob".chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(form.text("name"), "Bob");

        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Char(' ')));
        assert!(!form.flag("flag"));

        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Left));
        form.handle_key(key(KeyCode::Left));
        assert_eq!(form.choice("color"), "Blue");

        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.focus(), 0);
        form.handle_key(key(KeyCode::BackTab));
        assert_eq!(form.focus(), 2);
    }

    #[test]
    fn enter_submits_and_escape_cancels() {
        let mut form = Form::new(spec());
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormEvent::Submit);
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormEvent::Cancel);
        assert_eq!(form.handle_key(key(KeyCode::Char('x'))), FormEvent::None);
    }

    #[test]
    fn setters_ignore_mismatched_fields() {
        let mut form = Form::new(spec());
        form.set_text("flag", "nope");
        form.set_choice("color", "Purple");
        form.set_choice("color", "Red");
        form.set_flag("flag", false);
        assert!(!form.flag("flag"));
        assert_eq!(form.choice("color"), "Red");
    }
}
