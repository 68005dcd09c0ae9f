//! Form state generated from a converter's interface declaration
//!
//! Exclusive groups become [`Section::Choice`]: a radio selector where only
//! the selected member's input is visible. Other groups, and the top-level
//! arguments, become [`Section::Plain`] lists of inputs.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::{
    Argument, ArgumentType, Converter, DeclarationError, InterfaceBuilder, Value, Values,
};

/// Which control an input is rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line text
    Line,
    /// Multiline text; Enter inserts a newline
    Area,
    /// Checkbox
    Check,
    /// Single-line path with a file picker on Ctrl+O
    SavePath,
}

impl From<ArgumentType> for FieldKind {
    fn from(kind: ArgumentType) -> Self {
        match kind {
            ArgumentType::String => FieldKind::Line,
            ArgumentType::Text => FieldKind::Area,
            ArgumentType::Flag => FieldKind::Check,
            ArgumentType::FileSave => FieldKind::SavePath,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub label: String,
    pub help: String,
    pub kind: FieldKind,
    pub text: String,
    pub checked: bool,
}

impl Field {
    fn from_argument(argument: &Argument) -> Self {
        Self {
            name: argument.name.clone(),
            label: argument.display_label().to_string(),
            help: argument.help.clone(),
            kind: argument.kind.into(),
            text: argument.default.clone().unwrap_or_default(),
            checked: false,
        }
    }

    /// Value of this field when it is the active member of a choice.
    fn selected_value(&self) -> Value {
        match self.kind {
            FieldKind::Check => Value::Flag(true),
            FieldKind::SavePath => Value::Path(PathBuf::from(self.text.trim())),
            FieldKind::Line | FieldKind::Area => Value::Text(self.text.clone()),
        }
    }

    /// Value of this field in a plain section, if it was filled in.
    fn filled_value(&self) -> Option<Value> {
        match self.kind {
            FieldKind::Check => self.checked.then_some(Value::Flag(true)),
            _ if self.text.trim().is_empty() => None,
            _ => Some(self.selected_value()),
        }
    }

    /// Whether the field takes an input of its own when selected in a choice.
    pub fn has_input(&self) -> bool {
        self.kind != FieldKind::Check
    }
}

/// A radio selector over the members of an exclusive group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// When false a `(none)` option is offered
    pub required: bool,
    pub options: Vec<Field>,
    pub selected: Option<usize>,
}

impl Choice {
    pub fn selected_field(&self) -> Option<&Field> {
        self.selected.and_then(|index| self.options.get(index))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Choice(Choice),
    Plain(Vec<Field>),
}

/// Something keyboard focus can rest on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// A radio option; `None` is the `(none)` entry
    Radio { section: usize, option: Option<usize> },
    /// An input, by section and position within it
    Field { section: usize, field: usize },
    Execute,
}

/// What the owner of the form should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    None,
    Execute,
    /// Open the file picker for the named save field
    OpenPicker(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub sections: Vec<Section>,
    pub focus: Focus,
}

impl Form {
    /// Declare `converter`'s interface and build its form.
    pub fn new(converter: &dyn Converter) -> Result<Self, DeclarationError> {
        let interface = InterfaceBuilder::declare(converter)?;
        Ok(Self::from_interface(&interface))
    }

    pub fn from_interface(interface: &InterfaceBuilder) -> Self {
        let mut sections: Vec<Section> = interface
            .groups
            .iter()
            .map(|group| {
                let fields: Vec<Field> = group.arguments.iter().map(Field::from_argument).collect();
                if group.exclusive {
                    Section::Choice(Choice {
                        required: group.required,
                        selected: (group.required && !fields.is_empty()).then_some(0),
                        options: fields,
                    })
                } else {
                    Section::Plain(fields)
                }
            })
            .collect();

        if !interface.arguments.is_empty() {
            sections.push(Section::Plain(
                interface.arguments.iter().map(Field::from_argument).collect(),
            ));
        }

        let mut form = Self {
            sections,
            focus: Focus::Execute,
        };
        if let Some(first) = form.focus_targets().first() {
            form.focus = *first;
        }
        form
    }

    /// Focusable controls in display order. Inputs of unselected choice
    /// members are not part of the form until selected.
    pub fn focus_targets(&self) -> Vec<Focus> {
        let mut targets = Vec::new();
        for (section_index, section) in self.sections.iter().enumerate() {
            match section {
                Section::Choice(choice) => {
                    if !choice.required {
                        targets.push(Focus::Radio {
                            section: section_index,
                            option: None,
                        });
                    }
                    targets.extend((0..choice.options.len()).map(|option| Focus::Radio {
                        section: section_index,
                        option: Some(option),
                    }));
                    if let Some(index) = choice.selected {
                        if choice.options.get(index).is_some_and(Field::has_input) {
                            targets.push(Focus::Field {
                                section: section_index,
                                field: index,
                            });
                        }
                    }
                }
                Section::Plain(fields) => {
                    targets.extend((0..fields.len()).map(|field| Focus::Field {
                        section: section_index,
                        field,
                    }));
                }
            }
        }
        targets.push(Focus::Execute);
        targets
    }

    /// Whether the member `field` of `section` is currently shown.
    pub fn is_visible(&self, section: usize, field: usize) -> bool {
        match self.sections.get(section) {
            Some(Section::Choice(choice)) => choice.selected == Some(field),
            Some(Section::Plain(fields)) => field < fields.len(),
            None => false,
        }
    }

    pub fn field(&self, section: usize, field: usize) -> Option<&Field> {
        match self.sections.get(section)? {
            Section::Choice(choice) => choice.options.get(field),
            Section::Plain(fields) => fields.get(field),
        }
    }

    fn field_mut(&mut self, section: usize, field: usize) -> Option<&mut Field> {
        match self.sections.get_mut(section)? {
            Section::Choice(choice) => choice.options.get_mut(field),
            Section::Plain(fields) => fields.get_mut(field),
        }
    }

    pub fn focused_field(&self) -> Option<&Field> {
        match self.focus {
            Focus::Field { section, field } => self.field(section, field),
            _ => None,
        }
    }

    pub fn focus_next(&mut self) {
        self.move_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.move_focus(-1);
    }

    fn move_focus(&mut self, step: isize) {
        let targets = self.focus_targets();
        let len = targets.len() as isize;
        let current = targets
            .iter()
            .position(|target| *target == self.focus)
            .unwrap_or(0) as isize;
        self.focus = targets[(current + step).rem_euclid(len) as usize];
    }

    /// Select a radio option of the choice in `section`.
    pub fn select(&mut self, section: usize, option: Option<usize>) {
        if let Some(Section::Choice(choice)) = self.sections.get_mut(section) {
            if option.is_none() && choice.required {
                return;
            }
            match option {
                Some(index) if index >= choice.options.len() => {}
                _ => choice.selected = option,
            }
        }
    }

    /// Replace the text of the field called `name`.
    pub fn set_text(&mut self, name: &str, text: impl Into<String>) -> bool {
        let text = text.into();
        for section in &mut self.sections {
            let fields = match section {
                Section::Choice(choice) => &mut choice.options,
                Section::Plain(fields) => fields,
            };
            if let Some(field) = fields.iter_mut().find(|field| field.name == name) {
                field.text = text;
                return true;
            }
        }
        false
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::F(5) => return FormAction::Execute,
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                return FormAction::None;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                return FormAction::None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Execute => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => FormAction::Execute,
                _ => FormAction::None,
            },
            Focus::Radio { section, option } => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.select(section, option);
                }
                FormAction::None
            }
            Focus::Field { section, field } => {
                let Some(target) = self.field_mut(section, field) else {
                    return FormAction::None;
                };
                match (target.kind, key.code) {
                    (FieldKind::Check, KeyCode::Enter | KeyCode::Char(' ')) => {
                        target.checked = !target.checked;
                        FormAction::None
                    }
                    (FieldKind::SavePath, KeyCode::Char('o')) if ctrl => {
                        FormAction::OpenPicker(target.name.clone())
                    }
                    (FieldKind::Check, _) => FormAction::None,
                    (_, KeyCode::Char('u')) if ctrl => {
                        target.text.clear();
                        FormAction::None
                    }
                    (FieldKind::Area, KeyCode::Enter) => {
                        target.text.push('\n');
                        FormAction::None
                    }
                    (_, KeyCode::Enter) => {
                        self.focus_next();
                        FormAction::None
                    }
                    (_, KeyCode::Backspace) => {
                        target.text.pop();
                        FormAction::None
                    }
                    (_, KeyCode::Char(c)) if !ctrl => {
                        target.text.push(c);
                        FormAction::None
                    }
                    _ => FormAction::None,
                }
            }
        }
    }

    /// Values for the current state: the active member of each choice and
    /// every filled-in plain input.
    pub fn collect(&self) -> Values {
        let mut values = Values::new();
        for section in &self.sections {
            match section {
                Section::Choice(choice) => {
                    if let Some(field) = choice.selected_field() {
                        values.insert(field.name.clone(), field.selected_value());
                    }
                }
                Section::Plain(fields) => {
                    for field in fields {
                        if let Some(value) = field.filled_value() {
                            values.insert(field.name.clone(), value);
                        }
                    }
                }
            }
        }
        values
    }
}
