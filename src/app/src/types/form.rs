use serde::{Deserialize, Serialize};

use super::network::NetworkCombo;

/// Kind of a single-line input element
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum InputKind {
    #[default]
    Text,
    Password,
    Number,
    ReadOnly,
}

/// An option of a select element
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// State of a rendered form element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Widget {
    Input {
        kind: InputKind,
        placeholder: Option<String>,
        value: String,
    },
    Checkbox {
        checked: bool,
    },
    Select {
        options: Vec<SelectOption>,
        selected: Option<usize>,
    },
    Network(NetworkCombo),
}

impl Widget {
    pub fn input(kind: InputKind, placeholder: Option<&str>) -> Self {
        Self::Input {
            kind,
            placeholder: placeholder.map(str::to_string),
            value: String::new(),
        }
    }

    /// Short name of the widget kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Input { .. } => "input",
            Self::Checkbox { .. } => "checkbox",
            Self::Select { .. } => "select",
            Self::Network(_) => "network combo",
        }
    }
}

/// One labelled widget addressed by `${setting}_${variable}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldView {
    pub id: String,
    pub label: String,
    /// Grid width out of twelve columns, `None` means full width
    pub columns: Option<u8>,
    pub widget: Widget,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowView {
    pub fields: Vec<FieldView>,
}

/// A setting rendered as a heading followed by rows of fields
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionView {
    pub name: String,
    pub title: String,
    pub rows: Vec<RowView>,
}

/// The rendered settings form
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormView {
    pub sections: Vec<SectionView>,
}

impl FormView {
    pub fn fields(&self) -> impl Iterator<Item = &FieldView> {
        self.sections
            .iter()
            .flat_map(|s| s.rows.iter())
            .flat_map(|r| r.fields.iter())
    }

    pub fn fields_mut(&mut self) -> impl Iterator<Item = &mut FieldView> {
        self.sections
            .iter_mut()
            .flat_map(|s| s.rows.iter_mut())
            .flat_map(|r| r.fields.iter_mut())
    }

    pub fn field(&self, id: &str) -> Option<&FieldView> {
        self.fields().find(|f| f.id == id)
    }

    pub fn field_mut(&mut self, id: &str) -> Option<&mut FieldView> {
        self.fields_mut().find(|f| f.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
