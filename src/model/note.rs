// File: ./src/model/note.rs
// Read-only note snapshot: identifier, title, color class and attributes.
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Label,
    Relation,
}

/// A (type, name, value) triple attached to a note. For labels the value is
/// the literal string; for relations it is the target note's identifier.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn label(name: &str, value: &str) -> Self {
        Self {
            attr_type: AttributeType::Label,
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    pub fn relation(name: &str, target_note_id: &str) -> Self {
        Self {
            attr_type: AttributeType::Relation,
            name: name.to_string(),
            value: target_note_id.to_string(),
        }
    }
}

/// A logically immutable snapshot of a note as fetched from the store.
/// Attributes keep their declaration order; the builder relies on it.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Note {
    pub note_id: String,
    pub title: String,
    pub color_class: Option<String>,
    pub attributes: Vec<Attribute>,
    pub child_note_ids: Vec<String>,
}

impl Note {
    pub fn new(note_id: &str, title: &str) -> Self {
        Self {
            note_id: note_id.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, name: &str, value: &str) -> Self {
        self.attributes.push(Attribute::label(name, value));
        self
    }

    pub fn with_relation(mut self, name: &str, target_note_id: &str) -> Self {
        self.attributes.push(Attribute::relation(name, target_note_id));
        self
    }

    pub fn with_color_class(mut self, color_class: &str) -> Self {
        self.color_class = Some(color_class.to_string());
        self
    }

    pub fn with_child(mut self, child_note_id: &str) -> Self {
        self.child_note_ids.push(child_note_id.to_string());
        self
    }

    /// Value of the first attribute matching (type, name), if any.
    pub fn get_attribute_value(&self, attr_type: AttributeType, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.attr_type == attr_type && a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn get_label_value(&self, name: &str) -> Option<&str> {
        self.get_attribute_value(AttributeType::Label, name)
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.get_label_value(name).is_some()
    }

    /// All relation attributes of the given name, in declaration order.
    pub fn get_relations(&self, name: &str) -> Vec<&Attribute> {
        self.attributes
            .iter()
            .filter(|a| a.attr_type == AttributeType::Relation && a.name == name)
            .collect()
    }

    pub fn get_attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn get_color_class(&self) -> Option<&str> {
        self.color_class.as_deref()
    }

    pub fn has_children(&self) -> bool {
        !self.child_note_ids.is_empty()
    }
}
