//! Intercom Canvas Kit document types.
//!
//! Only the components this app renders are modelled.

use serde::{Deserialize, Serialize};

/// Top-level canvas response returned to Intercom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub canvas: CanvasBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasBody {
    pub content: Content,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub components: Vec<Component>,
}

/// A single canvas component, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Component {
    Text {
        id: String,
        text: String,
        align: Align,
        style: TextStyle,
    },
    Button {
        id: String,
        label: String,
        style: ButtonStyle,
        action: Action,
    },
}

/// What a button does when clicked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// Open a sheet iframe loaded from `url`
    Sheet { url: String },
    /// Submit the canvas back to the app
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    Header,
    Paragraph,
    Muted,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Link,
}

impl Canvas {
    pub fn new(components: Vec<Component>) -> Self {
        Self {
            canvas: CanvasBody {
                content: Content { components },
            },
        }
    }
}

impl Component {
    pub fn text(id: &str, text: &str, align: Align, style: TextStyle) -> Self {
        Component::Text {
            id: id.to_string(),
            text: text.to_string(),
            align,
            style,
        }
    }

    pub fn button(id: &str, label: &str, style: ButtonStyle, action: Action) -> Self {
        Component::Button {
            id: id.to_string(),
            label: label.to_string(),
            style,
            action,
        }
    }
}
