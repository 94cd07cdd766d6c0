//! Toolbar wiring and configuration for the embedded rich-text editor.
//!
//! Editing itself happens inside the browser editor. This module only
//! describes which command each toolbar button runs, the extension
//! settings the editor is created with, and how the HTML it emits is
//! normalised before storage.

use serde::Serialize;
use serde_json::{json, Value};

/// What the editor emits for a document with no content.
pub const EMPTY_DOCUMENT: &str = "<p></p>";

pub const HEADING_LEVELS: [u8; 3] = [1, 2, 3];
pub const LINK_PROTOCOLS: [&str; 2] = ["http", "https"];
pub const PLACEHOLDER: &str = "Contenido de la clase...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarCommand {
    Bold,
    Italic,
    Underline,
    Strike,
    Heading(u8),
    BulletList,
    OrderedList,
    Blockquote,
    Link,
    Code,
    CodeBlock,
    Undo,
    Redo,
}

impl ToolbarCommand {
    /// Buttons in the order they appear on the toolbar.
    pub fn toolbar() -> Vec<ToolbarCommand> {
        let mut buttons = vec![Self::Bold, Self::Italic, Self::Underline, Self::Strike];
        buttons.extend(HEADING_LEVELS.iter().map(|l| Self::Heading(*l)));
        buttons.extend([
            Self::BulletList,
            Self::OrderedList,
            Self::Blockquote,
            Self::Link,
            Self::Code,
            Self::CodeBlock,
            Self::Undo,
            Self::Redo,
        ]);
        buttons
    }

    pub fn label(self) -> String {
        match self {
            Self::Bold => "B".into(),
            Self::Italic => "I".into(),
            Self::Underline => "U".into(),
            Self::Strike => "S".into(),
            Self::Heading(level) => format!("H{}", level),
            Self::BulletList => "• Lista".into(),
            Self::OrderedList => "1. Lista".into(),
            Self::Blockquote => "Cita".into(),
            Self::Link => "Link".into(),
            Self::Code => "Código".into(),
            Self::CodeBlock => "Bloque código".into(),
            Self::Undo => "↶".into(),
            Self::Redo => "↷".into(),
        }
    }

    /// Editor chain command the button runs after focusing the editor.
    pub fn command(self) -> &'static str {
        match self {
            Self::Bold => "toggleBold",
            Self::Italic => "toggleItalic",
            Self::Underline => "toggleUnderline",
            Self::Strike => "toggleStrike",
            Self::Heading(_) => "toggleHeading",
            Self::BulletList => "toggleBulletList",
            Self::OrderedList => "toggleOrderedList",
            Self::Blockquote => "toggleBlockquote",
            // Link goes through a URL prompt; see `resolve_link_prompt`.
            Self::Link => "setLink",
            Self::Code => "toggleCode",
            Self::CodeBlock => "toggleCodeBlock",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }

    fn args(self) -> Value {
        match self {
            Self::Heading(level) => json!({ "level": level }),
            _ => Value::Null,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarButton {
    pub label: String,
    pub command: &'static str,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub args: Value,
}

impl From<ToolbarCommand> for ToolbarButton {
    fn from(cmd: ToolbarCommand) -> Self {
        ToolbarButton {
            label: cmd.label(),
            command: cmd.command(),
            args: cmd.args(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    pub heading_levels: Vec<u8>,
    pub link_open_on_click: bool,
    pub link_autolink: bool,
    pub link_protocols: Vec<&'static str>,
    pub placeholder: &'static str,
    pub empty_document: &'static str,
    pub toolbar: Vec<ToolbarButton>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            heading_levels: HEADING_LEVELS.to_vec(),
            link_open_on_click: false,
            link_autolink: true,
            link_protocols: LINK_PROTOCOLS.to_vec(),
            placeholder: PLACEHOLDER,
            empty_document: EMPTY_DOCUMENT,
            toolbar: ToolbarCommand::toolbar()
                .into_iter()
                .map(ToolbarButton::from)
                .collect(),
        }
    }
}

/// Outcome of the URL prompt opened by the link button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "href", rename_all = "lowercase")]
pub enum LinkAction {
    /// Prompt dismissed: leave the selection untouched.
    Keep,
    /// Empty answer removes the link around the selection.
    Unset,
    Set(String),
}

pub fn resolve_link_prompt(answer: Option<&str>) -> LinkAction {
    match answer {
        None => LinkAction::Keep,
        Some("") => LinkAction::Unset,
        Some(url) => LinkAction::Set(url.to_string()),
    }
}

/// Value the link prompt opens with.
pub fn link_prompt_default(previous_href: Option<&str>) -> String {
    previous_href.unwrap_or("https://").to_string()
}

pub fn normalize_content(html: &str) -> String {
    if html.trim().is_empty() {
        EMPTY_DOCUMENT.to_string()
    } else {
        html.to_string()
    }
}
