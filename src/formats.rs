//! Link formats and the interactive choice surface
//!
//! Everything here is transport-agnostic: a [`Surface`] is plain text plus
//! rows of labeled actions. The Telegram layer turns it into an inline
//! keyboard (see `bot::views`).

use crate::session::SessionStore;
use std::fmt;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────────────────────
// Fixed texts and callback data
// ─────────────────────────────────────────────────────────────────────────────

/// Prompt shown above the four format buttons
pub const CHOICE_PROMPT: &str = "✅ Upload complete! Choose a link format:";
/// Shown when the user has no stored link for the requested format
pub const NOT_FOUND_PLACEHOLDER: &str = "Link not found. Please upload the image again.";
/// Callback data for going back to the format menu
pub const RETURN_ACTION: &str = "return";
/// Label of the "return" button
pub const RETURN_LABEL: &str = "⬅️ Back";

/// One of the four link representations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKey {
    /// The bare URL
    Direct,
    /// `<img>` tag
    Html,
    /// `[img]` tag
    BbCode,
    /// `![image](...)` syntax
    Markdown,
}

impl FormatKey {
    /// All formats in menu order
    pub const ALL: [Self; 4] = [Self::Direct, Self::Html, Self::BbCode, Self::Markdown];

    /// Callback data / lookup key
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Html => "html",
            Self::BbCode => "bbcode",
            Self::Markdown => "markdown",
        }
    }

    /// Button label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Direct => "🔗 Direct link",
            Self::Html => "🌐 HTML",
            Self::BbCode => "📋 BBCode",
            Self::Markdown => "📝 Markdown",
        }
    }
}

impl fmt::Display for FormatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or(())
    }
}

/// The four derived representations of an uploaded image URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSet {
    /// Bare URL
    pub direct: String,
    /// HTML image tag
    pub html: String,
    /// BBCode image tag
    pub bbcode: String,
    /// Markdown image
    pub markdown: String,
}

impl FormatSet {
    /// Rendered text for `key`
    #[must_use]
    pub fn get(&self, key: FormatKey) -> &str {
        match key {
            FormatKey::Direct => &self.direct,
            FormatKey::Html => &self.html,
            FormatKey::BbCode => &self.bbcode,
            FormatKey::Markdown => &self.markdown,
        }
    }
}

/// Build every format from a hosted image URL.
///
/// # Examples
///
/// ```
/// use imglink_bot::formats::derive_formats;
///
/// let set = derive_formats("https://x/y.png");
/// assert_eq!(set.bbcode, "[img]https://x/y.png[/img]");
/// ```
#[must_use]
pub fn derive_formats(url: &str) -> FormatSet {
    FormatSet {
        direct: url.to_string(),
        html: format!(r#"<img src="{url}" alt="image">"#),
        bbcode: format!("[img]{url}[/img]"),
        markdown: format!("![image]({url})"),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Surfaces
// ─────────────────────────────────────────────────────────────────────────────

/// A button: label plus opaque callback data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// Text on the button
    pub label: String,
    /// Data sent back when the button is pressed
    pub data: String,
}

impl Action {
    fn new(label: &str, data: &str) -> Self {
        Self {
            label: label.to_string(),
            data: data.to_string(),
        }
    }
}

/// Message text with optional rows of actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    /// Message body
    pub text: String,
    /// Button rows (empty for plain text replies)
    pub actions: Vec<Vec<Action>>,
}

impl Surface {
    /// Plain text, no buttons
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            actions: Vec::new(),
        }
    }

    /// Flattened view of all actions
    pub fn all_actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter().flatten()
    }
}

/// What a pressed button asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionAction {
    /// Show one stored format
    Show(FormatKey),
    /// Go back to the format menu
    Return,
}

impl SelectionAction {
    /// Parse callback data; unknown data yields `None`
    #[must_use]
    pub fn parse(data: &str) -> Option<Self> {
        if data == RETURN_ACTION {
            return Some(Self::Return);
        }
        data.parse().ok().map(Self::Show)
    }
}

/// The fixed format menu: one action per format, two per row.
#[must_use]
pub fn render_choice_surface() -> Surface {
    let actions = FormatKey::ALL
        .chunks(2)
        .map(|row| {
            row.iter()
                .map(|key| Action::new(key.label(), key.as_str()))
                .collect()
        })
        .collect();

    Surface {
        text: CHOICE_PROMPT.to_string(),
        actions,
    }
}

/// Look up the stored text for `key` and wrap it with a single "return" action.
///
/// A missing user or format yields [`NOT_FOUND_PLACEHOLDER`].
pub async fn render_selection(key: FormatKey, session: &SessionStore, user_id: i64) -> Surface {
    let text = session
        .get(user_id, key)
        .await
        .unwrap_or_else(|| NOT_FOUND_PLACEHOLDER.to_string());

    Surface {
        text,
        actions: vec![vec![Action::new(RETURN_LABEL, RETURN_ACTION)]],
    }
}
