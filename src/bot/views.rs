//! Surface → Telegram markup

use crate::formats::Surface;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Inline keyboard for a surface, `None` when it has no actions
#[must_use]
pub fn keyboard(surface: &Surface) -> Option<InlineKeyboardMarkup> {
    if surface.actions.is_empty() {
        return None;
    }

    let rows = surface.actions.iter().map(|row| {
        row.iter()
            .map(|action| InlineKeyboardButton::callback(action.label.clone(), action.data.clone()))
            .collect::<Vec<_>>()
    });
    Some(InlineKeyboardMarkup::new(rows))
}
