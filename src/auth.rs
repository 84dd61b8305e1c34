//! Allow-list authorization
//!
//! An empty allow-list means the bot is open to everyone.

use std::collections::HashSet;

/// Set of user identifiers permitted to use the bot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    ids: HashSet<String>,
}

impl AllowList {
    /// Parse a comma, semicolon or whitespace separated list of user IDs.
    ///
    /// `None` or a blank string gives an open allow-list.
    ///
    /// # Examples
    ///
    /// ```
    /// use imglink_bot::auth::AllowList;
    ///
    /// let list = AllowList::parse(Some("123, 456;789"));
    /// assert_eq!(list.len(), 3);
    /// assert!(AllowList::parse(None).is_open());
    /// ```
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        raw.map(|s| {
            s.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .collect::<Vec<_>>()
        })
        .map(Self::from_ids)
        .unwrap_or_default()
    }

    /// Build from explicit identifiers
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// True when no restriction is configured
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of configured identifiers
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when no identifiers are configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Decide whether `user_id` may use the bot.
///
/// Membership is an exact string match.
#[must_use]
pub fn is_allowed(user_id: &str, allow_list: &AllowList) -> bool {
    allow_list.is_open() || allow_list.ids.contains(user_id)
}
