//! Status vocabulary shared by every closed enumeration in the back office
//!
//! Each enumeration carries a table of `(value, token, Hebrew label, English label)`
//! rows in its fixed display order. Tokens are the snake_case strings stored in
//! the database and exchanged with the browser.

use crate::types::Language;

/// One row of a status vocabulary table
#[derive(Debug)]
pub struct StatusEntry<S: 'static> {
    pub value: S,
    pub token: &'static str,
    pub label_he: &'static str,
    pub label_en: &'static str,
}

/// A closed set of string tokens with fixed display labels
pub trait StatusToken: Copy + Eq + Sized + 'static {
    /// Every value in display order; `ENTRIES[v.index()].value == v`
    const ENTRIES: &'static [StatusEntry<Self>];

    /// Position of this value in `ENTRIES`
    fn index(&self) -> usize;

    fn all() -> Vec<Self> {
        Self::ENTRIES.iter().map(|e| e.value).collect()
    }

    fn entry(&self) -> &'static StatusEntry<Self> {
        &Self::ENTRIES[self.index()]
    }

    fn as_str(&self) -> &'static str {
        self.entry().token
    }

    /// Strict parse: unknown tokens yield `None`
    fn parse(token: &str) -> Option<Self> {
        Self::ENTRIES
            .iter()
            .find(|e| e.token == token)
            .map(|e| e.value)
    }

    fn label_he(&self) -> &'static str {
        self.entry().label_he
    }

    fn label_en(&self) -> &'static str {
        self.entry().label_en
    }

    fn label(&self, lang: Language) -> &'static str {
        match lang {
            Language::Hebrew => self.label_he(),
            Language::English => self.label_en(),
        }
    }
}

/// Label for a raw token, falling back to the token itself when it is unknown
pub fn label_of<S: StatusToken>(token: &str, lang: Language) -> String {
    match S::parse(token) {
        Some(status) => status.label(lang).to_string(),
        None => token.to_string(),
    }
}

/// Which statuses may directly follow a given one
pub trait StatusFlow: StatusToken {
    fn allowed_next(&self) -> Vec<Self>;

    fn can_transition_to(&self, next: Self) -> bool {
        self.allowed_next().contains(&next)
    }
}

/// Flow for statuses that may be reassigned to any other value
pub fn any_other<S: StatusToken>(current: S) -> Vec<S> {
    S::all().into_iter().filter(|s| *s != current).collect()
}

#[cfg(test)]
pub(crate) fn assert_table_consistent<S: StatusToken + std::fmt::Debug>() {
    for (i, entry) in S::ENTRIES.iter().enumerate() {
        assert_eq!(entry.value.index(), i, "entry {:?} out of order", entry.value);
        assert!(!entry.label_he.is_empty());
        assert!(!entry.label_en.is_empty());
        assert!(entry
            .token
            .chars()
            .all(|c| c.is_ascii_lowercase() || c == '_'));
        assert_eq!(S::parse(entry.token), Some(entry.value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImportStatus, LocalProductionStatus, OrderStatus};

    #[test]
    fn test_label_of_known_token() {
        assert_eq!(label_of::<OrderStatus>("draft", Language::Hebrew), "טיוטה");
        assert_eq!(label_of::<OrderStatus>("draft", Language::English), "Draft");
    }

    #[test]
    fn test_label_of_unknown_token_falls_back_to_key() {
        assert_eq!(
            label_of::<OrderStatus>("on_hold", Language::Hebrew),
            "on_hold"
        );
        assert_eq!(label_of::<ImportStatus>("", Language::English), "");
    }

    #[test]
    fn test_parse_is_strict() {
        assert_eq!(OrderStatus::parse("Draft"), None);
        assert_eq!(OrderStatus::parse(" draft"), None);
        assert_eq!(
            LocalProductionStatus::parse("ready_ship"),
            Some(LocalProductionStatus::ReadyShip)
        );
    }

    #[test]
    fn test_any_other_excludes_current() {
        let next = any_other(LocalProductionStatus::Printing);
        assert_eq!(next.len(), 5);
        assert!(!next.contains(&LocalProductionStatus::Printing));
    }
}
