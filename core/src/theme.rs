use std::str::FromStr;

use crate::config::THEME_KEY;
use crate::models::UnknownVariant;
use crate::session::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Stored preference first, then the system preference, then light.
    #[must_use]
    pub fn resolve(store: &dyn KeyValueStore, prefers_dark: bool) -> Self {
        store
            .get(THEME_KEY)
            .and_then(|stored| stored.parse().ok())
            .unwrap_or(if prefers_dark { Theme::Dark } else { Theme::Light })
    }

    pub fn persist(self, store: &dyn KeyValueStore) {
        store.set(THEME_KEY, self.as_str());
    }
}

impl FromStr for Theme {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(UnknownVariant {
                kind: "theme",
                value: other.to_string(),
            }),
        }
    }
}
