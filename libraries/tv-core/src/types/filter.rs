//! Filter and color-group keys
use serde::{Deserialize, Serialize};
use std::fmt;

/// Color of a sub-folder group inside a playlist
///
/// Declaration order is the cycle order used when stepping through filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorKey {
    Red,
    Green,
    Blue,
    Yellow,
    Orange,
    Purple,
    Pink,
    Cyan,
    Indigo,
}

impl ColorKey {
    /// Every color, in cycle order
    pub const ALL: [ColorKey; 9] = [
        ColorKey::Red,
        ColorKey::Green,
        ColorKey::Blue,
        ColorKey::Yellow,
        ColorKey::Orange,
        ColorKey::Purple,
        ColorKey::Pink,
        ColorKey::Cyan,
        ColorKey::Indigo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorKey::Red => "red",
            ColorKey::Green => "green",
            ColorKey::Blue => "blue",
            ColorKey::Yellow => "yellow",
            ColorKey::Orange => "orange",
            ColorKey::Purple => "purple",
            ColorKey::Pink => "pink",
            ColorKey::Cyan => "cyan",
            ColorKey::Indigo => "indigo",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|color| color.as_str() == s)
    }

    /// Display name used for freshly created groups
    pub fn display_name(&self) -> &'static str {
        match self {
            ColorKey::Red => "Red",
            ColorKey::Green => "Green",
            ColorKey::Blue => "Blue",
            ColorKey::Yellow => "Yellow",
            ColorKey::Orange => "Orange",
            ColorKey::Purple => "Purple",
            ColorKey::Pink => "Pink",
            ColorKey::Cyan => "Cyan",
            ColorKey::Indigo => "Indigo",
        }
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subset selector over a playlist's videos
///
/// Serialized as a plain string: `"all"` or a color key. Unknown strings
/// decode as `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterKey {
    /// Every video in playlist order
    #[default]
    All,

    /// Videos belonging to one color group
    Color(ColorKey),
}

impl FilterKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::All => "all",
            FilterKey::Color(color) => color.as_str(),
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        if s == "all" {
            return Some(FilterKey::All);
        }
        ColorKey::from_str(s).map(FilterKey::Color)
    }

    pub fn color(&self) -> Option<ColorKey> {
        match self {
            FilterKey::All => None,
            FilterKey::Color(color) => Some(*color),
        }
    }

    pub fn is_color(&self) -> bool {
        matches!(self, FilterKey::Color(_))
    }
}

impl From<ColorKey> for FilterKey {
    fn from(color: ColorKey) -> Self {
        FilterKey::Color(color)
    }
}

impl From<String> for FilterKey {
    fn from(value: String) -> Self {
        FilterKey::from_str(&value).unwrap_or_default()
    }
}

impl From<FilterKey> for String {
    fn from(filter: FilterKey) -> Self {
        filter.as_str().to_string()
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
