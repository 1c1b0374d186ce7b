use std::fmt::Display;

use ansi_term::Colour;
use serde::{Deserialize, Serialize};

/// Closed set of one-letter codes a slot can hold. `A` through `F` are the
/// user-enterable activities, with `F` doubling as the "missed" code written
/// by the auto-fill sweep. `Sleep` is reserved for the pre-filled sleep range
/// and is never accepted from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    A,
    B,
    C,
    D,
    E,
    F,
    #[serde(rename = "S")]
    Sleep,
}

impl Category {
    /// Fixed ordering, which is also the legend order of every summary.
    pub const ALL: [Category; 7] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::Sleep,
    ];

    /// Code the auto-fill sweep writes into lapsed empty slots.
    pub const MISSED: Category = Self::F;

    pub fn code(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
            Self::F => 'F',
            Self::Sleep => 'S',
        }
    }

    /// Accepts only the user-enterable codes, case insensitively. The sleep
    /// code is rejected like any other unknown letter.
    pub fn from_user_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            'E' => Some(Self::E),
            'F' => Some(Self::F),
            _ => None,
        }
    }

    /// Display colour, shared by every rendering of a category.
    pub fn colour(self) -> Colour {
        match self {
            Self::A => Colour::Green,
            Self::B => Colour::Cyan,
            Self::C => Colour::Yellow,
            Self::D => Colour::Purple,
            Self::E => Colour::Blue,
            Self::F => Colour::Red,
            Self::Sleep => Colour::White,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::Category;

    #[test]
    fn user_codes_exclude_sleep() {
        assert_eq!(Category::from_user_code('a'), Some(Category::A));
        assert_eq!(Category::from_user_code('F'), Some(Category::F));
        assert_eq!(Category::from_user_code('s'), None);
        assert_eq!(Category::from_user_code('S'), None);
        assert_eq!(Category::from_user_code('G'), None);
    }

    #[test]
    fn serializes_as_single_letters() {
        assert_eq!(serde_json::to_string(&Category::A).unwrap(), "\"A\"");
        assert_eq!(serde_json::to_string(&Category::Sleep).unwrap(), "\"S\"");
        assert_eq!(
            serde_json::from_str::<Category>("\"S\"").unwrap(),
            Category::Sleep
        );
    }
}
