#![forbid(unsafe_code)]

//! Requested popover side and alignment.

use serde::{Deserialize, Serialize};

/// Which side of the target the popover should attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
    /// Centered over the viewport, ignoring the target position.
    Over,
}

impl Side {
    /// CSS-facing name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Over => "over",
        }
    }
}

/// Alignment of the popover along the chosen side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
}

impl Align {
    /// CSS-facing name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_names_are_lowercase() {
        assert_eq!(serde_json::to_string(&Side::Left).unwrap(), "\"left\"");
        assert_eq!(
            serde_json::from_str::<Align>("\"end\"").unwrap(),
            Align::End
        );
    }

    #[test]
    fn default_alignment_is_start() {
        assert_eq!(Align::default(), Align::Start);
    }
}
