#![forbid(unsafe_code)]

//! Popover navigation buttons.
//!
//! A single [`Button`] names one control; [`Buttons`] is the set used for the
//! `showButtons` and `disableButtons` options. On the wire a set is a plain
//! list (`["next", "close"]`).

use bitflags::bitflags;
use serde::de::Deserializer;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

/// One popover navigation control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    Next,
    Previous,
    Close,
}

bitflags! {
    /// A set of popover buttons.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u8 {
        const NEXT     = 0b001;
        const PREVIOUS = 0b010;
        const CLOSE    = 0b100;
    }
}

impl From<Button> for Buttons {
    fn from(button: Button) -> Self {
        match button {
            Button::Next => Self::NEXT,
            Button::Previous => Self::PREVIOUS,
            Button::Close => Self::CLOSE,
        }
    }
}

impl FromIterator<Button> for Buttons {
    fn from_iter<I: IntoIterator<Item = Button>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |set, button| set | Self::from(button))
    }
}

impl Buttons {
    /// Whether `button` is in the set.
    #[must_use]
    pub fn has(self, button: Button) -> bool {
        self.contains(Self::from(button))
    }

    /// The buttons in the set, in `next, previous, close` order.
    pub fn buttons(self) -> impl Iterator<Item = Button> {
        [Button::Next, Button::Previous, Button::Close]
            .into_iter()
            .filter(move |b| self.has(*b))
    }
}

impl Serialize for Buttons {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.bits().count_ones() as usize))?;
        for button in self.buttons() {
            seq.serialize_element(&button)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Buttons {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let list = Vec::<Button>::deserialize(deserializer)?;
        Ok(list.into_iter().collect())
    }
}
