use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use strum_macros::{Display, EnumIter, EnumString};

use crate::error::PpForgeError;

/// Gameplay modifiers with their osu! protocol codes.
///
/// The numeric values are external-protocol constants; the engine consumes
/// their sum as an opaque identifier. Nightcore carries its own code rather
/// than DoubleTime's because it changes audio/visual behavior on top of the
/// speed change.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumString, Display,
)]
pub enum Mod {
    #[strum(serialize = "NF")]
    NoFail,
    #[strum(serialize = "EZ")]
    Easy,
    #[strum(serialize = "HD")]
    Hidden,
    #[strum(serialize = "HR")]
    HardRock,
    #[strum(serialize = "DT")]
    DoubleTime,
    #[strum(serialize = "HT")]
    HalfTime,
    #[strum(serialize = "NC")]
    Nightcore,
    #[strum(serialize = "FL")]
    Flashlight,
    #[strum(serialize = "SO")]
    SpunOut,
    #[strum(serialize = "TD")]
    TouchDevice,
}

impl Mod {
    pub const fn bits(self) -> u32 {
        match self {
            Self::NoFail => 1,
            Self::Easy => 2,
            Self::Hidden => 8,
            Self::HardRock => 16,
            Self::DoubleTime => 64,
            Self::HalfTime => 256,
            Self::Nightcore => 576,
            Self::Flashlight => 1024,
            Self::SpunOut => 4096,
            Self::TouchDevice => 4_194_304,
        }
    }

    /// Mods that cannot be active at the same time as `self`.
    pub fn conflicts(self) -> &'static [Mod] {
        match self {
            Self::Easy => &[Self::HardRock],
            Self::HardRock => &[Self::Easy],
            Self::DoubleTime => &[Self::HalfTime, Self::Nightcore],
            Self::Nightcore => &[Self::HalfTime, Self::DoubleTime],
            Self::HalfTime => &[Self::DoubleTime, Self::Nightcore],
            _ => &[],
        }
    }
}

/// The set of active modifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModSet {
    active: BTreeSet<Mod>,
}

impl ModSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from mod acronyms as the score API delivers them.
    /// Unknown acronyms are skipped; NC is folded into DT, matching the
    /// calculator's single DT/NC control.
    pub fn from_acronyms<S: AsRef<str>>(acronyms: &[S]) -> Self {
        let mut set = Self::new();
        for acronym in acronyms {
            let acronym = match acronym.as_ref() {
                "NC" => "DT",
                other => other,
            };
            if let Ok(m) = acronym.parse::<Mod>() {
                set.activate(m);
            }
        }
        set
    }

    /// Flip one modifier; activating it deactivates its declared conflicts.
    pub fn toggle(&mut self, m: Mod) {
        if self.active.contains(&m) {
            self.active.remove(&m);
        } else {
            self.activate(m);
        }
    }

    fn activate(&mut self, m: Mod) {
        for conflict in m.conflicts() {
            self.active.remove(conflict);
        }
        self.active.insert(m);
    }

    /// The "No Mod" control: clears everything.
    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn contains(&self, m: Mod) -> bool {
        self.active.contains(&m)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Mod> + '_ {
        self.active.iter().copied()
    }

    /// Sum of the active modifiers' protocol codes.
    pub fn bits(&self) -> u32 {
        self.active.iter().map(|m| m.bits()).sum()
    }
}

impl fmt::Display for ModSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.active.is_empty() {
            return f.write_str("NM");
        }
        for m in &self.active {
            write!(f, "{m}")?;
        }
        Ok(())
    }
}

impl FromStr for ModSet {
    type Err = PpForgeError;

    /// Parse concatenated two-letter acronyms, e.g. "HDDT". "NM" or an
    /// empty string is the empty set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("NM") {
            return Ok(Self::new());
        }
        if !s.is_ascii() || s.len() % 2 != 0 {
            return Err(PpForgeError::Validation(format!(
                "cannot parse mod string '{s}'"
            )));
        }
        let mut set = Self::new();
        for chunk in s.as_bytes().chunks(2) {
            let acronym = std::str::from_utf8(chunk)
                .map_err(|_| PpForgeError::Validation(format!("cannot parse mod string '{s}'")))?
                .to_ascii_uppercase();
            let m = acronym.parse::<Mod>().map_err(|_| {
                PpForgeError::Validation(format!("unknown mod acronym '{acronym}'"))
            })?;
            set.activate(m);
        }
        Ok(set)
    }
}
