//! Styled text: ordered runs of characters sharing one set of style flags.

use bitflags::bitflags;
use smallvec::SmallVec;
use smartstring::{LazyCompact, SmartString};

pub mod fit;
pub mod markup;
pub mod wrap;

bitflags! {
    /// Style attributes attached to a run of text.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct StyleFlags: u8 {
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
        const UNDERLINE = 1 << 2;
        const STRIKETHROUGH = 1 << 3;
        const CODE = 1 << 4;
        const BIG_TEXT = 1 << 5;
        const NO_WRAP = 1 << 6;
    }
}

impl StyleFlags {
    /// Opaque runs are never split by word segmentation, only at explicit
    /// newlines.
    pub fn is_opaque(self) -> bool {
        self.intersects(Self::CODE | Self::BIG_TEXT | Self::NO_WRAP)
    }
}

/// A maximal span of characters sharing one [`StyleFlags`] combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub style: StyleFlags,
    pub text: SmartString<LazyCompact>,
}

/// One block of renderable content: an ordered list of [`Run`]s.
///
/// Concatenating the run texts reproduces the logical document with the
/// markup syntax stripped. A `StyledText` is immutable after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText {
    runs: SmallVec<[Run; 1]>,
}

impl StyledText {
    pub fn from_runs(runs: impl IntoIterator<Item = Run>) -> Self {
        Self {
            runs: runs.into_iter().collect(),
        }
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// The text of every run concatenated, without style information.
    pub fn to_plain_string(&self) -> String {
        let mut s = String::new();
        for run in &self.runs {
            s.push_str(&run.text);
        }
        s
    }
}

impl From<&str> for StyledText {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            return Self::default();
        }
        Self::from_runs([Run {
            style: StyleFlags::empty(),
            text: s.into(),
        }])
    }
}

impl From<String> for StyledText {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_styles() {
        assert!(StyleFlags::CODE.is_opaque());
        assert!(StyleFlags::BIG_TEXT.is_opaque());
        assert!(StyleFlags::NO_WRAP.is_opaque());
        assert!((StyleFlags::BOLD | StyleFlags::CODE).is_opaque());
        assert!(!(StyleFlags::BOLD | StyleFlags::UNDERLINE).is_opaque());
        assert!(!StyleFlags::empty().is_opaque());
    }

    #[test]
    fn plain_string_concatenates_runs() {
        let text = StyledText::from_runs([
            Run {
                style: StyleFlags::BOLD,
                text: "a".into(),
            },
            Run {
                style: StyleFlags::empty(),
                text: "b".into(),
            },
        ]);
        assert_eq!(text.to_plain_string(), "ab");
    }
}
