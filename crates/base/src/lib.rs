//! Source handling shared by the syntax and host layers
//!
//! Offsets, spans, line tables and the virtual file system.

pub mod ln;
pub mod span;
pub mod vfs;

impl span::Span {
    pub fn from_rowan_range(range: rowan::TextRange) -> Self {
        let (start, end): (u32, u32) = (range.start().into(), range.end().into());
        Self::from(start, end)
    }

    pub fn into_rowan_range(self) -> rowan::TextRange {
        let (start, end): (u32, u32) = (self.start.into(), self.end.into());
        rowan::TextRange::new(start.into(), end.into())
    }
}

impl From<span::Offset> for rowan::TextSize {
    fn from(offset: span::Offset) -> Self {
        rowan::TextSize::from(u32::from(offset))
    }
}

impl From<rowan::TextSize> for span::Offset {
    fn from(size: rowan::TextSize) -> Self {
        span::Offset::from(u32::from(size))
    }
}
