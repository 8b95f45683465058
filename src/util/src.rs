use std::fmt;

/// A byte offset into program text.
#[derive(Copy, Clone, PartialEq, Eq)]
#[cfg(test)]
pub struct SrcLoc(pub usize);
#[derive(Copy, Clone, PartialEq, Eq)]
#[cfg(not(test))]
pub struct SrcLoc(usize);

impl SrcLoc {
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }

    /// Zero-based (line, column) of this location, counting columns in chars.
    pub fn in_context(&self, code: &str) -> (usize, usize) {
        let mut pos = self.0;
        for (i, line) in code.split('\n').enumerate() {
            if pos < line.len() + 1 {
                let col = line
                    .char_indices()
                    .take_while(|(idx, _)| *idx < pos)
                    .count();
                return (i, col);
            }
            pos -= line.len() + 1;
        }
        (code.split('\n').count(), 0)
    }

    pub fn advance(self, by: usize) -> Self {
        Self(self.0 + by)
    }
}

impl fmt::Debug for SrcLoc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl From<usize> for SrcLoc {
    fn from(pos: usize) -> Self {
        Self(pos)
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
pub enum SrcRegion {
    None,
    Range(SrcLoc, SrcLoc),
}

impl SrcRegion {
    /// Region covering the `len` bytes starting at `loc`.
    pub fn single(loc: SrcLoc, len: usize) -> Self {
        SrcRegion::range(loc, loc.advance(len))
    }

    pub fn range(from: SrcLoc, until: SrcLoc) -> SrcRegion {
        if from.0 < until.0 {
            SrcRegion::Range(from, until)
        } else {
            SrcRegion::None
        }
    }

    pub fn extend_to(self, limit: SrcLoc) -> Self {
        match self {
            SrcRegion::None => SrcRegion::None,
            SrcRegion::Range(from, until) => SrcRegion::Range(from, until.max(limit)),
        }
    }

    pub fn union(self, other: Self) -> Self {
        match (self, other) {
            (SrcRegion::None, _) => SrcRegion::None,
            (_, SrcRegion::None) => SrcRegion::None,
            (SrcRegion::Range(from_a, until_a), SrcRegion::Range(from_b, until_b)) =>
                SrcRegion::Range(from_a.min(from_b), until_a.max(until_b)),
        }
    }

    /// The slice of `code` this region spans. Empty for `None` or a region
    /// that does not fit the given text.
    pub fn as_str<'a>(&self, code: &'a str) -> &'a str {
        match self {
            SrcRegion::Range(from, until) => code.get(from.0..until.0).unwrap_or(""),
            SrcRegion::None => "",
        }
    }

    pub fn in_context(&self, code: &str) -> Option<((usize, usize), (usize, usize))> {
        match self {
            SrcRegion::Range(from, until) => Some((from.in_context(code), until.in_context(code))),
            SrcRegion::None => None,
        }
    }
}

impl fmt::Debug for SrcRegion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SrcRegion::None => write!(f, "<none>"),
            SrcRegion::Range(from, to) => write!(f, "{:?}:{:?}", from, to),
        }
    }
}

impl From<(usize, usize)> for SrcRegion {
    fn from((from, to): (usize, usize)) -> Self {
        SrcRegion::range(SrcLoc::from(from), SrcLoc::from(to))
    }
}
