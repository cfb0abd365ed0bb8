use std::fmt;

/// One of the three independent search inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchSlot {
    A,
    B,
    C,
}

impl SearchSlot {
    pub const ALL: [SearchSlot; 3] = [SearchSlot::A, SearchSlot::B, SearchSlot::C];

    /// Position in `App::slots`.
    pub fn index(self) -> usize {
        match self {
            SearchSlot::A => 0,
            SearchSlot::B => 1,
            SearchSlot::C => 2,
        }
    }

    pub fn letter(self) -> char {
        match self {
            SearchSlot::A => 'A',
            SearchSlot::B => 'B',
            SearchSlot::C => 'C',
        }
    }

    /// Label suffix for unnamed places, e.g. `"(A)"`.
    pub fn suffix(self) -> String {
        format!("({})", self.letter())
    }

    pub fn placeholder(self) -> String {
        format!("Search {}...", self.letter())
    }
}

impl fmt::Display for SearchSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}
