use core::fmt;
use core::num::NonZeroU32;

/// Handle of an element within one network.
///
/// Numbers start at 1 and follow creation order. A network never hands the
/// same number out twice, so a handle stays valid while other elements are
/// deleted around it. The zero niche keeps an empty output slot
/// (`Option<ElementId>`) the same size as a connected one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(NonZeroU32);

impl ElementId {
    /// Handle with the given creation number; `None` for 0.
    pub fn new(number: u32) -> Option<Self> {
        NonZeroU32::new(number).map(Self)
    }

    /// Creation number, starting at 1.
    pub fn number(self) -> u32 {
        self.0.get()
    }

    /// Zero-based offset for tables indexed by id.
    pub fn offset(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({})", self.0)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source of fresh element ids for one network.
#[derive(Debug, Clone, Default)]
pub struct IdSequence {
    issued: u32,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unused id, or `None` once every number has been issued.
    pub fn next_id(&mut self) -> Option<ElementId> {
        let number = self.issued.checked_add(1)?;
        self.issued = number;
        ElementId::new(number)
    }

    /// How many ids this sequence has handed out.
    pub fn issued(&self) -> u32 {
        self.issued
    }
}
