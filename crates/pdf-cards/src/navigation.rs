//! Instruction pager: a bounded walk over the instruction pages

use crate::types::PageNumber;

#[derive(Debug, Clone, PartialEq)]
pub struct InstructionNav {
    pages: Vec<PageNumber>,
    index: usize,
}

impl InstructionNav {
    pub fn new(pages: Vec<PageNumber>) -> Self {
        Self { pages, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn current_page(&self) -> Option<PageNumber> {
        self.pages.get(self.index).copied()
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.pages.len()
    }

    /// Step back; `None` (and no change) at the first page
    pub fn prev(&mut self) -> Option<PageNumber> {
        if !self.can_go_back() {
            return None;
        }
        self.index -= 1;
        self.current_page()
    }

    /// Step forward; `None` (and no change) at the last page
    pub fn next(&mut self) -> Option<PageNumber> {
        if !self.can_go_forward() {
            return None;
        }
        self.index += 1;
        self.current_page()
    }

    /// "Page 2 of 8"
    pub fn counter_label(&self) -> String {
        format!("Page {} of {}", self.index + 1, self.pages.len())
    }
}
