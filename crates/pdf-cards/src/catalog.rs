//! Static card catalog: which PDF pages belong to which category

use crate::types::{CardError, PageNumber, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Name of the category shown through the instruction pager instead of a card list
pub const INSTRUCTIONS: &str = "instructions";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub title: String,
    pub pages: Vec<PageNumber>,
}

impl Category {
    pub fn new(name: &str, title: &str, pages: impl IntoIterator<Item = PageNumber>) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            pages: pages.into_iter().collect(),
        }
    }

    pub fn is_instructions(&self) -> bool {
        self.name == INSTRUCTIONS
    }

    /// Page for a 1-based card ordinal
    pub fn page_for(&self, ordinal: usize) -> Option<PageNumber> {
        ordinal
            .checked_sub(1)
            .and_then(|index| self.pages.get(index))
            .copied()
    }

    /// "Level 2 Card 3"
    pub fn card_label(&self, ordinal: usize) -> String {
        format!("{} Card {}", self.title, ordinal)
    }

    /// "Level 2 Card 3 (Page 24)"
    pub fn card_title(&self, ordinal: usize, page_number: PageNumber) -> String {
        format!("{} Card {} (Page {})", self.title, ordinal, page_number)
    }
}

/// One entry of a category's card list
#[derive(Debug, Clone, PartialEq)]
pub struct CardListing {
    pub ordinal: usize,
    pub page_number: PageNumber,
    pub label: String,
    pub viewed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardCatalog {
    categories: Vec<Category>,
}

impl Default for CardCatalog {
    fn default() -> Self {
        Self::new(vec![
            Category::new(INSTRUCTIONS, "Instructions", 1..=8),
            Category::new("level1", "Level 1", 10..=19),
            Category::new("level2", "Level 2", 22..=31),
            Category::new("level3", "Level 3", 34..=41),
            Category::new("challenge", "Challenge", [20, 32, 42]),
        ])
    }
}

impl CardCatalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Categories listed as cards (everything but the instructions)
    pub fn card_categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(|c| !c.is_instructions())
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn category(&self, name: &str) -> Result<&Category> {
        self.get(name)
            .ok_or_else(|| CardError::UnknownCategory(name.to_string()))
    }

    pub fn instructions(&self) -> Option<&Category> {
        self.get(INSTRUCTIONS)
    }

    pub fn instruction_pages(&self) -> &[PageNumber] {
        self.instructions()
            .map(|c| c.pages.as_slice())
            .unwrap_or_default()
    }

    pub fn all_pages(&self) -> impl Iterator<Item = PageNumber> + '_ {
        self.categories.iter().flat_map(|c| c.pages.iter().copied())
    }

    /// Referenced pages a document with `page_count` pages cannot provide
    pub fn out_of_range_pages(&self, page_count: usize) -> Vec<PageNumber> {
        self.all_pages()
            .filter(|&p| p == 0 || p as usize > page_count)
            .collect()
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        let mut names = HashSet::new();
        for category in &self.categories {
            if !names.insert(category.name.as_str()) {
                return Err(format!("Duplicate category name: {}", category.name));
            }
        }

        match self.instructions() {
            None => return Err(format!("Missing '{}' category", INSTRUCTIONS)),
            Some(c) if c.pages.is_empty() => {
                return Err("Instructions category has no pages".to_string());
            }
            Some(_) => {}
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            for &page in &category.pages {
                if page == 0 {
                    return Err(format!(
                        "Category {} references page 0 (pages are 1-based)",
                        category.name
                    ));
                }
                if !seen.insert(page) {
                    return Err(format!(
                        "Page {} is listed more than once (in {})",
                        page, category.name
                    ));
                }
            }
        }

        Ok(())
    }
}
