//! Card viewer state: catalog, instruction pager, modal and viewed-state
//!
//! Rendering is split in two halves so that it never borrows the viewer:
//! [`CardViewer::request`] hands out a [`RenderTicket`] and marks the target as
//! loading, the caller renders the page however it likes, then feeds the
//! result back through [`CardViewer::complete`]. Each display target keeps a
//! generation counter and only the newest ticket for a target is applied;
//! anything older is dropped as stale.

use crate::catalog::{CardCatalog, CardListing};
use crate::document::PdfDocument;
use crate::navigation::InstructionNav;
use crate::render::{RenderOptions, render_page};
use crate::storage::KeyValueStore;
use crate::types::{CardError, PageNumber, RenderError, Result, Surface};
use crate::viewed::ViewedCards;

/// Where a rendered page is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayTarget {
    Instructions,
    Modal,
}

/// Handle for one render request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTicket {
    pub target: DisplayTarget,
    pub generation: u64,
    pub page_number: PageNumber,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DisplayStatus {
    #[default]
    Idle,
    Loading {
        page_number: PageNumber,
    },
    /// Render failed; the target shows fallback text and can be retried
    Failed {
        error: RenderError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShownPage {
    pub page_number: PageNumber,
    pub surface: Surface,
}

/// Render state of one display target
#[derive(Debug, Clone, Default)]
pub struct DisplaySlot {
    generation: u64,
    status: DisplayStatus,
    shown: Option<ShownPage>,
}

impl DisplaySlot {
    pub fn status(&self) -> &DisplayStatus {
        &self.status
    }

    pub fn shown(&self) -> Option<&ShownPage> {
        self.shown.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, DisplayStatus::Loading { .. })
    }

    fn supersede(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}

/// The card currently opened in the modal
#[derive(Debug, Clone, PartialEq)]
pub struct ModalCard {
    pub category: String,
    pub ordinal: usize,
    pub page_number: PageNumber,
    pub title: String,
}

/// What happened to a completed render
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayOutcome {
    Displayed {
        page_number: PageNumber,
        newly_viewed: bool,
    },
    Failed(RenderError),
    /// A newer request for the same target exists; the result was dropped
    Stale,
}

pub struct CardViewer<S> {
    catalog: CardCatalog,
    viewed: ViewedCards<S>,
    nav: InstructionNav,
    render_options: RenderOptions,
    active_category: String,
    modal: Option<ModalCard>,
    instructions: DisplaySlot,
    modal_slot: DisplaySlot,
}

impl<S: KeyValueStore> CardViewer<S> {
    pub fn new(catalog: CardCatalog, viewed: ViewedCards<S>, render_options: RenderOptions) -> Self {
        let nav = InstructionNav::new(catalog.instruction_pages().to_vec());
        let active_category = catalog
            .categories()
            .first()
            .map(|c| c.name.clone())
            .unwrap_or_default();

        Self {
            catalog,
            viewed,
            nav,
            render_options,
            active_category,
            modal: None,
            instructions: DisplaySlot::default(),
            modal_slot: DisplaySlot::default(),
        }
    }

    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    pub fn viewed(&self) -> &ViewedCards<S> {
        &self.viewed
    }

    pub fn navigation(&self) -> &InstructionNav {
        &self.nav
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.render_options
    }

    pub fn active_category(&self) -> &str {
        &self.active_category
    }

    pub fn modal(&self) -> Option<&ModalCard> {
        self.modal.as_ref()
    }

    pub fn display(&self, target: DisplayTarget) -> &DisplaySlot {
        match target {
            DisplayTarget::Instructions => &self.instructions,
            DisplayTarget::Modal => &self.modal_slot,
        }
    }

    fn slot_mut(&mut self, target: DisplayTarget) -> &mut DisplaySlot {
        match target {
            DisplayTarget::Instructions => &mut self.instructions,
            DisplayTarget::Modal => &mut self.modal_slot,
        }
    }

    pub fn is_viewed(&self, page_number: PageNumber) -> bool {
        self.viewed.contains(page_number)
    }

    pub fn select_category(&mut self, name: &str) -> Result<()> {
        self.catalog.category(name)?;
        self.active_category = name.to_string();
        Ok(())
    }

    /// Cards of a category with their viewed markers
    pub fn card_list(&self, name: &str) -> Result<Vec<CardListing>> {
        let category = self.catalog.category(name)?;
        Ok(category
            .pages
            .iter()
            .enumerate()
            .map(|(index, &page_number)| CardListing {
                ordinal: index + 1,
                page_number,
                label: category.card_label(index + 1),
                viewed: self.viewed.contains(page_number),
            })
            .collect())
    }

    /// Start a render of `page_number` for `target`, superseding any
    /// request still in flight for that target
    pub fn request(&mut self, target: DisplayTarget, page_number: PageNumber) -> RenderTicket {
        let slot = self.slot_mut(target);
        let generation = slot.supersede();
        slot.status = DisplayStatus::Loading { page_number };
        log::debug!(
            "Render request {:?}#{} for page {}",
            target,
            generation,
            page_number
        );
        RenderTicket {
            target,
            generation,
            page_number,
        }
    }

    /// Apply a finished render.
    ///
    /// Success replaces the target's surface and marks the page viewed.
    /// Failure clears the surface and leaves viewed-state alone.
    pub fn complete(
        &mut self,
        ticket: RenderTicket,
        result: std::result::Result<Surface, RenderError>,
    ) -> DisplayOutcome {
        let slot = self.slot_mut(ticket.target);
        if slot.generation != ticket.generation {
            log::debug!(
                "Discarding stale render of page {} for {:?}",
                ticket.page_number,
                ticket.target
            );
            return DisplayOutcome::Stale;
        }

        match result {
            Ok(surface) => {
                slot.status = DisplayStatus::Idle;
                slot.shown = Some(ShownPage {
                    page_number: ticket.page_number,
                    surface,
                });
                let newly_viewed = self.viewed.mark_viewed(ticket.page_number);
                DisplayOutcome::Displayed {
                    page_number: ticket.page_number,
                    newly_viewed,
                }
            }
            Err(error) => {
                log::error!("Error showing page {}: {}", ticket.page_number, error);
                slot.status = DisplayStatus::Failed {
                    error: error.clone(),
                };
                slot.shown = None;
                DisplayOutcome::Failed(error)
            }
        }
    }

    /// Re-request the page whose render failed on `target`
    pub fn retry(&mut self, target: DisplayTarget) -> Option<RenderTicket> {
        let page_number = match self.display(target).status() {
            DisplayStatus::Failed { error } => error.page_number,
            _ => return None,
        };
        Some(self.request(target, page_number))
    }

    /// Render the current instruction page
    pub fn start(&mut self) -> Option<RenderTicket> {
        let page_number = self.nav.current_page()?;
        Some(self.request(DisplayTarget::Instructions, page_number))
    }

    /// `None` when already on the last instruction page
    pub fn next_instruction(&mut self) -> Option<RenderTicket> {
        let page_number = self.nav.next()?;
        Some(self.request(DisplayTarget::Instructions, page_number))
    }

    /// `None` when already on the first instruction page
    pub fn prev_instruction(&mut self) -> Option<RenderTicket> {
        let page_number = self.nav.prev()?;
        Some(self.request(DisplayTarget::Instructions, page_number))
    }

    /// Open card `ordinal` (1-based) of `category` in the modal
    pub fn open_card(&mut self, category: &str, ordinal: usize) -> Result<RenderTicket> {
        let cat = self.catalog.category(category)?;
        let page_number = cat.page_for(ordinal).ok_or_else(|| CardError::NoSuchCard {
            category: category.to_string(),
            ordinal,
        })?;

        self.modal = Some(ModalCard {
            category: category.to_string(),
            ordinal,
            page_number,
            title: cat.card_title(ordinal, page_number),
        });
        Ok(self.request(DisplayTarget::Modal, page_number))
    }

    /// Hide the modal; a render still in flight for it will be dropped
    pub fn close_modal(&mut self) {
        self.modal = None;
        let slot = &mut self.modal_slot;
        slot.supersede();
        slot.status = DisplayStatus::Idle;
        slot.shown = None;
    }

    /// Render a ticket against `document` and apply the result
    pub async fn show<D: PdfDocument>(
        &mut self,
        document: &D,
        ticket: RenderTicket,
        available_width: f32,
    ) -> DisplayOutcome {
        let result = render_page(
            document,
            ticket.page_number,
            available_width,
            &self.render_options,
        )
        .await;
        self.complete(ticket, result)
    }

    pub fn reset_viewed(&mut self) {
        self.viewed.reset();
    }

    /// Write viewed-state through to storage
    pub fn flush(&mut self) {
        self.viewed.save();
    }

    /// Flush and hand back the storage backend
    pub fn shutdown(mut self) -> S {
        self.flush();
        self.viewed.into_store()
    }
}
