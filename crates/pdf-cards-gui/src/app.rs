use eframe::egui;
use pdf_async_runtime::{CardCommand, CardUpdate};
use pdf_cards::{
    CardViewer, DisplayOutcome, DisplayTarget, JsonFileStore, RenderTicket, ViewedCards,
    ViewerConfig,
};
use std::collections::HashMap;
use tokio::sync::mpsc;

use crate::logger::AppLogger;
use crate::views::{UiAction, show_card_list, show_instructions, show_modal};

/// Width used until the first frame reports the real one
const INITIAL_WIDTH: f32 = 840.0;

enum DocumentStatus {
    Loading,
    Ready { page_count: usize },
    Failed { message: String },
}

pub struct CardsApp {
    config: ViewerConfig,
    viewer: CardViewer<JsonFileStore>,
    document: DocumentStatus,
    textures: HashMap<DisplayTarget, egui::TextureHandle>,
    available_width: f32,
    logger: AppLogger,
    show_log: bool,

    // Async infrastructure
    command_tx: mpsc::UnboundedSender<CardCommand>,
    update_rx: mpsc::UnboundedReceiver<CardUpdate>,

    _tokio_handle: tokio::runtime::Handle,
}

impl CardsApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: ViewerConfig,
        logger: AppLogger,
        tokio_handle: tokio::runtime::Handle,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        // Spawn worker task
        tokio_handle.spawn(crate::worker::worker_task(command_rx, update_tx));

        let store = JsonFileStore::open_or_empty(&config.state_path);
        let viewed = ViewedCards::load(store, &config.storage_key);
        let viewer = CardViewer::new(config.catalog.clone(), viewed, config.render);

        let mut app = Self {
            config,
            viewer,
            document: DocumentStatus::Loading,
            textures: HashMap::new(),
            available_width: INITIAL_WIDTH,
            logger,
            show_log: false,
            command_tx,
            update_rx,
            _tokio_handle: tokio_handle,
        };
        app.load_document();
        app
    }

    fn load_document(&mut self) {
        self.document = DocumentStatus::Loading;
        let _ = self.command_tx.send(CardCommand::LoadDocument {
            path: self.config.pdf_path.clone(),
        });
    }

    fn send_render(&self, ticket: RenderTicket) {
        let _ = self.command_tx.send(CardCommand::RenderPage {
            ticket,
            available_width: self.available_width,
            options: *self.viewer.render_options(),
        });
    }

    fn process_updates(&mut self, ctx: &egui::Context) {
        while let Ok(update) = self.update_rx.try_recv() {
            match update {
                CardUpdate::DocumentLoaded { path, page_count } => {
                    log::info!("Opened {} ({} pages)", path.display(), page_count);
                    let missing = self.viewer.catalog().out_of_range_pages(page_count);
                    if !missing.is_empty() {
                        log::warn!(
                            "{} has no page(s) {:?}; those cards will fail to render",
                            path.display(),
                            missing
                        );
                    }
                    self.document = DocumentStatus::Ready { page_count };
                    if let Some(ticket) = self.viewer.start() {
                        self.send_render(ticket);
                    }
                }
                CardUpdate::LoadFailed { message } => {
                    log::error!("Error loading PDF: {}", message);
                    self.document = DocumentStatus::Failed { message };
                }
                CardUpdate::PageRendered { ticket, result } => {
                    match self.viewer.complete(ticket, result) {
                        DisplayOutcome::Displayed { .. } => self.upload_texture(ctx, ticket.target),
                        DisplayOutcome::Failed(_) => {
                            self.textures.remove(&ticket.target);
                        }
                        DisplayOutcome::Stale => {}
                    }
                }
            }
        }
    }

    fn upload_texture(&mut self, ctx: &egui::Context, target: DisplayTarget) {
        let Some(shown) = self.viewer.display(target).shown() else {
            return;
        };
        let surface = &shown.surface;
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [surface.width, surface.height],
            &surface.rgba_data,
        );

        if let Some(texture) = self.textures.get_mut(&target) {
            texture.set(color_image, egui::TextureOptions::default());
        } else {
            let texture = ctx.load_texture(
                format!("{:?}_page", target),
                color_image,
                egui::TextureOptions::default(),
            );
            self.textures.insert(target, texture);
        }
    }

    fn apply(&mut self, action: UiAction) {
        let ticket = match action {
            UiAction::SelectCategory(name) => {
                if let Err(e) = self.viewer.select_category(&name) {
                    log::error!("{}", e);
                }
                None
            }
            UiAction::OpenCard { category, ordinal } => {
                match self.viewer.open_card(&category, ordinal) {
                    Ok(ticket) => Some(ticket),
                    Err(e) => {
                        log::error!("Error showing card: {}", e);
                        None
                    }
                }
            }
            UiAction::PrevInstruction => self.viewer.prev_instruction(),
            UiAction::NextInstruction => self.viewer.next_instruction(),
            UiAction::CloseModal => {
                self.viewer.close_modal();
                self.textures.remove(&DisplayTarget::Modal);
                None
            }
            UiAction::Retry(target) => self.viewer.retry(target),
            UiAction::ReloadDocument => {
                self.load_document();
                None
            }
            UiAction::ResetViewed => {
                self.viewer.reset_viewed();
                None
            }
        };

        if let Some(ticket) = ticket {
            self.send_render(ticket);
        }
    }

    fn show_menu(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.horizontal(|ui| {
            for category in self.viewer.catalog().categories() {
                let active = self.viewer.active_category() == category.name;
                if ui.selectable_label(active, &category.title).clicked() && !active {
                    actions.push(UiAction::SelectCategory(category.name.clone()));
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .small_button("Reset viewed")
                    .on_hover_text("Forget every viewed card (debugging)")
                    .clicked()
                {
                    actions.push(UiAction::ResetViewed);
                }
            });
        });
    }

    fn show_status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.toggle_value(&mut self.show_log, "Log");
            ui.separator();
            ui.label(format!("{} card(s) viewed", self.viewer.viewed().len()));
            if let DocumentStatus::Ready { page_count } = self.document {
                ui.separator();
                ui.label(format!("{} pages", page_count));
            }
            if let Some(problem) = self.logger.latest_problem() {
                ui.separator();
                ui.colored_label(ui.visuals().warn_fg_color, problem.message);
            }
        });
    }

    fn show_log_panel(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("log_panel")
            .resizable(true)
            .default_height(160.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for entry in self.logger.get_entries() {
                            ui.monospace(entry.format_line());
                        }
                    });
            });
    }

    fn show_document_problem(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) -> bool {
        match &self.document {
            DocumentStatus::Loading => {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
                true
            }
            DocumentStatus::Failed { message } => {
                ui.vertical_centered(|ui| {
                    ui.add_space(50.0);
                    ui.heading("Failed to load PDF");
                    ui.add_space(10.0);
                    ui.label(message);
                    ui.label(format!(
                        "Check that {} exists and that the pdfium library is installed.",
                        self.config.pdf_path.display()
                    ));
                    ui.add_space(10.0);
                    if ui.button("Try again").clicked() {
                        actions.push(UiAction::ReloadDocument);
                    }
                });
                true
            }
            DocumentStatus::Ready { .. } => false,
        }
    }
}

impl eframe::App for CardsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_updates(ctx);

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            self.show_menu(ui, &mut actions);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            self.show_status_bar(ui);
        });

        if self.show_log {
            self.show_log_panel(ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.available_width = ui.available_width();

            if self.show_document_problem(ui, &mut actions) {
                return;
            }

            let active = self.viewer.active_category().to_string();
            match self.viewer.catalog().get(&active) {
                Some(category) if category.is_instructions() => show_instructions(
                    ui,
                    &self.viewer,
                    self.textures.get(&DisplayTarget::Instructions),
                    &mut actions,
                ),
                Some(category) => {
                    ui.heading(&category.title);
                    ui.separator();
                    show_card_list(ui, &self.viewer, &active, &mut actions);
                }
                None => {}
            }
        });

        show_modal(
            ctx,
            &self.viewer,
            self.textures.get(&DisplayTarget::Modal),
            &mut actions,
        );

        for action in actions {
            self.apply(action);
        }

        // Keep polling while a render or the document load is in flight
        let loading = matches!(self.document, DocumentStatus::Loading)
            || self.viewer.display(DisplayTarget::Instructions).is_loading()
            || self.viewer.display(DisplayTarget::Modal).is_loading();
        if loading {
            ctx.request_repaint();
        }
    }
}

impl Drop for CardsApp {
    fn drop(&mut self) {
        // Last chance to persist viewed-state before exit
        self.viewer.flush();
    }
}
