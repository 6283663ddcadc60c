//! Main application structure: hub plus one screen per document type

use std::sync::Arc;

use chrono::Local;
use eframe::egui::{self, Color32, RichText};
use sow_app::app::{QuoteService, TechPackService, TechPackSession};
use sow_app::config::Config;
use sow_app::print::PrintJob;
use sow_app::repository::open_repositories;
use sow_domain::repository::{DocumentRepository, DraftRepository};
use sow_infra::persistence::{MemoryDocumentRepository, MemoryDraftRepository};
use sow_types::DocumentKind;
use tracing::warn;

use crate::quote_panel::QuotePanel;
use crate::techpack_panel::TechPackPanel;
use crate::widgets::{show_error, ACCENT};

/// Screen selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Hub,
    TechPack,
    Quote,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Hub => "Sow Brand Systems",
            Screen::TechPack => DocumentKind::TechPack.label(),
            Screen::Quote => DocumentKind::Quote.label(),
        }
    }
}

/// Main application state
pub struct SowApp {
    screen: Screen,
    config: Config,
    drafts: Arc<dyn DraftRepository>,
    library: Arc<dyn DocumentRepository>,
    quote_panel: Option<QuotePanel>,
    techpack_panel: Option<TechPackPanel>,
    /// Shown on the hub when storage could not be opened
    storage_warning: Option<String>,
}

impl SowApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut style = (*cc.egui_ctx.style()).clone();
        style.interaction.tooltip_delay = 0.5;
        style.animation_time = 0.1;
        cc.egui_ctx.set_style(style);

        let config = Config::load().unwrap_or_else(|e| {
            warn!(error = %e, "config not loaded, using defaults");
            Config::default()
        });

        let (drafts, library, storage_warning) = match open_repositories(&config) {
            Ok((drafts, library)) => (drafts, library, None),
            Err(e) => {
                warn!(error = %e, "storage unavailable, keeping documents in memory");
                let drafts: Arc<dyn DraftRepository> = Arc::new(MemoryDraftRepository::new());
                let library: Arc<dyn DocumentRepository> = Arc::new(MemoryDocumentRepository::new());
                (
                    drafts,
                    library,
                    Some(format!(
                        "Armazenamento indisponível ({}). Os documentos desta sessão não serão gravados.",
                        e
                    )),
                )
            }
        };

        Self {
            screen: Screen::default(),
            config,
            drafts,
            library,
            quote_panel: None,
            techpack_panel: None,
            storage_warning,
        }
    }

    fn print_job(&self) -> PrintJob {
        PrintJob::new(self.config.print_dir())
    }

    /// Open the screen, creating its panel (and restoring its draft) on first visit
    fn enter(&mut self, screen: Screen) {
        match screen {
            Screen::Quote if self.quote_panel.is_none() => {
                let service = QuoteService::new(self.drafts.clone(), self.library.clone());
                match QuotePanel::open(service, self.config.company.clone(), self.print_job()) {
                    Ok(panel) => self.quote_panel = Some(panel),
                    Err(e) => {
                        show_error("Orçamento", &e.to_string());
                        return;
                    }
                }
            }
            Screen::TechPack if self.techpack_panel.is_none() => {
                let service = TechPackService::new(self.drafts.clone(), self.library.clone());
                match TechPackSession::open(service, Local::now().date_naive()) {
                    Ok(session) => {
                        self.techpack_panel = Some(TechPackPanel::new(
                            session,
                            self.config.company.clone(),
                            self.print_job(),
                        ))
                    }
                    Err(e) => {
                        show_error("Ficha Técnica", &e.to_string());
                        return;
                    }
                }
            }
            _ => {}
        }
        self.screen = screen;
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("← Voltar").clicked() {
                self.screen = Screen::Hub;
            }
            ui.add_space(12.0);
            ui.label(RichText::new(self.screen.title()).size(18.0).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new("SOWBRAND").strong().color(ACCENT));
            });
        });
    }

    fn render_hub(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.label(RichText::new("SOW BRAND").size(36.0).strong().color(ACCENT));
            ui.label(RichText::new("Sistemas de produção").color(Color32::GRAY));
            ui.add_space(40.0);

            let button_size = egui::vec2(320.0, 64.0);
            if ui
                .add_sized(button_size, egui::Button::new(RichText::new("Ficha Técnica").size(20.0)))
                .clicked()
            {
                self.enter(Screen::TechPack);
            }
            ui.add_space(16.0);
            if ui
                .add_sized(button_size, egui::Button::new(RichText::new("Orçamento").size(20.0)))
                .clicked()
            {
                self.enter(Screen::Quote);
            }

            if let Some(ref warning) = self.storage_warning {
                ui.add_space(24.0);
                ui.label(RichText::new(warning).color(Color32::YELLOW));
            }
        });

        ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui| {
            ui.label(
                RichText::new(format!("v{} · {}", env!("CARGO_PKG_VERSION"), self.config.backend))
                    .small()
                    .color(Color32::GRAY),
            );
        });
    }
}

impl eframe::App for SowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.screen != Screen::Hub {
            egui::TopBottomPanel::top("header").show(ctx, |ui| {
                ui.add_space(4.0);
                self.render_header(ui);
                ui.add_space(4.0);
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.screen {
            Screen::Hub => self.render_hub(ui),
            Screen::Quote => {
                if let Some(panel) = self.quote_panel.as_mut() {
                    panel.ui(ui);
                }
            }
            Screen::TechPack => {
                if let Some(panel) = self.techpack_panel.as_mut() {
                    panel.ui(ui);
                }
            }
        });
    }
}
