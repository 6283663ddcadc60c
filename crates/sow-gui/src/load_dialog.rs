//! Library picker window

use chrono::Local;
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use sow_domain::repository::StoredDocument;

use crate::widgets::muted;

/// Lists library rows newest first; picking one yields its id
#[derive(Default)]
pub struct LoadDialog {
    open: bool,
    rows: Vec<StoredDocument>,
}

impl LoadDialog {
    pub fn show_rows(&mut self, rows: Vec<StoredDocument>) {
        self.rows = rows;
        self.open = true;
    }

    /// Draw the window while open; returns the picked row id
    pub fn ui(&mut self, ctx: &egui::Context, title: &str) -> Option<String> {
        if !self.open {
            return None;
        }

        let mut picked = None;
        let mut open = self.open;
        egui::Window::new(title)
            .open(&mut open)
            .collapsible(false)
            .resizable(true)
            .default_width(520.0)
            .show(ctx, |ui| {
                if self.rows.is_empty() {
                    ui.label(muted("Nenhum documento salvo"));
                    return;
                }

                TableBuilder::new(ui)
                    .striped(true)
                    .column(Column::remainder().at_least(260.0))
                    .column(Column::auto().at_least(120.0))
                    .column(Column::auto())
                    .header(20.0, |mut header| {
                        header.col(|ui| {
                            ui.strong("Título");
                        });
                        header.col(|ui| {
                            ui.strong("Data");
                        });
                        header.col(|_| {});
                    })
                    .body(|mut body| {
                        for row in &self.rows {
                            body.row(24.0, |mut table_row| {
                                table_row.col(|ui| {
                                    ui.label(&row.title);
                                });
                                table_row.col(|ui| {
                                    ui.label(
                                        row.created_at
                                            .with_timezone(&Local)
                                            .format("%d/%m/%Y %H:%M")
                                            .to_string(),
                                    );
                                });
                                table_row.col(|ui| {
                                    if ui.button("Abrir").clicked() {
                                        picked = Some(row.id.clone());
                                    }
                                });
                            });
                        }
                    });
            });

        self.open = open && picked.is_none();
        picked
    }
}
