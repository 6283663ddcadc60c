//! Small form helpers shared by the panels

use eframe::egui::{self, Color32, RichText, Ui};
use sow_domain::model::Choice;

pub const ACCENT: Color32 = Color32::from_rgb(0x72, 0xbf, 0x03);

/// Combo box over a fixed list; the empty entry clears the field
pub fn text_combo(ui: &mut Ui, id: &str, value: &mut String, options: &[&str]) -> bool {
    let mut changed = false;
    let selected = if value.is_empty() { "Selecione..." } else { value.as_str() };
    egui::ComboBox::from_id_salt(id)
        .width(220.0)
        .selected_text(selected.to_string())
        .show_ui(ui, |ui| {
            changed |= ui.selectable_value(value, String::new(), "Selecione...").changed();
            for option in options {
                changed |= ui.selectable_value(value, option.to_string(), *option).changed();
            }
        });
    changed
}

/// Combo box over a [`Choice`] enum
pub fn choice_combo<T: Choice>(ui: &mut Ui, id: &str, value: &mut Option<T>) -> bool {
    let mut changed = false;
    let selected = value.map(|c| c.label()).unwrap_or("Selecione...");
    egui::ComboBox::from_id_salt(id)
        .width(220.0)
        .selected_text(selected)
        .show_ui(ui, |ui| {
            changed |= ui.selectable_value(value, None, "Selecione...").changed();
            for choice in T::ALL {
                changed |= ui.selectable_value(value, Some(*choice), choice.label()).changed();
            }
        });
    changed
}

pub fn text_field(ui: &mut Ui, value: &mut String, hint: &str) -> bool {
    ui.add(egui::TextEdit::singleline(value).hint_text(hint).desired_width(220.0))
        .changed()
}

pub fn text_area(ui: &mut Ui, value: &mut String, hint: &str) -> bool {
    ui.add(
        egui::TextEdit::multiline(value)
            .hint_text(hint)
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    )
    .changed()
}

pub fn muted(text: &str) -> RichText {
    RichText::new(text).italics().color(Color32::GRAY)
}

/// Blocking error box
pub fn show_error(title: &str, message: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title(title)
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

/// Yes/No question; true when the user confirms
pub fn confirm(title: &str, message: &str) -> bool {
    let answer = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title(title)
        .set_description(message)
        .set_buttons(rfd::MessageButtons::YesNo)
        .show();
    answer == rfd::MessageDialogResult::Yes
}
