use eframe::egui;

use crate::{
    core::utils::format_date,
    core::NewsItem,
    gui::theme::Theme,
};

/// Dismissible strip under the menu bar for the latest news entry. News is
/// best-effort: with nothing fetched, nothing is shown.
pub struct NewsBanner {
    dismissed: bool,
}

impl NewsBanner {
    pub fn new() -> Self {
        Self { dismissed: false }
    }

    pub fn show(&mut self, ctx: &egui::Context, news: &[NewsItem], theme: &Theme) {
        if self.dismissed {
            return;
        }
        let Some(item) = news.first() else {
            return;
        };

        egui::TopBottomPanel::top("news_banner").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("📢").size(14.0));
                if let Some(date) = &item.date {
                    ui.label(
                        egui::RichText::new(format_date(date))
                            .color(theme.comment(ui.ctx()))
                            .size(12.0),
                    );
                }
                ui.label(egui::RichText::new(&item.text).color(theme.cyan(ui.ctx())));

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("✕").clicked() {
                        self.dismissed = true;
                    }
                });
            });
        });
    }
}

impl Default for NewsBanner {
    fn default() -> Self {
        Self::new()
    }
}
