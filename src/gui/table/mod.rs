pub mod search;
pub mod state;

use eframe::egui::{
    self,
    RichText,
};
use egui_extras::{
    Column,
    TableBuilder,
};
pub use state::ListState;

use crate::{
    core::utils::format_date,
    gui::app::ChardexApp,
};

/// Main list view: search box, tag filter chips, and the character table.
/// Row clicks open the detail modal through the app.
pub fn character_table(ctx: &egui::Context, app: &mut ChardexApp) {
    let mut open_detail: Option<usize> = None;

    egui::CentralPanel::default().show(ctx, |ui| {
        if let Some(error) = &app.load_error {
            ui.vertical_centered(|ui| {
                ui.add_space(60.0);
                ui.label(
                    RichText::new("Could not load the registry")
                        .size(18.0)
                        .color(app.theme.red(ui.ctx())),
                );
                ui.add_space(6.0);
                ui.label(RichText::new(error).color(app.theme.comment(ui.ctx())));
            });
            return;
        }

        if !app.is_ready() {
            return;
        }

        app.list_state.ensure_indices(app.cache.characters());

        ui.horizontal(|ui| {
            ui.heading(app.theme.heading(ui.ctx(), "Character Registry"));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let mut search = app.list_state.search().to_string();
                ui.add(
                    egui::TextEdit::singleline(&mut search)
                        .hint_text("Search names, trainers, tags…")
                        .desired_width(260.0),
                );
                ui.label("🔍");
                app.list_state.set_search(search);
            });
        });

        ui_tag_filter(ui, app);
        ui.add_space(8.0);

        if app.cache.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.label(
                    RichText::new("No entries registered yet.")
                        .color(app.theme.comment(ui.ctx())),
                );
            });
            return;
        }

        let visible = app.list_state.visible_indices().to_vec();
        if visible.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.label(
                    RichText::new("No entries match the current filter.")
                        .color(app.theme.comment(ui.ctx())),
                );
            });
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(false)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::auto().at_least(170.0))
                .column(Column::auto().at_least(150.0))
                .column(Column::auto().at_least(110.0))
                .column(Column::remainder())
                .column(Column::auto().at_least(90.0))
                .header(25.0, |mut header| {
                    header.col(|ui| {
                        ui.label(app.theme.heading(ui.ctx(), "Name"));
                    });
                    header.col(|ui| {
                        ui.label(app.theme.heading(ui.ctx(), "Other Names"));
                    });
                    header.col(|ui| {
                        ui.label(app.theme.heading(ui.ctx(), "Trainer"));
                    });
                    header.col(|ui| {
                        ui.label(app.theme.heading(ui.ctx(), "Tags"));
                    });
                    header.col(|ui| {
                        ui.label(app.theme.heading(ui.ctx(), "Updated"));
                    });
                })
                .body(|body| {
                    body.rows(26.0, visible.len(), |mut row| {
                        let index = visible[row.index()];
                        let Some(character) = app.cache.get(index) else {
                            return;
                        };

                        row.col(|ui| {
                            let label = egui::Label::new(
                                RichText::new(&character.name)
                                    .color(app.theme.cyan(ui.ctx()))
                                    .strong(),
                            )
                            .sense(egui::Sense::click());

                            let mut response = ui.add(label);
                            if response.hovered() {
                                response = response.on_hover_cursor(egui::CursorIcon::PointingHand);
                            }
                            if response.clicked() {
                                open_detail = Some(index);
                            }
                            if character.tag_edit_locked {
                                ui.label(RichText::new("🔒").size(11.0))
                                    .on_hover_text("Tag editing is locked");
                            }
                        });

                        row.col(|ui| {
                            // Whichever name is not the main one.
                            let other = if character.is_en_main {
                                character.name_kana.as_deref()
                            } else {
                                character.name_en.as_deref()
                            };
                            ui.label(other.unwrap_or("-"));
                        });

                        row.col(|ui| {
                            ui.label(character.trainer_name.as_deref().unwrap_or("-"));
                        });

                        row.col(|ui| {
                            let names: Vec<String> = character
                                .tags
                                .values()
                                .flatten()
                                .map(|tag| match tag.origin {
                                    crate::core::TagOrigin::Owner => format!("★{}", tag.name),
                                    crate::core::TagOrigin::Participant => tag.name.clone(),
                                })
                                .collect();
                            ui.label(names.join(" · "));
                        });

                        row.col(|ui| {
                            let updated = character
                                .updated_at
                                .as_deref()
                                .map(format_date)
                                .unwrap_or_else(|| "-".to_string());
                            ui.label(RichText::new(updated).color(app.theme.comment(ui.ctx())));
                        });
                    });
                });
        });
    });

    if let Some(index) = open_detail {
        app.open_detail(index);
    }
}

fn ui_tag_filter(ui: &mut egui::Ui, app: &mut ChardexApp) {
    let available = ListState::available_tags(app.cache.characters());
    if available.is_empty() {
        return;
    }

    let selected = app.list_state.filter().len();
    let title = if selected == 0 {
        "Tag filter".to_string()
    } else {
        format!("Tag filter ({} selected)", selected)
    };

    let mut toggles: Vec<String> = Vec::new();
    let mut clear = false;

    egui::CollapsingHeader::new(title)
        .id_salt("tag_filter")
        .default_open(false)
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for name in &available {
                    let is_selected = app.list_state.filter().is_selected(name);
                    if ui.selectable_label(is_selected, name).clicked() {
                        toggles.push(name.clone());
                    }
                }
            });
            if selected > 0 {
                if ui.small_button("Clear filter").clicked() {
                    clear = true;
                }
                ui.label(
                    RichText::new("Entries must carry every selected tag.")
                        .size(11.0)
                        .color(app.theme.comment(ui.ctx())),
                );
            }
        });

    for name in toggles {
        app.list_state.toggle_tag(&name);
    }
    if clear {
        app.list_state.clear_filter();
    }
}
