use eframe::egui::{
    self,
    RichText,
};

use crate::{
    core::{
        cache::CharacterCache,
        utils::format_date,
        Character,
        TagOrigin,
    },
    gui::theme::Theme,
    schema::{
        FieldSchema,
        TagSchema,
        CATEGORY_SLOTS,
    },
};

pub enum DetailAction {
    EditEntry(String),
    EditTags(String),
}

/// Read-only detail view of one character. Works on a clone of the cached
/// entity; `refresh` re-syncs it after the cache was reloaded.
pub struct DetailModal {
    open: bool,
    character: Option<Character>,
}

impl DetailModal {
    pub fn new() -> Self {
        Self { open: false, character: None }
    }

    pub fn open(&mut self, character: Character) {
        self.character = Some(character);
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.character = None;
    }

    pub fn refresh(&mut self, cache: &CharacterCache) {
        if let Some(current) = &self.character {
            match cache.get_by_id(&current.id) {
                Some(updated) => self.character = Some(updated.clone()),
                None => self.close(),
            }
        }
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        theme: &Theme,
        field_schema: &FieldSchema,
        tag_schema: &TagSchema,
    ) -> Option<DetailAction> {
        if !self.open {
            return None;
        }
        let Some(character) = self.character.clone() else {
            return None;
        };

        let mut action = None;
        let mut open = self.open;

        egui::Window::new(RichText::new(&character.name).strong())
            .id(egui::Id::new("detail_modal"))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .min_size(egui::Vec2::new(420.0, 300.0))
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().max_height(440.0).show(ui, |ui| {
                    ui_names(ui, theme, &character);
                    ui.add_space(8.0);
                    ui_extended_fields(ui, theme, field_schema, &character);
                    ui_free_fields(ui, theme, &character);
                    ui.add_space(8.0);
                    ui_tags(ui, theme, tag_schema, &character);
                });

                ui.add_space(12.0);
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("✏ Edit entry").clicked() {
                        action = Some(DetailAction::EditEntry(character.id.clone()));
                    }

                    if character.tag_edit_locked {
                        ui.add_enabled(false, egui::Button::new("🔒 Edit tags"));
                        ui.label(
                            RichText::new("Tag editing is locked for this entry.")
                                .size(11.0)
                                .color(theme.orange(ui.ctx())),
                        );
                    } else if ui.button("🏷 Edit tags").clicked() {
                        action = Some(DetailAction::EditTags(character.id.clone()));
                    }
                });
            });

        self.open = open;
        if action.is_some() {
            self.open = false;
        }
        if !self.open {
            self.character = None;
        }

        action
    }
}

impl Default for DetailModal {
    fn default() -> Self {
        Self::new()
    }
}

fn ui_names(ui: &mut egui::Ui, theme: &Theme, character: &Character) {
    egui::Grid::new("detail_names").num_columns(2).spacing([12.0, 4.0]).show(ui, |ui| {
        let mut row = |label: &str, value: Option<&str>| {
            if let Some(value) = value {
                ui.label(RichText::new(label).color(theme.comment(ui.ctx())));
                ui.label(value);
                ui.end_row();
            }
        };

        row("Kana", character.name_kana.as_deref());
        row("English", character.name_en.as_deref());
        row("Nickname", character.name_hk.as_deref());
        row("Trainer", character.trainer_name.as_deref());
        row("Updated", character.updated_at.as_deref().map(format_date).as_deref());
    });

    if let Some(url) = &character.image_url {
        ui.hyperlink_to("Image", url);
    }
}

fn ui_extended_fields(ui: &mut egui::Ui, theme: &Theme, schema: &FieldSchema, character: &Character) {
    // Categories render in the fixed slot order; anything else stays
    // invisible, matching the form.
    for slot in &CATEGORY_SLOTS {
        let Some(fields) = character.extended.get(slot.id) else {
            continue;
        };
        if fields.is_empty() {
            continue;
        }

        let title = schema
            .get(slot.id)
            .map(|category| category.title.as_str())
            .unwrap_or(slot.id);

        ui.label(theme.heading(ui.ctx(), title));
        egui::Grid::new(format!("detail_{}", slot.id)).num_columns(2).spacing([12.0, 2.0]).show(
            ui,
            |ui| {
                for (key, value) in fields {
                    let label = schema
                        .get(slot.id)
                        .and_then(|category| {
                            category.fields.iter().find(|field| &field.key == key)
                        })
                        .map(|field| field.label.as_str())
                        .unwrap_or(key);
                    ui.label(RichText::new(label).color(theme.comment(ui.ctx())));
                    ui.label(value);
                    ui.end_row();
                }
            },
        );
        ui.add_space(6.0);
    }
}

fn ui_free_fields(ui: &mut egui::Ui, theme: &Theme, character: &Character) {
    if character.free_fields.is_empty() {
        return;
    }

    ui.label(theme.heading(ui.ctx(), "Free items"));
    egui::Grid::new("detail_free").num_columns(2).spacing([12.0, 2.0]).show(ui, |ui| {
        for field in &character.free_fields {
            ui.label(RichText::new(&field.label).color(theme.comment(ui.ctx())));
            ui.label(&field.value);
            ui.end_row();
        }
    });
    ui.add_space(6.0);
}

fn ui_tags(ui: &mut egui::Ui, theme: &Theme, schema: &TagSchema, character: &Character) {
    if character.tags.values().all(Vec::is_empty) {
        return;
    }

    ui.label(theme.heading(ui.ctx(), "Tags"));
    for (category_id, tags) in &character.tags {
        if tags.is_empty() {
            continue;
        }
        let category_name = schema
            .get(category_id)
            .map(|category| category.name.as_str())
            .unwrap_or(category_id.as_str());

        ui.horizontal_wrapped(|ui| {
            ui.label(
                RichText::new(format!("{}:", category_name))
                    .size(12.0)
                    .color(theme.comment(ui.ctx())),
            );
            for tag in tags {
                match tag.origin {
                    TagOrigin::Owner => {
                        ui.label(RichText::new(format!("★ {}", tag.name)).color(theme.orange(ui.ctx())))
                            .on_hover_text("Set by the owner");
                    }
                    TagOrigin::Participant => {
                        ui.label(RichText::new(&tag.name).color(theme.green(ui.ctx())));
                    }
                }
            }
        });
    }
}
