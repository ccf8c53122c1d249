use std::collections::BTreeMap;

use eframe::egui::{
    self,
    RichText,
};

use crate::{
    core::{
        tag_editor::TagEditor,
        Character,
        Tag,
        TagOrigin,
    },
    gui::theme::Theme,
    schema::TagSchema,
};

pub enum TagEditorAction {
    Save { id: String, tags: BTreeMap<String, Vec<Tag>> },
}

/// UI shell around the `TagEditor` working copy. The save button stays
/// disabled while the update request is in flight; a failed save keeps the
/// editor open and editable.
pub struct TagEditorModal {
    open: bool,
    editor: Option<TagEditor>,
    input: String,
    suggestions: Vec<String>,
    error: Option<String>,
    saving: bool,
}

impl TagEditorModal {
    pub fn new() -> Self {
        Self {
            open: false,
            editor: None,
            input: String::new(),
            suggestions: Vec::new(),
            error: None,
            saving: false,
        }
    }

    /// Locked characters are filtered out by the detail view already; this
    /// is the enforcing gate.
    pub fn open(&mut self, character: &Character, schema: &TagSchema) {
        match TagEditor::open(character, schema) {
            Ok(editor) => {
                self.suggestions = schema
                    .free_category()
                    .map(|category| category.vocabulary.clone())
                    .unwrap_or_default();
                self.editor = Some(editor);
                self.input.clear();
                self.error = None;
                self.saving = false;
                self.open = true;
            }
            Err(error) => {
                println!("[Tags] refusing to open editor: {}", error);
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn save_finished(&mut self, result: Result<(), String>) {
        self.saving = false;
        match result {
            Ok(()) => {
                self.open = false;
                self.editor = None;
            }
            Err(error) => {
                // Back to the editable state; nothing was lost.
                self.error = Some(error);
            }
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, theme: &Theme) -> Option<TagEditorAction> {
        if !self.open {
            return None;
        }
        let Some(editor) = &mut self.editor else {
            self.open = false;
            return None;
        };

        let mut action = None;
        let mut open = self.open;

        egui::Window::new("Edit Tags")
            .id(egui::Id::new("tag_editor_modal"))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .min_size(egui::Vec2::new(380.0, 240.0))
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(
                    RichText::new("★ marks owner tags; only participant tags can be removed.")
                        .size(11.0)
                        .color(theme.comment(ui.ctx())),
                );
                ui.add_space(6.0);

                let mut remove: Option<usize> = None;
                ui.horizontal_wrapped(|ui| {
                    for (index, tag) in editor.tags().iter().enumerate() {
                        match tag.origin {
                            TagOrigin::Owner => {
                                ui.label(
                                    RichText::new(format!("★ {}", tag.name))
                                        .color(theme.orange(ui.ctx())),
                                );
                            }
                            TagOrigin::Participant => {
                                ui.label(RichText::new(&tag.name).color(theme.green(ui.ctx())));
                                if !self.saving && ui.small_button("✕").clicked() {
                                    remove = Some(index);
                                }
                            }
                        }
                    }
                    if editor.is_empty() {
                        ui.label(RichText::new("No tags yet.").color(theme.comment(ui.ctx())));
                    }
                });

                if let Some(index) = remove {
                    if let Err(error) = editor.remove(index) {
                        self.error = Some(error.to_string());
                    } else {
                        self.error = None;
                    }
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let input = egui::TextEdit::singleline(&mut self.input)
                        .hint_text("New tag…")
                        .desired_width(200.0);
                    let submitted =
                        ui.add_enabled(!self.saving, input).lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                    if (ui.add_enabled(!self.saving, egui::Button::new("Add")).clicked() || submitted)
                        && !self.input.trim().is_empty()
                    {
                        match editor.add(&self.input) {
                            Ok(()) => {
                                self.input.clear();
                                self.error = None;
                            }
                            Err(error) => self.error = Some(error.to_string()),
                        }
                    }
                });

                let unused: Vec<&String> = self
                    .suggestions
                    .iter()
                    .filter(|name| !editor.tags().iter().any(|tag| &tag.name == *name))
                    .collect();
                if !unused.is_empty() {
                    ui.add_space(4.0);
                    ui.horizontal_wrapped(|ui| {
                        ui.label(
                            RichText::new("Suggestions:").size(11.0).color(theme.comment(ui.ctx())),
                        );
                        let mut picked: Option<String> = None;
                        for name in unused {
                            if ui.small_button(name).clicked() {
                                picked = Some(name.clone());
                            }
                        }
                        if let Some(name) = picked {
                            if !self.saving {
                                match editor.add(&name) {
                                    Ok(()) => self.error = None,
                                    Err(error) => self.error = Some(error.to_string()),
                                }
                            }
                        }
                    });
                }

                if let Some(error) = &self.error {
                    ui.add_space(6.0);
                    ui.colored_label(theme.red(ui.ctx()), error);
                }

                ui.add_space(10.0);
                ui.separator();
                ui.horizontal(|ui| {
                    let save_label = if self.saving { "Saving…" } else { "Save" };
                    if ui.add_enabled(!self.saving, egui::Button::new(save_label)).clicked() {
                        self.saving = true;
                        self.error = None;
                        action = Some(TagEditorAction::Save {
                            id: editor.character_id().to_string(),
                            tags: editor.to_payload(),
                        });
                    }
                    if self.saving {
                        ui.add(egui::Spinner::new().size(14.0));
                    }
                });
            });

        // Closing via the title bar discards the working copy, but a save
        // in flight keeps the modal alive until the result arrives.
        if !open && !self.saving {
            self.open = false;
            self.editor = None;
        }

        action
    }
}

impl Default for TagEditorModal {
    fn default() -> Self {
        Self::new()
    }
}
