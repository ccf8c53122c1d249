use std::fs;

use eframe::egui::{
    self,
    RichText,
};
use serde_json::Value;

use crate::{
    core::form::FormState,
    gui::theme::Theme,
    schema::{
        FieldSchema,
        SlotStyle,
        CATEGORY_SLOTS,
    },
};

pub enum RegisterAction {
    Submit { payload: Value, updating: bool },
    Authenticate { id: String, password: String },
    SendInquiry { char_id: String, message: String },
    ResolveInquiry { inquiry_id: String, message: String },
}

#[derive(PartialEq)]
enum Stage {
    Auth,
    Form,
    Success,
}

/// Create/edit form. New entries open straight on the form; editing an
/// existing entry goes through the password dialog first and pre-fills the
/// form from `getEditData`. Submission is serial: the submit button is
/// disabled until its request completes, on success or failure.
pub struct RegisterModal {
    open: bool,
    stage: Stage,
    schema: FieldSchema,
    form: FormState,
    validation_error: Option<String>,
    submit_error: Option<String>,
    submitting: bool,
    finished_update: bool,
    export_status: Option<String>,

    auth_id: String,
    auth_password: String,
    auth_error: Option<String>,
    authenticating: bool,

    inquiry_open: bool,
    inquiry_message: String,
    inquiry_sending: bool,
    inquiry_result: Option<String>,
    inquiry_error: Option<String>,

    resolve_open: bool,
    resolve_id: String,
    resolve_message: String,
    resolve_sending: bool,
    resolve_status: Option<String>,
    resolve_error: Option<String>,
}

impl RegisterModal {
    pub fn new() -> Self {
        Self {
            open: false,
            stage: Stage::Form,
            schema: FieldSchema::default(),
            form: FormState::default(),
            validation_error: None,
            submit_error: None,
            submitting: false,
            finished_update: false,
            export_status: None,

            auth_id: String::new(),
            auth_password: String::new(),
            auth_error: None,
            authenticating: false,

            inquiry_open: false,
            inquiry_message: String::new(),
            inquiry_sending: false,
            inquiry_result: None,
            inquiry_error: None,

            resolve_open: false,
            resolve_id: String::new(),
            resolve_message: String::new(),
            resolve_sending: false,
            resolve_status: None,
            resolve_error: None,
        }
    }

    fn reset(&mut self, schema: &FieldSchema) {
        *self = Self::new();
        self.schema = schema.clone();
        self.form = FormState::from_schema(schema);
        self.open = true;
    }

    pub fn open_new(&mut self, schema: &FieldSchema) {
        self.reset(schema);
        self.stage = Stage::Form;
    }

    pub fn open_edit(&mut self, schema: &FieldSchema, id: String) {
        self.reset(schema);
        self.form.edit_id = Some(id.clone());
        self.auth_id = id;
        self.stage = Stage::Auth;
    }

    pub fn open_import(&mut self, schema: &FieldSchema, data: &Value) {
        self.reset(schema);
        self.stage = Stage::Form;
        self.form.import_backup(data);
        println!("[Import] backup loaded; names marked for re-entry, password cleared");
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn auth_finished(&mut self, result: Result<Value, String>) {
        self.authenticating = false;
        match result {
            Ok(data) => {
                let password = self.auth_password.clone();
                self.form.fill(&data, &password);
                self.auth_error = None;
                self.stage = Stage::Form;
            }
            Err(error) => {
                eprintln!("[API] edit authentication failed: {}", error);
                self.auth_error = Some("Wrong password.".to_string());
            }
        }
    }

    pub fn submission_finished(&mut self, result: Result<(), String>) {
        self.submitting = false;
        match result {
            Ok(()) => {
                self.stage = Stage::Success;
                self.finished_update = self.form.edit_id.is_some();
            }
            Err(error) => self.submit_error = Some(error),
        }
    }

    pub fn inquiry_finished(&mut self, result: Result<String, String>) {
        self.inquiry_sending = false;
        match result {
            Ok(id) => {
                self.inquiry_result = Some(id);
                self.inquiry_error = None;
            }
            Err(error) => self.inquiry_error = Some(error),
        }
    }

    pub fn resolve_finished(&mut self, result: Result<(), String>) {
        self.resolve_sending = false;
        match result {
            Ok(()) => {
                self.resolve_status = Some(
                    "Resolution reported. The administrator will merge the old data after review."
                        .to_string(),
                );
                self.resolve_error = None;
            }
            Err(error) => self.resolve_error = Some(error),
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, theme: &Theme) -> Option<RegisterAction> {
        if !self.open {
            return None;
        }

        if self.inquiry_open {
            return self.ui_inquiry_modal(ctx, theme);
        }
        if self.resolve_open {
            return self.ui_resolve_modal(ctx, theme);
        }

        match self.stage {
            Stage::Auth => self.ui_auth_modal(ctx, theme),
            Stage::Form => self.ui_form_window(ctx, theme),
            Stage::Success => {
                self.ui_success_modal(ctx, theme);
                None
            }
        }
    }

    fn ui_auth_modal(&mut self, ctx: &egui::Context, theme: &Theme) -> Option<RegisterAction> {
        let mut action = None;

        egui::Modal::new(egui::Id::new("auth_modal")).show(ctx, |ui| {
            ui.set_width(340.0);
            ui.label(RichText::new("Edit authentication").size(16.0).strong());
            ui.add_space(4.0);
            ui.label(
                RichText::new(format!("Entry: {}", self.auth_id))
                    .size(12.0)
                    .color(theme.comment(ui.ctx())),
            );
            ui.add_space(8.0);

            ui.add_enabled(
                !self.authenticating,
                egui::TextEdit::singleline(&mut self.auth_password)
                    .hint_text("Edit password")
                    .password(true)
                    .desired_width(f32::INFINITY),
            );

            if let Some(error) = &self.auth_error {
                ui.add_space(4.0);
                ui.colored_label(theme.red(ui.ctx()), error);
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let label = if self.authenticating { "Checking…" } else { "Confirm" };
                if ui.add_enabled(!self.authenticating, egui::Button::new(label)).clicked() {
                    if self.auth_password.is_empty() {
                        self.auth_error = Some("Enter the password.".to_string());
                    } else {
                        self.authenticating = true;
                        self.auth_error = None;
                        action = Some(RegisterAction::Authenticate {
                            id: self.auth_id.clone(),
                            password: self.auth_password.clone(),
                        });
                    }
                }
                if ui.add_enabled(!self.authenticating, egui::Button::new("Cancel")).clicked() {
                    self.open = false;
                }
            });

            ui.add_space(6.0);
            ui.separator();
            ui.horizontal(|ui| {
                if ui.link("Forgot password?").clicked() {
                    self.inquiry_open = true;
                }
                if ui.link("Report a resolved inquiry").clicked() {
                    self.resolve_open = true;
                }
            });
        });

        action
    }

    fn ui_form_window(&mut self, ctx: &egui::Context, theme: &Theme) -> Option<RegisterAction> {
        let mut action = None;
        let mut open = self.open;
        let updating = self.form.edit_id.is_some();
        let title = if updating { "📝 Edit Entry" } else { "✨ New Entry" };

        egui::Window::new(title)
            .id(egui::Id::new("register_modal"))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .min_size(egui::Vec2::new(460.0, 360.0))
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().max_height(460.0).show(ui, |ui| {
                    self.ui_basic_fields(ui, theme);
                    ui.add_space(10.0);
                    self.ui_dynamic_fields(ui, theme);
                    ui.add_space(10.0);
                    self.ui_password_field(ui, theme);
                });

                if let Some(error) = &self.validation_error {
                    ui.add_space(6.0);
                    ui.colored_label(theme.red(ui.ctx()), error);
                }
                if let Some(error) = &self.submit_error {
                    ui.add_space(6.0);
                    ui.colored_label(
                        theme.red(ui.ctx()),
                        format!("{} failed: {}", if updating { "Update" } else { "Registration" }, error),
                    );
                }

                ui.add_space(10.0);
                ui.separator();
                ui.horizontal(|ui| {
                    let label = if self.submitting {
                        "Submitting…"
                    } else if updating {
                        "Update"
                    } else {
                        "Register"
                    };
                    if ui.add_enabled(!self.submitting, egui::Button::new(label)).clicked() {
                        match self.form.validate() {
                            Ok(()) => {
                                self.validation_error = None;
                                self.submit_error = None;
                                self.submitting = true;
                                action = Some(RegisterAction::Submit {
                                    payload: self.form.to_payload(),
                                    updating,
                                });
                            }
                            Err(error) => self.validation_error = Some(error),
                        }
                    }
                    if self.submitting {
                        ui.add(egui::Spinner::new().size(14.0));
                    }
                });
            });

        if !open && !self.submitting {
            self.open = false;
        }

        action
    }

    fn ui_basic_fields(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        ui.label(theme.heading(ui.ctx(), "Basic Information"));
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.label("Main name:");
            ui.radio_value(&mut self.form.is_en_main, false, "Kana");
            ui.radio_value(&mut self.form.is_en_main, true, "English");
        });

        let required = |ui: &mut egui::Ui, required: bool| {
            if required {
                ui.label(RichText::new("required").size(10.0).color(theme.orange(ui.ctx())));
            } else {
                ui.label(RichText::new("optional").size(10.0).color(theme.comment(ui.ctx())));
            }
        };

        egui::Grid::new("basic_fields").num_columns(3).spacing([8.0, 6.0]).show(ui, |ui| {
            ui.label("Name (kana)");
            ui.add(egui::TextEdit::singleline(&mut self.form.name_kana).desired_width(240.0));
            required(ui, !self.form.is_en_main);
            ui.end_row();

            ui.label("Name (English)");
            ui.add(egui::TextEdit::singleline(&mut self.form.name_en).desired_width(240.0));
            required(ui, self.form.is_en_main);
            ui.end_row();

            ui.label("Nickname");
            ui.add(egui::TextEdit::singleline(&mut self.form.name_hk).desired_width(240.0));
            required(ui, false);
            ui.end_row();

            ui.label("Trainer name");
            ui.add(egui::TextEdit::singleline(&mut self.form.trainer_name).desired_width(240.0));
            required(ui, false);
            ui.end_row();

            ui.label("Image URL");
            ui.add(egui::TextEdit::singleline(&mut self.form.image_url).desired_width(240.0));
            required(ui, false);
            ui.end_row();
        });
    }

    fn ui_dynamic_fields(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        for slot in &CATEGORY_SLOTS {
            let Some(category) = self.schema.get(slot.id) else {
                continue;
            };
            let title = category.title.clone();

            match slot.style {
                SlotStyle::Plain => {
                    ui.label(theme.heading(ui.ctx(), &title));
                    ui.add_space(2.0);
                    ui_binding_grid(ui, &mut self.form, slot.id);
                }
                SlotStyle::Collapsible => {
                    egui::CollapsingHeader::new(title).id_salt(slot.id).show(ui, |ui| {
                        ui_binding_grid(ui, &mut self.form, slot.id);
                    });
                }
                SlotStyle::CollapsibleWithFree => {
                    egui::CollapsingHeader::new(title).id_salt(slot.id).show(ui, |ui| {
                        ui_binding_grid(ui, &mut self.form, slot.id);
                        ui.add_space(6.0);
                        ui_free_rows(ui, &mut self.form, theme);
                    });
                }
            }
            ui.add_space(6.0);
        }
    }

    fn ui_password_field(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        ui.label(theme.heading(ui.ctx(), "Edit Password"));
        ui.label(
            RichText::new("Needed to edit this entry later. Keep it somewhere safe.")
                .size(11.0)
                .color(theme.comment(ui.ctx())),
        );
        ui.add(
            egui::TextEdit::singleline(&mut self.form.password)
                .password(true)
                .desired_width(240.0),
        );
    }

    fn ui_success_modal(&mut self, ctx: &egui::Context, theme: &Theme) {
        let mut close = false;

        egui::Modal::new(egui::Id::new("register_success_modal")).show(ctx, |ui| {
            ui.set_width(360.0);

            let (title, message) = if self.finished_update {
                ("🎉 Update complete", "The entry has been updated.")
            } else {
                ("🎉 Registration complete", "The entry has been registered.")
            };
            ui.label(RichText::new(title).size(17.0).strong());
            ui.add_space(6.0);
            ui.label(message);
            ui.add_space(6.0);
            ui.label(
                RichText::new("Export a backup to re-register later if the entry is ever lost.")
                    .size(11.0)
                    .color(theme.comment(ui.ctx())),
            );

            if let Some(status) = &self.export_status {
                ui.add_space(4.0);
                ui.label(RichText::new(status).size(11.0).color(theme.green(ui.ctx())));
            }

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.button("Export backup JSON").clicked() {
                    self.export_backup();
                }
                if ui.button("Close").clicked() {
                    close = true;
                }
            });
        });

        if close {
            self.open = false;
        }
    }

    fn export_backup(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name(FormState::backup_filename())
            .save_file()
        else {
            return;
        };

        let exported = self.form.export_json();
        match serde_json::to_string_pretty(&exported)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(&path, json).map_err(|e| e.to_string()))
        {
            Ok(()) => {
                self.export_status = Some(format!("Saved to {}", path.display()));
            }
            Err(error) => {
                eprintln!("[Export] backup write failed: {}", error);
                self.export_status = Some(format!("Export failed: {}", error));
            }
        }
    }

    fn ui_inquiry_modal(&mut self, ctx: &egui::Context, theme: &Theme) -> Option<RegisterAction> {
        let mut action = None;

        egui::Modal::new(egui::Id::new("inquiry_modal")).show(ctx, |ui| {
            ui.set_width(360.0);
            ui.label(RichText::new("Password inquiry").size(16.0).strong());
            ui.add_space(6.0);

            if let Some(inquiry_id) = &self.inquiry_result {
                ui.colored_label(theme.green(ui.ctx()), "The inquiry has been sent.");
                ui.add_space(4.0);
                ui.label("Write this ID down; it is required when reporting resolution:");
                ui.add(
                    egui::TextEdit::singleline(&mut inquiry_id.as_str())
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(8.0);
                if ui.button("Close").clicked() {
                    self.inquiry_open = false;
                }
            } else {
                ui.label("Describe the entry and how to reach you. The administrator will get back with a reset.");
                ui.add_space(4.0);
                ui.add_enabled(
                    !self.inquiry_sending,
                    egui::TextEdit::multiline(&mut self.inquiry_message)
                        .desired_rows(4)
                        .desired_width(f32::INFINITY),
                );

                if let Some(error) = &self.inquiry_error {
                    ui.add_space(4.0);
                    ui.colored_label(theme.red(ui.ctx()), error);
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let label = if self.inquiry_sending { "Sending…" } else { "Send inquiry" };
                    if ui.add_enabled(!self.inquiry_sending, egui::Button::new(label)).clicked() {
                        if self.inquiry_message.is_empty() {
                            self.inquiry_error = Some("Enter a message.".to_string());
                        } else {
                            self.inquiry_sending = true;
                            self.inquiry_error = None;
                            action = Some(RegisterAction::SendInquiry {
                                char_id: self.auth_id.clone(),
                                message: self.inquiry_message.clone(),
                            });
                        }
                    }
                    if ui.add_enabled(!self.inquiry_sending, egui::Button::new("Cancel")).clicked() {
                        self.inquiry_open = false;
                    }
                });
            }
        });

        action
    }

    fn ui_resolve_modal(&mut self, ctx: &egui::Context, theme: &Theme) -> Option<RegisterAction> {
        let mut action = None;

        egui::Modal::new(egui::Id::new("resolve_modal")).show(ctx, |ui| {
            ui.set_width(360.0);
            ui.label(RichText::new("Report a resolved inquiry").size(16.0).strong());
            ui.add_space(6.0);

            ui.label("Inquiry ID");
            ui.add_enabled(
                !self.resolve_sending,
                egui::TextEdit::singleline(&mut self.resolve_id).desired_width(f32::INFINITY),
            );
            ui.label("Message");
            ui.add_enabled(
                !self.resolve_sending,
                egui::TextEdit::multiline(&mut self.resolve_message)
                    .desired_rows(3)
                    .desired_width(f32::INFINITY),
            );

            if let Some(status) = &self.resolve_status {
                ui.add_space(4.0);
                ui.colored_label(theme.green(ui.ctx()), status);
            }
            if let Some(error) = &self.resolve_error {
                ui.add_space(4.0);
                ui.colored_label(theme.red(ui.ctx()), error);
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let label = if self.resolve_sending { "Sending…" } else { "Report resolved" };
                if ui.add_enabled(!self.resolve_sending, egui::Button::new(label)).clicked() {
                    if self.resolve_id.is_empty() {
                        self.resolve_error = Some("The inquiry ID is required.".to_string());
                    } else {
                        self.resolve_sending = true;
                        self.resolve_error = None;
                        action = Some(RegisterAction::ResolveInquiry {
                            inquiry_id: self.resolve_id.clone(),
                            message: self.resolve_message.clone(),
                        });
                    }
                }
                if ui.add_enabled(!self.resolve_sending, egui::Button::new("Close")).clicked() {
                    self.resolve_open = false;
                }
            });
        });

        action
    }
}

impl Default for RegisterModal {
    fn default() -> Self {
        Self::new()
    }
}

fn ui_binding_grid(ui: &mut egui::Ui, form: &mut FormState, category_id: &str) {
    egui::Grid::new(format!("bindings_{}", category_id))
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui| {
            for binding in form.bindings.iter_mut().filter(|b| b.category_id == category_id) {
                ui.label(&binding.label);
                ui.add(egui::TextEdit::singleline(&mut binding.value).desired_width(240.0));
                ui.end_row();
            }
        });
}

fn ui_free_rows(ui: &mut egui::Ui, form: &mut FormState, theme: &Theme) {
    ui.label(
        RichText::new("Free items (rows missing a label or a value are not saved)")
            .size(11.0)
            .color(theme.comment(ui.ctx())),
    );

    let mut remove: Option<usize> = None;
    for (index, row) in form.free_rows.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut row.label)
                    .hint_text("Label (e.g. favorite food)")
                    .desired_width(150.0),
            );
            ui.label(":");
            ui.add(egui::TextEdit::singleline(&mut row.value).hint_text("Value").desired_width(190.0));
            if ui.small_button("✕").clicked() {
                remove = Some(index);
            }
        });
    }
    if let Some(index) = remove {
        form.remove_free_row(index);
    }

    if ui.button("＋ Add free item").clicked() {
        form.add_free_row();
    }
}
