use eframe::egui::{
    self,
    containers,
};

pub enum TopBarAction {
    NewEntry,
    ImportBackup(std::path::PathBuf),
    Refresh,
}

pub struct TopBar;

impl TopBar {
    pub fn show(
        ctx: &egui::Context,
        can_refresh: bool,
        reloading: bool,
        entry_count: usize,
    ) -> Option<TopBarAction> {
        let mut action = None;

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            containers::menu::Bar::new().ui(ui, |ui| {
                egui::widgets::global_theme_preference_switch(ui);

                ui.menu_button("File", |ui| {
                    if ui.button("New Entry").clicked() {
                        action = Some(TopBarAction::NewEntry);
                    }
                    if ui.button("Import Backup JSON").clicked() {
                        if let Some(path) =
                            rfd::FileDialog::new().add_filter("JSON", &["json"]).pick_file()
                        {
                            action = Some(TopBarAction::ImportBackup(path));
                        }
                    }
                    if ui
                        .add_enabled(can_refresh && !reloading, egui::Button::new("Refresh List"))
                        .clicked()
                    {
                        action = Some(TopBarAction::Refresh);
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if reloading {
                        ui.add(egui::Spinner::new().size(14.0));
                        ui.label("Reloading…");
                    } else if can_refresh {
                        ui.label(format!("{} entries", entry_count));
                    }
                });
            });
        });

        action
    }
}
