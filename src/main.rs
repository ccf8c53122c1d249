use chardex::gui::ChardexApp;
use eframe::egui;

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1080.0, 760.0])
            .with_min_inner_size([800.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native("Chardex", options, Box::new(|cc| Ok(Box::new(ChardexApp::new(cc)))))
}
