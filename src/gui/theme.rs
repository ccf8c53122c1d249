use eframe::egui::{
    self,
    RichText,
};
use egui::{
    epaint::Shadow,
    style::{
        Selection,
        WidgetVisuals,
        Widgets,
    },
    Color32,
    Stroke,
    Visuals,
};

#[derive(Clone)]
pub struct Theme {
    dark: ThemeDetails,
    light: ThemeDetails,
}

impl Default for Theme {
    fn default() -> Self {
        Self::paddock()
    }
}

impl Theme {
    pub fn paddock() -> Self {
        Theme { dark: ThemeDetails::paddock_dark(), light: ThemeDetails::paddock_light() }
    }

    fn details(&self, ctx: &egui::Context) -> &ThemeDetails {
        if ctx.style().visuals.dark_mode {
            &self.dark
        } else {
            &self.light
        }
    }

    pub fn heading(&self, ctx: &egui::Context, content: &str) -> RichText {
        RichText::new(content).color(self.details(ctx).purple).strong()
    }

    pub fn accent(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).purple
    }

    pub fn red(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).red
    }

    pub fn orange(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).orange
    }

    pub fn green(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).green
    }

    pub fn cyan(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).cyan
    }

    pub fn comment(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).comment
    }
}

#[derive(Clone)]
struct ThemeDetails {
    background: Color32,
    foreground: Color32,
    selection: Color32,
    comment: Color32,
    red: Color32,
    orange: Color32,
    green: Color32,
    purple: Color32,
    cyan: Color32,
    background_darker: Color32,
    background_dark: Color32,
    background_light: Color32,
    background_lighter: Color32,
}

impl ThemeDetails {
    fn paddock_dark() -> Self {
        Self {
            background: Color32::from_rgb(0x24, 0x27, 0x30),
            foreground: Color32::from_rgb(0xe8, 0xe9, 0xed),
            selection: Color32::from_rgb(0x3d, 0x42, 0x52),
            comment: Color32::from_rgb(0x8c, 0x93, 0xa8),
            red: Color32::from_rgb(0xe8, 0x6a, 0x6a),
            orange: Color32::from_rgb(0xe5, 0xa5, 0x61),
            green: Color32::from_rgb(0x7d, 0xc8, 0x83),
            purple: Color32::from_rgb(0xb1, 0x8a, 0xe8),
            cyan: Color32::from_rgb(0x74, 0xc3, 0xe3),
            background_darker: Color32::from_rgb(0x1a, 0x1c, 0x23),
            background_dark: Color32::from_rgb(0x1f, 0x22, 0x2a),
            background_light: Color32::from_rgb(0x2e, 0x32, 0x3e),
            background_lighter: Color32::from_rgb(0x3a, 0x3f, 0x4d),
        }
    }

    fn paddock_light() -> Self {
        Self {
            background: Color32::from_rgb(0xf6, 0xf5, 0xf1),
            foreground: Color32::from_rgb(0x2c, 0x2e, 0x38),
            selection: Color32::from_rgb(0xd6, 0xd4, 0xe4),
            comment: Color32::from_rgb(0x7a, 0x80, 0x94),
            red: Color32::from_rgb(0xc0, 0x4b, 0x4b),
            orange: Color32::from_rgb(0xc4, 0x7e, 0x38),
            green: Color32::from_rgb(0x47, 0x9c, 0x52),
            purple: Color32::from_rgb(0x7a, 0x56, 0xbd),
            cyan: Color32::from_rgb(0x34, 0x88, 0xb0),
            background_darker: Color32::from_rgb(0xe4, 0xe2, 0xdb),
            background_dark: Color32::from_rgb(0xec, 0xea, 0xe4),
            background_light: Color32::from_rgb(0xfb, 0xfa, 0xf7),
            background_lighter: Color32::from_rgb(0xff, 0xff, 0xff),
        }
    }
}

pub fn set_theme(ctx: &egui::Context, theme: Theme) {
    set_theme_variant(ctx, &theme.dark, true);
    set_theme_variant(ctx, &theme.light, false);
}

fn set_theme_variant(ctx: &egui::Context, theme: &ThemeDetails, is_dark: bool) {
    let (default, variant) = match is_dark {
        true => (Visuals::dark(), egui::Theme::Dark),
        false => (Visuals::light(), egui::Theme::Light),
    };

    ctx.set_visuals_of(
        variant,
        Visuals {
            dark_mode: is_dark,
            widgets: Widgets {
                noninteractive: WidgetVisuals {
                    bg_fill: theme.background,
                    weak_bg_fill: theme.background_lighter,
                    bg_stroke: Stroke {
                        color: theme.background_dark,
                        ..default.widgets.noninteractive.bg_stroke
                    },
                    fg_stroke: Stroke {
                        color: theme.foreground,
                        ..default.widgets.noninteractive.fg_stroke
                    },
                    ..default.widgets.noninteractive
                },
                inactive: WidgetVisuals {
                    bg_fill: theme.background_light,
                    weak_bg_fill: theme.background_lighter,
                    bg_stroke: Stroke {
                        color: theme.background_dark,
                        ..default.widgets.inactive.bg_stroke
                    },
                    fg_stroke: Stroke {
                        color: theme.foreground,
                        ..default.widgets.inactive.fg_stroke
                    },
                    ..default.widgets.inactive
                },
                hovered: WidgetVisuals {
                    bg_fill: theme.selection,
                    weak_bg_fill: theme.background_lighter,
                    bg_stroke: Stroke { color: theme.cyan, ..default.widgets.hovered.bg_stroke },
                    fg_stroke: Stroke {
                        color: theme.foreground,
                        ..default.widgets.hovered.fg_stroke
                    },
                    ..default.widgets.hovered
                },
                active: WidgetVisuals {
                    bg_fill: theme.selection,
                    weak_bg_fill: theme.background_light,
                    bg_stroke: Stroke { color: theme.cyan, ..default.widgets.active.bg_stroke },
                    fg_stroke: Stroke {
                        color: theme.foreground,
                        ..default.widgets.active.fg_stroke
                    },
                    ..default.widgets.active
                },
                open: WidgetVisuals {
                    bg_fill: theme.background_dark,
                    weak_bg_fill: theme.background_lighter,
                    bg_stroke: Stroke { color: theme.purple, ..default.widgets.open.bg_stroke },
                    fg_stroke: Stroke { color: theme.foreground, ..default.widgets.open.fg_stroke },
                    ..default.widgets.open
                },
            },
            selection: Selection {
                bg_fill: theme.selection,
                stroke: Stroke { color: theme.foreground, ..default.selection.stroke },
            },
            hyperlink_color: theme.cyan,
            faint_bg_color: match is_dark {
                true => theme.background_darker,
                false => theme.background_light,
            },
            extreme_bg_color: theme.background_darker,
            code_bg_color: theme.background_dark,
            error_fg_color: theme.red,
            warn_fg_color: theme.orange,
            window_shadow: Shadow { color: theme.background_darker, ..default.window_shadow },
            window_fill: theme.background,
            window_stroke: Stroke { color: theme.background_light, ..default.window_stroke },
            panel_fill: theme.background_dark,
            popup_shadow: Shadow { color: theme.background_dark, ..default.popup_shadow },
            collapsing_header_frame: true,
            ..default
        },
    );
}
