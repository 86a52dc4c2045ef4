use once_cell::sync::Lazy;

use super::merge::{
    BrandingPatch, ColorPatch, LayoutPatch, MotionPatch, SettingsPatch, TypographyPatch,
};
use super::{Density, ThemeMode};

/// Built-in baseline for a theme mode. Every palette/typography/layout/motion/
/// branding key is populated; a mode switch overlays this onto the current
/// settings before the explicit update is applied on top.
pub fn baseline(mode: ThemeMode) -> SettingsPatch {
    match mode {
        ThemeMode::Dark => DARK_BASELINE.clone(),
        ThemeMode::Light => LIGHT_BASELINE.clone(),
    }
}

static DARK_BASELINE: Lazy<SettingsPatch> = Lazy::new(|| SettingsPatch {
    theme_mode: None,
    colors: Some(ColorPatch {
        primary_accent: Some("#7c5cff".into()),
        background: Some("#10121a".into()),
        surface: Some("#1a1d29".into()),
        text_primary: Some("#f2f3f7".into()),
        text_secondary: Some("#9aa0b5".into()),
        success: Some("#2dd4a0".into()),
        warning: Some("#f5b84d".into()),
        error: Some("#ef5d6b".into()),
    }),
    typography: Some(base_typography()),
    layout: Some(base_layout()),
    motion: Some(base_motion()),
    branding: Some(base_branding()),
    admin_pin: None,
    user_preferences: None,
});

static LIGHT_BASELINE: Lazy<SettingsPatch> = Lazy::new(|| SettingsPatch {
    theme_mode: None,
    colors: Some(ColorPatch {
        primary_accent: Some("#5b43d6".into()),
        background: Some("#f7f7fa".into()),
        surface: Some("#ffffff".into()),
        text_primary: Some("#1c1e26".into()),
        text_secondary: Some("#5a6072".into()),
        success: Some("#1f9d76".into()),
        warning: Some("#b07a14".into()),
        error: Some("#c93a49".into()),
    }),
    typography: Some(base_typography()),
    layout: Some(base_layout()),
    motion: Some(base_motion()),
    branding: Some(base_branding()),
    admin_pin: None,
    user_preferences: None,
});

// Typography, layout, motion and branding baselines are shared between the
// two modes; only the palette differs.

fn base_typography() -> TypographyPatch {
    TypographyPatch {
        font_family: Some("Inter, sans-serif".into()),
        base_size_px: Some(15),
        heading_weight: Some(600),
        body_weight: Some(400),
    }
}

fn base_layout() -> LayoutPatch {
    LayoutPatch {
        border_radius: Some(10),
        density: Some(Density::Comfortable),
        sidebar_width: Some(264),
    }
}

fn base_motion() -> MotionPatch {
    MotionPatch {
        enable_animations: Some(true),
        transition_ms: Some(180),
        reduce_motion: Some(false),
    }
}

fn base_branding() -> BrandingPatch {
    BrandingPatch {
        company_name: Some("Opsdesk".into()),
        tagline: Some(String::new()),
        logo_url: Some(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baselines_cover_every_palette_key() {
        for mode in [ThemeMode::Dark, ThemeMode::Light] {
            let colors = baseline(mode).colors.expect("palette present");
            assert!(colors.primary_accent.is_some());
            assert!(colors.background.is_some());
            assert!(colors.surface.is_some());
            assert!(colors.text_primary.is_some());
            assert!(colors.text_secondary.is_some());
            assert!(colors.success.is_some());
            assert!(colors.warning.is_some());
            assert!(colors.error.is_some());
        }
    }

    #[test]
    fn baselines_never_touch_mode_pin_or_preferences() {
        for mode in [ThemeMode::Dark, ThemeMode::Light] {
            let b = baseline(mode);
            assert!(b.theme_mode.is_none());
            assert!(b.admin_pin.is_none());
            assert!(b.user_preferences.is_none());
        }
    }
}
