use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;

use crate::error::{AppError, AppResult};
use crate::id::new_uuid_v7;
use crate::model::ThemePreset;
use crate::store::StoreHandle;
use crate::time::now_ms;

pub mod merge;
pub mod theme;

pub use merge::{
    BrandingPatch, ColorPatch, LayoutPatch, Merge, MotionPatch, SettingsPatch, TypographyPatch,
    UserPreferencesPatch,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../ui/bindings/")]
pub enum ThemeMode {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../ui/bindings/")]
pub enum Density {
    #[default]
    Comfortable,
    Compact,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../ui/bindings/")]
pub struct ColorSettings {
    pub primary_accent: String,
    pub background: String,
    pub surface: String,
    pub text_primary: String,
    pub text_secondary: String,
    pub success: String,
    pub warning: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../ui/bindings/")]
pub struct TypographySettings {
    pub font_family: String,
    pub base_size_px: u32,
    pub heading_weight: u32,
    pub body_weight: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../ui/bindings/")]
pub struct LayoutSettings {
    pub border_radius: u32,
    pub density: Density,
    pub sidebar_width: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../ui/bindings/")]
pub struct MotionSettings {
    pub enable_animations: bool,
    pub transition_ms: u32,
    pub reduce_motion: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../ui/bindings/")]
pub struct BrandingSettings {
    pub company_name: String,
    pub tagline: String,
    pub logo_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../ui/bindings/")]
pub struct UserPreferences {
    pub locale: String,
    pub date_format: String,
    pub start_view: String,
    pub sound_enabled: bool,
    pub pinned_views: Vec<String>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        UserPreferences {
            locale: "en-US".into(),
            date_format: "YYYY-MM-DD".into(),
            start_view: "dashboard".into(),
            sound_enabled: true,
            pinned_views: Vec::new(),
        }
    }
}

/// Nested configuration tree. Mutated only through [`update_settings`];
/// full replacement never happens outside theme application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../ui/bindings/")]
pub struct Settings {
    pub theme_mode: ThemeMode,
    pub colors: ColorSettings,
    pub typography: TypographySettings,
    pub layout: LayoutSettings,
    pub motion: MotionSettings,
    pub branding: BrandingSettings,
    /// `None` means the PIN was never configured; the elevation gate falls
    /// back to [`crate::elevation::DEFAULT_ADMIN_PIN`].
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub admin_pin: Option<String>,
    pub user_preferences: UserPreferences,
}

impl Default for Settings {
    fn default() -> Self {
        let mut settings = Settings {
            theme_mode: ThemeMode::Dark,
            colors: ColorSettings::default(),
            typography: TypographySettings::default(),
            layout: LayoutSettings::default(),
            motion: MotionSettings::default(),
            branding: BrandingSettings::default(),
            admin_pin: None,
            user_preferences: UserPreferences::default(),
        };
        settings.merge(theme::baseline(ThemeMode::Dark));
        settings
    }
}

/// Reconcile a partial update into the stored settings.
///
/// A patch that changes `theme_mode` merges in two stages: a deep copy of the
/// current settings takes the target mode's baseline first, then the explicit
/// patch on top, which wins every scalar conflict. Sections the baseline does
/// not cover (preferences, PIN) survive untouched.
pub fn update_settings(store: &StoreHandle, patch: SettingsPatch) -> AppResult<Settings> {
    let mut theme_switch = false;
    store.mutate(|state| {
        let settings = &mut state.settings;
        match patch.theme_mode {
            Some(mode) if mode != settings.theme_mode => {
                theme_switch = true;
                let mut next = settings.clone();
                next.merge(theme::baseline(mode));
                next.merge(patch);
                *settings = next;
            }
            _ => settings.merge(patch),
        }
    })?;

    let settings = store.snapshot().settings;
    info!(
        target: "opsdesk",
        event = "settings_updated",
        theme_switch,
        mode = ?settings.theme_mode
    );
    Ok(settings)
}

/// Snapshot the current settings into a named preset.
pub fn save_theme_preset(store: &StoreHandle, name: &str) -> AppResult<ThemePreset> {
    let preset = ThemePreset {
        id: new_uuid_v7(),
        name: name.to_string(),
        settings: store.snapshot().settings.as_patch(),
        created_at: now_ms(),
    };
    store.mutate(|state| state.custom_themes.push(preset.clone()))?;
    info!(target: "opsdesk", event = "theme_preset_saved", id = %preset.id, name = %preset.name);
    Ok(preset)
}

/// Apply a saved preset through the same reconciler as any other update.
pub fn apply_theme_preset(store: &StoreHandle, preset_id: &str) -> AppResult<Settings> {
    let preset = store
        .snapshot()
        .custom_themes
        .iter()
        .find(|p| p.id == preset_id)
        .cloned()
        .ok_or_else(|| {
            AppError::new("SETTINGS/PRESET_NOT_FOUND", "Theme preset not found")
                .with_context("id", preset_id.to_string())
        })?;
    update_settings(store, preset.settings)
}

/// Remove a saved preset. Removing an id that is already gone is a no-op.
pub fn delete_theme_preset(store: &StoreHandle, preset_id: &str) -> AppResult<()> {
    store.mutate(|state| state.custom_themes.retain(|p| p.id != preset_id))?;
    info!(target: "opsdesk", event = "theme_preset_deleted", id = %preset_id);
    Ok(())
}
