use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{
    BrandingSettings, ColorSettings, LayoutSettings, MotionSettings, Settings, ThemeMode,
    TypographySettings, UserPreferences,
};

/// Structural deep-merge of a partial update into a settings tree.
///
/// Scalars overwrite when the patch carries `Some`, nested sections recurse,
/// and list fields are replaced wholesale, never merged element-wise.
pub trait Merge {
    type Patch;

    fn merge(&mut self, patch: Self::Patch);
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../ui/bindings/")]
pub struct ColorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub primary_accent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub surface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub text_primary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub text_secondary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub success: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error: Option<String>,
}

impl Merge for ColorSettings {
    type Patch = ColorPatch;

    fn merge(&mut self, patch: ColorPatch) {
        if let Some(v) = patch.primary_accent {
            self.primary_accent = v;
        }
        if let Some(v) = patch.background {
            self.background = v;
        }
        if let Some(v) = patch.surface {
            self.surface = v;
        }
        if let Some(v) = patch.text_primary {
            self.text_primary = v;
        }
        if let Some(v) = patch.text_secondary {
            self.text_secondary = v;
        }
        if let Some(v) = patch.success {
            self.success = v;
        }
        if let Some(v) = patch.warning {
            self.warning = v;
        }
        if let Some(v) = patch.error {
            self.error = v;
        }
    }
}

impl ColorSettings {
    pub fn as_patch(&self) -> ColorPatch {
        ColorPatch {
            primary_accent: Some(self.primary_accent.clone()),
            background: Some(self.background.clone()),
            surface: Some(self.surface.clone()),
            text_primary: Some(self.text_primary.clone()),
            text_secondary: Some(self.text_secondary.clone()),
            success: Some(self.success.clone()),
            warning: Some(self.warning.clone()),
            error: Some(self.error.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../ui/bindings/")]
pub struct TypographyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub base_size_px: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub heading_weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub body_weight: Option<u32>,
}

impl Merge for TypographySettings {
    type Patch = TypographyPatch;

    fn merge(&mut self, patch: TypographyPatch) {
        if let Some(v) = patch.font_family {
            self.font_family = v;
        }
        if let Some(v) = patch.base_size_px {
            self.base_size_px = v;
        }
        if let Some(v) = patch.heading_weight {
            self.heading_weight = v;
        }
        if let Some(v) = patch.body_weight {
            self.body_weight = v;
        }
    }
}

impl TypographySettings {
    pub fn as_patch(&self) -> TypographyPatch {
        TypographyPatch {
            font_family: Some(self.font_family.clone()),
            base_size_px: Some(self.base_size_px),
            heading_weight: Some(self.heading_weight),
            body_weight: Some(self.body_weight),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../ui/bindings/")]
pub struct LayoutPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub border_radius: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub density: Option<super::Density>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub sidebar_width: Option<u32>,
}

impl Merge for LayoutSettings {
    type Patch = LayoutPatch;

    fn merge(&mut self, patch: LayoutPatch) {
        if let Some(v) = patch.border_radius {
            self.border_radius = v;
        }
        if let Some(v) = patch.density {
            self.density = v;
        }
        if let Some(v) = patch.sidebar_width {
            self.sidebar_width = v;
        }
    }
}

impl LayoutSettings {
    pub fn as_patch(&self) -> LayoutPatch {
        LayoutPatch {
            border_radius: Some(self.border_radius),
            density: Some(self.density),
            sidebar_width: Some(self.sidebar_width),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../ui/bindings/")]
pub struct MotionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub enable_animations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub transition_ms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub reduce_motion: Option<bool>,
}

impl Merge for MotionSettings {
    type Patch = MotionPatch;

    fn merge(&mut self, patch: MotionPatch) {
        if let Some(v) = patch.enable_animations {
            self.enable_animations = v;
        }
        if let Some(v) = patch.transition_ms {
            self.transition_ms = v;
        }
        if let Some(v) = patch.reduce_motion {
            self.reduce_motion = v;
        }
    }
}

impl MotionSettings {
    pub fn as_patch(&self) -> MotionPatch {
        MotionPatch {
            enable_animations: Some(self.enable_animations),
            transition_ms: Some(self.transition_ms),
            reduce_motion: Some(self.reduce_motion),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../ui/bindings/")]
pub struct BrandingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub logo_url: Option<String>,
}

impl Merge for BrandingSettings {
    type Patch = BrandingPatch;

    fn merge(&mut self, patch: BrandingPatch) {
        if let Some(v) = patch.company_name {
            self.company_name = v;
        }
        if let Some(v) = patch.tagline {
            self.tagline = v;
        }
        if let Some(v) = patch.logo_url {
            self.logo_url = v;
        }
    }
}

impl BrandingSettings {
    pub fn as_patch(&self) -> BrandingPatch {
        BrandingPatch {
            company_name: Some(self.company_name.clone()),
            tagline: Some(self.tagline.clone()),
            logo_url: Some(self.logo_url.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../ui/bindings/")]
pub struct UserPreferencesPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub date_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub start_view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub sound_enabled: Option<bool>,
    /// Replaced wholesale when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub pinned_views: Option<Vec<String>>,
}

impl Merge for UserPreferences {
    type Patch = UserPreferencesPatch;

    fn merge(&mut self, patch: UserPreferencesPatch) {
        if let Some(v) = patch.locale {
            self.locale = v;
        }
        if let Some(v) = patch.date_format {
            self.date_format = v;
        }
        if let Some(v) = patch.start_view {
            self.start_view = v;
        }
        if let Some(v) = patch.sound_enabled {
            self.sound_enabled = v;
        }
        if let Some(v) = patch.pinned_views {
            self.pinned_views = v;
        }
    }
}

impl UserPreferences {
    pub fn as_patch(&self) -> UserPreferencesPatch {
        UserPreferencesPatch {
            locale: Some(self.locale.clone()),
            date_format: Some(self.date_format.clone()),
            start_view: Some(self.start_view.clone()),
            sound_enabled: Some(self.sound_enabled),
            pinned_views: Some(self.pinned_views.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../ui/bindings/")]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub theme_mode: Option<ThemeMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub colors: Option<ColorPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub typography: Option<TypographyPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub layout: Option<LayoutPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub motion: Option<MotionPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub branding: Option<BrandingPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub admin_pin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub user_preferences: Option<UserPreferencesPatch>,
}

impl Merge for Settings {
    type Patch = SettingsPatch;

    fn merge(&mut self, patch: SettingsPatch) {
        if let Some(v) = patch.theme_mode {
            self.theme_mode = v;
        }
        if let Some(p) = patch.colors {
            self.colors.merge(p);
        }
        if let Some(p) = patch.typography {
            self.typography.merge(p);
        }
        if let Some(p) = patch.layout {
            self.layout.merge(p);
        }
        if let Some(p) = patch.motion {
            self.motion.merge(p);
        }
        if let Some(p) = patch.branding {
            self.branding.merge(p);
        }
        if let Some(v) = patch.admin_pin {
            self.admin_pin = Some(v);
        }
        if let Some(p) = patch.user_preferences {
            self.user_preferences.merge(p);
        }
    }
}

impl Settings {
    /// Full snapshot of the tree as a patch; applying it to any settings
    /// value reproduces this one (except an unset `admin_pin`, which a patch
    /// cannot clear).
    pub fn as_patch(&self) -> SettingsPatch {
        SettingsPatch {
            theme_mode: Some(self.theme_mode),
            colors: Some(self.colors.as_patch()),
            typography: Some(self.typography.as_patch()),
            layout: Some(self.layout.as_patch()),
            motion: Some(self.motion.as_patch()),
            branding: Some(self.branding.as_patch()),
            admin_pin: self.admin_pin.clone(),
            user_preferences: Some(self.user_preferences.as_patch()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patch_is_a_no_op() {
        let mut settings = Settings::default();
        let before = settings.clone();
        settings.merge(SettingsPatch::default());
        assert_eq!(settings, before);
    }

    #[test]
    fn scalar_wins_and_siblings_survive() {
        let mut settings = Settings::default();
        let radius = settings.layout.border_radius;
        settings.merge(SettingsPatch {
            colors: Some(ColorPatch {
                primary_accent: Some("#222222".into()),
                ..ColorPatch::default()
            }),
            ..SettingsPatch::default()
        });
        assert_eq!(settings.layout.border_radius, radius);
        assert_eq!(settings.colors.primary_accent, "#222222");
    }

    #[test]
    fn list_fields_replace_wholesale() {
        let mut settings = Settings::default();
        settings.user_preferences.pinned_views = vec!["events".into(), "finance".into()];
        settings.merge(SettingsPatch {
            user_preferences: Some(UserPreferencesPatch {
                pinned_views: Some(vec!["clients".into()]),
                ..UserPreferencesPatch::default()
            }),
            ..SettingsPatch::default()
        });
        assert_eq!(settings.user_preferences.pinned_views, vec!["clients"]);
    }

    #[test]
    fn as_patch_round_trips() {
        let mut source = Settings::default();
        source.colors.primary_accent = "#abcdef".into();
        source.admin_pin = Some("0000".into());

        let mut target = Settings::default();
        target.merge(source.as_patch());
        assert_eq!(target, source);
    }
}
