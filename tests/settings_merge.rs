use opsdesk::settings::{
    theme, ColorPatch, LayoutPatch, Merge, Settings, SettingsPatch, ThemeMode,
};
use opsdesk::{update_settings, StoreHandle};
use proptest::prelude::*;

fn accent_patch(accent: &str) -> SettingsPatch {
    SettingsPatch {
        colors: Some(ColorPatch {
            primary_accent: Some(accent.to_string()),
            ..ColorPatch::default()
        }),
        ..SettingsPatch::default()
    }
}

#[test]
fn untouched_branches_survive_a_partial_update() {
    let store = StoreHandle::in_memory();
    update_settings(
        &store,
        SettingsPatch {
            colors: Some(ColorPatch {
                primary_accent: Some("#111111".into()),
                ..ColorPatch::default()
            }),
            layout: Some(LayoutPatch {
                border_radius: Some(4),
                ..LayoutPatch::default()
            }),
            ..SettingsPatch::default()
        },
    )
    .unwrap();

    let settings = update_settings(&store, accent_patch("#222222")).unwrap();
    assert_eq!(settings.colors.primary_accent, "#222222");
    assert_eq!(settings.layout.border_radius, 4);
}

#[test]
fn theme_switch_overlays_the_target_baseline_then_the_patch() {
    let store = StoreHandle::in_memory();
    // Customize the dark palette first.
    update_settings(&store, accent_patch("#010101")).unwrap();

    let mut patch = accent_patch("#aabbcc");
    patch.theme_mode = Some(ThemeMode::Light);
    let settings = update_settings(&store, patch).unwrap();

    let light = theme::baseline(ThemeMode::Light).colors.unwrap();
    assert_eq!(settings.theme_mode, ThemeMode::Light);
    // The explicit patch wins on its key ...
    assert_eq!(settings.colors.primary_accent, "#aabbcc");
    // ... every other palette key takes the light baseline.
    assert_eq!(Some(settings.colors.background), light.background);
    assert_eq!(Some(settings.colors.surface), light.surface);
    assert_eq!(Some(settings.colors.text_primary), light.text_primary);
}

#[test]
fn theme_switch_keeps_sections_outside_the_baseline() {
    let store = StoreHandle::in_memory();
    store
        .mutate(|state| {
            state.settings.admin_pin = Some("9876".into());
            state.settings.user_preferences.locale = "en-IE".into();
        })
        .unwrap();

    let mut patch = SettingsPatch::default();
    patch.theme_mode = Some(ThemeMode::Light);
    let settings = update_settings(&store, patch).unwrap();

    assert_eq!(settings.admin_pin.as_deref(), Some("9876"));
    assert_eq!(settings.user_preferences.locale, "en-IE");
}

#[test]
fn same_mode_patch_skips_the_baseline_overlay() {
    let store = StoreHandle::in_memory();
    update_settings(&store, accent_patch("#010101")).unwrap();

    // Mode already dark: re-stating it must not reset the custom accent.
    let mut patch = SettingsPatch::default();
    patch.theme_mode = Some(ThemeMode::Dark);
    let settings = update_settings(&store, patch).unwrap();
    assert_eq!(settings.colors.primary_accent, "#010101");
}

proptest! {
    #[test]
    fn merging_the_same_patch_twice_is_idempotent(
        accent in "#[0-9a-f]{6}",
        radius in 0u32..64,
    ) {
        let patch = SettingsPatch {
            colors: Some(ColorPatch {
                primary_accent: Some(accent),
                ..ColorPatch::default()
            }),
            layout: Some(LayoutPatch {
                border_radius: Some(radius),
                ..LayoutPatch::default()
            }),
            ..SettingsPatch::default()
        };

        let mut settings = Settings::default();
        settings.merge(patch.clone());
        let once = settings.clone();
        settings.merge(patch);
        prop_assert_eq!(settings, once);
    }

    #[test]
    fn as_patch_reproduces_any_reachable_settings(
        accent in "#[0-9a-f]{6}",
        locale in "[a-z]{2}-[A-Z]{2}",
    ) {
        let mut source = Settings::default();
        source.merge(SettingsPatch {
            colors: Some(ColorPatch {
                primary_accent: Some(accent),
                ..ColorPatch::default()
            }),
            ..SettingsPatch::default()
        });
        source.user_preferences.locale = locale;

        let mut target = Settings::default();
        target.merge(source.as_patch());
        prop_assert_eq!(target, source);
    }
}
