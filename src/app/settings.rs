//! Settings menu model (data only).
//!
//! Keeping these definitions outside the input handler lets both the handler
//! and UI renderers consume the same source of truth without cross-importing.

use super::state::{ActiveView, AppState};
use crate::config::BRUSH_RADIUS_MAX;

/// A single item in the settings menu.
pub enum SettingsItem {
    /// Opens a submenu.
    Submenu {
        label: &'static str,
        view: ActiveView,
    },
    /// Boolean toggle: reads/writes via accessors on `AppState`.
    Toggle {
        label: &'static str,
        get: fn(&AppState) -> bool,
        set: fn(&mut AppState, bool),
    },
    /// Cycles through a finite set of values, or runs a one-shot action.
    Cycle {
        label: &'static str,
        value: fn(&AppState) -> String,
        cycle: fn(&mut AppState),
    },
}

impl SettingsItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Submenu { label, .. }
            | Self::Toggle { label, .. }
            | Self::Cycle { label, .. } => label,
        }
    }
}

/// Persist the config, reporting failures in the status bar.
fn persist(state: &mut AppState, done: String) {
    state.status_message = Some(match state.config.save() {
        Ok(()) => done,
        Err(e) => {
            tracing::warn!("failed to save config: {e:#}");
            format!("Could not save settings: {e}")
        }
    });
}

/// All items shown in the settings popup, in display order.
pub static SETTINGS_ITEMS: &[SettingsItem] = &[
    SettingsItem::Submenu {
        label: "Controls",
        view: ActiveView::KeyBindingsSubmenu,
    },
    SettingsItem::Cycle {
        label: "Brush Size",
        value: |s| {
            let side = 1 + 2 * u32::from(s.config.brush_radius);
            format!("{side}x{side}")
        },
        cycle: |s| {
            s.config.brush_radius = (s.config.brush_radius + 1) % (BRUSH_RADIUS_MAX + 1);
            let radius = s.config.brush_radius;
            persist(s, format!("Brush radius: {radius}"));
        },
    },
    SettingsItem::Toggle {
        label: "Show Stats",
        get: |s| s.config.show_stats,
        set: |s, v| {
            s.config.show_stats = v;
            persist(s, format!("Stats {}", if v { "shown" } else { "hidden" }));
        },
    },
    SettingsItem::Cycle {
        label: "Save Tick Interval",
        value: |s| {
            if s.config.tick_interval == s.tick_interval {
                format!("{} (saved)", s.tick_interval)
            } else {
                format!("{} → {}", s.config.tick_interval, s.tick_interval)
            }
        },
        cycle: |s| {
            s.config.tick_interval = s.tick_interval;
            s.config.material = s.material;
            let interval = s.tick_interval;
            persist(s, format!("Default tick interval: {interval}"));
        },
    },
];
