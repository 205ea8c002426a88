//! Input handling: maps key/mouse events to state mutations.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::{Action, KeyBind};
use crate::core::material::Material;
use crate::ui::controls::PanelZones;
use crate::ui::layout::point_in_rect;

use super::settings::{SettingsItem, SETTINGS_ITEMS};
use super::state::{ActiveView, AppState};

/// Total selectable rows in the key-binding submenu (actions + "Reset").
pub fn controls_item_count() -> usize {
    Action::ALL.len() + 1
}

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Canvas => handle_canvas_key(state, key),
        ActiveView::SettingsMenu => handle_settings_key(state, key),
        ActiveView::KeyBindingsSubmenu => {
            if state.awaiting_rebind {
                handle_rebind_key(state, key);
            } else {
                handle_controls_key(state, key);
            }
        }
    }
}

// ── Canvas view (configurable bindings) ─────────────────────────

fn handle_canvas_key(state: &mut AppState, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    // Digits pick a material directly, in selector order.
    if let KeyCode::Char(c @ '1'..='9') = key.code {
        if key.modifiers.is_empty() {
            let idx = c as usize - '1' as usize;
            if let Some(&m) = Material::ALL.get(idx) {
                state.select_material(m);
            }
            return;
        }
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    match action {
        Action::TogglePause => state.toggle_pause(),
        Action::StepOnce => state.step_once(),
        Action::SlowerTicks => {
            state.set_tick_interval(state.tick_interval.saturating_add(1));
            state.status_message = Some(format!("Tick every {} frames", state.tick_interval));
        }
        Action::FasterTicks => {
            state.set_tick_interval(state.tick_interval.saturating_sub(1));
            state.status_message = Some(format!("Tick every {} frames", state.tick_interval));
        }
        Action::NextMaterial => state.cycle_material(1),
        Action::PrevMaterial => state.cycle_material(-1),
        Action::ClearCanvas => state.clear_canvas(),
        Action::Snapshot => state.save_snapshot(),
        Action::OpenSettings => {
            state.active_view = ActiveView::SettingsMenu;
            state.settings_selected = 0;
            state.mouse_down = false;
        }
        Action::Quit => state.should_quit = true,
    }
}

// ── Settings menu (hardcoded keys) ──────────────────────────────

fn handle_settings_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            state.active_view = ActiveView::Canvas;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.settings_selected = state.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.settings_selected < SETTINGS_ITEMS.len() - 1 {
                state.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
            if let Some(item) = SETTINGS_ITEMS.get(state.settings_selected) {
                match item {
                    SettingsItem::Submenu { view, .. } => {
                        state.active_view = *view;
                        state.controls_selected = 0;
                    }
                    SettingsItem::Toggle { get, set, .. } => {
                        let current = get(state);
                        set(state, !current);
                    }
                    SettingsItem::Cycle { cycle, .. } => {
                        cycle(state);
                    }
                }
            }
        }
        _ => {}
    }
}

// ── Key-binding submenu (hardcoded navigation, interactive rebinding) ──

fn handle_controls_key(state: &mut AppState, key: KeyEvent) {
    let item_count = controls_item_count();

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            state.active_view = ActiveView::Canvas;
        }
        KeyCode::Left | KeyCode::Char('h') => {
            state.active_view = ActiveView::SettingsMenu;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.controls_selected = state.controls_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.controls_selected < item_count - 1 {
                state.controls_selected += 1;
            }
        }
        KeyCode::Enter => {
            if state.controls_selected < Action::ALL.len() {
                state.awaiting_rebind = true;
            } else {
                state.config.reset_defaults();
                save_bindings(state);
            }
        }
        KeyCode::Delete | KeyCode::Backspace => {
            if let Some(&action) = Action::ALL.get(state.controls_selected) {
                state.config.bindings.insert(action, Vec::new());
                save_bindings(state);
            }
        }
        _ => {}
    }
}

/// Capture the next key press as a new binding.
fn handle_rebind_key(state: &mut AppState, key: KeyEvent) {
    // Only process Press events (ignore Release/Repeat on supported terminals).
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Esc {
        state.awaiting_rebind = false;
        return;
    }

    let Some(&action) = Action::ALL.get(state.controls_selected) else {
        state.awaiting_rebind = false;
        return;
    };
    state.config.add_binding(action, KeyBind::from_key_event(key));
    save_bindings(state);
    state.awaiting_rebind = false;
}

fn save_bindings(state: &mut AppState) {
    if let Err(e) = state.config.save() {
        tracing::warn!("failed to save key bindings: {e:#}");
        state.status_message = Some(format!("Could not save bindings: {e}"));
    }
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view != ActiveView::Canvas {
        return;
    }

    let (col, row) = (mouse.column, mouse.row);
    let zones = PanelZones::compute(state.layout().panel_area);
    let on_canvas = state
        .canvas_geometry()
        .is_some_and(|g| point_in_rect(g.drawn_rect(), col, row));

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if on_canvas {
                state.mouse_down = true;
                state.pointer = Some((col, row));
                state.paint_at_pointer();
                return;
            }
            state.mouse_down = false;

            if point_in_rect(zones.pause, col, row) {
                state.toggle_pause();
            } else if point_in_rect(zones.slider, col, row) {
                state.dragging_slider = true;
                state.set_tick_interval(zones.slider_value_at(col));
            } else if let Some(m) = zones.material_at(col, row) {
                state.select_material(m);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if state.dragging_slider {
                state.set_tick_interval(zones.slider_value_at(col));
                return;
            }
            pointer_moved(state, col, row, on_canvas);
            if state.mouse_down {
                state.paint_at_pointer();
            }
        }
        MouseEventKind::Moved => pointer_moved(state, col, row, on_canvas),
        MouseEventKind::Up(MouseButton::Left) => {
            state.mouse_down = false;
            state.dragging_slider = false;
        }
        MouseEventKind::ScrollUp if on_canvas || point_in_rect(zones.materials, col, row) => {
            state.cycle_material(-1);
        }
        MouseEventKind::ScrollDown if on_canvas || point_in_rect(zones.materials, col, row) => {
            state.cycle_material(1);
        }
        _ => {}
    }
}

/// Track the pointer; leaving the canvas releases the brush.
fn pointer_moved(state: &mut AppState, col: u16, row: u16, on_canvas: bool) {
    if on_canvas {
        state.pointer = Some((col, row));
    } else {
        state.pointer = None;
        state.mouse_down = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, TICK_INTERVAL_MAX, TICK_INTERVAL_MIN};
    use crate::core::renderer::Renderer;
    use crate::core::scene::Scene;
    use crossterm::event::KeyEventState;
    use ratatui::layout::Rect;

    fn state() -> AppState {
        let renderer = Renderer::with_scene(20, 20, Scene::Empty, Some(1)).unwrap();
        let mut state = AppState::new(renderer, AppConfig::default());
        state.terminal_area = Rect::new(0, 0, 60, 30);
        state
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn zones(state: &AppState) -> PanelZones {
        PanelZones::compute(state.layout().panel_area)
    }

    #[test]
    fn ctrl_c_quits_from_any_view() {
        let mut s = state();
        s.active_view = ActiveView::SettingsMenu;
        handle_key(
            &mut s,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(s.should_quit);
    }

    #[test]
    fn default_keys_drive_the_controls() {
        let mut s = state();
        handle_key(&mut s, key(KeyCode::Char(' ')));
        assert!(s.paused);

        handle_key(&mut s, key(KeyCode::Char('-')));
        assert_eq!(s.tick_interval, 2);
        handle_key(&mut s, key(KeyCode::Char('+')));
        handle_key(&mut s, key(KeyCode::Char('+')));
        assert_eq!(s.tick_interval, TICK_INTERVAL_MIN);

        handle_key(&mut s, key(KeyCode::Char(']')));
        assert_eq!(s.material, Material::ALL[1]);
        handle_key(&mut s, key(KeyCode::Char('3')));
        assert_eq!(s.material, Material::ALL[2]);

        handle_key(&mut s, key(KeyCode::Char('n')));
        assert_eq!(s.renderer.ticks(), 1);

        handle_key(&mut s, key(KeyCode::Char('?')));
        assert_eq!(s.active_view, ActiveView::SettingsMenu);
        handle_key(&mut s, key(KeyCode::Esc));
        assert_eq!(s.active_view, ActiveView::Canvas);

        handle_key(&mut s, key(KeyCode::Char('q')));
        assert!(s.should_quit);
    }

    #[test]
    fn settings_opens_key_binding_submenu() {
        let mut s = state();
        s.active_view = ActiveView::SettingsMenu;
        handle_key(&mut s, key(KeyCode::Enter));
        assert_eq!(s.active_view, ActiveView::KeyBindingsSubmenu);
        handle_key(&mut s, key(KeyCode::Down));
        assert_eq!(s.controls_selected, 1);
        handle_key(&mut s, key(KeyCode::Left));
        assert_eq!(s.active_view, ActiveView::SettingsMenu);
    }

    #[test]
    fn rebind_can_be_cancelled() {
        let mut s = state();
        s.active_view = ActiveView::KeyBindingsSubmenu;
        s.awaiting_rebind = true;
        handle_key(&mut s, key(KeyCode::Esc));
        assert!(!s.awaiting_rebind);
        assert_eq!(s.config.bindings, AppConfig::default_bindings());
    }

    #[test]
    fn pressing_on_canvas_paints_and_release_stops() {
        let mut s = state();
        s.select_material(Material::Wood);
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), 2, 2));
        assert!(s.mouse_down);
        assert_eq!(s.pointer, Some((2, 2)));
        assert!(s.renderer.simulation().count(Material::Wood) > 0);

        handle_mouse(&mut s, mouse(MouseEventKind::Up(MouseButton::Left), 2, 2));
        assert!(!s.mouse_down);
    }

    #[test]
    fn dragging_off_the_canvas_releases_the_brush() {
        let mut s = state();
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), 2, 2));
        let panel_x = s.layout().panel_area.x + 2;
        handle_mouse(&mut s, mouse(MouseEventKind::Drag(MouseButton::Left), panel_x, 2));
        assert!(!s.mouse_down);
        assert_eq!(s.pointer, None);
    }

    #[test]
    fn panel_clicks_hit_the_controls() {
        let mut s = state();
        let z = zones(&s);

        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), z.pause.x, z.pause.y));
        assert!(s.paused);

        let end = z.slider.x + z.slider.width - 1;
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), end, z.slider.y));
        assert_eq!(s.tick_interval, TICK_INTERVAL_MAX);
        assert!(s.dragging_slider);
        handle_mouse(&mut s, mouse(MouseEventKind::Drag(MouseButton::Left), 0, z.slider.y));
        assert_eq!(s.tick_interval, TICK_INTERVAL_MIN);
        handle_mouse(&mut s, mouse(MouseEventKind::Up(MouseButton::Left), 0, z.slider.y));
        assert!(!s.dragging_slider);

        let row = z.materials.y + 3;
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), z.materials.x, row));
        assert_eq!(s.material, Material::ALL[3]);
    }

    #[test]
    fn mouse_is_ignored_behind_popups() {
        let mut s = state();
        s.active_view = ActiveView::SettingsMenu;
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), 2, 2));
        assert!(!s.mouse_down);
        assert_eq!(s.renderer.simulation().count(Material::Air), 400);
    }
}
