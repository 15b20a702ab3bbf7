use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use std::path::Path;

const FALLBACK_SIZE: i32 = 720;

/// Monitor the window will most likely open on.
fn primary_monitor() -> Option<gdk::Monitor> {
    let display = gdk::Display::default()?;
    let monitors = display.monitors();
    (0..monitors.n_items()).find_map(|i| {
        monitors
            .item(i)
            .and_then(|item| item.downcast::<gdk::Monitor>().ok())
    })
}

/// Opens the editor square, taking most of the monitor's height.
pub fn init_window(window: &gtk::ApplicationWindow) {
    let side = primary_monitor()
        .map(|m| (m.geometry().height() as f64 * 0.75) as i32)
        .filter(|&s| s > 0)
        .unwrap_or(FALLBACK_SIZE);
    window.set_default_size(side, side);
    set_title(window, None);
}

pub fn set_title(window: &gtk::ApplicationWindow, image: Option<&Path>) {
    let title = match image.and_then(|p| p.file_name()) {
        Some(name) => format!("{} - Ringframe", name.to_string_lossy()),
        None => "Ringframe".to_string(),
    };
    window.set_title(Some(&title));
}
