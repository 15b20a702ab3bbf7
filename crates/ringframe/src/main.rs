use ringframe::config;
use ringframe::gui::app::AppModel;
use ringframe::sys::runtime;
use relm4::prelude::*;

fn main() {
    env_logger::init();

    let config = config::load_or_default();

    let (tx, rx) = async_channel::bounded(32);
    let (decode_tx, decode_rx) = async_channel::unbounded();

    // Start Background Services
    runtime::start_background_services(tx, decode_rx);

    let app = RelmApp::new("org.ringframe.editor");

    app.run::<AppModel>((config, decode_tx, rx));
}
