use gdk_pixbuf::Pixbuf;
use ringcore::control::ControlCommand;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum AppEvent {
    ConfigReload,
    LoadImage(PathBuf),
    ImageDecoded(PathBuf, Pixbuf),
    ImageFailed(PathBuf, String),
    Export(Option<PathBuf>),
    ResetView,
    Zoom(f64),
}

impl From<ControlCommand> for AppEvent {
    fn from(cmd: ControlCommand) -> Self {
        match cmd {
            ControlCommand::Load(path) => AppEvent::LoadImage(path),
            ControlCommand::Export(path) => AppEvent::Export(path),
            ControlCommand::ResetView => AppEvent::ResetView,
            ControlCommand::Zoom(scale) => AppEvent::Zoom(scale),
        }
    }
}
