use crate::events::AppEvent;
use async_channel::{Receiver, Sender};
use gdk_pixbuf::Pixbuf;
use std::path::PathBuf;

/// Decodes requested images off the UI thread, one at a time and in request
/// order.
pub async fn run_decoder(requests: Receiver<PathBuf>, tx: Sender<AppEvent>) {
    while let Ok(path) = requests.recv().await {
        let event = decode(path).await;
        if tx.send(event).await.is_err() {
            break;
        }
    }
}

async fn decode(path: PathBuf) -> AppEvent {
    let source = path.clone();
    match tokio::task::spawn_blocking(move || Pixbuf::from_file(&source)).await {
        Ok(Ok(pixbuf)) => {
            log::debug!(
                "decoded {} ({}x{})",
                path.display(),
                pixbuf.width(),
                pixbuf.height()
            );
            AppEvent::ImageDecoded(path, pixbuf)
        }
        Ok(Err(e)) => AppEvent::ImageFailed(path, e.to_string()),
        Err(e) => AppEvent::ImageFailed(path, format!("decoder task failed: {}", e)),
    }
}
