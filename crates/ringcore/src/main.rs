use clap::{Args, Parser, Subcommand};
use ringcore::canvas::Canvas;
use ringcore::control::{ControlCommand, SOCKET_PATH};
use ringcore::geom::Point;
use ringcore::image::RasterImage;
use ringcore::render::RenderOutcome;
use ringcore::session::EditorSession;
use ringcore::style::{ColorSpec, FontFamily, FontWeight, FrameStyle, TextStyle};
use ringcore::surface::Capabilities;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ringctl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a framed picture straight to a PNG file
    Render(RenderArgs),
    /// Load an image into the running editor
    Load { path: PathBuf },
    /// Export the running editor's canvas
    Export { path: Option<PathBuf> },
    /// Reset the running editor's pan and zoom
    Reset,
    /// Set the running editor's zoom
    Zoom { scale: f64 },
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// The photo to frame
    image: PathBuf,

    /// Where to write the PNG
    #[arg(short = 'o', long, default_value = "framed-image.png")]
    output: PathBuf,

    /// Text to curve along the ring
    #[arg(short = 't', long)]
    text: Option<String>,

    #[arg(long)]
    text_color: Option<String>,

    #[arg(long)]
    font_family: Option<String>,

    /// CSS weight: normal, bold or 100-900
    #[arg(long)]
    font_weight: Option<FontWeight>,

    #[arg(long)]
    font_size: Option<f64>,

    #[arg(long)]
    frame_color: Option<String>,

    #[arg(long)]
    frame_width: Option<f64>,

    /// Where the text is centred on the ring, in degrees
    #[arg(short = 'a', long)]
    angle: Option<f64>,

    #[arg(short = 's', long, default_value_t = 1.0)]
    scale: f64,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    offset_x: f64,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    offset_y: f64,

    /// Leave out the fading ring
    #[arg(long)]
    no_fade: bool,
}

impl RenderArgs {
    fn styles(&self) -> (FrameStyle, TextStyle) {
        let mut frame = FrameStyle::default();
        let mut text = TextStyle::default();

        if let Some(v) = &self.frame_color {
            frame.frame_color = ColorSpec::new(v.as_str());
        }
        if let Some(v) = self.frame_width {
            frame.frame_width = v;
        }
        if let Some(v) = self.angle {
            frame.angle_deg = v;
        }
        if let Some(v) = &self.text {
            text.text = v.clone();
        }
        if let Some(v) = &self.text_color {
            text.text_color = ColorSpec::new(v.as_str());
        }
        if let Some(v) = &self.font_family {
            text.font_family = FontFamily::new(v.as_str());
        }
        if let Some(v) = self.font_weight {
            text.font_weight = v;
        }
        if let Some(v) = self.font_size {
            text.font_size = v;
        }

        (frame, text)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => render(&args),
        Commands::Load { path } => {
            let path = std::path::absolute(&path)?;
            send_command(&ControlCommand::Load(path))
        }
        Commands::Export { path } => {
            let path = path.map(std::path::absolute).transpose()?;
            send_command(&ControlCommand::Export(path))
        }
        Commands::Reset => send_command(&ControlCommand::ResetView),
        Commands::Zoom { scale } => send_command(&ControlCommand::Zoom(scale)),
    }
}

fn render(args: &RenderArgs) -> anyhow::Result<()> {
    let (frame, text) = args.styles();
    let mut session = EditorSession::new(frame, text);

    let image = RasterImage::open(&args.image)
        .map_err(|e| anyhow::anyhow!("Could not load '{}': {}", args.image.display(), e))?;
    session.image_loaded(image);
    session.set_scale(args.scale);
    session.pan(Point::new(args.offset_x, args.offset_y));

    let canvas = Canvas::with_capabilities(Capabilities {
        conic_gradient: !args.no_fade,
    })?;
    if let RenderOutcome::Skipped = canvas.render(&mut session)? {
        anyhow::bail!("Nothing was rendered");
    }
    canvas.save_png(&args.output)?;
    Ok(())
}

fn send_command(cmd: &ControlCommand) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to ringframe at {}: {}. Is the editor running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", cmd)?;
    Ok(())
}
