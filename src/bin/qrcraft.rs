use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use qrcraft::{
    CompositionState, ContentKind, CpuQrRenderer, DotStyle, EditorConfig, ErrorCorrection,
    ExportFormat, EyeStyle, FsObjectStore, LogoFit, LogoShape, QrEditor, ShapeOptions,
    StateSnapshot, StylePatch, UploadFile,
};

#[derive(Parser, Debug)]
#[command(name = "qrcraft", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a styled QR code to PNG or JPEG.
    Render(RenderArgs),
    /// Clip an image to a logo shape and write it as PNG.
    ShapeLogo(ShapeLogoArgs),
    /// Print the render request derived from a state JSON file.
    Request(RequestArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Text to encode.
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// File to upload; its public URL is encoded.
    #[arg(long, requires = "kind")]
    file: Option<PathBuf>,

    /// Content kind of `--file` (image, audio, video, document).
    #[arg(long)]
    kind: Option<ContentKind>,

    /// Directory uploaded files are stored in.
    #[arg(long, default_value = "qr-uploads")]
    store_dir: PathBuf,

    /// Public base URL the store directory is served under.
    #[arg(long, default_value = "http://localhost:8000")]
    public_url: String,

    /// Editor config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output edge in pixels (overrides config).
    #[arg(long)]
    size: Option<u32>,

    /// Error correction level (overrides config).
    #[arg(long)]
    ec: Option<ErrorCorrection>,

    /// Module color.
    #[arg(long)]
    fg: Option<String>,

    /// Background color.
    #[arg(long)]
    bg: Option<String>,

    /// Data module style.
    #[arg(long)]
    dots: Option<DotStyle>,

    /// Finder pattern style.
    #[arg(long)]
    eyes: Option<EyeStyle>,

    /// Logo image to overlay.
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Logo shape.
    #[arg(long, default_value = "square")]
    logo_shape: LogoShape,

    /// Logo size ratio, clamped to 0.15..=0.5.
    #[arg(long)]
    logo_size: Option<f64>,

    /// Logo fit (overrides config).
    #[arg(long)]
    fit: Option<LogoFit>,

    /// Output format.
    #[arg(long, default_value = "png")]
    format: ExportFormat,

    /// Output file path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ShapeLogoArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Target shape.
    #[arg(long, default_value = "square")]
    shape: LogoShape,

    /// Base canvas edge in pixels.
    #[arg(long, default_value_t = qrcraft::DEFAULT_BASE_SIZE)]
    size: u32,

    /// How the image maps onto the canvas.
    #[arg(long, default_value = "stretch")]
    fit: LogoFit,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RequestArgs {
    /// State snapshot JSON; defaults to a fresh state.
    #[arg(long)]
    state: Option<PathBuf>,

    /// Logo image to shape with the state's logo shape.
    #[arg(long)]
    logo: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::ShapeLogo(args) => cmd_shape_logo(args),
        Command::Request(args) => cmd_request(args),
    }
}

fn read_bytes(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read '{}'", path.display()))
}

fn write_bytes(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => EditorConfig::from_path(path)?,
        None => EditorConfig::default(),
    }
    .with_env_overrides();
    if let Some(size) = args.size {
        config.qr_size = size;
    }
    if let Some(ec) = args.ec {
        config.error_correction = ec;
    }
    if let Some(fit) = args.fit {
        config.logo_fit = fit;
    }
    config.validate()?;

    let renderer = CpuQrRenderer::new(config.renderer_options())?;
    let store = Arc::new(FsObjectStore::new(&args.store_dir, args.public_url.clone()));
    let mut editor = QrEditor::new(config, renderer, store)?;

    let mut patch = StylePatch {
        foreground_color: args.fg.clone(),
        background_color: args.bg.clone(),
        ..StylePatch::default()
    };
    if let Some(d) = args.dots {
        patch = patch.dots(d);
    }
    if let Some(e) = args.eyes {
        patch = patch.eyes(e);
    }
    if !patch.is_empty() {
        editor.set_style(&patch)?;
    }

    if let Some(text) = &args.text {
        editor.set_payload(ContentKind::Text, text.clone());
    }
    if let (Some(file), Some(kind)) = (&args.file, args.kind) {
        editor.set_content_kind(kind);
        editor.upload(kind, UploadFile::from_path(file)?);
    }

    if let Some(size) = args.logo_size {
        editor.set_logo_size(size);
    }
    editor.set_logo_shape(args.logo_shape);
    if let Some(logo) = &args.logo {
        editor.set_logo(read_bytes(logo)?);
    }

    let notices = editor.take_notices();
    for n in &notices {
        eprintln!("{:?}: {}", n.kind, n.message);
    }
    if !notices.is_empty() {
        anyhow::bail!("{} notice(s) raised while composing", notices.len());
    }

    let hint = args
        .out
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let exported = editor.export(args.format, &hint)?;
    write_bytes(&args.out, &exported.bytes)?;
    editor.into_renderer().dispose();

    eprintln!(
        "wrote {} ({})",
        args.out.display(),
        exported.format.mime_type()
    );
    Ok(())
}

fn cmd_shape_logo(args: ShapeLogoArgs) -> anyhow::Result<()> {
    let bytes = read_bytes(&args.in_path)?;
    let opts = ShapeOptions {
        base_size: args.size,
        fit: args.fit,
    };
    let shaped = qrcraft::shape_logo(&bytes, args.shape, &opts)?;
    write_bytes(&args.out, shaped.png_bytes())?;

    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        shaped.width(),
        shaped.height()
    );
    Ok(())
}

fn cmd_request(args: RequestArgs) -> anyhow::Result<()> {
    let mut state = match &args.state {
        Some(path) => {
            let f = std::fs::File::open(path)
                .with_context(|| format!("open state '{}'", path.display()))?;
            let snapshot: StateSnapshot = serde_json::from_reader(std::io::BufReader::new(f))
                .with_context(|| "parse state JSON")?;
            CompositionState::from_snapshot(snapshot)?
        }
        None => CompositionState::new(),
    };

    if let Some(logo) = &args.logo {
        let job = state.set_logo(read_bytes(logo)?);
        let shaped = qrcraft::shape_logo(&job.raw, job.shape, &ShapeOptions::default())?;
        state.commit_logo(job.ticket, shaped);
    }

    let request = qrcraft::build_request(&state);
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}
