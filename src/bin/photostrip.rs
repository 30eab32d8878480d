use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use photostrip::{
    apply_filter, export, render_strip, session::SessionDocument, FilterRegistry, FsAssetStore,
    Photo, SessionState, StickerCatalog, TemplateRegistry, DEFAULT_STRIP_WIDTH,
};

#[derive(Parser, Debug)]
#[command(name = "photostrip", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose four photos into a strip PNG.
    Compose(ComposeArgs),
    /// List the built-in filters.
    Filters,
    /// List the built-in templates.
    Templates,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input photo, given four times in slot order.
    #[arg(long = "photo", num_args = 1, required = true)]
    photos: Vec<PathBuf>,

    /// Template id.
    #[arg(long, default_value = "default")]
    template: String,

    /// Filter id.
    #[arg(long, default_value = "normal")]
    filter: String,

    /// Optional session JSON with sticker placements.
    #[arg(long)]
    session: Option<PathBuf>,

    /// Root directory for template/texture/sticker artwork.
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Strip width in pixels.
    #[arg(long, default_value_t = DEFAULT_STRIP_WIDTH)]
    width: u32,

    /// Output PNG path; defaults to the date-stamped download name.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => compose(args),
        Command::Filters => {
            for f in FilterRegistry::builtin().iter() {
                let tex = f.texture.as_ref().map(|t| t.path.as_str()).unwrap_or("-");
                println!("{:<14} {:<14} {:<60} {}", f.id, f.name, f.effect, tex);
            }
            Ok(())
        }
        Command::Templates => {
            for t in TemplateRegistry::builtin().iter() {
                println!("{:<12} {:<20} slots={} {}", t.id, t.name, t.slot_count(), t.description);
            }
            Ok(())
        }
    }
}

fn compose(args: ComposeArgs) -> anyhow::Result<()> {
    if args.photos.len() != photostrip::PHOTO_COUNT {
        anyhow::bail!(
            "expected {} --photo inputs, got {}",
            photostrip::PHOTO_COUNT,
            args.photos.len()
        );
    }

    let templates = TemplateRegistry::builtin();
    let filters = FilterRegistry::builtin();
    let catalog = StickerCatalog::builtin();
    let template = templates.get(&args.template)?.clone();
    let filter = filters.get(&args.filter)?.clone();
    let mut assets = FsAssetStore::new(&args.assets);

    let mut session = match &args.session {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read session '{}'", path.display()))?;
            let doc: SessionDocument =
                serde_json::from_slice(&bytes).context("parse session JSON")?;
            SessionState::from_document(&doc, template, filter)?
        }
        None => SessionState::new(template, filter, 0),
    };

    let mut processed = Vec::with_capacity(args.photos.len());
    for path in &args.photos {
        let bytes =
            std::fs::read(path).with_context(|| format!("read photo '{}'", path.display()))?;
        let photo = Photo::from_bytes(bytes)?;
        processed.push(apply_filter(&photo, session.filter(), &mut assets)?);
    }
    session.set_photos(processed)?;

    let surface = render_strip(
        session.template(),
        session.photos(),
        session.stickers(),
        &catalog,
        &mut assets,
        args.width,
    )?;

    let png = export::encode_png(&surface)?;
    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(export::export_filename_today()));
    std::fs::write(&out, png).with_context(|| format!("write '{}'", out.display()))?;
    println!("wrote {}", out.display());
    Ok(())
}
