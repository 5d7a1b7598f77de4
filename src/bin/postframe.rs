use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use serde::{Serialize, de::DeserializeOwned};
use tracing_subscriber::EnvFilter;

use postframe::{
    Anchor, BackgroundOptions, ComposeOptions, Corner, CpuSurface, FitKind, ForegroundOptions,
    GeneralOptions, JsonFileStore, KeyValueStore, LayerSources, MemoryStore, OptionStore,
    OutputFormat, RasterDecoder, Rotation, SourceBlob, WatermarkOptions,
};

#[derive(Parser, Debug)]
#[command(name = "postframe", version, about = "Compose a post frame as a PNG")]
struct Cli {
    /// Background image.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Foreground image.
    #[arg(long)]
    foreground: Option<PathBuf>,

    /// Watermark image.
    #[arg(long)]
    watermark: Option<PathBuf>,

    /// Output format: `1:1` (1080x1080) or `4:5` (1080x1350).
    #[arg(long, value_parser = parse_format)]
    format: Option<OutputFormat>,

    /// JSON file with `background`, `foreground`, `watermark` and `general` sections.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Directory of persisted preferences; read first, then updated with the
    /// effective options of this run.
    #[arg(long)]
    prefs: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    overrides: Overrides,
}

#[derive(clap::Args, Debug, Default)]
struct Overrides {
    /// Background blur radius in pixels.
    #[arg(long)]
    blur: Option<f64>,

    /// Background brightness percentage.
    #[arg(long)]
    brightness: Option<f64>,

    /// Tile the background; `--repeat false` turns a stored `true` off.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    repeat: Option<bool>,

    /// Use the foreground image as the background.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    reuse_foreground: Option<bool>,

    /// Background scale.
    #[arg(long)]
    background_scale: Option<f64>,

    /// Foreground sizing: `contain` or `cover`.
    #[arg(long, value_parser = parse_keyword::<FitKind>)]
    mode: Option<FitKind>,

    /// Foreground cover anchor: `start`, `center` or `end`.
    #[arg(long, value_parser = parse_keyword::<Anchor>)]
    position: Option<Anchor>,

    /// Foreground rotation in degrees (0, 90, 180, 270).
    #[arg(long, value_parser = parse_rotation)]
    rotation: Option<Rotation>,

    /// Watermark opacity in `[0, 1]`.
    #[arg(long)]
    opacity: Option<f64>,

    /// Watermark corner, e.g. `bottom-right`.
    #[arg(long, value_parser = parse_keyword::<Corner>)]
    watermark_position: Option<Corner>,

    /// Watermark scale.
    #[arg(long)]
    watermark_scale: Option<f64>,
}

#[derive(serde::Deserialize, Debug, Default)]
#[serde(default, deny_unknown_fields)]
struct OptionsFile {
    background: Option<serde_json::Value>,
    foreground: Option<serde_json::Value>,
    watermark: Option<serde_json::Value>,
    general: Option<serde_json::Value>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let file = match &cli.options {
        Some(path) => read_options_file(path)?,
        None => OptionsFile::default(),
    };

    let (options, general) = match &cli.prefs {
        Some(dir) => resolve_options(&cli, file, &JsonFileStore::new(dir)?)?,
        None => resolve_options(&cli, file, &MemoryStore::new())?,
    };

    let sources = LayerSources {
        background: read_source(cli.background.as_deref())?,
        foreground: read_source(cli.foreground.as_deref())?,
        watermark: read_source(cli.watermark.as_deref())?,
    };

    let mut surface = CpuSurface::new(general.format.canvas())?;
    postframe::compose(&mut surface, &sources, &options, &RasterDecoder)?;

    if let Some(parent) = cli.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    surface.save_png(&cli.out)?;

    eprintln!("wrote {}", cli.out.display());
    Ok(())
}

/// Layer options in increasing precedence: stored preferences, options file,
/// command-line flags. Nothing is persisted unless the result validates.
fn resolve_options<S>(
    cli: &Cli,
    file: OptionsFile,
    backend: &S,
) -> anyhow::Result<(ComposeOptions, GeneralOptions)>
where
    S: KeyValueStore + Clone,
{
    let mut bg_store = open::<BackgroundOptions, _>("background", backend)?;
    let mut fg_store = open::<ForegroundOptions, _>("foreground", backend)?;
    let mut wm_store = open::<WatermarkOptions, _>("watermark", backend)?;
    let mut general_store = open::<GeneralOptions, _>("general", backend)?;

    let o = &cli.overrides;
    let mut background = merge_section(bg_store.get(), file.background.as_ref())?;
    if let Some(v) = o.blur {
        background.blur = v;
    }
    if let Some(v) = o.brightness {
        background.brightness = v;
    }
    if let Some(v) = o.repeat {
        background.repeat = v;
    }
    if let Some(v) = o.reuse_foreground {
        background.reuse_foreground = v;
    }
    if let Some(v) = o.background_scale {
        background.scale = v;
    }

    let mut foreground = merge_section(fg_store.get(), file.foreground.as_ref())?;
    if let Some(v) = o.mode {
        foreground.mode = v;
    }
    if let Some(v) = o.position {
        foreground.position = v;
    }
    if let Some(v) = o.rotation {
        foreground.rotation_in_degrees = Some(v);
    }

    let mut watermark = merge_section(wm_store.get(), file.watermark.as_ref())?;
    if let Some(v) = o.opacity {
        watermark.opacity = v;
    }
    if let Some(v) = o.watermark_position {
        watermark.position = v;
    }
    if let Some(v) = o.watermark_scale {
        watermark.scale = v;
    }

    let mut general = merge_section(general_store.get(), file.general.as_ref())?;
    if let Some(v) = cli.format {
        general.format = v;
    }

    let options = ComposeOptions {
        background,
        foreground,
        watermark,
    };
    options.validate()?;

    bg_store.set(options.background)?;
    fg_store.set(options.foreground)?;
    wm_store.set(options.watermark)?;
    general_store.set(general)?;
    Ok((options, general))
}

fn open<T, S>(key: &str, backend: &S) -> anyhow::Result<OptionStore<T, S>>
where
    T: Serialize + DeserializeOwned + Default,
    S: KeyValueStore + Clone,
{
    Ok(OptionStore::open(key, T::default(), backend.clone())?)
}

/// Overlay the fields present in an options-file section onto `stored`.
fn merge_section<T>(stored: &T, patch: Option<&serde_json::Value>) -> anyhow::Result<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    let Some(patch) = patch else {
        return Ok(stored.clone());
    };
    let mut merged = serde_json::to_value(stored).context("serialize stored options")?;
    match (merged.as_object_mut(), patch.as_object()) {
        (Some(base), Some(fields)) => {
            for (k, v) in fields {
                base.insert(k.clone(), v.clone());
            }
        }
        _ => anyhow::bail!("options section must be a JSON object, got {patch}"),
    }
    serde_json::from_value(merged).context("parse options section")
}

fn read_options_file(path: &Path) -> anyhow::Result<OptionsFile> {
    let f = std::fs::File::open(path)
        .with_context(|| format!("open options '{}'", path.display()))?;
    serde_json::from_reader(std::io::BufReader::new(f))
        .with_context(|| format!("parse options '{}'", path.display()))
}

fn read_source(path: Option<&Path>) -> anyhow::Result<Option<SourceBlob>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    Ok(Some(SourceBlob::new(bytes, mime_from_extension(path))))
}

fn mime_from_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => return None,
    };
    Some(mime.to_string())
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    match s {
        "1:1" => Ok(OutputFormat::Square),
        "4:5" => Ok(OutputFormat::Portrait),
        other => parse_keyword(other),
    }
}

fn parse_rotation(s: &str) -> Result<Rotation, String> {
    let degrees: u16 = s.parse().map_err(|e| format!("{e}"))?;
    Rotation::try_from(degrees).map_err(|e| e.to_string())
}

/// Parse a bare keyword with the same spelling the JSON options use.
fn parse_keyword<T: DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string())).map_err(|e| e.to_string())
}
