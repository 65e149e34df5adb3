use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use tagcloud_rs::cloud::{count_words, tokenize, CloudRequest, WordFilter};
use tagcloud_rs::geometry::Point;
use tagcloud_rs::layout::{CircularCloudLayouter, SpiralPointsGenerator};
use tagcloud_rs::render::{BitmapRenderer, Color, FontLibrary, TextMeasurer};
use tagcloud_rs::Visualizer;

const FAMILY: &str = "Sans";

/// Settings read from `TAGCLOUD_*` environment variables.
struct Options {
    font_path: Option<PathBuf>,
    min_font_size: f32,
    reduction_coefficient: f64,
    max_words: usize,
    background: Color,
}

impl Options {
    fn from_env() -> Result<Self> {
        Ok(Self {
            font_path: std::env::var_os("TAGCLOUD_FONT").map(PathBuf::from),
            min_font_size: env_or("TAGCLOUD_MIN_FONT", 12.0)?,
            reduction_coefficient: env_or("TAGCLOUD_COEFFICIENT", 0.8)?,
            max_words: env_or("TAGCLOUD_MAX_WORDS", 150)?,
            background: match std::env::var("TAGCLOUD_BACKGROUND") {
                Ok(raw) => Color::parse_hex(&raw)
                    .with_context(|| format!("TAGCLOUD_BACKGROUND={raw:?} is not a hex color"))?,
                Err(_) => Color::WHITE,
            },
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key}={raw:?} is not a valid value")),
        Err(_) => Ok(default),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tagcloud_rs=info".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        bail!("usage: tagcloud <input.txt> [output.png]");
    };
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| input.with_extension("png"));
    let options = Options::from_env()?;

    let text = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let mut words = WordFilter::default().apply(count_words(tokenize(&text)));
    words.truncate(options.max_words);
    tracing::info!("{} distinct words from {:?}", words.len(), input);

    let mut fonts = FontLibrary::new();
    match &options.font_path {
        Some(path) => fonts
            .load_font_file(FAMILY, path)
            .with_context(|| format!("failed to load font {}", path.display()))?,
        None => {
            if let Err(e) = fonts.load_system_font(FAMILY) {
                tracing::warn!("{e}; falling back to monospace metrics without glyphs");
            }
        }
    }

    let layouter = CircularCloudLayouter::new(SpiralPointsGenerator::new(Point::new(0, 0)));
    let mut request = CloudRequest::new(words, Box::new(layouter));
    request.min_font_size = options.min_font_size;
    request.reduction_coefficient = options.reduction_coefficient;
    request.font_family = Some(FAMILY.into());
    request.background = options.background;

    let measurer: &dyn TextMeasurer = &fonts;
    let renderer = BitmapRenderer::new(&fonts);
    let image = Visualizer::new(measurer, &renderer)
        .get_cloud_visualization(request)
        .context("failed to build tag cloud")?;

    image
        .save(&output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!(
        "Wrote {}x{} cloud to {:?}",
        image.width(),
        image.height(),
        output
    );
    Ok(())
}
