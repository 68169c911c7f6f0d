use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "spanwall", version)]
struct Cli {
    /// Source wallpaper image (any raster format `image` can decode).
    input: PathBuf,

    /// Output PNG path.
    output: PathBuf,

    /// Monitor layout JSON, ordered left to right.
    #[arg(long, default_value = "monitors.json")]
    monitors: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let monitors = read_monitors(&cli.monitors)?;
    let plan = spanwall::compute_layout(&monitors)?;

    eprintln!(
        "layout: {:.2} x {:.2} in at {:.1} px/in",
        plan.layout.width_in, plan.layout.height_in, plan.layout.density
    );
    eprintln!(
        "source image should be at least {}x{} to avoid blur",
        plan.layout.source_width, plan.layout.source_height
    );

    let bytes = std::fs::read(&cli.input)
        .with_context(|| format!("read source image '{}'", cli.input.display()))?;
    let source = spanwall::decode_source(&bytes)?;

    // Red so any canvas region the crops fail to cover is impossible to miss.
    let settings = spanwall::ComposeSettings {
        clear_rgba: [255, 0, 0, 255],
    };
    let canvas = spanwall::compose(&source, &plan, &settings)?;

    if let Some(parent) = cli.output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &cli.output,
        canvas.as_raw(),
        canvas.width(),
        canvas.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", cli.output.display()))?;

    eprintln!("wrote {}", cli.output.display());
    Ok(())
}

fn read_monitors(path: &Path) -> anyhow::Result<Vec<spanwall::MonitorSpec>> {
    let f = File::open(path).with_context(|| format!("open monitor layout '{}'", path.display()))?;
    let r = BufReader::new(f);
    let monitors: Vec<spanwall::MonitorSpec> =
        serde_json::from_reader(r).with_context(|| "parse monitor layout JSON")?;
    Ok(monitors)
}
