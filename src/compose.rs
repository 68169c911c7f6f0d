use image::{DynamicImage, GenericImageView, Rgba, RgbaImage, imageops};

use crate::{
    error::{SpanwallError, SpanwallResult},
    layout::{LayoutPlan, NormalizedLayout},
};

#[derive(Clone, Copy, Debug)]
pub struct ComposeSettings {
    /// Fill for canvas regions no monitor covers.
    pub clear_rgba: [u8; 4],
}

impl Default for ComposeSettings {
    fn default() -> Self {
        Self {
            clear_rgba: [0, 0, 0, 255],
        }
    }
}

pub fn decode_source(bytes: &[u8]) -> SpanwallResult<DynamicImage> {
    image::load_from_memory(bytes)
        .map_err(|e| SpanwallError::image(format!("decode source image: {e}")))
}

/// Fits the source to the layout's required pixel size: center-crops to the
/// layout's aspect ratio, then resizes to exactly the required size. A source
/// smaller than required is stretched rather than rejected.
pub fn prepare_source(source: &DynamicImage, layout: &NormalizedLayout) -> RgbaImage {
    let (input_w, input_h) = source.dimensions();
    let target_w = layout.source_width;
    let target_h = layout.source_height;

    let input_aspect = f64::from(input_w) / f64::from(input_h);
    let target_aspect = f64::from(target_w) / f64::from(target_h);

    let cropped = if input_aspect > target_aspect {
        // Too wide: keep the center columns.
        let keep_w = ((f64::from(input_h) * target_aspect).round() as u32).clamp(1, input_w);
        source.crop_imm((input_w - keep_w) / 2, 0, keep_w, input_h)
    } else if input_aspect < target_aspect {
        // Too tall: keep the center rows.
        let keep_h = ((f64::from(input_w) / target_aspect).round() as u32).clamp(1, input_h);
        source.crop_imm(0, (input_h - keep_h) / 2, input_w, keep_h)
    } else {
        source.clone()
    };

    tracing::debug!(
        input_w,
        input_h,
        target_w,
        target_h,
        "prepared source for cropping"
    );

    cropped
        .resize_exact(target_w, target_h, imageops::FilterType::Lanczos3)
        .to_rgba8()
}

/// Applies a layout plan to a source image: one tile per monitor, extracted
/// from the prepared source and pasted without blending into a canvas sized
/// for the desktop's spanned wallpaper mode.
pub fn compose(
    source: &DynamicImage,
    plan: &LayoutPlan,
    settings: &ComposeSettings,
) -> SpanwallResult<RgbaImage> {
    if plan.crops.is_empty() {
        return Err(SpanwallError::configuration(
            "layout produced no crop rectangles",
        ));
    }

    let prepared = prepare_source(source, &plan.layout);
    let mut canvas = RgbaImage::from_pixel(
        plan.canvas_width,
        plan.canvas_height,
        Rgba(settings.clear_rgba),
    );

    for crop in &plan.crops {
        let region = imageops::crop_imm(
            &prepared,
            crop.src_x,
            crop.src_y,
            crop.src_width,
            crop.src_height,
        );
        // Resample to the monitor's native resolution; identity for the
        // monitor that set the global density.
        let tile: RgbaImage = if (crop.src_width, crop.src_height)
            != (crop.dst_width, crop.dst_height)
        {
            imageops::resize(
                &*region,
                crop.dst_width,
                crop.dst_height,
                imageops::FilterType::Lanczos3,
            )
        } else {
            region.to_image()
        };
        imageops::replace(&mut canvas, &tile, i64::from(crop.dst_x), i64::from(crop.dst_y));
    }

    Ok(canvas)
}
