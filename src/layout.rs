use crate::{
    error::{SpanwallError, SpanwallResult},
    model::MonitorSpec,
};

/// A monitor's resolved place in physical space, inches.
#[derive(Clone, Copy, Debug)]
pub struct MonitorPlacement {
    pub width_in: f64,
    pub height_in: f64,
    /// Left edge, cumulative over prior widths and gaps. The leftmost
    /// monitor sits at exactly 0.
    pub x_in: f64,
    /// Signed distance above the shared bottom baseline.
    pub bottom_in: f64,
    /// Effective pixels per inch after OS scaling.
    pub density: f64,
}

/// The whole layout in one shared physical coordinate space, plus the pixel
/// size the source image must be resized to before cropping.
#[derive(Clone, Debug)]
pub struct NormalizedLayout {
    pub placements: Vec<MonitorPlacement>,
    /// Physical span of the layout, inches.
    pub width_in: f64,
    pub height_in: f64,
    /// Global pixels-per-inch: the max effective density across monitors, so
    /// every region is extracted by downsampling, never upsampling.
    pub density: f64,
    pub source_width: u32,
    pub source_height: u32,
}

/// Source rectangle (in required-source pixel space) and target placement
/// rectangle (in output-canvas pixel space) for one monitor. The target size
/// always equals the monitor's native pixel resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    pub src_x: u32,
    pub src_y: u32,
    pub src_width: u32,
    pub src_height: u32,
    pub dst_x: u32,
    pub dst_y: u32,
    pub dst_width: u32,
    pub dst_height: u32,
}

#[derive(Clone, Debug)]
pub struct LayoutPlan {
    pub layout: NormalizedLayout,
    /// One per monitor, in monitor order.
    pub crops: Vec<CropRect>,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

/// Turns an ordered left-to-right monitor list into crop rectangles against
/// a source image sized to the layout's physical span at the global density.
#[tracing::instrument(skip(monitors))]
pub fn compute_layout(monitors: &[MonitorSpec]) -> SpanwallResult<LayoutPlan> {
    if monitors.is_empty() {
        return Err(SpanwallError::configuration(
            "at least one monitor is required",
        ));
    }
    for (index, monitor) in monitors.iter().enumerate() {
        monitor.validate(index)?;
    }

    let mut placements = Vec::with_capacity(monitors.len());
    let mut x_in = 0.0f64;
    for (index, monitor) in monitors.iter().enumerate() {
        if index > 0 {
            x_in += monitor.gap_before_in;
        }
        let (width_in, height_in) = monitor.physical_size_in();
        placements.push(MonitorPlacement {
            width_in,
            height_in,
            x_in,
            bottom_in: monitor.offset_bottom_in,
            density: monitor.effective_density(),
        });
        x_in += width_in;
    }

    let width_in = x_in;
    let min_bottom = placements
        .iter()
        .map(|p| p.bottom_in)
        .fold(f64::INFINITY, f64::min);
    let max_top = placements
        .iter()
        .map(|p| p.bottom_in + p.height_in)
        .fold(f64::NEG_INFINITY, f64::max);
    let height_in = max_top - min_bottom;
    let density = placements.iter().map(|p| p.density).fold(0.0, f64::max);

    let source_width = (width_in * density).ceil() as u32;
    let source_height = (height_in * density).ceil() as u32;

    let canvas_width: u32 = monitors.iter().map(|m| m.pixel_width).sum();

    // Vertical pixel offsets, each at its monitor's own vertical density and
    // normalized so the lowest monitor sits on the canvas bottom edge.
    let offsets_px: Vec<u32> = monitors
        .iter()
        .zip(&placements)
        .map(|(m, p)| {
            let vertical_density = f64::from(m.pixel_height) / p.height_in;
            round_px((p.bottom_in - min_bottom) * vertical_density)
        })
        .collect();
    let canvas_height = monitors
        .iter()
        .zip(&offsets_px)
        .map(|(m, off)| m.pixel_height + off)
        .max()
        .unwrap_or(0);

    let mut crops = Vec::with_capacity(monitors.len());
    let mut dst_x = 0u32;
    for ((monitor, placement), offset_px) in monitors.iter().zip(&placements).zip(&offsets_px) {
        // Edges rounded independently so adjacent crops meet without drift.
        let src_x = round_px(placement.x_in * density);
        let src_right = round_px((placement.x_in + placement.width_in) * density).min(source_width);
        let src_y = round_px((max_top - (placement.bottom_in + placement.height_in)) * density);
        let src_bottom = round_px((max_top - placement.bottom_in) * density).min(source_height);

        crops.push(CropRect {
            src_x,
            src_y,
            src_width: src_right.saturating_sub(src_x),
            src_height: src_bottom.saturating_sub(src_y),
            dst_x,
            dst_y: canvas_height - monitor.pixel_height - offset_px,
            dst_width: monitor.pixel_width,
            dst_height: monitor.pixel_height,
        });
        dst_x += monitor.pixel_width;
    }

    tracing::debug!(
        width_in,
        height_in,
        density,
        source_width,
        source_height,
        canvas_width,
        canvas_height,
        "layout resolved"
    );

    Ok(LayoutPlan {
        layout: NormalizedLayout {
            placements,
            width_in,
            height_in,
            density,
            source_width,
            source_height,
        },
        crops,
        canvas_width,
        canvas_height,
    })
}

fn round_px(v: f64) -> u32 {
    v.round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PhysicalSize;

    fn monitor(
        pixel_width: u32,
        pixel_height: u32,
        scaling: f64,
        width_in: f64,
        height_in: f64,
    ) -> MonitorSpec {
        MonitorSpec {
            pixel_width,
            pixel_height,
            scaling,
            size: PhysicalSize::Dimensions {
                width_in,
                height_in: Some(height_in),
            },
            offset_bottom_in: 0.0,
            gap_before_in: 0.0,
        }
    }

    #[test]
    fn single_monitor_covers_entire_source() {
        let plan = compute_layout(&[monitor(1920, 1080, 1.0, 24.0, 13.5)]).unwrap();

        assert!((plan.layout.density - 80.0).abs() < 1e-9);
        assert_eq!(plan.layout.source_width, 1920);
        assert_eq!(plan.layout.source_height, 1080);
        assert_eq!(plan.canvas_width, 1920);
        assert_eq!(plan.canvas_height, 1080);

        let crop = plan.crops[0];
        assert_eq!((crop.src_x, crop.src_y), (0, 0));
        assert_eq!((crop.src_width, crop.src_height), (1920, 1080));
        assert_eq!((crop.dst_x, crop.dst_y), (0, 0));
        assert_eq!((crop.dst_width, crop.dst_height), (1920, 1080));
    }

    #[test]
    fn mixed_density_pair_picks_sharpest_monitor() {
        let a = monitor(1920, 1200, 1.0, 19.0, 11.9);
        let mut b = monitor(2560, 1440, 1.25, 24.0, 13.5);
        b.gap_before_in = 0.5;

        let plan = compute_layout(&[a, b]).unwrap();

        // A is the densest at 1920/19 px/in; B's raw ~106.7 drops to ~85.3
        // once its 1.25x scaling is applied.
        assert!((plan.layout.density - 1920.0 / 19.0).abs() < 1e-9);
        assert_eq!(plan.canvas_width, 4480);
        assert_eq!(plan.canvas_height, 1440);
        assert!((plan.layout.placements[1].x_in - 19.5).abs() < 1e-9);

        let a = plan.crops[0];
        let b = plan.crops[1];
        assert_eq!(a.src_x, 0);
        assert_eq!(a.src_width, 1920);
        assert_eq!((a.dst_x, a.dst_y), (0, 240)); // bottom aligned under B
        assert_eq!((b.dst_x, b.dst_y), (1920, 0));
        // B's crop reaches the right edge of the required source.
        assert_eq!(b.src_x + b.src_width, plan.layout.source_width);
    }

    #[test]
    fn doubling_scaling_does_not_raise_density() {
        let base = compute_layout(&[monitor(2560, 1440, 1.0, 24.0, 13.5)]).unwrap();
        let scaled = compute_layout(&[monitor(2560, 1440, 2.0, 24.0, 13.5)]).unwrap();
        assert!(scaled.layout.density <= base.layout.density);
        assert!((scaled.layout.density - base.layout.density / 2.0).abs() < 1e-9);
    }

    #[test]
    fn gap_offsets_second_monitor_by_width_plus_gap() {
        let a = monitor(1920, 1080, 1.0, 24.0, 13.5);
        let mut b = monitor(1920, 1080, 1.0, 24.0, 13.5);
        b.gap_before_in = 0.5;

        let plan = compute_layout(&[a, b]).unwrap();
        assert_eq!(plan.layout.placements[0].x_in, 0.0);
        assert!((plan.layout.placements[1].x_in - 24.5).abs() < 1e-9);
    }

    #[test]
    fn leading_gap_is_ignored() {
        let mut only = monitor(1920, 1080, 1.0, 24.0, 13.5);
        only.gap_before_in = 2.0;
        let plan = compute_layout(&[only]).unwrap();
        assert_eq!(plan.layout.placements[0].x_in, 0.0);
        assert!((plan.layout.width_in - 24.0).abs() < 1e-9);
    }

    #[test]
    fn targets_tile_the_canvas_without_gaps() {
        let mut b = monitor(2560, 1440, 1.25, 24.0, 13.5);
        b.gap_before_in = 0.4;
        let mut c = monitor(3840, 2160, 1.5, 27.9, 15.7);
        c.gap_before_in = 0.5;
        c.offset_bottom_in = 0.75;
        let monitors = [monitor(1920, 1080, 1.25, 13.6, 7.6), b, c];

        let plan = compute_layout(&monitors).unwrap();

        let mut expected_x = 0u32;
        for (crop, m) in plan.crops.iter().zip(&monitors) {
            assert_eq!(crop.dst_x, expected_x);
            assert_eq!(crop.dst_width, m.pixel_width);
            assert_eq!(crop.dst_height, m.pixel_height);
            assert!(crop.dst_y + crop.dst_height <= plan.canvas_height);
            expected_x += crop.dst_width;
        }
        assert_eq!(expected_x, plan.canvas_width);
    }

    #[test]
    fn raised_monitor_clears_the_bottom_edge() {
        let low = monitor(1920, 1080, 1.0, 24.0, 13.5);
        let mut high = monitor(1920, 1080, 1.0, 24.0, 13.5);
        high.offset_bottom_in = 1.0;

        let plan = compute_layout(&[low, high]).unwrap();
        let offset_px = (1080.0 / 13.5f64).round() as u32; // 80 px per inch
        assert_eq!(plan.canvas_height, 1080 + offset_px);
        assert_eq!(plan.crops[0].dst_y, offset_px);
        assert_eq!(plan.crops[1].dst_y, 0);
        // The raised monitor crops the top band of the source.
        assert_eq!(plan.crops[1].src_y, 0);
        assert!(plan.crops[0].src_y > 0);
    }

    #[test]
    fn rejects_invalid_configurations() {
        assert!(matches!(
            compute_layout(&[]),
            Err(SpanwallError::Configuration(_))
        ));

        let mut bad = monitor(1920, 1080, 1.0, 24.0, 13.5);
        bad.pixel_height = 0;
        assert!(compute_layout(&[bad]).is_err());

        let mut bad = monitor(1920, 1080, 1.0, 24.0, 13.5);
        bad.gap_before_in = -1.0;
        let err = compute_layout(std::slice::from_ref(&bad)).unwrap_err();
        assert!(err.to_string().contains("gap"));

        assert!(compute_layout(&[monitor(1920, 1080, 1.0, -24.0, 13.5)]).is_err());
    }
}
