use crate::error::{SpanwallError, SpanwallResult};

/// One physical display, ordered left to right in the layout config.
///
/// Vertical offsets are measured in inches above a shared bottom baseline and
/// may be negative. `gap_before_in` is the dead space between this monitor
/// and the one to its left; it is validated but has no effect on the leftmost
/// monitor.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MonitorSpec {
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// OS display-scaling factor (1.0 = no scaling, 1.25, 1.5, ...).
    #[serde(default = "default_scaling")]
    pub scaling: f64,
    #[serde(flatten)]
    pub size: PhysicalSize,
    #[serde(default)]
    pub offset_bottom_in: f64,
    #[serde(default)]
    pub gap_before_in: f64,
}

/// Physical dimensions, either explicit or given as a marketing diagonal plus
/// aspect ratio (the form on the spec sheet of most monitors).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum PhysicalSize {
    Dimensions {
        width_in: f64,
        /// Derived from the pixel aspect ratio when omitted.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height_in: Option<f64>,
    },
    Diagonal {
        diagonal_in: f64,
        aspect_w: f64,
        aspect_h: f64,
    },
}

fn default_scaling() -> f64 {
    1.0
}

impl MonitorSpec {
    /// Resolved physical (width, height) in inches.
    pub fn physical_size_in(&self) -> (f64, f64) {
        match self.size {
            PhysicalSize::Dimensions {
                width_in,
                height_in,
            } => {
                let height_in = height_in.unwrap_or_else(|| {
                    width_in * f64::from(self.pixel_height) / f64::from(self.pixel_width.max(1))
                });
                (width_in, height_in)
            }
            PhysicalSize::Diagonal {
                diagonal_in,
                aspect_w,
                aspect_h,
            } => {
                let diag = aspect_w.hypot(aspect_h);
                (
                    diagonal_in * aspect_w / diag,
                    diagonal_in * aspect_h / diag,
                )
            }
        }
    }

    /// Pixels per inch this monitor effectively renders at, after the OS
    /// scaling factor shrinks its logical resolution.
    pub fn effective_density(&self) -> f64 {
        let (width_in, _) = self.physical_size_in();
        (f64::from(self.pixel_width) / width_in) / self.scaling
    }

    pub fn validate(&self, index: usize) -> SpanwallResult<()> {
        if self.pixel_width == 0 || self.pixel_height == 0 {
            return Err(SpanwallError::configuration(format!(
                "monitor {index}: pixel width/height must be > 0"
            )));
        }
        if !self.scaling.is_finite() || self.scaling < 1.0 {
            return Err(SpanwallError::configuration(format!(
                "monitor {index}: scaling must be a finite value >= 1.0"
            )));
        }
        let (width_in, height_in) = self.physical_size_in();
        if !width_in.is_finite() || !height_in.is_finite() || width_in <= 0.0 || height_in <= 0.0 {
            return Err(SpanwallError::configuration(format!(
                "monitor {index}: physical width/height must be > 0 inches"
            )));
        }
        if !self.offset_bottom_in.is_finite() {
            return Err(SpanwallError::configuration(format!(
                "monitor {index}: vertical offset must be finite"
            )));
        }
        if !self.gap_before_in.is_finite() || self.gap_before_in < 0.0 {
            return Err(SpanwallError::configuration(format!(
                "monitor {index}: gap must be >= 0 inches"
            )));
        }
        Ok(())
    }
}
