use serde::{Deserialize, Serialize};

/// Page layout for PDF exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageStyles {
    /// Page width in millimetres (A4 by default).
    pub page_width_mm: f32,

    /// Page height in millimetres.
    pub page_height_mm: f32,

    /// Margin applied to all four sides, in millimetres.
    pub margin_mm: f32,

    /// Report title font size in points.
    pub title_size: f32,

    /// Table title font size in points.
    pub heading_size: f32,

    /// Header and cell font size in points.
    pub body_size: f32,

    /// Vertical advance per line, in millimetres.
    pub line_height_mm: f32,
}

impl Default for PageStyles {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 15.0,
            title_size: 16.0,
            heading_size: 12.0,
            body_size: 8.0,
            line_height_mm: 5.0,
        }
    }
}

impl PageStyles {
    pub fn usable_width_mm(&self) -> f32 {
        self.page_width_mm - 2.0 * self.margin_mm
    }
}
