use crate::error::{BubbleError, Result};
use plotters::style::RGBColor;
use std::collections::HashMap;
use tracing::debug;

/// A named palette entry stored as 0xRRGGBB
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteColor {
    pub rgb: u32,
    pub name: &'static str,
}

impl PaletteColor {
    pub const fn new(rgb: u32, name: &'static str) -> Self {
        Self { rgb, name }
    }

    pub fn hex(&self) -> String {
        format!("#{:06x}", self.rgb)
    }

    pub fn to_rgb(&self) -> RGBColor {
        RGBColor(
            ((self.rgb >> 16) & 0xff) as u8,
            ((self.rgb >> 8) & 0xff) as u8,
            (self.rgb & 0xff) as u8,
        )
    }
}

/// Kelly's maximally distinct colors (white and black excluded)
pub const KELLY_COLORS: [PaletteColor; 20] = [
    PaletteColor::new(0xf3c300, "Vivid Yellow"),
    PaletteColor::new(0x875692, "Strong Purple"),
    PaletteColor::new(0xf38400, "Vivid Orange"),
    PaletteColor::new(0xa1caf1, "Very Light Blue"),
    PaletteColor::new(0xbe0032, "Vivid Red"),
    PaletteColor::new(0xc2b280, "Grayish Yellow"),
    PaletteColor::new(0x848482, "Medium Gray"),
    PaletteColor::new(0x008856, "Vivid Green"),
    PaletteColor::new(0xe68fac, "Strong Purplish Pink"),
    PaletteColor::new(0x0067a5, "Strong Blue"),
    PaletteColor::new(0xf99379, "Strong Yellowish Pink"),
    PaletteColor::new(0x604e97, "Strong Violet"),
    PaletteColor::new(0xf6a600, "Vivid Orange Yellow"),
    PaletteColor::new(0xb3446c, "Strong Purplish Red"),
    PaletteColor::new(0xdcd300, "Vivid Greenish Yellow"),
    PaletteColor::new(0x882d17, "Strong Reddish Brown"),
    PaletteColor::new(0x27a64c, "Vivid Yellowish Green"),
    PaletteColor::new(0x654522, "Deep Yellowish Brown"),
    PaletteColor::new(0xe25822, "Vivid Reddish Orange"),
    PaletteColor::new(0x2b3d26, "Dark Olive Green"),
];

/// Marker color used when no Category column is bound
pub const DEFAULT_MARKER_COLOR: PaletteColor = PaletteColor::new(0x1f77b4, "Muted Blue");

/// Assigns palette colors to category values in first-seen order.
///
/// The registry only grows; a category keeps the color it was first given.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    colors: &'static [PaletteColor],
    registry: Vec<String>,
    index: HashMap<String, usize>,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::new(&KELLY_COLORS)
    }
}

impl ColorPalette {
    pub fn new(colors: &'static [PaletteColor]) -> Self {
        Self {
            colors,
            registry: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Color for `category`, registering it if unseen
    pub fn color_for(&mut self, category: &str) -> Result<PaletteColor> {
        if let Some(&idx) = self.index.get(category) {
            return Ok(self.colors[idx]);
        }

        let idx = self.registry.len();
        let color = *self
            .colors
            .get(idx)
            .ok_or(BubbleError::TooManyCategories { max: self.colors.len() })?;

        debug!(category, color = color.name, hex = %color.hex(), "Category registered");
        self.registry.push(category.to_string());
        self.index.insert(category.to_string(), idx);
        Ok(color)
    }

    pub fn into_registry(self) -> Vec<(String, PaletteColor)> {
        self.registry.into_iter().zip(self.colors.iter().copied()).collect()
    }
}
