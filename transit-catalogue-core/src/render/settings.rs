use std::fmt;

use geo::Coord;

/// SVG paint value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Color {
    #[default]
    None,
    Named(String),
    Rgb {
        red: u8,
        green: u8,
        blue: u8,
    },
    Rgba {
        red: u8,
        green: u8,
        blue: u8,
        opacity: f64,
    },
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::None => f.write_str("none"),
            Color::Named(name) => f.write_str(name),
            Color::Rgb { red, green, blue } => write!(f, "rgb({red},{green},{blue})"),
            Color::Rgba {
                red,
                green,
                blue,
                opacity,
            } => write!(f, "rgba({red},{green},{blue},{opacity})"),
        }
    }
}

/// Map appearance. Built once from the input document and never mutated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderSettings {
    pub width: f64,
    pub height: f64,
    /// Gap between the map and the canvas border
    pub padding: f64,
    pub line_width: f64,
    pub stop_radius: f64,
    pub bus_label_font_size: f64,
    pub bus_label_offset: Coord<f64>,
    pub stop_label_font_size: f64,
    pub stop_label_offset: Coord<f64>,
    pub underlayer_color: Color,
    pub underlayer_width: f64,
    pub color_palette: Vec<Color>,
}

impl RenderSettings {
    /// Palette entry for the n-th drawn route, cycling through the palette
    pub fn palette_color(&self, index: usize) -> Color {
        if self.color_palette.is_empty() {
            Color::None
        } else {
            self.color_palette[index % self.color_palette.len()].clone()
        }
    }
}
