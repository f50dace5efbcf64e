//! Minimal SVG document writer covering polylines, circles and text

use std::fmt::{self, Write};

use geo::Coord;

use super::Color;

/// Presentation attributes shared by every shape
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathProps {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: Option<f64>,
    /// Round line caps and joins
    pub rounded: bool,
}

impl PathProps {
    pub fn fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn stroke(mut self, color: Color, width: f64) -> Self {
        self.stroke = Some(color);
        self.stroke_width = Some(width);
        self
    }

    pub fn rounded(mut self) -> Self {
        self.rounded = true;
        self
    }
}

impl fmt::Display for PathProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(fill) = &self.fill {
            write_attribute(f, "fill", fill)?;
        }
        if let Some(stroke) = &self.stroke {
            write_attribute(f, "stroke", stroke)?;
        }
        if let Some(width) = self.stroke_width {
            write!(f, " stroke-width=\"{width}\"")?;
        }
        if self.rounded {
            f.write_str(" stroke-linecap=\"round\" stroke-linejoin=\"round\"")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub position: Coord<f64>,
    pub offset: Coord<f64>,
    pub font_size: f64,
    pub font_family: Option<String>,
    pub font_weight: Option<String>,
    pub data: String,
    pub props: PathProps,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Polyline {
        points: Vec<Coord<f64>>,
        props: PathProps,
    },
    Circle {
        center: Coord<f64>,
        radius: f64,
        props: PathProps,
    },
    Text(Text),
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Polyline { points, props } => {
                f.write_str("<polyline points=\"")?;
                for (idx, point) in points.iter().enumerate() {
                    if idx > 0 {
                        f.write_char(' ')?;
                    }
                    write!(f, "{},{}", point.x, point.y)?;
                }
                write!(f, "\"{props}/>")
            }
            Element::Circle {
                center,
                radius,
                props,
            } => write!(
                f,
                "<circle cx=\"{}\" cy=\"{}\" r=\"{radius}\"{props}/>",
                center.x, center.y
            ),
            Element::Text(text) => {
                write!(
                    f,
                    "<text{} x=\"{}\" y=\"{}\" dx=\"{}\" dy=\"{}\" font-size=\"{}\"",
                    text.props,
                    text.position.x,
                    text.position.y,
                    text.offset.x,
                    text.offset.y,
                    text.font_size
                )?;
                if let Some(family) = &text.font_family {
                    write_attribute(f, "font-family", family)?;
                }
                if let Some(weight) = &text.font_weight {
                    write_attribute(f, "font-weight", weight)?;
                }
                write!(f, ">{}</text>", escape(&text.data))
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    pub fn extend(&mut self, elements: impl IntoIterator<Item = Element>) {
        self.elements.extend(elements);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, r#"<?xml version="1.0" encoding="UTF-8" ?>"#)?;
        writeln!(f, r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1">"#)?;
        for element in &self.elements {
            writeln!(f, "  {element}")?;
        }
        f.write_str("</svg>")
    }
}

fn write_attribute(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    value: impl fmt::Display,
) -> fmt::Result {
    write!(f, " {name}=\"{}\"", escape(&value.to_string()))
}

/// XML escaping for text content and attribute values
fn escape(data: &str) -> String {
    let mut escaped = String::with_capacity(data.len());
    for ch in data.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_shapes() {
        let mut document = Document::default();
        document.extend([
            Element::Polyline {
                points: vec![Coord { x: 1.0, y: 2.5 }, Coord { x: 3.0, y: 4.0 }],
                props: PathProps::default()
                    .fill(Color::None)
                    .stroke(Color::Named("green".into()), 14.0)
                    .rounded(),
            },
            Element::Circle {
                center: Coord { x: 10.0, y: 20.0 },
                radius: 5.0,
                props: PathProps::default().fill(Color::Named("white".into())),
            },
        ]);

        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n\
            <svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\">\n  \
            <polyline points=\"1,2.5 3,4\" fill=\"none\" stroke=\"green\" stroke-width=\"14\" \
            stroke-linecap=\"round\" stroke-linejoin=\"round\"/>\n  \
            <circle cx=\"10\" cy=\"20\" r=\"5\" fill=\"white\"/>\n\
            </svg>";
        assert_eq!(document.to_string(), expected);
    }

    #[test]
    fn text_is_escaped() {
        let text = Element::Text(Text {
            position: Coord { x: 1.0, y: 1.0 },
            offset: Coord { x: 7.0, y: -3.0 },
            font_size: 20.0,
            font_family: Some("Verdana".into()),
            font_weight: None,
            data: "Tom & \"Jerry\" <3".into(),
            props: PathProps::default().fill(Color::Named("black".into())),
        });
        assert_eq!(
            text.to_string(),
            "<text fill=\"black\" x=\"1\" y=\"1\" dx=\"7\" dy=\"-3\" font-size=\"20\" \
             font-family=\"Verdana\">Tom &amp; &quot;Jerry&quot; &lt;3</text>"
        );
    }

    #[test]
    fn attribute_values_are_escaped() {
        let circle = Element::Circle {
            center: Coord { x: 0.0, y: 0.0 },
            radius: 1.0,
            props: PathProps::default()
                .fill(Color::Named("red\" onload=\"x".into()))
                .stroke(Color::Named("a&b".into()), 2.0),
        };
        assert_eq!(
            circle.to_string(),
            "<circle cx=\"0\" cy=\"0\" r=\"1\" fill=\"red&quot; onload=&quot;x\" \
             stroke=\"a&amp;b\" stroke-width=\"2\"/>"
        );

        let text = Element::Text(Text {
            position: Coord { x: 0.0, y: 0.0 },
            offset: Coord { x: 0.0, y: 0.0 },
            font_size: 10.0,
            font_family: Some("Times \"New\" Roman".into()),
            font_weight: None,
            data: "A".into(),
            props: PathProps::default(),
        });
        assert!(text.to_string().contains("font-family=\"Times &quot;New&quot; Roman\""));
    }
}
