use crate::error::{ViewError, ViewResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self::rgba(self.red, self.green, self.blue, alpha)
    }

    pub fn validate(self) -> ViewResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ViewError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Outline applied to filled shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f64,
    pub color: Color,
}

impl Stroke {
    #[must_use]
    pub const fn new(width: f64, color: Color) -> Self {
        Self { width, color }
    }

    fn validate(self) -> ViewResult<()> {
        if !self.width.is_finite() || self.width < 0.0 {
            return Err(ViewError::InvalidData(
                "stroke width must be finite and >= 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

fn ensure_finite(what: &str, values: &[f64]) -> ViewResult<()> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(ViewError::InvalidData(format!(
            "{what} coordinates must be finite"
        )))
    }
}

fn ensure_non_negative(what: &str, values: &[f64]) -> ViewResult<()> {
    if values.iter().all(|value| *value >= 0.0) {
        Ok(())
    } else {
        Err(ViewError::InvalidData(format!(
            "{what} extents must be >= 0"
        )))
    }
}

/// Draw command for one line segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
    /// Draws an arrow head at `(x2, y2)`.
    pub arrow_end: bool,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
            arrow_end: false,
        }
    }

    #[must_use]
    pub const fn with_arrow_end(mut self) -> Self {
        self.arrow_end = true;
        self
    }

    pub fn validate(self) -> ViewResult<()> {
        ensure_finite("line", &[self.x1, self.y1, self.x2, self.y2])?;
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ViewError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Draw command for one axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
    pub stroke: Option<Stroke>,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill,
            stroke: None,
        }
    }

    #[must_use]
    pub const fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn validate(self) -> ViewResult<()> {
        ensure_finite("rect", &[self.x, self.y, self.width, self.height])?;
        ensure_non_negative("rect", &[self.width, self.height])?;
        if let Some(stroke) = self.stroke {
            stroke.validate()?;
        }
        self.fill.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CirclePrimitive {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub fill: Color,
    pub stroke: Option<Stroke>,
}

impl CirclePrimitive {
    #[must_use]
    pub const fn new(cx: f64, cy: f64, radius: f64, fill: Color) -> Self {
        Self {
            cx,
            cy,
            radius,
            fill,
            stroke: None,
        }
    }

    #[must_use]
    pub const fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn validate(self) -> ViewResult<()> {
        ensure_finite("circle", &[self.cx, self.cy, self.radius])?;
        ensure_non_negative("circle", &[self.radius])?;
        if let Some(stroke) = self.stroke {
            stroke.validate()?;
        }
        self.fill.validate()
    }
}

/// Ellipse rotated by `rotation_deg` around its own center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipsePrimitive {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
    pub rotation_deg: f64,
    pub fill: Color,
}

impl EllipsePrimitive {
    #[must_use]
    pub const fn new(cx: f64, cy: f64, rx: f64, ry: f64, rotation_deg: f64, fill: Color) -> Self {
        Self {
            cx,
            cy,
            rx,
            ry,
            rotation_deg,
            fill,
        }
    }

    pub fn validate(self) -> ViewResult<()> {
        ensure_finite("ellipse", &[self.cx, self.cy, self.rx, self.ry, self.rotation_deg])?;
        ensure_non_negative("ellipse", &[self.rx, self.ry])?;
        self.fill.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Draw command for one label in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
        }
    }

    pub fn validate(&self) -> ViewResult<()> {
        if self.text.is_empty() {
            return Err(ViewError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        ensure_finite("text", &[self.x, self.y])?;
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ViewError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Any drawable shape handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line(LinePrimitive),
    Rect(RectPrimitive),
    Circle(CirclePrimitive),
    Ellipse(EllipsePrimitive),
    Text(TextPrimitive),
}

impl Shape {
    pub fn validate(&self) -> ViewResult<()> {
        match self {
            Self::Line(line) => line.validate(),
            Self::Rect(rect) => rect.validate(),
            Self::Circle(circle) => circle.validate(),
            Self::Ellipse(ellipse) => ellipse.validate(),
            Self::Text(text) => text.validate(),
        }
    }
}
