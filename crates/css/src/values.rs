/// CSS length value. Percentages are kept distinct since they resolve late.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    Px(f32),
    Pt(f32),
    Em(f32),
    Percent(f32),
}

impl Length {
    /// Canonical CSS text for the length.
    pub fn to_css(self) -> String {
        match self {
            Length::Px(v) => format!("{}px", trim_float(v)),
            Length::Pt(v) => format!("{}pt", trim_float(v)),
            Length::Em(v) => format!("{}em", trim_float(v)),
            Length::Percent(v) => format!("{}%", trim_float(v)),
        }
    }
}

fn trim_float(v: f32) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

pub fn parse_color(value: &str) -> Option<Color> {
    let s = value.trim().to_ascii_lowercase();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
        let mut parts = args.split(',').map(|p| p.trim().parse::<u16>().ok());
        let r = parts.next()??;
        let g = parts.next()??;
        let b = parts.next()??;
        if parts.next().is_some() || r > 255 || g > 255 || b > 255 {
            return None;
        }
        return Some(Color::rgb(r as u8, g as u8, b as u8));
    }

    let named = match s.as_str() {
        "black" => Color::rgb(0, 0, 0),
        "blue" => Color::rgb(0, 0, 255),
        "cyan" | "aqua" => Color::rgb(0, 255, 255),
        "fuchsia" | "magenta" => Color::rgb(255, 0, 255),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "green" => Color::rgb(0, 128, 0),
        "lime" => Color::rgb(0, 255, 0),
        "maroon" => Color::rgb(128, 0, 0),
        "navy" => Color::rgb(0, 0, 128),
        "olive" => Color::rgb(128, 128, 0),
        "purple" => Color::rgb(128, 0, 128),
        "red" => Color::rgb(255, 0, 0),
        "silver" => Color::rgb(192, 192, 192),
        "teal" => Color::rgb(0, 128, 128),
        "white" => Color::rgb(255, 255, 255),
        "yellow" => Color::rgb(255, 255, 0),
        "transparent" => Color {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        },
        _ => return None,
    };
    Some(named)
}

fn parse_hex(hex: &str) -> Option<Color> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => Some(Color::rgb(
            channel(&hex[0..1].repeat(2))?,
            channel(&hex[1..2].repeat(2))?,
            channel(&hex[2..3].repeat(2))?,
        )),
        6 => Some(Color::rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

/// Parse `<number><unit>`; a bare number is read as pixels (presentational markup).
pub fn parse_length(value: &str) -> Option<Length> {
    let v = value.trim().to_ascii_lowercase();
    let (num, make): (&str, fn(f32) -> Length) = if let Some(n) = v.strip_suffix("px") {
        (n, Length::Px)
    } else if let Some(n) = v.strip_suffix("pt") {
        (n, Length::Pt)
    } else if let Some(n) = v.strip_suffix("em") {
        (n, Length::Em)
    } else if let Some(n) = v.strip_suffix('%') {
        (n, Length::Percent)
    } else {
        (v.as_str(), Length::Px)
    };
    let num = num.trim().parse::<f32>().ok()?;
    if num.is_finite() && num >= 0.0 {
        return Some(make(num));
    }
    None
}

const FONT_SIZE_KEYWORDS: [&str; 7] = [
    "xx-small", "small", "medium", "large", "x-large", "xx-large", "xx-large",
];

/// Default used when a markup font size cannot be read.
pub const DEFAULT_FONT_SIZE: &str = "medium";

/// Map a markup font size (`1`..`7`, or `+n`/`-n` relative to 3) to a CSS keyword.
///
/// Out-of-range values clamp; unreadable values fall back to `DEFAULT_FONT_SIZE`.
pub fn font_size_keyword(value: &str) -> &'static str {
    let v = value.trim();
    let parsed = if let Some(rel) = v.strip_prefix('+') {
        rel.parse::<i32>().ok().map(|n| n.saturating_add(3))
    } else if v.starts_with('-') {
        v.parse::<i32>().ok().map(|n| n.saturating_add(3))
    } else {
        v.parse::<i32>().ok()
    };
    match parsed {
        Some(n) => FONT_SIZE_KEYWORDS[(n.clamp(1, 7) - 1) as usize],
        None => DEFAULT_FONT_SIZE,
    }
}

pub fn is_border_style(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "none"
            | "hidden"
            | "dotted"
            | "dashed"
            | "solid"
            | "double"
            | "groove"
            | "ridge"
            | "inset"
            | "outset"
    )
}

pub fn is_border_width(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "thin" | "medium" | "thick"
    ) || parse_length(value).is_some()
}
