use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 138, g: 226, b: 52 };
pub const ACCENT: Color = Color::TrueColor { r: 252, g: 233, b: 79 };
pub const IPV4_ADDR: Color = Color::TrueColor { r: 114, g: 159, b: 207 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const MUTED: Color = Color::TrueColor { r: 136, g: 138, b: 133 };
