use std::env;
use std::ffi::OsStr;
use std::fmt;
use std::io::IsTerminal;
use std::str::FromStr;

use crate::ansi;
use crate::error::Error;

/// ColorChoice represents the color preferences of an end user.
///
/// The `Default` implementation for this type will select `Auto`, which tries
/// to do the right thing based on the current environment.
///
/// The `FromStr` implementation for this type converts a lowercase string of
/// the variant name to the corresponding variant. Any other string results in
/// an error.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ColorChoice {
    /// Always emit colors.
    Always,
    /// Try to use colors, but don't force the issue. If `NO_COLOR` is
    /// defined, if `TERM=dumb`, or if the destination is not a terminal, then
    /// don't use colors.
    #[default]
    Auto,
    /// Never emit colors.
    Never,
}

impl FromStr for ColorChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<ColorChoice, Error> {
        match s.to_lowercase().as_str() {
            "always" => Ok(ColorChoice::Always),
            "auto" => Ok(ColorChoice::Auto),
            "never" => Ok(ColorChoice::Never),
            _ => Err(Error::UnknownColorChoice(s.to_string())),
        }
    }
}

impl ColorChoice {
    /// Returns true if we should attempt to write colored output to the
    /// given stream.
    ///
    /// This consults the environment and the stream every time it is called.
    /// Callers are expected to call it once and keep the answer around, which
    /// is what [`Painter`](crate::Painter) does.
    pub fn should_attempt_color<T: IsTerminal>(&self, stream: &T) -> bool {
        match *self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                let no_color = env::var_os("NO_COLOR").is_some();
                let term = env::var_os("TERM");
                let is_tty = stream.is_terminal();
                let enabled = allows_color(no_color, term.as_deref(), is_tty);
                tracing::debug!(
                    no_color,
                    term = ?term,
                    is_tty,
                    enabled,
                    "resolved automatic color choice"
                );
                enabled
            }
        }
    }
}

/// Decides whether color is allowed from the three environment signals.
///
/// `no_color` is whether `NO_COLOR` is present (its value doesn't matter),
/// `term` is the value of `TERM` and `is_tty` is whether the destination is
/// an interactive terminal. An unset `TERM` does not disable color.
pub fn allows_color(no_color: bool, term: Option<&OsStr>, is_tty: bool) -> bool {
    if no_color {
        return false;
    }
    if term.is_some_and(|t| t == "dumb") {
        return false;
    }
    is_tty
}

/// A terminal style code.
///
/// Any `u8` is a valid code. Codes that the escape table does not populate
/// render as the empty string and have no visual effect. The associated
/// constants name every populated code.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Color(pub u8);

macro_rules! codes {
    ($($(#[$doc:meta])* $name:ident = $code:literal;)+) => {
        impl Color {
            $(
                $(#[$doc])*
                pub const $name: Color = Color($code);
            )+
        }
    };
}

codes! {
    /// Resets all attributes and colors.
    RESET = 0;
    BOLD = 1;
    FAINT = 2;
    ITALIC = 3;
    UNDERLINE = 4;
    BLINK_SLOW = 5;
    BLINK_RAPID = 6;
    REVERSE_VIDEO = 7;
    CONCEALED = 8;
    CROSSED_OUT = 9;

    FG_BLACK = 30;
    FG_RED = 31;
    FG_GREEN = 32;
    FG_YELLOW = 33;
    FG_BLUE = 34;
    FG_MAGENTA = 35;
    FG_CYAN = 36;
    FG_WHITE = 37;

    FG_HI_BLACK = 90;
    FG_HI_RED = 91;
    FG_HI_GREEN = 92;
    FG_HI_YELLOW = 93;
    FG_HI_BLUE = 94;
    FG_HI_MAGENTA = 95;
    FG_HI_CYAN = 96;
    FG_HI_WHITE = 97;

    BG_BLACK = 40;
    BG_RED = 41;
    BG_GREEN = 42;
    BG_YELLOW = 43;
    BG_BLUE = 44;
    BG_MAGENTA = 45;
    BG_CYAN = 46;
    BG_WHITE = 47;

    BG_HI_BLACK = 100;
    BG_HI_RED = 101;
    BG_HI_GREEN = 102;
    BG_HI_YELLOW = 103;
    BG_HI_BLUE = 104;
    BG_HI_MAGENTA = 105;
    BG_HI_CYAN = 106;
    BG_HI_WHITE = 107;
}

impl Color {
    /// Create a color from its raw code.
    pub const fn new(code: u8) -> Color {
        Color(code)
    }

    /// Returns the raw code of this color.
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns true if this is the reset sentinel.
    pub const fn is_reset(self) -> bool {
        self.0 == Color::RESET.0
    }

    /// Parses a foreground color name such as `red` or `hi-cyan`.
    pub fn parse_fg(name: &str) -> Result<Color, Error> {
        Color::parse(Layer::Foreground, name)
    }

    /// Parses a background color name such as `red` or `hi-cyan`.
    pub fn parse_bg(name: &str) -> Result<Color, Error> {
        Color::parse(Layer::Background, name)
    }

    /// Parses a color name for the given layer.
    ///
    /// Names are lowercase: the eight standard colors (`black`, `red`,
    /// `green`, `yellow`, `blue`, `magenta`, `cyan`, `white`) and their
    /// high-intensity variants prefixed with `hi-`.
    pub fn parse(layer: Layer, name: &str) -> Result<Color, Error> {
        let (intense, base) = match name.strip_prefix("hi-") {
            Some(base) => (true, base),
            None => (false, name),
        };
        let offset = match base {
            "black" => 0,
            "red" => 1,
            "green" => 2,
            "yellow" => 3,
            "blue" => 4,
            "magenta" => 5,
            "cyan" => 6,
            "white" => 7,
            _ => {
                return Err(Error::UnknownColorName {
                    layer,
                    name: name.to_string(),
                });
            }
        };
        Ok(Color(layer.base(intense) + offset))
    }
}

impl From<u8> for Color {
    fn from(code: u8) -> Color {
        Color(code)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ansi::lookup(self.0))
    }
}

/// The layer a named color applies to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Layer {
    Foreground,
    Background,
}

impl Layer {
    fn base(self, intense: bool) -> u8 {
        match (self, intense) {
            (Layer::Foreground, false) => 30,
            (Layer::Foreground, true) => 90,
            (Layer::Background, false) => 40,
            (Layer::Background, true) => 100,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Layer::Foreground => f.write_str("foreground"),
            Layer::Background => f.write_str("background"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: [&str; 8] =
        ["black", "red", "green", "yellow", "blue", "magenta", "cyan", "white"];

    #[test]
    fn parse_names() {
        for (i, name) in NAMES.iter().enumerate() {
            let i = i as u8;
            assert_eq!(Color::parse_fg(name).unwrap(), Color(30 + i));
            assert_eq!(Color::parse_bg(name).unwrap(), Color(40 + i));
            let hi = format!("hi-{name}");
            assert_eq!(Color::parse_fg(&hi).unwrap(), Color(90 + i));
            assert_eq!(Color::parse_bg(&hi).unwrap(), Color(100 + i));
        }
        assert_eq!(Color::parse_fg("cyan").unwrap(), Color::FG_CYAN);
        assert_eq!(Color::parse_bg("hi-white").unwrap(), Color::BG_HI_WHITE);
    }

    #[test]
    fn parse_unknown_names() {
        for bad in ["puce", "Red", "hi-", "hi-puce", "", "bright-red"] {
            let err = Color::parse_fg(bad).unwrap_err();
            assert!(err.to_string().contains(bad), "{err}");
            assert!(matches!(
                err,
                Error::UnknownColorName { layer: Layer::Foreground, .. }
            ));
            let err = Color::parse_bg(bad).unwrap_err();
            assert!(err.to_string().contains(bad), "{err}");
        }
        let err = Color::parse_bg("puce").unwrap_err();
        assert_eq!(err.to_string(), "invalid background color name 'puce'");
    }

    #[test]
    fn color_display() {
        assert_eq!(Color::FG_CYAN.to_string(), "\x1B[36m");
        assert_eq!(Color::BG_HI_RED.to_string(), "\x1B[101m");
        assert_eq!(Color(12).to_string(), "");
        assert!(Color::RESET.is_reset());
        assert!(!Color::BOLD.is_reset());
    }

    #[test]
    fn choice_from_str() {
        assert_eq!("always".parse::<ColorChoice>().unwrap(), ColorChoice::Always);
        assert_eq!("AUTO".parse::<ColorChoice>().unwrap(), ColorChoice::Auto);
        assert_eq!("never".parse::<ColorChoice>().unwrap(), ColorChoice::Never);
        let err = "sometimes".parse::<ColorChoice>().unwrap_err();
        assert!(err.to_string().contains("sometimes"));
        assert_eq!(ColorChoice::default(), ColorChoice::Auto);
    }

    #[test]
    fn oracle() {
        let dumb = OsStr::new("dumb");
        let xterm = OsStr::new("xterm-256color");
        assert!(allows_color(false, Some(xterm), true));
        assert!(allows_color(false, None, true));
        assert!(!allows_color(true, Some(xterm), true));
        assert!(!allows_color(false, Some(dumb), true));
        assert!(!allows_color(false, Some(xterm), false));
    }

    #[test]
    fn forced_choices_ignore_stream() {
        let sink = std::io::stdout();
        assert!(ColorChoice::Always.should_attempt_color(&sink));
        assert!(!ColorChoice::Never.should_attempt_color(&sink));
    }

    #[test]
    fn auto_rejects_regular_files() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml");
        let file = std::fs::File::open(path).unwrap();
        assert!(!ColorChoice::Auto.should_attempt_color(&file));
        assert!(ColorChoice::Always.should_attempt_color(&file));
    }
}
