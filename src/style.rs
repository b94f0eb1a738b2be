//! Styles and the combinator that merges them.
//!
//! A [`Style`] is one of three shapes: a single [`Color`] code, a
//! [`Combined`] sequence of styles, or [`Style::Nop`], which styles nothing.
//! All three satisfy [`Paint`], so a [`Painter`](crate::Painter) treats them
//! the same way.
//!
//! Combining styles yields one escape sequence with `;`-separated parameters
//! rather than one escape sequence per member:
//!
//! ```
//! use termstyle::{Color, Paint, combine};
//!
//! let style = combine([Color::BOLD, Color::FG_RED]);
//! assert_eq!(style.render(), "\x1B[1;31m");
//! assert_eq!(style.reset_code(), "\x1B[0m");
//! ```

use std::fmt;

use crate::ansi;
use crate::traits::Paint;
use crate::types::Color;

/// A style: a color, a combination of styles, or nothing at all.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum Style {
    /// A single style code.
    Code(Color),
    /// Several styles rendered as one escape sequence.
    Combined(Combined),
    /// The inert style. It renders nothing and combining anything with it
    /// yields itself.
    #[default]
    Nop,
}

impl Style {
    /// Returns a style that applies `others` on top of this one.
    ///
    /// * `Nop` absorbs everything and stays `Nop`.
    /// * A code combined with nothing, or with only itself, stays that code.
    /// * A combination combined with nothing stays unchanged.
    ///
    /// Everything else becomes [`combine`] of this style followed by
    /// `others`.
    #[must_use]
    pub fn with<I>(self, others: I) -> Style
    where
        I: IntoIterator,
        I::Item: Into<Style>,
    {
        let others: Vec<Style> = others.into_iter().map(Into::into).collect();
        match self {
            Style::Nop => Style::Nop,
            Style::Code(c) => {
                let unchanged = match others.as_slice() {
                    [] => true,
                    [Style::Code(x)] => *x == c,
                    _ => false,
                };
                if unchanged {
                    self
                } else {
                    combine(std::iter::once(self).chain(others))
                }
            }
            Style::Combined(_) => {
                if others.is_empty() {
                    self
                } else {
                    combine(std::iter::once(self).chain(others))
                }
            }
        }
    }

    /// Returns true if this style can never produce an escape sequence.
    pub fn is_inert(&self) -> bool {
        self.render().is_empty() && self.reset_code().is_empty()
    }
}

impl Paint for Style {
    fn render(&self) -> &str {
        match *self {
            Style::Code(ref c) => c.render(),
            Style::Combined(ref c) => c.render(),
            Style::Nop => "",
        }
    }

    fn reset_code(&self) -> &'static str {
        match *self {
            Style::Code(ref c) => c.reset_code(),
            Style::Combined(ref c) => c.reset_code(),
            Style::Nop => "",
        }
    }

    fn params(&self) -> &str {
        match *self {
            Style::Code(ref c) => c.params(),
            Style::Combined(ref c) => c.params(),
            Style::Nop => "",
        }
    }
}

impl From<Color> for Style {
    fn from(color: Color) -> Style {
        Style::Code(color)
    }
}

impl From<Combined> for Style {
    fn from(combined: Combined) -> Style {
        Style::Combined(combined)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render())
    }
}

/// An ordered sequence of styles that renders as a single escape sequence.
///
/// The escape sequence is built once, when the combination is created. The
/// reset is whatever the last member resets with. Members are kept in order
/// and duplicates are kept too.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Combined {
    escape: String,
    styles: Vec<Style>,
}

impl Combined {
    /// Returns the members of this combination in order.
    ///
    /// This is empty for a combination where no member had any visual
    /// effect.
    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    /// Returns true if this combination renders nothing.
    pub fn is_empty(&self) -> bool {
        self.escape.is_empty()
    }
}

impl Paint for Combined {
    fn render(&self) -> &str {
        &self.escape
    }

    fn reset_code(&self) -> &'static str {
        self.styles.last().map_or("", |s| s.reset_code())
    }
}

impl fmt::Display for Combined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.escape)
    }
}

/// Combines the given styles into one.
///
/// Members whose parameters are empty are skipped when building the escape
/// sequence, so styles without visual effect never produce stray `;`
/// separators. If no member contributes anything, the result is the empty
/// combination, which behaves exactly like [`Style::Nop`].
pub fn combine<I>(styles: I) -> Style
where
    I: IntoIterator,
    I::Item: Into<Style>,
{
    let styles: Vec<Style> = styles.into_iter().map(Into::into).collect();

    let mut escape = String::with_capacity(2 + 4 * styles.len());
    escape.push_str(ansi::CSI);
    let mut written = 0;
    for style in &styles {
        let params = style.params();
        if params.is_empty() {
            continue;
        }
        if written > 0 {
            escape.push(';');
        }
        escape.push_str(params);
        written += 1;
    }

    if written == 0 {
        return Style::Combined(Combined::default());
    }
    escape.push(ansi::SGR_END);
    Style::Combined(Combined { escape, styles })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_joins_params() {
        let style = combine([Color::BOLD, Color::FG_RED]);
        assert_eq!(style.render(), "\x1B[1;31m");
        assert_eq!(style.params(), "1;31");
        assert_eq!(style.reset_code(), Color::FG_RED.reset_code());
        assert_eq!(style.to_string(), "\x1B[1;31m");
    }

    #[test]
    fn combine_single_matches_code() {
        for code in 0..=255u8 {
            let color = Color(code);
            let style = combine([color]);
            assert_eq!(style.render(), color.render());
            if !color.render().is_empty() {
                assert_eq!(style.reset_code(), color.reset_code());
            }
        }
    }

    #[test]
    fn combine_skips_empty_members() {
        let style = combine([Color(12), Color::ITALIC, Color(200), Color::BG_BLUE]);
        assert_eq!(style.render(), "\x1B[3;44m");

        let style = combine([Style::Nop, Color::UNDERLINE.into()]);
        assert_eq!(style.render(), "\x1B[4m");
    }

    #[test]
    fn combine_keeps_order_and_duplicates() {
        let style = combine([Color::FG_GREEN, Color::BOLD, Color::FG_GREEN]);
        assert_eq!(style.render(), "\x1B[32;1;32m");
        match style {
            Style::Combined(ref c) => assert_eq!(c.styles().len(), 3),
            _ => panic!("expected a combination"),
        }
    }

    #[test]
    fn combine_nested() {
        let inner = combine([Color::BOLD, Color::ITALIC]);
        let outer = combine([inner.clone(), Color::FG_CYAN.into()]);
        assert_eq!(outer.render(), "\x1B[1;3;36m");
        assert_eq!(outer.reset_code(), "\x1B[0m");

        let outer = combine([Style::from(Color::FG_CYAN), inner]);
        assert_eq!(outer.render(), "\x1B[36;1;3m");
    }

    #[test]
    fn combine_degenerates_to_inert() {
        let empty = combine(Vec::<Style>::new());
        assert_eq!(empty.render(), "");
        assert_eq!(empty.reset_code(), "");
        assert!(empty.is_inert());

        let noops = combine([Color(10), Color(11)]);
        assert_eq!(noops, empty);
        assert!(noops.is_inert());
    }

    #[test]
    fn reset_delegates_to_last() {
        let style = combine([Color::FG_RED, Color::RESET]);
        assert_eq!(style.render(), "\x1B[31;0m");
        assert_eq!(style.reset_code(), "");

        let style = combine([Color::RESET, Color::FG_RED]);
        assert_eq!(style.reset_code(), "\x1B[0m");

        let style = combine([Style::from(Color::FG_RED), Style::Nop]);
        assert_eq!(style.render(), "\x1B[31m");
        assert_eq!(style.reset_code(), "");
    }

    #[test]
    fn with_chaining() {
        assert_eq!(Style::Nop.with([Color::FG_RED]), Style::Nop);

        let red = Style::from(Color::FG_RED);
        assert_eq!(red.clone().with(Vec::<Style>::new()), red);
        assert_eq!(red.clone().with([Color::FG_RED]), red);

        let bold_red = red.clone().with([Color::BOLD]);
        assert_eq!(bold_red.render(), "\x1B[31;1m");

        let again = bold_red.clone().with(Vec::<Style>::new());
        assert_eq!(again, bold_red);

        let more = bold_red.with([Color::BG_WHITE]);
        assert_eq!(more.render(), "\x1B[31;1;47m");
    }

    #[test]
    fn nop_is_inert() {
        let nop = Style::Nop;
        assert_eq!(nop.render(), "");
        assert_eq!(nop.reset_code(), "");
        assert_eq!(nop.params(), "");
        assert_eq!(nop.to_string(), "");
        assert_eq!(Style::default(), Style::Nop);
    }
}
