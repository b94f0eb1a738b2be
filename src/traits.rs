use crate::ansi;
use crate::types::Color;

/// This trait describes values that can style text.
///
/// A style knows the escape sequence that turns it on and the escape sequence
/// that undoes it. Neither looks at whether color is enabled: that decision
/// belongs to the [`Painter`](crate::Painter) that applies the style, so the
/// same style may be built long before anybody knows where its output goes.
pub trait Paint {
    /// Returns the escape sequence of this style, regardless of whether color
    /// is enabled.
    ///
    /// This is the empty string for styles without visual effect.
    fn render(&self) -> &str;

    /// Returns the escape sequence that undoes this style, regardless of
    /// whether color is enabled.
    ///
    /// Resets don't stack. A single reset clears every active attribute, so
    /// this is either the empty string or [`ansi::RESET`].
    fn reset_code(&self) -> &'static str;

    /// Returns the SGR parameters of this style, i.e., its escape sequence
    /// without the `ESC[` and `m` envelope.
    fn params(&self) -> &str {
        ansi::sgr_params(self.render())
    }
}

impl Paint for Color {
    #[inline]
    fn render(&self) -> &str {
        ansi::lookup(self.0)
    }

    #[inline]
    fn reset_code(&self) -> &'static str {
        if self.is_reset() { "" } else { ansi::RESET }
    }

    #[inline]
    fn params(&self) -> &str {
        ansi::params(self.0)
    }
}

impl<T: ?Sized + Paint> Paint for &T {
    fn render(&self) -> &str {
        (**self).render()
    }
    fn reset_code(&self) -> &'static str {
        (**self).reset_code()
    }
    fn params(&self) -> &str {
        (**self).params()
    }
}

impl<T: ?Sized + Paint> Paint for Box<T> {
    fn render(&self) -> &str {
        (**self).render()
    }
    fn reset_code(&self) -> &'static str {
        (**self).reset_code()
    }
    fn params(&self) -> &str {
        (**self).params()
    }
}
