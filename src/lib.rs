/*!
This crate styles terminal text with ANSI escape sequences. Styles are colors
and text attributes such as bold or underline, and they compose: combining
several styles yields a single escape sequence with `;`-separated parameters.

Whether any escape sequences are emitted at all is decided once, when a
[`Painter`] is created, from the user's [`ColorChoice`] and the environment
(`NO_COLOR`, `TERM=dumb`, and whether the destination is a terminal). When
color is disabled, every operation passes text through unchanged.

# Organization

[`Color`] is a single style code, [`Style`] is a color, a [`Combined`]
sequence of styles, or the inert [`Style::Nop`]. All of them implement the
[`Paint`] trait, which exposes escape and reset sequences irrespective of
whether color is enabled.

[`Painter`] applies styles. It wraps and joins strings, formats payloads, and
writes to its own sink or to any `io::Write` destination. Line-oriented
operations put the reset sequence before the trailing newline.

# Example

```
use termstyle::{Color, Painter, combine};

let painter = Painter::with_writer(Vec::<u8>::new(), true);
let style = combine([Color::BOLD, Color::FG_RED]);
assert_eq!(painter.wrap(&style, "error"), "\x1B[1;31merror\x1B[0m");
assert_eq!(painter.sprintln(&Color::FG_CYAN, "ok"), "\x1B[36mok\x1B[0m\n");

let plain = Painter::with_writer(Vec::<u8>::new(), false);
assert_eq!(plain.wrap(&style, "error"), "error");
```
*/

pub mod ansi;
mod error;
pub mod pool;
mod style;
mod traits;
mod types;
mod writers;

pub use error::{Error, WriteError};
pub use pool::{BufferPool, PooledBuffer};
pub use style::{Combined, Style, combine};
pub use traits::Paint;
pub use types::{ColorChoice, Color, Layer, allows_color};
pub use writers::{Output, Painter};
