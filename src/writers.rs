use std::fmt;
use std::io::{self, Write};

use crate::error::WriteError;
use crate::pool::BufferPool;
use crate::traits::Paint;
use crate::types::ColorChoice;

#[cfg(windows)]
use winapi_util::console as wincon;

/// The size of the chunks `Painter::copy` moves from source to destination.
const COPY_CHUNK: usize = 8 * 1024;

/// Which standard stream an [`Output`] writes to.
#[derive(Clone, Copy, Debug)]
enum StandardStreamType {
    Stdout,
    Stderr,
}

/// A buffered standard output or standard error stream.
///
/// This is the sink of painters created with [`Painter::stdout`] and
/// [`Painter::stderr`]. Writes are buffered until the stream is flushed,
/// which the printing methods of [`Painter`] do before they return.
#[derive(Debug)]
pub struct Output(OutputInner);

#[derive(Debug)]
enum OutputInner {
    Stdout(io::BufWriter<io::Stdout>),
    Stderr(io::BufWriter<io::Stderr>),
}

impl Output {
    fn new(sty: StandardStreamType) -> Output {
        match sty {
            StandardStreamType::Stdout => {
                Output(OutputInner::Stdout(io::BufWriter::new(io::stdout())))
            }
            StandardStreamType::Stderr => {
                Output(OutputInner::Stderr(io::BufWriter::new(io::stderr())))
            }
        }
    }
}

impl io::Write for Output {
    #[inline(always)]
    fn write(&mut self, b: &[u8]) -> io::Result<usize> {
        match self.0 {
            OutputInner::Stdout(ref mut s) => s.write(b),
            OutputInner::Stderr(ref mut s) => s.write(b),
        }
    }

    #[inline(always)]
    fn flush(&mut self) -> io::Result<()> {
        match self.0 {
            OutputInner::Stdout(ref mut s) => s.flush(),
            OutputInner::Stderr(ref mut s) => s.flush(),
        }
    }
}

/// Applies styles to text, honoring whether color is enabled.
///
/// A painter decides once, when it is created, whether color is enabled.
/// Every operation consults that decision: when color is disabled, escape
/// and reset sequences are empty and styled text comes out unchanged.
///
/// String operations (`wrap`, `wrap_joined`, `sprint`, `sprintln`) and
/// operations on caller supplied destinations (`fprint`, `fprintln`, `copy`)
/// only need a shared reference. Printing to the painter's own sink (`print`,
/// `println`) needs a mutable one, and flushes the sink before returning.
///
/// Payloads are anything that implements `Display`. To print formatted text,
/// pass `format_args!(..)`:
///
/// ```
/// use termstyle::{Color, Painter};
///
/// let painter = Painter::with_writer(Vec::<u8>::new(), true);
/// let text = painter.sprint(&Color::FG_CYAN, format_args!("{} + {}", 1, 2));
/// assert_eq!(text, "\x1B[36m1 + 2\x1B[0m");
/// ```
#[derive(Debug)]
pub struct Painter<W = Output> {
    wtr: W,
    enabled: bool,
    pool: BufferPool,
}

impl Painter<Output> {
    /// Create a new `Painter` with the given color preferences that prints
    /// to standard output.
    pub fn stdout(choice: ColorChoice) -> Painter<Output> {
        Painter::create(StandardStreamType::Stdout, choice)
    }

    /// Create a new `Painter` with the given color preferences that prints
    /// to standard error.
    pub fn stderr(choice: ColorChoice) -> Painter<Output> {
        Painter::create(StandardStreamType::Stderr, choice)
    }

    #[cfg(not(windows))]
    fn create(sty: StandardStreamType, choice: ColorChoice) -> Painter<Output> {
        let enabled = match sty {
            StandardStreamType::Stdout => {
                choice.should_attempt_color(&io::stdout())
            }
            StandardStreamType::Stderr => {
                choice.should_attempt_color(&io::stderr())
            }
        };
        tracing::debug!(stream = ?sty, ?choice, enabled, "created painter");
        Painter::with_writer(Output::new(sty), enabled)
    }

    #[cfg(windows)]
    fn create(sty: StandardStreamType, choice: ColorChoice) -> Painter<Output> {
        let attempt = match sty {
            StandardStreamType::Stdout => {
                choice.should_attempt_color(&io::stdout())
            }
            StandardStreamType::Stderr => {
                choice.should_attempt_color(&io::stderr())
            }
        };
        let enabled_virtual = attempt && {
            let con_res = match sty {
                StandardStreamType::Stdout => wincon::Console::stdout(),
                StandardStreamType::Stderr => wincon::Console::stderr(),
            };
            match con_res {
                Ok(mut con) => con.set_virtual_terminal_processing(true).is_ok(),
                Err(_) => false,
            }
        };
        let enabled =
            attempt && (enabled_virtual || choice == ColorChoice::Always);
        tracing::debug!(
            stream = ?sty,
            ?choice,
            enabled_virtual,
            enabled,
            "created painter"
        );
        Painter::with_writer(Output::new(sty), enabled)
    }
}

impl<W> Painter<W> {
    /// Create a new `Painter` that prints to the given writer.
    ///
    /// Whether color is enabled is given explicitly, which is useful for
    /// tests and for callers that run their own capability detection.
    pub fn with_writer(wtr: W, enabled: bool) -> Painter<W> {
        Painter { wtr, enabled, pool: BufferPool::new() }
    }

    /// Returns true if and only if this painter emits escape sequences.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Overrides whether this painter emits escape sequences.
    pub fn set_enabled(&mut self, yes: bool) {
        self.enabled = yes;
    }

    /// Return a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.wtr
    }

    /// Return a mutable reference to the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.wtr
    }

    /// Consume this painter and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.wtr
    }

    /// Return the scratch buffer pool of this painter.
    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    /// Returns the escape sequence of `style`, or the empty string if color
    /// is disabled.
    #[inline]
    pub fn escape<'s, S: Paint + ?Sized>(&self, style: &'s S) -> &'s str {
        if self.enabled { style.render() } else { "" }
    }

    /// Returns the sequence that undoes `style`, or the empty string if color
    /// is disabled.
    #[inline]
    pub fn reset<S: Paint + ?Sized>(&self, style: &S) -> &'static str {
        if self.enabled { style.reset_code() } else { "" }
    }

    /// Wraps `text` in `style`.
    ///
    /// When color is disabled, this returns `text` unchanged.
    pub fn wrap<S: Paint + ?Sized>(&self, style: &S, text: &str) -> String {
        let (esc, reset) = (self.escape(style), self.reset(style));
        let mut out = String::with_capacity(esc.len() + text.len() + reset.len());
        out.push_str(esc);
        out.push_str(text);
        out.push_str(reset);
        out
    }

    /// Wraps each element in `style` and joins the results with `sep`.
    ///
    /// Every element gets its own escape and reset. The separator is never
    /// styled.
    pub fn wrap_joined<S, I>(&self, style: &S, elems: I, sep: &str) -> String
    where
        S: Paint + ?Sized,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let (esc, reset) = (self.escape(style), self.reset(style));
        let mut buf = self.pool.acquire();
        for (i, elem) in elems.into_iter().enumerate() {
            if i > 0 {
                buf.extend_from_slice(sep.as_bytes());
            }
            buf.extend_from_slice(esc.as_bytes());
            buf.extend_from_slice(elem.as_ref().as_bytes());
            buf.extend_from_slice(reset.as_bytes());
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Formats `payload` wrapped in `style`.
    pub fn sprint<S, D>(&self, style: &S, payload: D) -> String
    where
        S: Paint + ?Sized,
        D: fmt::Display,
    {
        format!("{}{payload}{}", self.escape(style), self.reset(style))
    }

    /// Formats `payload` wrapped in `style`, followed by a newline.
    ///
    /// The reset comes before the newline, never after it.
    ///
    /// If `payload`'s `Display` implementation fails, the line holds whatever
    /// it produced before failing, still followed by the reset and newline.
    pub fn sprintln<S, D>(&self, style: &S, payload: D) -> String
    where
        S: Paint + ?Sized,
        D: fmt::Display,
    {
        let mut buf = self.pool.acquire();
        // Only a broken Display impl can fail here. Keep the partial output.
        let _ = self.render_line(&mut buf, style, payload);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Writes `payload` wrapped in `style` to `dst`.
    ///
    /// This returns the number of bytes written: escape, payload and reset.
    /// On failure, the error reports how many bytes `dst` accepted first.
    /// The payload is formatted before anything is written, so a failing
    /// `Display` implementation writes nothing.
    pub fn fprint<S, T, D>(
        &self,
        style: &S,
        dst: &mut T,
        payload: D,
    ) -> Result<usize, WriteError>
    where
        S: Paint + ?Sized,
        T: io::Write + ?Sized,
        D: fmt::Display,
    {
        let mut buf = self.pool.acquire();
        let mut out = Counted::new(dst);
        let res = format_into(&mut buf, payload).and_then(|()| {
            out.put(self.escape(style).as_bytes())?;
            out.put(&buf)?;
            out.put(self.reset(style).as_bytes())
        });
        out.finish(res).map(|n| n as usize)
    }

    /// Writes `payload` wrapped in `style` to `dst`, followed by a newline.
    ///
    /// The reset comes before the newline, never after it.
    pub fn fprintln<S, T, D>(
        &self,
        style: &S,
        dst: &mut T,
        payload: D,
    ) -> Result<usize, WriteError>
    where
        S: Paint + ?Sized,
        T: io::Write + ?Sized,
        D: fmt::Display,
    {
        let mut buf = self.pool.acquire();
        let mut out = Counted::new(dst);
        let res = self
            .render_line(&mut buf, style, payload)
            .and_then(|()| out.put(&buf));
        out.finish(res).map(|n| n as usize)
    }

    /// Copies everything from `src` to `dst`, wrapped in `style`.
    ///
    /// This returns the number of bytes written, including escape and reset.
    /// Read and write errors are returned along with the number of bytes
    /// written before the failure.
    ///
    /// The reset is appended after the last byte of `src`. Unlike `fprintln`,
    /// no newline is moved behind the reset, even if `src` ends with one.
    pub fn copy<S, T, R>(
        &self,
        style: &S,
        dst: &mut T,
        src: &mut R,
    ) -> Result<u64, WriteError>
    where
        S: Paint + ?Sized,
        T: io::Write + ?Sized,
        R: io::Read + ?Sized,
    {
        let mut buf = self.pool.acquire();
        buf.resize(COPY_CHUNK, 0);
        let mut out = Counted::new(dst);
        let res = pump(
            &mut out,
            src,
            &mut buf,
            self.escape(style).as_bytes(),
            self.reset(style).as_bytes(),
        );
        out.finish(res)
    }

    /// Renders escape, payload, newline and reset into `buf`, moving the
    /// reset in front of the newline.
    ///
    /// The line is completed even if `payload` fails to format, in which
    /// case the formatting error is returned afterwards.
    fn render_line<S, D>(
        &self,
        buf: &mut Vec<u8>,
        style: &S,
        payload: D,
    ) -> io::Result<()>
    where
        S: Paint + ?Sized,
        D: fmt::Display,
    {
        buf.extend_from_slice(self.escape(style).as_bytes());
        let res = format_into(buf, payload);
        buf.push(b'\n');
        splice_reset(buf, self.reset(style));
        res
    }
}

impl<W: io::Write> Painter<W> {
    /// Prints `payload` wrapped in `style` to this painter's sink.
    ///
    /// The sink is flushed before this returns, even if a write failed. The
    /// first error is returned. A payload that fails to format is reported
    /// as an error and nothing is written.
    pub fn print<S, D>(&mut self, style: &S, payload: D) -> io::Result<()>
    where
        S: Paint + ?Sized,
        D: fmt::Display,
    {
        let (esc, reset) = (self.escape(style), self.reset(style));
        let res = {
            let mut buf = self.pool.acquire();
            format_into(&mut buf, payload).and_then(|()| {
                self.wtr.write_all(esc.as_bytes())?;
                self.wtr.write_all(&buf)?;
                self.wtr.write_all(reset.as_bytes())
            })
        };
        let flushed = self.wtr.flush();
        res.and(flushed)
    }

    /// Prints `payload` wrapped in `style` to this painter's sink, followed
    /// by a newline.
    ///
    /// The reset comes before the newline, never after it. The sink is
    /// flushed before this returns, even if a write failed.
    pub fn println<S, D>(&mut self, style: &S, payload: D) -> io::Result<()>
    where
        S: Paint + ?Sized,
        D: fmt::Display,
    {
        let res = {
            let mut buf = self.pool.acquire();
            self.render_line(&mut buf, style, payload)
                .and_then(|()| self.wtr.write_all(&buf))
        };
        let flushed = self.wtr.flush();
        res.and(flushed)
    }

    /// Flushes this painter's sink.
    pub fn flush(&mut self) -> io::Result<()> {
        self.wtr.flush()
    }
}

/// Replaces the trailing newline of `line` with the first byte of `reset`,
/// then appends the rest of `reset` and a fresh newline.
///
/// The result is the same as inserting `reset` right before the newline.
/// Nothing happens when `reset` is empty.
fn splice_reset(line: &mut Vec<u8>, reset: &str) {
    let Some((&first, rest)) = reset.as_bytes().split_first() else {
        return;
    };
    if let Some(last) = line.last_mut() {
        *last = first;
    }
    line.extend_from_slice(rest);
    line.push(b'\n');
}

/// Formats `payload` onto the end of `buf`.
///
/// Output produced before a `Display` implementation fails stays in `buf`.
fn format_into<D: fmt::Display>(buf: &mut Vec<u8>, payload: D) -> io::Result<()> {
    fmt::write(&mut ByteSink(buf), format_args!("{payload}"))
        .map_err(|_| io::Error::other("formatter error"))
}

/// Adapts a byte buffer to `fmt::Write`, which never fails on its own.
struct ByteSink<'a>(&'a mut Vec<u8>);

impl fmt::Write for ByteSink<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

fn pump<T, R>(
    out: &mut Counted<'_, T>,
    src: &mut R,
    buf: &mut [u8],
    esc: &[u8],
    reset: &[u8],
) -> io::Result<()>
where
    T: io::Write + ?Sized,
    R: io::Read + ?Sized,
{
    out.put(esc)?;
    loop {
        let n = match src.read(buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        out.put(&buf[..n])?;
    }
    out.put(reset)
}

/// A writer that keeps count of the bytes its destination accepted.
struct Counted<'a, T: ?Sized> {
    dst: &'a mut T,
    written: u64,
}

impl<'a, T: io::Write + ?Sized> Counted<'a, T> {
    fn new(dst: &'a mut T) -> Counted<'a, T> {
        Counted { dst, written: 0 }
    }

    /// Writes all of `bytes`, counting partial writes as they happen.
    fn put(&mut self, mut bytes: &[u8]) -> io::Result<()> {
        while !bytes.is_empty() {
            match self.dst.write(bytes) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "failed to write whole buffer",
                    ));
                }
                Ok(n) => {
                    self.written += n as u64;
                    bytes = &bytes[n..];
                }
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn finish(self, res: io::Result<()>) -> Result<u64, WriteError> {
        match res {
            Ok(()) => Ok(self.written),
            Err(err) => {
                tracing::debug!(
                    written = self.written,
                    error = %err,
                    "styled write failed"
                );
                Err(WriteError::new(self.written, err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Style, combine};
    use crate::types::Color;

    #[test]
    fn splice_moves_reset_before_newline() {
        let mut line = b"\x1B[36mhi\n".to_vec();
        splice_reset(&mut line, "\x1B[0m");
        assert_eq!(line, b"\x1B[36mhi\x1B[0m\n");

        let mut line = b"hi\n".to_vec();
        splice_reset(&mut line, "");
        assert_eq!(line, b"hi\n");
    }

    #[test]
    fn escape_and_reset_follow_enablement() {
        let on = Painter::with_writer(io::sink(), true);
        let off = Painter::with_writer(io::sink(), false);
        assert_eq!(on.escape(&Color::FG_CYAN), "\x1B[36m");
        assert_eq!(on.reset(&Color::FG_CYAN), "\x1B[0m");
        assert_eq!(on.reset(&Color::RESET), "");
        assert_eq!(off.escape(&Color::FG_CYAN), "");
        assert_eq!(off.reset(&Color::FG_CYAN), "");
    }

    #[test]
    fn set_enabled_overrides() {
        let mut painter = Painter::with_writer(io::sink(), false);
        assert_eq!(painter.wrap(&Color::BOLD, "x"), "x");
        painter.set_enabled(true);
        assert!(painter.is_enabled());
        assert_eq!(painter.wrap(&Color::BOLD, "x"), "\x1B[1mx\x1B[0m");
    }

    #[test]
    fn scratch_buffers_return_to_pool() {
        let painter = Painter::with_writer(io::sink(), true);
        let style = combine([Color::BOLD, Color::FG_RED]);
        painter.wrap_joined(&style, ["a", "b"], ",");
        painter.sprintln(&style, "line");
        let mut dst = Vec::new();
        painter.fprintln(&style, &mut dst, "line").unwrap();
        painter.copy(&style, &mut dst, &mut &b"abc"[..]).unwrap();
        assert_eq!(painter.pool().idle(), 1);
    }

    /// Writes "part", then fails.
    struct Broken;

    impl fmt::Display for Broken {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("part")?;
            Err(fmt::Error)
        }
    }

    #[test]
    fn broken_display_is_reported() {
        let painter = Painter::with_writer(io::sink(), true);
        let mut dst = Vec::new();
        let err = painter.fprint(&Style::Nop, &mut dst, Broken).unwrap_err();
        assert_eq!(err.written(), 0);
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert!(dst.is_empty());

        let err = painter.fprintln(&Color::BOLD, &mut dst, Broken).unwrap_err();
        assert_eq!(err.written(), 0);
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert!(dst.is_empty());
        assert_eq!(painter.pool().idle(), 1);
    }

    #[test]
    fn broken_display_keeps_partial_line() {
        let painter = Painter::with_writer(io::sink(), true);
        assert_eq!(painter.sprintln(&Color::BOLD, Broken), "\x1B[1mpart\x1B[0m\n");

        let painter = Painter::with_writer(io::sink(), false);
        assert_eq!(painter.sprintln(&Color::BOLD, Broken), "part\n");
    }

    #[test]
    fn broken_display_prints_nothing() {
        let mut painter = Painter::with_writer(Vec::<u8>::new(), true);
        let err = painter.print(&Color::FG_RED, Broken).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        let err = painter.println(&Color::FG_RED, Broken).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert!(painter.get_ref().is_empty());

        painter.println(&Color::FG_RED, "ok").unwrap();
        assert_eq!(painter.get_ref(), b"\x1B[31mok\x1B[0m\n");
    }

    #[test]
    fn standard_stream_constructors() {
        assert!(!Painter::stdout(ColorChoice::Never).is_enabled());
        assert!(!Painter::stderr(ColorChoice::Never).is_enabled());
    }

    #[cfg(not(windows))]
    #[test]
    fn always_enables_standard_streams() {
        assert!(Painter::stdout(ColorChoice::Always).is_enabled());
        assert!(Painter::stderr(ColorChoice::Always).is_enabled());
    }
}
