//! ESC/POS command builder
//!
//! Ticket layout is finished upstream as plain fixed-width lines; this
//! builder only frames them for the printer:
//!
//! ```text
//! ESC @          initialize
//! ESC t 16       code page WPC1252
//! <line> LF      ... one per ticket line, Windows-1252 encoded
//! GS V 0         full cut
//! ```

use crate::encoding::encode_cp1252;

const ESC: u8 = 0x1B;
const GS: u8 = 0x1D;
const LF: u8 = 0x0A;

/// `ESC t n` value for Windows-1252 on Epson-compatible printers.
pub const CODE_PAGE_WPC1252: u8 = 16;

/// ESC/POS byte stream builder.
#[derive(Debug, Clone)]
pub struct EscPosBuilder {
    buf: Vec<u8>,
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EscPosBuilder {
    /// New builder, already initialized and switched to Windows-1252.
    pub fn new() -> Self {
        let mut builder = Self {
            buf: Vec::with_capacity(2048),
        };
        builder.buf.extend_from_slice(&[ESC, b'@']);
        builder.buf.extend_from_slice(&[ESC, b't', CODE_PAGE_WPC1252]);
        builder
    }

    /// Text without line feed.
    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend(encode_cp1252(s));
        self
    }

    /// Text followed by a line feed.
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(LF);
        self
    }

    /// Every line in order.
    pub fn lines<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.line(line.as_ref());
        }
        self
    }

    /// Feed n lines (`ESC d n`).
    pub fn feed(&mut self, n: u8) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, b'd', n]);
        self
    }

    /// Bold on/off (`ESC E n`).
    pub fn bold(&mut self, on: bool) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, b'E', u8::from(on)]);
        self
    }

    /// Full cut (`GS V 0`).
    pub fn cut(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[GS, b'V', 0]);
        self
    }

    /// Raw bytes, no conversion.
    pub fn raw(&mut self, data: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(data);
        self
    }

    /// Current length in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Finishes the job.
    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

/// Full print job for a finished ticket: header commands, every line, cut.
///
/// The ticket already ends with its own blank feed lines, so no extra feed
/// is added before the cut.
pub fn ticket_job<I, S>(lines: I) -> Vec<u8>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = EscPosBuilder::new();
    builder.lines(lines).cut();
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_and_code_page() {
        let data = EscPosBuilder::new().build();
        assert_eq!(data, vec![0x1B, b'@', 0x1B, b't', 16]);
    }

    #[test]
    fn test_lines_are_encoded() {
        let mut b = EscPosBuilder::new();
        b.line("Sin Tomáte");
        let data = b.build();
        assert!(data.ends_with(b"Sin Tom\xE1te\n"));
    }

    #[test]
    fn test_ticket_job_ends_with_cut() {
        let data = ticket_job(["PAPUCHO FOODTRUCK", "", ""]);
        assert!(data.ends_with(&[b'\n', b'\n', 0x1D, b'V', 0]));
        assert_eq!(data.iter().filter(|&&b| b == b'\n').count(), 3);
    }

    #[test]
    fn test_bold_feed() {
        let mut b = EscPosBuilder::new();
        b.bold(true).text("X").bold(false).feed(3);
        let data = b.build();
        assert!(data.ends_with(&[0x1B, b'E', 1, b'X', 0x1B, b'E', 0, 0x1B, b'd', 3]));
    }
}
