// ABOUTME: Streaming reader that drops control characters XML 1.0 forbids.
// ABOUTME: WordPress exports occasionally contain them and strict XML parsers reject the document.

use std::io::{self, Read};

/// Wraps a reader and removes C0 control bytes other than tab, newline and
/// carriage return. All other bytes pass through in order.
///
/// Every forbidden character is below 0x20, and UTF-8 never uses those
/// values inside a multi-byte sequence, so filtering byte by byte is safe.
#[derive(Debug)]
pub struct InvalidCharFilter<R> {
    inner: R,
    removed: u64,
}

impl<R: Read> InvalidCharFilter<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, removed: 0 }
    }

    /// Number of bytes dropped so far.
    pub fn removed(&self) -> u64 {
        self.removed
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

/// Returns true for bytes that may appear in an XML 1.0 document.
pub fn is_xml_char_byte(b: u8) -> bool {
    b >= 0x20 || b == b'\t' || b == b'\n' || b == b'\r'
}

impl<R: Read> Read for InvalidCharFilter<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            let n = self.inner.read(buf)?;
            if n == 0 {
                return Ok(0);
            }

            let mut kept = 0;
            for i in 0..n {
                let b = buf[i];
                if is_xml_char_byte(b) {
                    buf[kept] = b;
                    kept += 1;
                }
            }
            self.removed += (n - kept) as u64;

            // A chunk made only of control bytes is not end of stream.
            if kept > 0 {
                return Ok(kept);
            }
        }
    }
}
