use std::io::{self, BufRead};

/// Splits the input into a command character and an integer key, the way a stream extraction
/// of `char` then `int` would: ASCII whitespace (including newlines) between tokens is skipped
/// and a key may directly follow its command (`i5`).
///
/// Input is tokenized as bytes, so undecodable bytes only matter once scanning reaches them.
pub(crate) struct Scanner<R> {
    reader: R,
    line: Vec<u8>,
    pos: usize,
}

impl<R: BufRead> Scanner<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            pos: 0,
        }
    }

    /// Next non-whitespace character, or `None` at end of input. Bytes that do not start a valid
    /// UTF-8 character also end the input.
    pub(crate) fn next_command(&mut self) -> io::Result<Option<char>> {
        if !self.skip_whitespace()? {
            return Ok(None);
        }
        let command = self.line[self.pos..]
            .utf8_chunks()
            .next()
            .and_then(|chunk| chunk.valid().chars().next());
        match command {
            Some(command) => self.pos += command.len_utf8(),
            None => tracing::debug!("input is not valid UTF-8, stopping"),
        }
        Ok(command)
    }

    /// Next signed 32-bit decimal integer. `None` if input ends or the next token is not a
    /// valid key; nothing is consumed in that case.
    pub(crate) fn next_key(&mut self) -> io::Result<Option<i32>> {
        if !self.skip_whitespace()? {
            return Ok(None);
        }
        let rest = &self.line[self.pos..];
        let sign = usize::from(matches!(rest.first(), Some(b'+' | b'-')));
        let digits = rest[sign..].iter().take_while(|b| b.is_ascii_digit()).count();
        let token = &rest[..sign + digits];
        let key = std::str::from_utf8(token).ok().and_then(|token| token.parse::<i32>().ok());
        if key.is_some() {
            self.pos += token.len();
        }
        Ok(key)
    }

    /// Advances to the next non-whitespace byte, reading lines as needed. Returns `false` at end
    /// of input.
    fn skip_whitespace(&mut self) -> io::Result<bool> {
        loop {
            let skipped = self.line[self.pos..].iter().take_while(|&&b| is_space(b)).count();
            self.pos += skipped;
            if self.pos < self.line.len() {
                return Ok(true);
            }

            self.line.clear();
            self.pos = 0;
            if self.reader.read_until(b'\n', &mut self.line)? == 0 {
                return Ok(false);
            }
        }
    }
}

/// Whitespace skipped between tokens. Unlike `u8::is_ascii_whitespace`, this includes vertical tab.
fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}
