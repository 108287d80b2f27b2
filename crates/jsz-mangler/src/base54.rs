//! Character ordering for generated names.
//!
//! Names are numbered in a bijective base: the first character comes from
//! the 54 identifier-start characters, every further one from those plus the
//! ten digits. Ordering the alphabet by how often each character already
//! appears in the output makes the result compress better.

/// Identifier-start characters in their default order.
pub const LEADING: &[u8; 54] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ$_";
pub const DIGITS: &[u8; 10] = b"0123456789";

const SLOTS: usize = 64;

/// Slot of `byte` in the default order: leading characters, then digits.
fn slot(byte: u8) -> Option<usize> {
    match byte {
        b'a'..=b'z' => Some(usize::from(byte - b'a')),
        b'A'..=b'Z' => Some(26 + usize::from(byte - b'A')),
        b'$' => Some(52),
        b'_' => Some(53),
        b'0'..=b'9' => Some(54 + usize::from(byte - b'0')),
        _ => None,
    }
}

fn default_char(slot: usize) -> u8 {
    if slot < LEADING.len() {
        LEADING[slot]
    } else {
        DIGITS[slot - LEADING.len()]
    }
}

/// Occurrence counts of name characters in a piece of output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharFrequency {
    counts: [i64; SLOTS],
}

impl Default for CharFrequency {
    fn default() -> Self {
        CharFrequency { counts: [0; SLOTS] }
    }
}

impl CharFrequency {
    /// Count every name character of `text`.
    pub fn analyze(text: &str) -> CharFrequency {
        let mut frequency = CharFrequency::default();
        frequency.consider(text, 1);
        frequency
    }

    /// Add `delta` for every name character of `text`.
    pub fn consider(&mut self, text: &str, delta: i64) {
        for byte in text.bytes() {
            if let Some(slot) = slot(byte) {
                self.counts[slot] += delta;
            }
        }
    }

    pub fn count(&self, c: char) -> i64 {
        u8::try_from(c)
            .ok()
            .and_then(slot)
            .map_or(0, |slot| self.counts[slot])
    }

    /// Most frequent characters first; ties keep the default order.
    pub fn alphabet(&self) -> Alphabet {
        let mut leading: Vec<usize> = (0..LEADING.len()).collect();
        let mut digits: Vec<usize> = (LEADING.len()..SLOTS).collect();
        leading.sort_by_key(|&slot| std::cmp::Reverse(self.counts[slot]));
        digits.sort_by_key(|&slot| std::cmp::Reverse(self.counts[slot]));
        Alphabet {
            chars: leading.into_iter().chain(digits).map(default_char).collect(),
        }
    }
}

/// The 64 name characters in generation order; the first 54 are valid
/// leading characters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<u8>,
}

impl Default for Alphabet {
    fn default() -> Self {
        CharFrequency::default().alphabet()
    }
}

impl Alphabet {
    /// The `n`th name, counting from zero: `a`, `b`, ... `_`, `aa`, `ba`, ...
    pub fn name(&self, n: usize) -> String {
        let mut out = String::new();
        let mut rest = n + 1;
        let mut base = LEADING.len();
        loop {
            rest -= 1;
            out.push(char::from(self.chars[rest % base]));
            rest /= base;
            base = SLOTS;
            if rest == 0 {
                break;
            }
        }
        out
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.chars).unwrap_or_default()
    }
}
