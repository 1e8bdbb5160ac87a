//! Positional transcript chunking.
//!
//! Splits raw transcript text into overlapping fixed-size windows for
//! embedding. Purely positional over codepoints: no normalization, no
//! sentence-boundary awareness. Overlap keeps a sentence that straddles a
//! boundary retrievable from at least one window.

use crate::error::{Result, StemmeError};

/// Default window size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// Default overlap between consecutive windows.
pub const DEFAULT_OVERLAP: usize = 200;

/// Fixed-size overlapping window chunker.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    size: usize,
    overlap: usize,
}

impl Chunker {
    /// Create a chunker, validating that the window advances.
    ///
    /// `overlap` must be strictly less than `size`, otherwise the window
    /// start would never move forward.
    pub fn new(size: usize, overlap: usize) -> Result<Self> {
        if size == 0 {
            return Err(StemmeError::InvalidInput(
                "chunk size must be at least 1".to_string(),
            ));
        }
        if overlap >= size {
            return Err(StemmeError::InvalidInput(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                overlap, size
            )));
        }
        Ok(Self { size, overlap })
    }

    /// Window size in characters.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Overlap between consecutive windows.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// How far each window start advances.
    pub fn step(&self) -> usize {
        self.size - self.overlap
    }

    /// Split text into overlapping windows.
    ///
    /// Windows start at `0, step, 2*step, ...` and span `[start, start+size)`
    /// clipped to the text length; iteration stops once `start >= len`. The
    /// final window may be shorter than `size` (down to a single trailing
    /// overlap remnant). Empty input yields an empty iterator. Each call
    /// returns a fresh, restartable iterator.
    pub fn chunk(&self, text: &str) -> Chunks {
        Chunks {
            chars: text.chars().collect(),
            start: 0,
            size: self.size,
            step: self.step(),
        }
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

/// Lazy iterator over chunk windows. Operates on codepoints so multi-byte
/// text never splits inside a character.
pub struct Chunks {
    chars: Vec<char>,
    start: usize,
    size: usize,
    step: usize,
}

impl Iterator for Chunks {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.start >= self.chars.len() {
            return None;
        }
        let end = (self.start + self.size).min(self.chars.len());
        let chunk: String = self.chars[self.start..end].iter().collect();
        self.start += self.step;
        Some(chunk)
    }
}
