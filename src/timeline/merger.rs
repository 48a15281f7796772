/*!
 * Folding short consecutive captions into readable blocks.
 *
 * Greedy, single look-ahead: while the block being built is shorter than the
 * threshold, the next entry is appended to it. The length checked is the
 * block's length before the append, never the combined length.
 */

use log::debug;

use crate::subtitle_processor::SubtitleEntry;

/// Default minimum block length in characters
pub const DEFAULT_MIN_CHARS: usize = 45;

/// Default separator placed between folded caption texts
pub const DEFAULT_JOIN_SEPARATOR: &str = " ";

// @struct: Block merger configuration
#[derive(Debug, Clone)]
pub struct SubtitleMerger {
    // @field: Blocks shorter than this absorb the next entry
    min_chars: usize,

    // @field: Inserted between folded texts
    separator: String,
}

impl Default for SubtitleMerger {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CHARS)
    }
}

impl SubtitleMerger {
    /// Merger joining texts with a single space
    pub fn new(min_chars: usize) -> Self {
        Self::with_separator(min_chars, DEFAULT_JOIN_SEPARATOR)
    }

    /// Merger with a custom join separator
    pub fn with_separator(min_chars: usize, separator: impl Into<String>) -> Self {
        Self {
            min_chars,
            separator: separator.into(),
        }
    }

    /// Minimum block length in characters
    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// Merge consecutive short entries
    ///
    /// Output order follows input order, each output block covers a
    /// contiguous run of input entries, and blocks are numbered `1..N`.
    pub fn merge(&self, entries: &[SubtitleEntry]) -> Vec<SubtitleEntry> {
        let Some((first, rest)) = entries.split_first() else {
            return Vec::new();
        };

        let mut merged = Vec::with_capacity(entries.len());
        let mut block = first.clone();
        let mut block_chars = block.char_len();

        for entry in rest {
            if block_chars < self.min_chars {
                if !block.text.is_empty() && !entry.text.is_empty() {
                    block.text.push_str(&self.separator);
                    block_chars += self.separator.chars().count();
                }
                block.text.push_str(&entry.text);
                block_chars += entry.char_len();
                block.end_time_ms = block.end_time_ms.max(entry.end_time_ms);
            } else {
                let finished = std::mem::replace(&mut block, entry.clone());
                merged.push(finished);
                block_chars = block.char_len();
            }
        }
        merged.push(block);

        for (i, entry) in merged.iter_mut().enumerate() {
            entry.seq_num = i + 1;
        }

        debug!(
            "Merged {} entries into {} blocks (min {} chars)",
            entries.len(),
            merged.len(),
            self.min_chars
        );

        merged
    }
}
