use crate::error::IngestError;

/// Fixed-size, fixed-overlap splitting policy. Separators are tried in
/// priority order when looking for a cut point inside each window.
#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
    pub separators: Vec<char>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1_000,
            overlap: 200,
            separators: vec![' ', ',', '\n'],
        }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.chunk_size == 0 {
            return Err(IngestError::InvalidChunkConfig(
                "chunk_size must be positive".to_string(),
            ));
        }
        if self.overlap >= self.chunk_size {
            return Err(IngestError::InvalidChunkConfig(format!(
                "overlap {} must be smaller than chunk_size {}",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Splits the corpus into chunks of at most `chunk_size` characters where
/// the final `overlap` characters of each chunk reappear as the leading
/// characters of the next one.
///
/// Each window is cut at the latest occurrence of the highest-priority
/// separator that still clears the overlap region, so the walk always
/// advances; a window without a usable separator is hard-cut at
/// `chunk_size`. Stripping the first `overlap` characters of every chunk
/// after the first and concatenating reconstructs the corpus exactly.
pub fn split_corpus(corpus: &str, config: &ChunkingConfig) -> Result<Vec<String>, IngestError> {
    config.validate()?;

    let chars: Vec<char> = corpus.chars().collect();
    if chars.is_empty() {
        return Ok(Vec::new());
    }
    if chars.len() <= config.chunk_size {
        return Ok(vec![corpus.to_string()]);
    }

    let mut chunks = Vec::new();
    let mut start = 0usize;

    loop {
        let window_end = (start + config.chunk_size).min(chars.len());
        if window_end == chars.len() {
            chunks.push(chars[start..].iter().collect());
            break;
        }

        let cut = cut_position(&chars, start, window_end, config);
        chunks.push(chars[start..cut].iter().collect());
        start = cut - config.overlap;
    }

    Ok(chunks)
}

/// Latest index in `(start + overlap, window_end]` whose preceding
/// character is a separator, preferring earlier entries of the separator
/// list. The separator stays at the tail of the left chunk.
fn cut_position(chars: &[char], start: usize, window_end: usize, config: &ChunkingConfig) -> usize {
    let floor = start + config.overlap + 1;

    for separator in &config.separators {
        let mut position = window_end;
        while position >= floor {
            if chars[position - 1] == *separator {
                return position;
            }
            position -= 1;
        }
    }

    window_end
}
