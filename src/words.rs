//! Word list the hosts draw secret words from

use rand::Rng;
use std::path::Path;

/// Errors that can occur while building the word bank
#[derive(Debug, thiserror::Error)]
pub enum WordBankError {
    #[error("failed to read word list {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("word list is empty")]
    Empty,
}

/// Anything that can hand out a secret word
pub trait WordSource: Send + Sync {
    /// Pick a word. Repeats across calls are allowed.
    fn pick(&self) -> String;

    /// Number of candidate words
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Immutable list of candidate words, never empty
#[derive(Debug, Clone)]
pub struct WordBank {
    words: Vec<String>,
}

impl WordBank {
    /// Build a bank from raw entries. Blank entries are dropped.
    pub fn new<I, S>(words: I) -> Result<Self, WordBankError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return Err(WordBankError::Empty);
        }
        Ok(Self { words })
    }

    /// Load a bank from a text file with one word per line
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WordBankError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| WordBankError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let bank = Self::new(contents.lines())?;
        tracing::info!(path = %path.display(), words = bank.len(), "Word list loaded");
        Ok(bank)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Pick a word using the given RNG
    pub fn pick_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.words[rng.random_range(0..self.words.len())].clone()
    }

    pub fn pick_random(&self) -> String {
        self.pick_with(&mut rand::rng())
    }
}

impl WordSource for WordBank {
    fn pick(&self) -> String {
        self.pick_random()
    }

    fn len(&self) -> usize {
        self.words.len()
    }
}
