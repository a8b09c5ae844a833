//! Word list for the mini-games and reference texts for practice mode.
//!
//! Both ship embedded as JSON and can be replaced by a file of the same shape.

use include_dir::{include_dir, Dir};
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ArcadeError, CorpusKind, Result};

static DATA_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/data");

const WORDS_FILE: &str = "words.json";
const PRACTICE_FILE: &str = "practice.json";

fn read_embedded<T: DeserializeOwned>(file_name: &str) -> Result<T> {
    let file = DATA_DIR
        .get_file(file_name)
        .ok_or_else(|| ArcadeError::MissingEmbeddedCorpus(file_name.to_string()))?;
    let contents = file
        .contents_utf8()
        .ok_or_else(|| ArcadeError::MissingEmbeddedCorpus(file_name.to_string()))?;
    Ok(serde_json::from_str(contents)?)
}

fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Shared, read-only word list targets are drawn from
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WordCorpus {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl WordCorpus {
    pub fn embedded() -> Result<Self> {
        read_embedded(WORDS_FILE)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        read_file(path.as_ref())
    }

    pub fn from_words<S: Into<String>>(name: &str, words: impl IntoIterator<Item = S>) -> Self {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        Self {
            name: name.to_string(),
            size: words.len() as u32,
            words,
        }
    }

    pub fn ensure_non_empty(&self) -> Result<()> {
        if self.words.is_empty() {
            return Err(ArcadeError::EmptyCorpus(CorpusKind::Words));
        }
        Ok(())
    }

    /// Uniformly random word
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&str> {
        self.words
            .choose(rng)
            .map(String::as_str)
            .ok_or(ArcadeError::EmptyCorpus(CorpusKind::Words))
    }
}

/// Reference texts for practice mode
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PracticeCorpus {
    pub name: String,
    pub size: u32,
    pub texts: Vec<String>,
}

impl PracticeCorpus {
    pub fn embedded() -> Result<Self> {
        read_embedded(PRACTICE_FILE)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        read_file(path.as_ref())
    }

    pub fn from_texts<S: Into<String>>(name: &str, texts: impl IntoIterator<Item = S>) -> Self {
        let texts: Vec<String> = texts.into_iter().map(Into::into).collect();
        Self {
            name: name.to_string(),
            size: texts.len() as u32,
            texts,
        }
    }

    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&str> {
        self.texts
            .choose(rng)
            .map(String::as_str)
            .ok_or(ArcadeError::EmptyCorpus(CorpusKind::PracticeTexts))
    }
}

/// Uniformly random lowercase ASCII letter
pub fn random_letter<R: Rng + ?Sized>(rng: &mut R) -> char {
    rng.gen_range(b'a'..=b'z') as char
}

/// Prepares raw custom text for practice: whitespace runs collapse to one
/// space and typographic quotes become their ASCII forms.
pub fn normalize_text(raw: &str) -> Result<String> {
    let text: String = raw
        .split_whitespace()
        .join(" ")
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            other => other,
        })
        .collect();

    if text.is_empty() {
        return Err(ArcadeError::EmptyText);
    }
    Ok(text)
}

/// Reads a plain-text file and normalises it for practice
pub fn load_custom_text(path: impl AsRef<Path>) -> Result<String> {
    let raw = fs::read_to_string(path)?;
    normalize_text(&raw)
}
