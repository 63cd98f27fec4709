use crate::models::AnimeDocument;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct AnimeRecord {
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Genres", default)]
    genres: String,
    // Column name as it ships in the public dataset.
    #[serde(rename = "sypnopsis", alias = "synopsis", default)]
    synopsis: String,
}

/// Turns the anime CSV into documents ready for embedding.
pub struct AnimeDataLoader {
    whitespace: Regex,
}

impl AnimeDataLoader {
    pub fn new() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").expect("static regex"),
        }
    }

    pub fn load(&self, path: &Path) -> Result<Vec<AnimeDocument>> {
        log::info!("Loading anime data from {}", path.display());
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open anime data at {}", path.display()))?;
        let documents = self
            .load_from_reader(file)
            .with_context(|| format!("failed to parse anime data at {}", path.display()))?;
        log::info!("Loaded {} anime documents", documents.len());
        Ok(documents)
    }

    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<Vec<AnimeDocument>> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let mut documents = Vec::new();

        for (line, record) in csv_reader.deserialize::<AnimeRecord>().enumerate() {
            // Header is line 1.
            let record = record.with_context(|| format!("bad record on line {}", line + 2))?;
            let title = self.clean_text(&record.name);
            if title.is_empty() {
                continue;
            }
            let synopsis = self.clean_text(&record.synopsis);
            let genres = self.clean_text(&record.genres);

            documents.push(AnimeDocument {
                id: Uuid::new_v4().to_string(),
                content: format!("Title: {title} Overview: {synopsis} Genres: {genres}"),
                title,
            });
        }

        Ok(documents)
    }

    fn clean_text(&self, text: &str) -> String {
        self.whitespace.replace_all(text.trim(), " ").into_owned()
    }
}

impl Default for AnimeDataLoader {
    fn default() -> Self {
        Self::new()
    }
}
