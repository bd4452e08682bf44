use crate::core::homophones::HomophoneMap;
use crate::core::loader::FileLoader;
use crate::core::similarity::{
    auto_threshold, jaro_winkler, weighted_score, DEFAULT_ROW_THRESHOLD,
};
use crate::core::variants::generate_variants;
use crate::domain::model::{MatchMode, Row, SearchHit, Table};
use crate::utils::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    path: PathBuf,
    modified: Option<SystemTime>,
    keyword: String,
    mode: MatchMode,
    threshold_bits: u64,
}

/// Matches keywords against loaded tables, caching results per file.
pub struct TableSearcher {
    loader: FileLoader,
    homophones: HomophoneMap,
    cache: Mutex<HashMap<CacheKey, Vec<SearchHit>>>,
}

impl TableSearcher {
    pub fn new(loader: FileLoader, homophones: HomophoneMap) -> Self {
        Self {
            loader,
            homophones,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Threshold actually applied for `mode` when none is configured.
    pub fn effective_threshold(keyword: &str, mode: MatchMode, threshold: Option<f64>) -> f64 {
        threshold.unwrap_or_else(|| match mode {
            MatchMode::Row => DEFAULT_ROW_THRESHOLD,
            MatchMode::Cell => auto_threshold(keyword),
        })
    }

    /// Load `path` and search it. Results are cached by file modification
    /// time, so an edited file is searched again.
    pub fn search_file(
        &self,
        path: &Path,
        keyword: &str,
        mode: MatchMode,
        threshold: f64,
    ) -> Result<Vec<SearchHit>> {
        let key = CacheKey {
            path: path.to_path_buf(),
            modified: std::fs::metadata(path).and_then(|m| m.modified()).ok(),
            keyword: keyword.to_string(),
            mode,
            threshold_bits: threshold.to_bits(),
        };

        if let Some(hits) = self.cache.lock().ok().and_then(|c| c.get(&key).cloned()) {
            tracing::debug!("Cache hit: {}", path.display());
            return Ok(hits);
        }

        let table = self.loader.load(path)?;
        let hits = self.search_table(&table, keyword, mode, threshold);

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, hits.clone());
        }
        Ok(hits)
    }

    /// Search an already loaded table. Each row yields at most one hit.
    pub fn search_table(
        &self,
        table: &Table,
        keyword: &str,
        mode: MatchMode,
        threshold: f64,
    ) -> Vec<SearchHit> {
        if table.is_empty() {
            return Vec::new();
        }

        let variants: Vec<(String, String)> = generate_variants(keyword, &self.homophones)
            .into_iter()
            .map(|v| {
                let lowered = v.to_lowercase();
                (v, lowered)
            })
            .collect();

        let file = table
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| table.source.display().to_string());

        let mut hits = Vec::new();
        for (idx, row) in table.rows.iter().enumerate() {
            let matched = match mode {
                MatchMode::Row => match_row(row, &variants, threshold),
                MatchMode::Cell => match_cells(table, row, &variants, threshold),
            };

            if let Some((similarity, pattern, field)) = matched {
                hits.push(SearchHit {
                    file: file.clone(),
                    path: table.source.clone(),
                    sheet: row.sheet.clone(),
                    row: idx + 1,
                    content: table.row_content(row),
                    similarity,
                    pattern,
                    field,
                });
            }
        }

        tracing::debug!("{}: {} hits for '{}'", file, hits.len(), keyword);
        hits
    }
}

type Match = (f64, String, Option<String>);

/// Non-null cells joined by `|`, lowercased.
pub fn search_text(row: &Row) -> String {
    row.cells
        .iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("|")
        .to_lowercase()
}

/// First variant whose similarity to the whole row text reaches `threshold`.
fn match_row(row: &Row, variants: &[(String, String)], threshold: f64) -> Option<Match> {
    let text = search_text(row);
    if text.is_empty() {
        return None;
    }

    variants.iter().find_map(|(variant, lowered)| {
        let similarity = jaro_winkler(lowered, &text);
        (similarity >= threshold).then(|| (similarity, variant.clone(), None))
    })
}

/// Best weighted (cell, variant) pair of the row, if it reaches `threshold`.
fn match_cells(
    table: &Table,
    row: &Row,
    variants: &[(String, String)],
    threshold: f64,
) -> Option<Match> {
    let mut best: Option<(f64, &str, &str)> = None;

    for (header, cell) in table.headers.iter().zip(row.cells.iter()) {
        let Some(value) = cell else { continue };
        let value = value.to_lowercase();

        for (variant, lowered) in variants {
            let score = weighted_score(jaro_winkler(lowered, &value), header);
            if best.map_or(true, |(s, _, _)| score > s) {
                best = Some((score, variant.as_str(), header.as_str()));
            }
        }
    }

    best.filter(|(score, _, _)| *score >= threshold)
        .map(|(score, variant, header)| (score, variant.to_string(), Some(header.to_string())))
}
