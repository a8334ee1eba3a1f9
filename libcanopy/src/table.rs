use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;

use crate::{SourceId, WordId};

/// One row of the word-rank table: a (source, word) pairing annotated with
/// how many sources in the current scope contain the word.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceWord {
    pub source_word_id: u32,
    pub source_id: SourceId,
    pub word_id: WordId,
    pub word: String,
    pub word_no_of_sources: usize,
}

/// Insertion-ordered table of source/word rows, ranked so the most widely
/// shared word comes first. Rows keep the dense key assigned when the root
/// table was built; restriction and re-ranking never renumber them.
#[derive(Debug, Clone, Default)]
pub struct WordRankTable {
    rows: IndexMap<u32, SourceWord>,
}

impl WordRankTable {
    /// Rank the initial relation rows and assign keys 1..n in rank order.
    pub fn from_relation(mut rows: Vec<SourceWord>) -> Self {
        rows.sort_by(|a, b| {
            b.word_no_of_sources
                .cmp(&a.word_no_of_sources)
                .then(a.word_id.cmp(&b.word_id))
        });
        let rows = rows
            .into_iter()
            .zip(1u32..)
            .map(|(row, key)| (key, row))
            .collect();
        WordRankTable { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The highest-ranked row, i.e. the most widely shared word in scope.
    pub fn first(&self) -> Option<&SourceWord> {
        self.rows.values().next()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceWord> {
        self.rows.values()
    }

    /// Drop every row carrying `word_id`, keeping the order of the rest.
    pub fn remove_word(&mut self, word_id: WordId) {
        self.rows.retain(|_, row| row.word_id != word_id);
    }

    /// The sources containing `word_id` within this table.
    pub fn sources_of(&self, word_id: WordId) -> BTreeSet<SourceId> {
        self.rows
            .values()
            .filter(|row| row.word_id == word_id)
            .map(|row| row.source_id)
            .collect()
    }

    /// Every source with at least one row left in the table.
    pub fn source_ids(&self) -> BTreeSet<SourceId> {
        self.rows.values().map(|row| row.source_id).collect()
    }

    /// Copy out the rows belonging to `sources`, optionally dropping rows
    /// whose word appears in `exclude_words`. Keys carry over unchanged.
    pub fn restrict(
        &self,
        sources: &BTreeSet<SourceId>,
        exclude_words: Option<&BTreeSet<WordId>>,
    ) -> WordRankTable {
        let rows = self
            .rows
            .iter()
            .filter(|(_, row)| {
                sources.contains(&row.source_id)
                    && exclude_words.map_or(true, |words| !words.contains(&row.word_id))
            })
            .map(|(key, row)| (*key, row.clone()))
            .collect();
        WordRankTable { rows }
    }

    /// Recompute each row's source count from the rows actually present.
    pub fn recount(&mut self) {
        let mut counts: HashMap<WordId, usize> = HashMap::new();
        for row in self.rows.values() {
            *counts.entry(row.word_id).or_insert(0) += 1;
        }
        for row in self.rows.values_mut() {
            row.word_no_of_sources = counts.get(&row.word_id).copied().unwrap_or(0);
        }
    }

    /// Re-sort rows by descending source count, then ascending word id.
    pub fn rank(&mut self) {
        self.rows.sort_by(|_, a, _, b| {
            b.word_no_of_sources
                .cmp(&a.word_no_of_sources)
                .then(a.word_id.cmp(&b.word_id))
        });
    }
}
