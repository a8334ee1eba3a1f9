use std::collections::BTreeMap;

use indexmap::{IndexMap, IndexSet};
use log::debug;

use crate::source::Source;
use crate::table::SourceWord;
use crate::{SourceId, WordId};

/// The interned vocabulary of a corpus plus the initial source/word relation.
#[derive(Debug, Default)]
pub struct Vocabulary {
    /// word id to word text, for words that met the importance cutoff
    pub words: BTreeMap<WordId, String>,
    /// one row per (source, distinct word) pair that survived the cutoff
    pub relation: Vec<SourceWord>,
    /// distinct words seen across the corpus, counted before the cutoff
    pub distinct_words: usize,
}

/// Count how many sources contain each word and intern every word appearing
/// in at least `minimum_sources` of them. Duplicates inside one source count
/// once. Ids are handed out in first-appearance order, walking sources by
/// ascending id, so the same corpus always interns the same way.
pub fn index_sources(
    sources: &BTreeMap<SourceId, Source>,
    minimum_sources: usize,
) -> Vocabulary {
    let mut frequency: IndexMap<&str, usize> = IndexMap::new();
    for source in sources.values() {
        let distinct: IndexSet<&str> = source.words.iter().map(String::as_str).collect();
        for word in distinct {
            *frequency.entry(word).or_insert(0) += 1;
        }
    }

    let mut words: BTreeMap<WordId, String> = BTreeMap::new();
    let mut ids: IndexMap<&str, WordId> = IndexMap::new();
    let mut next_id: WordId = 1;
    for (word, count) in &frequency {
        if *count >= minimum_sources {
            ids.insert(*word, next_id);
            words.insert(next_id, (*word).to_string());
            next_id += 1;
        }
    }

    let mut relation: Vec<SourceWord> = Vec::new();
    let mut next_row: u32 = 1;
    for source in sources.values() {
        let distinct: IndexSet<&str> = source.words.iter().map(String::as_str).collect();
        for word in distinct {
            if let Some(&word_id) = ids.get(word) {
                relation.push(SourceWord {
                    source_word_id: next_row,
                    source_id: source.source_id,
                    word_id,
                    word: word.to_string(),
                    word_no_of_sources: frequency.get(word).copied().unwrap_or(0),
                });
                next_row += 1;
            }
        }
    }

    debug!(
        "interned {} of {} distinct words into {} source/word rows",
        words.len(),
        frequency.len(),
        relation.len()
    );

    Vocabulary {
        words,
        relation,
        distinct_words: frequency.len(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::index_sources;
    use crate::source::Source;
    use crate::SourceId;

    fn corpus(entries: Vec<(SourceId, Vec<&str>)>) -> BTreeMap<SourceId, Source> {
        entries
            .into_iter()
            .map(|(id, words)| (id, Source::new(id, words)))
            .collect()
    }

    #[test]
    fn test_duplicates_count_once_per_source() {
        let sources = corpus(vec![(1, vec!["storm", "storm", "surge"]), (2, vec!["storm"])]);
        let vocab = index_sources(&sources, 1);

        let storm = vocab.relation.iter().find(|r| r.word == "storm").unwrap();
        assert_eq!(2, storm.word_no_of_sources);
        // one row per source for "storm", not one per occurrence
        assert_eq!(2, vocab.relation.iter().filter(|r| r.word == "storm").count());
        assert_eq!(3, vocab.relation.len());
    }

    #[test]
    fn test_importance_cutoff() {
        let sources = corpus(vec![
            (1, vec!["flood", "levee"]),
            (2, vec!["flood"]),
            (3, vec!["flood", "rain"]),
        ]);
        let vocab = index_sources(&sources, 2);

        // "flood" is the only word shared by two sources
        assert_eq!(1, vocab.words.len());
        assert_eq!("flood", vocab.words.get(&1).unwrap());
        assert!(vocab.relation.iter().all(|r| r.word == "flood"));
        // the pre-cutoff distinct count still sees all three words
        assert_eq!(3, vocab.distinct_words);
    }

    #[test]
    fn test_ids_follow_first_appearance() {
        let sources = corpus(vec![(1, vec!["b", "a"]), (2, vec!["c", "a"])]);
        let vocab = index_sources(&sources, 1);

        // walking source 1 then source 2: b, a, c
        assert_eq!("b", vocab.words.get(&1).unwrap());
        assert_eq!("a", vocab.words.get(&2).unwrap());
        assert_eq!("c", vocab.words.get(&3).unwrap());
    }

    #[test]
    fn test_empty_corpus() {
        let vocab = index_sources(&BTreeMap::new(), 1);
        assert!(vocab.words.is_empty());
        assert!(vocab.relation.is_empty());
        assert_eq!(0, vocab.distinct_words);
    }
}
