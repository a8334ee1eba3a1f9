use libcanopy::hkt::Forest;
use tabled::{Table, Tabled};

#[derive(Default, Tabled)]
struct Summary {
    sources: usize,
    words: usize,
    relations: usize,
    trees: usize,
    nodes: usize,
}

/// Build a printable summary table for a computed forest.
pub fn gen_stats(forest: &Forest) -> String {
    let stats = &forest.stats;
    let summary = Summary {
        sources: stats.number_loaded,
        words: stats.number_of_words,
        relations: stats.update_source_word_relation_db,
        trees: stats.number_of_hkts,
        nodes: stats.number_of_nodes,
    };

    let stat_str = Table::new(vec![summary]).to_string();
    format!("\n{}\n", stat_str)
}

#[cfg(test)]
mod tests {
    use libcanopy::builder::TreeBuilder;
    use libcanopy::source::Source;

    use super::gen_stats;

    #[test]
    fn test_summary_table() {
        let forest = TreeBuilder::default()
            .build(vec![
                Source::new(1, vec!["a"]),
                Source::new(2, vec!["a", "b"]),
            ])
            .unwrap();
        let table = gen_stats(&forest);

        assert!(table.contains("sources"));
        assert!(table.contains("nodes"));
    }
}
