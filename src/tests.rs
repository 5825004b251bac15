#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;

    use itertools::Itertools;
    use proptest::prelude::*;

    use crate::decode::{decode, decode_words, split_lines, Encoding};
    use crate::encoder::partition;
    use crate::{
        extract, read_words, Alphabet, AlphabetError, ConfigInvalidReason, ConstraintGraph, EncoderBuilder,
        ExtractionFailure, ExtractionReport, MapperError, Mode, OrderExtractor, ReadError, SubstitutionTable,
        Symbol, TieBreak, MAX_PAIN_PREFIX,
    };

    fn alphabet(symbols: &str) -> Alphabet {
        Alphabet::new(symbols.chars()).unwrap()
    }

    fn position(order: &[Symbol], symbol: Symbol) -> usize {
        order.iter().position(|s| *s == symbol).unwrap()
    }

    fn assert_before(order: &[Symbol], before: Symbol, after: Symbol) {
        assert!(
            position(order, before) < position(order, after),
            "{:?} should precede {:?} in {:?}",
            before,
            after,
            order
        );
    }

    #[test]
    fn classic_dictionary() {
        let words = ["wrt", "wrf", "er", "ett", "rftt"];
        let order = extract(&words).unwrap();
        assert_eq!(order.iter().collect::<String>(), "wertf");

        let graph = OrderExtractor::constraint_graph(&words).unwrap();
        assert_eq!(graph.edge_count(), 4);
        for (before, after) in graph.constraints() {
            assert_before(&order, before, after);
        }
    }

    #[test]
    fn prefix_followed_by_longer_word() {
        assert_eq!(extract(&["ab", "abcd"]), Ok(vec!['a', 'b', 'c', 'd']));
    }

    #[test]
    fn longer_word_followed_by_prefix() {
        assert_eq!(
            extract(&["xy", "abcd", "ab"]),
            Err(ExtractionFailure::PrefixInvalid {
                index: 1,
                longer: "abcd".to_owned(),
                shorter: "ab".to_owned(),
            })
        );
    }

    #[test]
    fn cyclic_constraints() {
        let failure = extract(&["z", "x", "z"]).unwrap_err();
        assert_eq!(failure, ExtractionFailure::Cycle { unresolved: vec!['x', 'z'] });
        assert_eq!(failure.to_string(), "constraints are cyclic; unresolved symbols: {x, z}");
    }

    #[test]
    fn trivial_inputs() {
        assert_eq!(extract(&["a"]), Ok(vec!['a']));
        assert_eq!(extract(&["a", "a", "a"]), Ok(vec!['a']));
        assert_eq!(extract::<&str>(&[]), Ok(vec![]));
        assert_eq!(extract(&["", ""]), Ok(vec![]));
    }

    #[test]
    fn tie_break() {
        // b and a are both ready at the start, c waits on a
        let words = ["ba", "bc"];
        let ascending = OrderExtractor::new(TieBreak::Ascending).extract(&words).unwrap();
        let insertion = OrderExtractor::new(TieBreak::Insertion).extract(&words).unwrap();
        assert_eq!(ascending, vec!['a', 'b', 'c']);
        assert_eq!(insertion, vec!['b', 'a', 'c']);

        assert_eq!("INSERTION".parse::<TieBreak>().unwrap(), TieBreak::Insertion);
        assert_eq!(TieBreak::default().to_string(), "ascending");
    }

    #[test]
    fn extraction_is_deterministic() {
        let words = ["bca", "bcd", "ab", "aa", "dx", "dq", "c"];
        let first = OrderExtractor::default().extract(&words);
        for _ in 0..10 {
            assert_eq!(OrderExtractor::default().extract(&words), first);
        }
    }

    #[test]
    fn agrees_with_petgraph_toposort() {
        let words = ["wrt", "wrf", "er", "ett", "rftt"];
        let graph = OrderExtractor::constraint_graph(&words).unwrap();
        let sorted = petgraph::algo::toposort(graph.as_graph_map(), None).unwrap();
        assert_eq!(sorted.len(), graph.vertex_count());
        // a single chain, so there is only one topological order
        assert_eq!(sorted, extract(&words).unwrap());

        let cyclic = OrderExtractor::constraint_graph(&["z", "x", "z"]).unwrap();
        assert!(petgraph::algo::toposort(cyclic.as_graph_map(), None).is_err());
        assert!(cyclic.into_order(TieBreak::Ascending).is_err());
    }

    #[test]
    fn repeated_constraint_counts_once() {
        let graph = OrderExtractor::constraint_graph(&["a", "b", "ba", "bb"]).unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.indegree('b'), Some(1));
        assert_eq!(graph.indegree('a'), Some(0));
        assert_eq!(graph.indegree('q'), None);

        let mut graph = ConstraintGraph::new();
        assert!(graph.add_constraint('x', 'y'));
        assert!(!graph.add_constraint('x', 'y'));
        assert_eq!(graph.indegree('y'), Some(1));
        assert!(graph.contains_constraint('x', 'y'));
        assert!(!graph.contains_constraint('y', 'x'));
        assert_eq!(graph.into_order(TieBreak::Ascending), Ok(vec!['x', 'y']));
    }

    #[test]
    fn symbols_without_constraints_are_vertices() {
        let graph = OrderExtractor::constraint_graph(&["mn", "mo", "pqr"]).unwrap();
        assert_eq!(graph.symbols().collect::<String>(), "mnopqr");
        assert_eq!(graph.constraints().collect_vec(), vec![('n', 'o'), ('m', 'p')]);
    }

    #[test]
    fn alphabet_parsing() {
        assert_eq!(Alphabet::parse("a\nb\n\nc\n").unwrap().symbols(), &['a', 'b', 'c']);
        assert_eq!(Alphabet::parse("\u{feff}a\r\nb").unwrap().symbols(), &['a', 'b']);
        assert_eq!(Alphabet::parse("a\n \nb").unwrap().symbols(), &['a', ' ', 'b']);

        assert!(matches!(Alphabet::parse("a\nbc\n"), Err(AlphabetError::MultiSymbolLine { line: 2, .. })));
        assert!(matches!(
            Alphabet::parse("a\nb\na\n"),
            Err(AlphabetError::DuplicateSymbol { symbol: 'a', first_line: 1, line: 3 })
        ));
        assert!(matches!(Alphabet::parse("\n\n"), Err(AlphabetError::Empty)));
        assert!(matches!(
            Alphabet::new("xyx".chars()),
            Err(AlphabetError::DuplicateSymbol { symbol: 'x', first_line: 1, line: 3 })
        ));
    }

    #[test]
    fn alien_lexicographic_order() {
        let alphabet = alphabet("zyx");
        let mut words = vec!["x".to_owned(), "zy".to_owned(), "z".to_owned(), "y".to_owned()];
        alphabet.sort_words(&mut words);
        assert_eq!(words, vec!["z", "zy", "y", "x"]);
        assert!(alphabet.is_sorted(&words));
        assert!(!alphabet.is_sorted(&["x", "z"]));
        assert_eq!(alphabet.rank('y'), Some(1));
    }

    #[test]
    fn code_point_ranges() {
        assert_eq!(Alphabet::from_code_points(0x61..=0x65).symbols(), &['a', 'b', 'c', 'd', 'e']);
        assert_eq!(Alphabet::from_code_points(0x09..=0x0E).symbols(), &['\t', '\u{0e}']);
        // surrogates are skipped
        assert_eq!(Alphabet::from_code_points(0xD7FF..=0xE000).len(), 2);

        let printable = Alphabet::from_code_points(0x20..=0x7E);
        assert_eq!(Alphabet::parse(&printable.to_string()).unwrap(), printable);
    }

    #[test]
    fn alphabet_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alphabet.txt");
        fs::write(&path, "q\nw\ne\n").unwrap();
        assert_eq!(Alphabet::read(&path).unwrap(), alphabet("qwe"));

        fs::write(&path, b"a\n\xFF\n").unwrap();
        assert!(matches!(Alphabet::read(&path), Err(AlphabetError::NotUtf8)));

        assert!(matches!(
            Alphabet::read(dir.path()),
            Err(AlphabetError::Read(ReadError::IsADirectory { .. }))
        ));
        assert!(matches!(
            Alphabet::read(dir.path().join("missing.txt")),
            Err(AlphabetError::Read(ReadError::NotFound { .. }))
        ));
    }

    #[test]
    fn blank_lines_are_counted() {
        let (words, stats) = decode_words(b"abc\n\nde\n  \n f \n");
        assert_eq!(words, vec!["abc", "de", " f "]);
        assert_eq!(stats.encoding, Encoding::Utf8Sig);
        assert_eq!(stats.total_lines, 5);
        assert_eq!(stats.kept_lines, 3);
        assert_eq!(stats.skipped_blank, 2);
        assert_eq!(stats.unique_symbols.iter().collect::<String>(), " abcdef");
    }

    #[test]
    fn byte_order_marks() {
        let (words, _) = decode_words(b"\xEF\xBB\xBFab\ncd");
        assert_eq!(words, vec!["ab", "cd"]);

        let mut little = vec![0xFF, 0xFE];
        little.extend("ab\ncd".encode_utf16().flat_map(u16::to_le_bytes));
        let (words, stats) = decode_words(&little);
        assert_eq!(words, vec!["ab", "cd"]);
        assert_eq!(stats.encoding, Encoding::Utf16);

        let mut big = vec![0xFE, 0xFF];
        big.extend("ab\ncd".encode_utf16().flat_map(u16::to_be_bytes));
        let (words, stats) = decode_words(&big);
        assert_eq!(words, vec!["ab", "cd"]);
        assert_eq!(stats.encoding, Encoding::Utf16);

        // a stray mark at the start of a later line
        let (words, _) = decode_words("a\n\u{feff}b".as_bytes());
        assert_eq!(words, vec!["a", "b"]);
    }

    #[test]
    fn encoding_ladder() {
        assert_eq!(decode(&[0xFF]), ("\u{ff}".to_owned(), Encoding::Latin1));
        assert_eq!(Encoding::Utf8Lossy.decode(b"a\xFFb"), Some("a\u{fffd}b".to_owned()));
        assert_eq!(Encoding::Utf8.decode(b"a\xFFb"), None);
        assert_eq!(Encoding::Utf32Be.decode(&[0, 0, 0, 0x61]), Some("a".to_owned()));
        assert_eq!(Encoding::Utf16Le.decode(&[0x61]), None);
        assert_eq!("utf-16-be".parse::<Encoding>().unwrap(), Encoding::Utf16Be);
        assert_eq!(Encoding::Utf8Lossy.to_string(), "utf-8(replace)");
    }

    #[test]
    fn unicode_line_separators() {
        let text = "a\u{2028}b\u{85}c\r\nd\re\u{0b}f\n";
        assert_eq!(split_lines(text).collect_vec(), vec!["a", "b", "c", "d", "e", "f"]);
        assert_eq!(split_lines("a\n\nb").collect_vec(), vec!["a", "", "b"]);
        assert_eq!(split_lines("").count(), 0);
    }

    #[test]
    fn word_list_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        fs::write(&path, "ba\nbc\n").unwrap();

        let (words, stats) = read_words(&path).unwrap();
        assert_eq!(words, vec!["ba", "bc"]);
        assert!(stats.to_string().contains("# Set of unique symbols (non-ordered): {a, b, c}\n"));

        assert!(matches!(read_words(dir.path().join("nope")), Err(ReadError::NotFound { .. })));
    }

    #[test]
    fn invalid_configs() {
        let reasons = |builder: &EncoderBuilder| builder.build().unwrap_err().reasons().to_vec();

        let empty = Alphabet::new([]).unwrap();
        assert_eq!(reasons(&EncoderBuilder::new(empty)), vec![ConfigInvalidReason::EmptyAlphabet]);

        let mut builder = EncoderBuilder::new(alphabet("abc"));
        builder.word_len(0, 4);
        assert_eq!(builder.is_valid(), Some(&vec![ConfigInvalidReason::ZeroMinLength]));
        // later setters do nothing
        builder.word_len(2, 4).filler('z');
        assert_eq!(reasons(&builder), vec![ConfigInvalidReason::ZeroMinLength]);

        let mut builder = EncoderBuilder::new(alphabet("abc"));
        builder.word_len(5, 3);
        assert_eq!(reasons(&builder), vec![ConfigInvalidReason::LengthBounds { min: 5, max: 3 }]);

        let mut builder = EncoderBuilder::new(alphabet("abc"));
        builder.filler('z');
        assert_eq!(reasons(&builder), vec![ConfigInvalidReason::FillerNotInAlphabet('z')]);

        let mut builder = EncoderBuilder::new(alphabet("abc"));
        builder.noise_ratio(1.5);
        assert!(matches!(
            reasons(&builder)[..],
            [ConfigInvalidReason::ProbabilityOutOfRange { name: "noise ratio", .. }]
        ));

        let mut builder = EncoderBuilder::new(alphabet("abc"));
        builder.mode(Mode::Ambiguous);
        assert!(builder.is_valid().is_none());
        assert_eq!(reasons(&builder), vec![ConfigInvalidReason::MissingEnforcePrefix]);
        builder.enforce_prefix(4);
        assert!(matches!(
            reasons(&builder)[..],
            [ConfigInvalidReason::OutOfRange { name: "enforce-prefix", requested: 4, .. }]
        ));
        builder.enforce_prefix(3);
        assert!(builder.build().is_ok());

        let mut builder = EncoderBuilder::new(alphabet("abc"));
        builder.mode(Mode::Adversarial).clusters(0).enforce_global(9);
        assert!(matches!(
            reasons(&builder)[..],
            [
                ConfigInvalidReason::OutOfRange { name: "clusters", requested: 0, .. },
                ConfigInvalidReason::OutOfRange { name: "enforce-global", requested: 9, .. },
            ]
        ));
        builder.clusters(4).enforce_global(0);
        assert!(matches!(reasons(&builder)[..], [ConfigInvalidReason::OutOfRange { name: "clusters", .. }]));

        let mut builder = EncoderBuilder::new(alphabet("abc"));
        builder.pain_prefix(usize::MAX);
        assert!(matches!(
            reasons(&builder)[..],
            [ConfigInvalidReason::OutOfRange { name: "pain-prefix", requested: usize::MAX, .. }]
        ));
        let mut builder = EncoderBuilder::new(alphabet("abc"));
        builder.pain_prefix(MAX_PAIN_PREFIX).word_count(2);
        assert!(builder.build().is_ok());
    }

    #[test]
    fn default_config() {
        let encoder = EncoderBuilder::new(alphabet("xyz")).build().unwrap();
        let config = encoder.config();
        assert_eq!(config.word_count(), 1000);
        assert_eq!(config.word_len(), (3, 10));
        assert_eq!(config.seed(), 0);
        assert_eq!(config.mode(), Mode::Unique);
        assert_eq!(config.filler(), 'x');
        assert_eq!(config.pain_prefix_len(), 0);
        assert_eq!(config.adversarial().clusters, 8);
        assert_eq!("Adversarial".parse::<Mode>().unwrap(), Mode::Adversarial);
    }

    #[test]
    fn zero_words() {
        let encoder = EncoderBuilder::new(alphabet("abc")).word_count(0).build().unwrap();
        assert!(encoder.encode().is_empty());

        // mode parameters are not needed when nothing is generated
        let encoder = EncoderBuilder::new(alphabet("abc")).mode(Mode::Ambiguous).word_count(0).build().unwrap();
        assert!(encoder.encode().is_empty());
        let mut builder = EncoderBuilder::new(alphabet("abc"));
        builder.mode(Mode::Adversarial).clusters(0).word_count(0);
        assert!(builder.build().unwrap().encode().is_empty());
    }

    #[test]
    fn unique_round_trip() {
        let alphabet = alphabet("qwertyuiop");
        let encoder = EncoderBuilder::new(alphabet.clone()).word_count(300).seed(7).build().unwrap();
        let words = encoder.encode();
        assert_eq!(words.len(), 300);
        assert!(alphabet.is_sorted(&words));
        assert!(words.iter().all(|word| (3..=10).contains(&word.chars().count())));
        assert_eq!(extract(&words).unwrap(), alphabet.symbols());
    }

    #[test]
    fn unique_backbone_is_a_chain() {
        let alphabet = alphabet("mnbvc");
        let encoder = EncoderBuilder::new(alphabet.clone()).build().unwrap();
        let mut backbone = encoder.backbone();
        alphabet.sort_words(&mut backbone);

        let graph = OrderExtractor::constraint_graph(&backbone).unwrap();
        assert_eq!(graph.edge_count(), 4);
        assert!(alphabet.symbols().iter().tuple_windows().all(|(a, b)| graph.contains_constraint(*a, *b)));
    }

    #[test]
    fn deep_first_difference() {
        let alphabet = alphabet("abcdef");
        let encoder = EncoderBuilder::new(alphabet.clone())
            .word_count(50)
            .word_len(2, 4)
            .filler('c')
            .pain_prefix(12)
            .build()
            .unwrap();

        for word in encoder.backbone() {
            assert_eq!(word.chars().count(), 13);
            assert!(word.starts_with(&"c".repeat(12)));
        }
        assert_eq!(extract(&encoder.encode()).unwrap(), alphabet.symbols());
    }

    #[test]
    fn undersized_request_keeps_backbone() {
        let encoder = EncoderBuilder::new(alphabet("abcdefgh")).word_count(3).build().unwrap();
        let words = encoder.encode();
        assert_eq!(words.len(), 14);
        assert_eq!(extract(&words).unwrap().iter().collect::<String>(), "abcdefgh");
    }

    #[test]
    fn generation_is_deterministic() {
        let mut builder = EncoderBuilder::new(alphabet("abcdefghij"));
        builder.mode(Mode::Adversarial).clusters(3).word_count(400).seed(99);
        assert_eq!(builder.build().unwrap().encode(), builder.build().unwrap().encode());

        builder.mode(Mode::Unique);
        assert_eq!(builder.build().unwrap().encode(), builder.build().unwrap().encode());
    }

    #[test]
    fn ambiguous_round_trip() {
        let alphabet = alphabet("0123456789");
        let encoder = EncoderBuilder::new(alphabet.clone())
            .mode(Mode::Ambiguous)
            .enforce_prefix(3)
            .word_count(100)
            .build()
            .unwrap();

        let order = extract(&encoder.encode()).unwrap();
        assert_eq!(order.iter().copied().sorted().collect_vec(), alphabet.symbols());
        assert_before(&order, '0', '1');
        assert_before(&order, '1', '2');
    }

    #[test]
    fn ambiguous_without_enforced_prefix() {
        let alphabet = alphabet("abcdefghijklmnop");
        let encoder = EncoderBuilder::new(alphabet.clone())
            .mode(Mode::Ambiguous)
            .enforce_prefix(0)
            .word_len(3, 5)
            .word_count(40)
            .build()
            .unwrap();

        let backbone = encoder.backbone();
        let graph = OrderExtractor::constraint_graph(&backbone).unwrap();
        assert_eq!(backbone.len(), 1);
        assert_eq!(graph.edge_count(), 0);

        // carriers still bring every symbol into the vertex set
        let order = extract(&encoder.encode()).unwrap();
        assert_eq!(order.len(), alphabet.len());
    }

    #[test]
    fn carriers_exceed_small_requests() {
        let alphabet = alphabet("abcdefghij");
        let words = EncoderBuilder::new(alphabet.clone())
            .mode(Mode::Ambiguous)
            .enforce_prefix(3)
            .word_count(4)
            .build()
            .unwrap()
            .encode();

        assert!(words.len() > 4);
        let order = extract(&words).unwrap();
        assert_eq!(order.len(), alphabet.len());
        assert_before(&order, 'a', 'b');
        assert_before(&order, 'b', 'c');
    }

    #[test]
    fn cluster_partition() {
        let symbols = ['a', 'b', 'c', 'd', 'e', 'f', 'g'];
        let sizes = |k| partition(&symbols, k).iter().map(|cluster| cluster.len()).collect_vec();
        assert_eq!(sizes(3), vec![3, 2, 2]);
        assert_eq!(sizes(7), vec![1; 7]);
        assert_eq!(sizes(1), vec![7]);
        assert_eq!(partition(&symbols, 2)[1], &['e', 'f', 'g']);
    }

    #[test]
    fn adversarial_round_trip() {
        let alphabet = Alphabet::from_code_points(0x41..=0x68);
        let symbols = alphabet.symbols();
        let encoder = EncoderBuilder::new(alphabet.clone())
            .mode(Mode::Adversarial)
            .clusters(4)
            .enforce_global(2)
            .enforce_per_cluster(3)
            .inter_cluster_pairs(1)
            .pain_prefix(8)
            .word_count(500)
            .seed(3)
            .build()
            .unwrap();

        let words = encoder.encode();
        assert!(alphabet.is_sorted(&words));
        let order = extract(&words).unwrap();

        assert_before(&order, symbols[0], symbols[1]);
        for cluster in partition(symbols, 4) {
            assert_before(&order, cluster[0], cluster[1]);
            assert_before(&order, cluster[1], cluster[2]);
        }
        for (left, right) in partition(symbols, 4).iter().tuple_windows() {
            assert_before(&order, left[left.len() - 1], right[0]);
        }
    }

    #[test]
    fn adversarial_edges_do_not_grow_with_volume() {
        let constraints = |builder: &EncoderBuilder, count| {
            let words = builder.clone().word_count(count).build().unwrap().encode();
            OrderExtractor::constraint_graph(&words).unwrap().constraints().sorted().collect_vec()
        };

        // default profile, with room for spiced tails
        let mut builder = EncoderBuilder::new(Alphabet::from_code_points(0x61..=0x7A));
        builder.mode(Mode::Adversarial).pain_prefix(6).seed(5);
        let small = constraints(&builder, 2_000);
        assert_eq!(small, constraints(&builder, 20_000));
        assert!(small.len() < 26);

        // what the command line generates by default
        let mut builder = EncoderBuilder::new(Alphabet::from_code_points(0x61..=0x7A));
        builder
            .mode(Mode::Adversarial)
            .pain_prefix(64)
            .clusters(16)
            .enforce_per_cluster(8)
            .noise_ratio(0.90)
            .inter_cluster_pairs(1);
        let small = constraints(&builder, 2_000);
        assert_eq!(small, constraints(&builder, 20_000));
        assert!(small.len() < 26);
    }

    #[test]
    fn substitution_tables() {
        let table = SubstitutionTable::parse("a\tx\nb\t\n\nc\tyz\n").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get('b'), Some(""));
        assert_eq!(table.map_str("abcd"), "xyzd");
        assert_eq!(SubstitutionTable::parse(&table.to_string()).unwrap(), table);

        assert!(matches!(SubstitutionTable::parse("a x"), Err(MapperError::MissingTab { line: 1 })));
        assert!(matches!(
            SubstitutionTable::parse("a\tb\nab\tx"),
            Err(MapperError::MultiSymbolSource { line: 2, .. })
        ));
        assert!(matches!(
            SubstitutionTable::parse("a\tx\na\ty"),
            Err(MapperError::DuplicateSource { line: 2, symbol: 'a' })
        ));
    }

    #[test]
    fn substitution_from_orders() {
        let table = SubstitutionTable::from_orders(&['w', 'e', 'r'], &alphabet("abc")).unwrap();
        let mut output = Vec::new();
        table.map_stream(Cursor::new("wer\r\nrew\nq"), &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "abc\r\ncba\nq");

        assert!(matches!(
            SubstitutionTable::from_orders(&['w'], &alphabet("ab")),
            Err(MapperError::LengthMismatch { inferred: 1, target: 2 })
        ));
    }

    #[test]
    fn solved_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictionary.txt");
        fs::write(&path, "wrt\nwrf\ner\nett\nrftt\n").unwrap();

        let report = ExtractionReport::solve(&path, &OrderExtractor::default()).unwrap();
        assert!(report.is_solved());
        let text = report.to_string();
        assert!(text.starts_with(
            "# Ordered sequence:\nwertf\n\n# Encoding of the file: utf-8-sig\n# Total number of lines: 5\n"
        ));
        assert!(text.ends_with(&format!("\n\n{}\n\n", "-".repeat(50))));
    }

    #[test]
    fn unsolvable_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictionary.txt");
        fs::write(&path, "z\nx\nz\n").unwrap();

        let report = ExtractionReport::solve(&path, &OrderExtractor::default()).unwrap();
        assert!(!report.is_solved());
        assert!(report.to_string().starts_with("# No valid order: constraints are cyclic"));

        assert!(matches!(
            ExtractionReport::solve(dir.path().join("missing"), &OrderExtractor::default()),
            Err(ReadError::NotFound { .. })
        ));
    }

    fn distinct_symbols() -> impl Strategy<Value = Vec<Symbol>> {
        prop::collection::hash_set(prop::char::range('a', 'z'), 2..12).prop_map(|set| set.into_iter().collect())
    }

    proptest! {
        #[test]
        fn unique_mode_recovers_alphabet(symbols in distinct_symbols(), seed in any::<u64>(), count in 1usize..300) {
            let alphabet = Alphabet::new(symbols.clone()).unwrap();
            let words = EncoderBuilder::new(alphabet).word_count(count).seed(seed).build().unwrap().encode();
            prop_assert_eq!(extract(&words).unwrap(), symbols);
        }

        #[test]
        fn ambiguous_mode_keeps_prefix_order(symbols in distinct_symbols(), seed in any::<u64>(), enforced in 0usize..12) {
            let enforced = enforced.min(symbols.len());
            let alphabet = Alphabet::new(symbols.clone()).unwrap();
            let words = EncoderBuilder::new(alphabet)
                .mode(Mode::Ambiguous)
                .enforce_prefix(enforced)
                .word_count(120)
                .seed(seed)
                .build()
                .unwrap()
                .encode();

            let order = extract(&words).unwrap();
            prop_assert_eq!(order.len(), symbols.len());
            for (before, after) in symbols[..enforced].iter().tuple_windows() {
                prop_assert!(position(&order, *before) < position(&order, *after));
            }
        }

        #[test]
        fn adversarial_mode_keeps_backbone_order(
            symbols in distinct_symbols(),
            seed in any::<u64>(),
            clusters in 1usize..12,
            global in 0usize..12,
            per_cluster in 0usize..5,
            pairs in 0usize..3,
            pain in 0usize..10,
            count in 1usize..300,
        ) {
            let clusters = clusters.min(symbols.len());
            let global = global.min(symbols.len());
            let alphabet = Alphabet::new(symbols.clone()).unwrap();
            let words = EncoderBuilder::new(alphabet.clone())
                .mode(Mode::Adversarial)
                .clusters(clusters)
                .enforce_global(global)
                .enforce_per_cluster(per_cluster)
                .inter_cluster_pairs(pairs)
                .pain_prefix(pain)
                .word_count(count)
                .seed(seed)
                .build()
                .unwrap()
                .encode();
            prop_assert!(alphabet.is_sorted(&words));

            let order = extract(&words);
            prop_assert!(order.is_ok(), "{:?}", order);
            let order = order.unwrap();
            let precedes = |before: &Symbol, after: &Symbol| position(&order, *before) < position(&order, *after);

            for (before, after) in symbols[..global].iter().tuple_windows() {
                prop_assert!(precedes(before, after));
            }
            for cluster in partition(&symbols, clusters) {
                for (before, after) in cluster[..per_cluster.min(cluster.len())].iter().tuple_windows() {
                    prop_assert!(precedes(before, after));
                }
            }
            if pairs > 0 {
                for (left, right) in partition(&symbols, clusters).iter().tuple_windows() {
                    prop_assert!(precedes(&left[left.len() - 1], &right[0]));
                }
            }
        }

        #[test]
        fn sorted_lists_always_extract(symbols in distinct_symbols(), raw in prop::collection::vec(prop::collection::vec(0usize..12, 1..6), 0..40)) {
            let alphabet = Alphabet::new(symbols.clone()).unwrap();
            let mut words = raw
                .iter()
                .map(|word| word.iter().map(|index| symbols[index % symbols.len()]).collect::<String>())
                .collect_vec();
            alphabet.sort_words(&mut words);

            let order = extract(&words).unwrap();
            let graph = OrderExtractor::constraint_graph(&words).unwrap();
            for (before, after) in graph.constraints() {
                prop_assert!(alphabet.rank(before) < alphabet.rank(after));
                prop_assert!(position(&order, before) < position(&order, after));
            }
        }
    }
}
