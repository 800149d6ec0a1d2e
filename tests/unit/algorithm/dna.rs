//! Tests for DNA encoding of combinations

#[cfg(test)]
mod tests {
    use layerforge::algorithm::dna::{Combination, Selection, dna_segment, encode};
    use layerforge::model::layer::LayerItem;

    fn combination_of(items: &[LayerItem]) -> Combination<'_> {
        Combination::new(
            items
                .iter()
                .enumerate()
                .map(|(item_index, item)| Selection { item_index, item })
                .collect(),
        )
    }

    // Tests formatted and raw DNA for 4-digit identifiers
    // Verified by swapping the join separators
    #[test]
    fn test_encode_four_digit_ids() {
        let items = vec![
            LayerItem::new("0001", 100),
            LayerItem::new("0003", 100),
            LayerItem::new("0002", 100),
        ];

        let dna = encode(&combination_of(&items));

        assert_eq!(dna.formatted, "0001-0003-0002");
        assert_eq!(dna.raw, "000100030002");
        assert_eq!(dna.to_string(), "0001-0003-0002");
    }

    // Tests that only the first four characters of long identifiers participate
    // Verified by changing the segment length
    #[test]
    fn test_encode_truncates_long_ids() {
        let items = vec![LayerItem::new("background-blue", 1), LayerItem::new("hat7", 1)];

        let dna = encode(&combination_of(&items));

        assert_eq!(dna.formatted, "back-hat7");
        assert_eq!(dna.raw, "backhat7");
    }

    // Tests that short identifiers are used whole
    // Verified by padding segments to four characters
    #[test]
    fn test_dna_segment_short_and_multibyte() {
        assert_eq!(dna_segment("ab"), "ab");
        assert_eq!(dna_segment(""), "");
        assert_eq!(dna_segment("ééééé"), "éééé");
        assert_eq!(dna_segment("0042x"), "0042");
    }

    // Tests that the raw form can collide where the formatted form does not
    // Verified by encoding raw DNA with the separator
    #[test]
    fn test_raw_dna_ignores_segment_boundaries() {
        let first = vec![LayerItem::new("ab", 1), LayerItem::new("c", 1)];
        let second = vec![LayerItem::new("a", 1), LayerItem::new("bc", 1)];

        let first_dna = encode(&combination_of(&first));
        let second_dna = encode(&combination_of(&second));

        assert_eq!(first_dna.raw, second_dna.raw);
        assert_ne!(first_dna.formatted, second_dna.formatted);
    }

    // Tests combination accessors
    // Verified by returning selections out of layer order
    #[test]
    fn test_combination_accessors() {
        let items = vec![LayerItem::new("0001", 1), LayerItem::new("0002", 1)];
        let combination = combination_of(&items);

        assert_eq!(combination.len(), 2);
        assert!(!combination.is_empty());
        assert_eq!(combination.get(1).map(|s| s.item.id.as_str()), Some("0002"));
        assert!(combination.get(2).is_none());
        assert!(Combination::default().is_empty());
    }
}
