use crate::base54::*;

#[test]
fn test_default_alphabet_counts_through_leading_then_pairs() {
    let alphabet = Alphabet::default();
    assert_eq!(alphabet.name(0), "a");
    assert_eq!(alphabet.name(25), "z");
    assert_eq!(alphabet.name(26), "A");
    assert_eq!(alphabet.name(52), "$");
    assert_eq!(alphabet.name(53), "_");
    assert_eq!(alphabet.name(54), "aa");
    assert_eq!(alphabet.name(55), "ba");
}

#[test]
fn test_names_never_start_with_a_digit() {
    let alphabet = Alphabet::default();
    for n in 0..5000 {
        let name = alphabet.name(n);
        assert!(!name.starts_with(|c: char| c.is_ascii_digit()), "{name}");
    }
}

#[test]
fn test_names_are_distinct() {
    let alphabet = Alphabet::default();
    let mut seen = std::collections::HashSet::new();
    for n in 0..10_000 {
        assert!(seen.insert(alphabet.name(n)), "duplicate at {n}");
    }
}

#[test]
fn test_frequent_characters_come_first() {
    let frequency = CharFrequency::analyze("zzz yy x 999");
    let alphabet = frequency.alphabet();
    assert_eq!(alphabet.name(0), "z");
    assert_eq!(alphabet.name(1), "y");
    assert_eq!(alphabet.name(2), "x");
    // Ties keep the default order.
    assert_eq!(alphabet.name(3), "a");
    assert!(alphabet.as_str().ends_with("9012345678"));
}

#[test]
fn test_discounting_removes_counts() {
    let mut frequency = CharFrequency::analyze("foo");
    assert_eq!(frequency.count('o'), 2);
    frequency.consider("foo", -1);
    assert_eq!(frequency.count('o'), 0);
    assert_eq!(frequency.count('-'), 0);
}
