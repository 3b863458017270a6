//! Display a fraction as a horizontal bar chart with "high" resolution by using Unicode block
//! characters.

use crate::options::ProperFraction;

// Use only two different levels of "fullness" since the other unicode characters may look slightly
// different depending on the font.
const FULL_BLOCK: char = '█';
const HALF_BLOCK: char = '▌';
const EMPTY: char = ' ';

/// Always exactly `max_width` characters wide.
pub fn unicode_bar(fraction: ProperFraction, max_width: usize) -> String {
    let ideal_width = fraction.0 * max_width as f64;
    let full_width = (ideal_width.floor() as usize).min(max_width);

    let mut bar: String = std::iter::repeat(FULL_BLOCK).take(full_width).collect();
    if full_width < max_width && ideal_width - full_width as f64 >= 0.5 {
        bar.push(HALF_BLOCK);
    }
    let empty_width = max_width - bar.chars().count();
    bar.extend(std::iter::repeat(EMPTY).take(empty_width));

    debug_assert_eq!(bar.chars().count(), max_width);
    bar
}

#[test]
fn test_bar() {
    assert_eq!(unicode_bar(ProperFraction(0.0), 4), "    ");
    assert_eq!(unicode_bar(ProperFraction(0.5), 4), "██  ");
    assert_eq!(unicode_bar(ProperFraction(0.625), 4), "██▌ ");
    assert_eq!(unicode_bar(ProperFraction(0.6), 4), "██  ");
    assert_eq!(unicode_bar(ProperFraction(1.0), 4), "████");
    for i in 0..=100 {
        let bar = unicode_bar(ProperFraction(i as f64 / 100.0), 10);
        println!("{i:3}: {bar}");
        assert_eq!(bar.chars().count(), 10);
    }
}
