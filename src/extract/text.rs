//! Small text transforms shared by the extractors

use std::ops::RangeInclusive;

/// Code points removed from prize titles (pictographs and emoticons)
pub const EMOJI_RANGE: RangeInclusive<u32> = 0x1F300..=0x1F9FF;

/// Month names used to spot a date line on an event page
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Drops every character in [`EMOJI_RANGE`] and trims the result
///
/// ```
/// use showcase_harvest::extract::text::strip_emoji;
///
/// assert_eq!(strip_emoji("🏆 Best Use of X"), "Best Use of X");
/// ```
pub fn strip_emoji(text: &str) -> String {
    text.chars()
        .filter(|c| !EMOJI_RANGE.contains(&(*c as u32)))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Title-cases words: a letter is uppercased when the previous character is
/// not a letter, lowercased otherwise
///
/// Digits therefore start a new word: `"sf2024hack"` becomes `"Sf2024Hack"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }

    out
}

/// True when `text` mentions a full English month name
pub fn mentions_month(text: &str) -> bool {
    MONTHS.iter().any(|month| text.contains(month))
}

/// First whitespace-separated word made of exactly four ASCII digits
pub fn first_four_digit_word(text: &str) -> Option<&str> {
    text.split_whitespace()
        .find(|word| word.len() == 4 && word.chars().all(|c| c.is_ascii_digit()))
}
