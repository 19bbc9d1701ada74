//! Spanish syllable counting.
//!
//! Counting follows vowel nuclei: each vowel opens a syllable unless it closes
//! a diphthong with the vowel before it. Consonants (including `y`) never add
//! a syllable. Words are counted independently; no synalepha is applied
//! across word boundaries.

use alloc::string::String;

use unicode_normalization::UnicodeNormalization;

/// Vowel pairs pronounced as a single syllable.
///
/// Strong + strong pairs are deliberately absent: they always form a hiatus.
const DIPHTHONGS: [(char, char); 30] = [
    ('a', 'i'),
    ('a', 'u'),
    ('e', 'i'),
    ('e', 'u'),
    ('o', 'i'),
    ('o', 'u'),
    ('i', 'a'),
    ('i', 'e'),
    ('i', 'o'),
    ('i', 'u'),
    ('u', 'a'),
    ('u', 'e'),
    ('u', 'i'),
    ('u', 'o'),
    ('á', 'i'),
    ('á', 'u'),
    ('é', 'i'),
    ('é', 'u'),
    ('ó', 'i'),
    ('í', 'u'),
    ('ú', 'i'),
    ('i', 'á'),
    ('i', 'é'),
    ('i', 'ó'),
    ('i', 'ú'),
    ('u', 'á'),
    ('u', 'é'),
    ('u', 'ó'),
    ('ü', 'e'),
    ('ü', 'i'),
];

/// Returns `true` for Spanish vowels, accented forms and `ü` included.
#[inline]
#[must_use]
pub const fn is_vowel(c: char) -> bool {
    matches!(
        c,
        'a' | 'e'
            | 'i'
            | 'o'
            | 'u'
            | 'á'
            | 'é'
            | 'í'
            | 'ó'
            | 'ú'
            | 'ü'
            | 'A'
            | 'E'
            | 'I'
            | 'O'
            | 'U'
            | 'Á'
            | 'É'
            | 'Í'
            | 'Ó'
            | 'Ú'
            | 'Ü'
    )
}

/// Strong (open) vowels: `a`, `e`, `o` and their accented forms.
#[inline]
#[must_use]
pub const fn is_strong(c: char) -> bool {
    matches!(
        c,
        'a' | 'e' | 'o' | 'á' | 'é' | 'ó' | 'A' | 'E' | 'O' | 'Á' | 'É' | 'Ó'
    )
}

/// Weak (closed) vowels: `i`, `u`, their accented forms and `ü`.
#[inline]
#[must_use]
pub const fn is_weak(c: char) -> bool {
    matches!(
        c,
        'i' | 'u' | 'í' | 'ú' | 'ü' | 'I' | 'U' | 'Í' | 'Ú' | 'Ü'
    )
}

/// Whether the lowercase pair `(first, second)` forms a diphthong.
#[inline]
#[must_use]
pub fn is_diphthong(first: char, second: char) -> bool {
    DIPHTHONGS.contains(&(first, second))
}

/// Letters kept when cleaning a token: ASCII letters, accented vowels, `ñ` and `ü`.
#[inline]
#[must_use]
pub const fn is_spanish_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
        || matches!(
            c,
            'á' | 'é'
                | 'í'
                | 'ó'
                | 'ú'
                | 'ü'
                | 'ñ'
                | 'Á'
                | 'É'
                | 'Í'
                | 'Ó'
                | 'Ú'
                | 'Ü'
                | 'Ñ'
        )
}

/// Strips everything that is not a Spanish letter from `token`.
#[must_use]
pub fn clean_token(token: &str) -> String {
    token.chars().filter(|&c| is_spanish_letter(c)).collect()
}

/// Counts the syllables of a single word.
///
/// The caller strips punctuation beforehand; this function only lowercases
/// and normalizes to NFC. Three adjacent vowels are scanned as two
/// overlapping pairs, so triphthongs may be over- or undercounted.
///
/// Returns 0 for an empty word and at least 1 otherwise, even when the word
/// holds no vowel at all (`"brr"`).
#[must_use]
pub fn count_word(word: &str) -> usize {
    if word.is_empty() {
        return 0;
    }

    let mut chars = word.chars().flat_map(char::to_lowercase).nfc().peekable();
    let mut count = 0;

    while let Some(c) = chars.next() {
        if !is_vowel(c) {
            continue;
        }
        count += 1;
        if let Some(&next) = chars.peek()
            && is_diphthong(c, next)
        {
            chars.next();
        }
    }

    count.max(1)
}

/// Counts the syllables of a run of text.
///
/// The text is NFC-normalized, split on whitespace, and each token is cleaned
/// with [`clean_token`] before [`count_word`] is applied. Tokens left empty
/// after cleaning contribute nothing.
#[must_use]
pub fn count_text(text: &str) -> usize {
    let normalized: String = text.nfc().collect();
    normalized
        .split_whitespace()
        .map(|token| {
            let clean = clean_token(token);
            if clean.is_empty() { 0 } else { count_word(&clean) }
        })
        .sum()
}

/// Counts whitespace-delimited words. Punctuation is not stripped.
#[must_use]
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_counts_zero() {
        assert_eq!(count_word(""), 0);
        assert_eq!(count_text(""), 0);
        assert_eq!(count_text("   \n\t "), 0);
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("  \n "), 0);
    }

    #[test]
    fn vowel_less_word_is_clamped_to_one() {
        assert_eq!(count_word("brr"), 1);
        assert_eq!(count_word("y"), 1);
        assert_eq!(count_word("pst"), 1);
    }

    #[test]
    fn diphthongs_merge() {
        assert_eq!(count_word("aire"), 2);
        assert_eq!(count_word("ciudad"), 2);
        assert_eq!(count_word("canción"), 2);
        assert_eq!(count_word("pingüino"), 3);
        assert_eq!(count_word("buey"), 1);
    }

    #[test]
    fn strong_pairs_are_hiatus() {
        assert_eq!(count_word("leer"), 2);
        assert_eq!(count_word("poeta"), 3);
        assert_eq!(count_word("caos"), 2);
    }

    #[test]
    fn accented_weak_vowel_breaks_the_pair() {
        // "ío" is not in the table, so río keeps two syllables.
        assert_eq!(count_word("río"), 2);
        assert_eq!(count_word("país"), 2);
    }

    #[test]
    fn triphthongs_use_overlapping_pairs() {
        assert_eq!(count_word("averiguáis"), 5);
    }

    #[test]
    fn case_is_ignored() {
        assert_eq!(count_word("ÁRBOL"), count_word("árbol"));
        assert_eq!(count_word("CIUDAD"), 2);
    }

    #[test]
    fn decomposed_accents_are_normalized() {
        assert_eq!(count_word("a\u{301}rbol"), count_word("árbol"));
        assert_eq!(count_text("ri\u{301}o"), 2);
        assert_eq!(count_text("rio"), 1);
    }

    #[test]
    fn text_strips_punctuation_and_digits() {
        assert_eq!(count_text("¡Hola, mundo!"), 4);
        assert_eq!(count_text("123 ... ---"), 0);
        assert_eq!(count_text("Verso de once sílabas"), 8);
    }

    #[test]
    fn text_is_sum_of_cleaned_words() {
        let text = "En el silencio, la ciudad respira.";
        let expected: usize = text
            .split_whitespace()
            .map(clean_token)
            .map(|w| count_word(&w))
            .sum();
        assert_eq!(count_text(text), expected);
    }

    #[test]
    fn words_split_on_whitespace_only() {
        assert_eq!(count_words("Hola, mundo!"), 2);
        assert_eq!(count_words("uno  dos\ttres\ncuatro"), 4);
        assert_eq!(count_words("... !!"), 2);
    }

    #[test]
    fn vowel_classes() {
        assert!(is_strong('á') && is_strong('O'));
        assert!(is_weak('ü') && is_weak('Í'));
        assert!(!is_vowel('y'));
        assert!(!is_diphthong('e', 'e'));
        assert!(is_diphthong('ü', 'e'));
    }

    #[test]
    fn cleaning_keeps_spanish_letters() {
        assert_eq!(clean_token("«Ñandú»,"), "Ñandú");
        assert_eq!(clean_token("<b>amor</b>"), "bamorb");
        assert_eq!(clean_token("42"), "");
    }
}
