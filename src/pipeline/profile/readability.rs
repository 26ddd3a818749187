//! Flesch reading-ease score.
//!
//! 206.835 − 1.015 × (words / sentences) − 84.6 × (syllables / words).
//! Higher is easier; very dense text goes negative.

/// Returns `None` when the text has no words to score.
pub fn flesch_reading_ease(text: &str) -> Option<f64> {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphabetic())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|w| !w.is_empty())
        .collect();

    if words.is_empty() {
        return None;
    }

    let word_count = words.len() as f64;
    let sentence_count = count_sentences(text).max(1) as f64;
    let syllable_count: usize = words.iter().map(|w| count_syllables(w)).sum();

    let score = 206.835
        - 1.015 * (word_count / sentence_count)
        - 84.6 * (syllable_count as f64 / word_count);

    score.is_finite().then_some(score)
}

/// Sentences are runs of text closed by `.`, `!` or `?` (or end of input)
/// that contain at least one alphanumeric character.
fn count_sentences(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .count()
}

/// Vowel-group heuristic: every run of vowels is a syllable, a trailing
/// silent `e` is dropped, and every word has at least one.
pub fn count_syllables(word: &str) -> usize {
    let chars: Vec<char> = word.chars().collect();
    if chars.is_empty() {
        return 0;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y') || !c.is_ascii();

    let mut count = 0;
    let mut prev_vowel = false;
    for &c in &chars {
        let vowel = is_vowel(c);
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }

    let n = chars.len();
    if n > 2 && chars[n - 1] == 'e' && chars[n - 2] != 'l' && !is_vowel(chars[n - 2]) {
        count -= 1;
    }

    count.max(1)
}
