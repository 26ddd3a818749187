//! Lightweight language detection for extracted text.
//!
//! Scores each candidate language by the frequency of its common function
//! words, plus a small bonus for characters that are distinctive for it.
//! No model files: good enough to tell the inference model what language
//! the document is in.

/// Below this many non-whitespace characters there is too little signal.
const MIN_DETECTABLE_CHARS: usize = 20;

struct LanguageProfile {
    code: &'static str,
    stopwords: &'static [&'static str],
    distinctive_chars: &'static [char],
}

/// Candidate languages, English first: it wins ties.
const PROFILES: &[LanguageProfile] = &[
    LanguageProfile {
        code: "en",
        stopwords: &[
            "the", "and", "was", "for", "are", "but", "not", "you", "with", "this", "that",
            "have", "from", "they", "will", "been", "which", "would", "their", "there", "is",
            "of", "to", "in", "it",
        ],
        distinctive_chars: &[],
    },
    LanguageProfile {
        code: "fr",
        stopwords: &[
            "le", "la", "les", "un", "une", "des", "du", "et", "est", "pour", "par", "sur",
            "dans", "avec", "qui", "que", "pas", "mais", "ce", "cette", "au", "aux", "nous",
            "vous", "sont",
        ],
        distinctive_chars: &['è', 'ê', 'à', 'ç', 'œ', 'ù', 'û', 'î'],
    },
    LanguageProfile {
        code: "es",
        stopwords: &[
            "el", "los", "las", "una", "del", "y", "es", "por", "para", "con", "que", "pero",
            "como", "muy", "esta", "este", "son", "su", "sus", "al", "se", "lo", "fue",
        ],
        distinctive_chars: &['ñ', '¿', '¡', 'á', 'í', 'ó', 'ú'],
    },
    LanguageProfile {
        code: "de",
        stopwords: &[
            "der", "die", "das", "und", "ist", "nicht", "mit", "ein", "eine", "den", "dem",
            "zu", "von", "auf", "für", "sich", "auch", "wir", "sie", "ich", "es", "wird",
        ],
        distinctive_chars: &['ß', 'ä', 'ö', 'ü'],
    },
    LanguageProfile {
        code: "it",
        stopwords: &[
            "il", "gli", "della", "delle", "che", "non", "per", "con", "una", "sono", "nel",
            "nella", "anche", "questo", "questa", "come", "ma", "di", "è",
        ],
        distinctive_chars: &['ì', 'ò'],
    },
    LanguageProfile {
        code: "pt",
        stopwords: &[
            "os", "as", "um", "uma", "não", "com", "para", "por", "que", "mas", "são", "do",
            "da", "dos", "das", "em", "no", "na", "foi", "ao",
        ],
        distinctive_chars: &['ã', 'õ'],
    },
];

/// Detect the primary language of `text` as an ISO 639-1 code.
///
/// Returns `None` when the text is too short or no language scores at all.
pub fn detect_language(text: &str) -> Option<&'static str> {
    let significant = text.chars().filter(|c| !c.is_whitespace()).count();
    if significant < MIN_DETECTABLE_CHARS {
        return None;
    }

    let lower = text.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphabetic())
        .filter(|t| !t.is_empty())
        .collect();

    let mut best: Option<(&'static str, u32)> = None;
    for profile in PROFILES {
        let score = count_indicators(&tokens, profile.stopwords)
            + count_distinctive(&lower, profile.distinctive_chars);
        if score > 0 && best.map_or(true, |(_, top)| score > top) {
            best = Some((profile.code, score));
        }
    }

    best.map(|(code, _)| code)
}

/// Count how many tokens are indicator words.
fn count_indicators(tokens: &[&str], indicators: &[&str]) -> u32 {
    tokens.iter().filter(|t| indicators.contains(t)).count() as u32
}

/// Each 2 distinctive characters = 1 point.
fn count_distinctive(lower_text: &str, chars: &[char]) -> u32 {
    let count = lower_text.chars().filter(|c| chars.contains(c)).count() as u32;
    count / 2
}
