//! Transcript Normalizer: cleans raw speech-to-text into readable sentences.
//!
//! Pure string transformation, no failure modes: filler-word removal,
//! whitespace collapsing, punctuation repair, sentence capitalization.

/// Single-word fillers removed on a case-insensitive whole-word match.
const FILLER_WORDS: &[&str] = &[
    "um", "umm", "uh", "uhh", "uhm", "er", "erm", "ah", "hmm", "mhm",
];

/// Two-word fillers removed as phrases before the single-word pass.
const FILLER_PHRASES: &[(&str, &str)] = &[
    ("you", "know"),
    ("i", "mean"),
    ("sort", "of"),
    ("kind", "of"),
];

/// Normalizes a raw transcript into clean, sentence-cased text.
/// Empty (or filler-only) input yields an empty string with no period.
pub fn normalize(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let text = remove_fillers(raw);
    let text = collapse_whitespace(&text);
    let text = fix_punctuation_spacing(&text);
    let text = capitalize_sentences(&text);
    // Filler removal can leave bare punctuation ("Umm... uh" -> "...").
    if !text.chars().any(char::is_alphanumeric) {
        return String::new();
    }
    ensure_terminal_punctuation(text)
}

enum Segment {
    Word(String),
    Separator(String),
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\''
}

fn segment(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut buf = String::new();
    let mut in_word = false;
    for c in input.chars() {
        let word_char = is_word_char(c);
        if word_char != in_word && !buf.is_empty() {
            segments.push(if in_word {
                Segment::Word(std::mem::take(&mut buf))
            } else {
                Segment::Separator(std::mem::take(&mut buf))
            });
        }
        in_word = word_char;
        buf.push(c);
    }
    if !buf.is_empty() {
        segments.push(if in_word {
            Segment::Word(buf)
        } else {
            Segment::Separator(buf)
        });
    }
    segments
}

/// Drops filler words and two-word filler phrases. A comma left dangling
/// directly after a removed filler ("um, so") is dropped with it.
fn remove_fillers(input: &str) -> String {
    let segments = segment(input);
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    while i < segments.len() {
        match &segments[i] {
            Segment::Separator(s) => {
                out.push_str(s);
                i += 1;
            }
            Segment::Word(w) => {
                let lower = w.to_lowercase();

                // Phrase match: word + whitespace separator + word.
                let phrase_len = FILLER_PHRASES.iter().find_map(|(first, second)| {
                    if lower != *first {
                        return None;
                    }
                    match (segments.get(i + 1), segments.get(i + 2)) {
                        (Some(Segment::Separator(sep)), Some(Segment::Word(next)))
                            if sep.chars().all(char::is_whitespace)
                                && next.to_lowercase() == *second =>
                        {
                            Some(3)
                        }
                        _ => None,
                    }
                });

                if let Some(len) = phrase_len {
                    i += len;
                    skip_dangling_comma(&segments, &mut i, &mut out);
                } else if FILLER_WORDS.contains(&lower.as_str()) {
                    i += 1;
                    skip_dangling_comma(&segments, &mut i, &mut out);
                } else {
                    out.push_str(w);
                    i += 1;
                }
            }
        }
    }
    out
}

fn skip_dangling_comma(segments: &[Segment], i: &mut usize, out: &mut String) {
    if let Some(Segment::Separator(s)) = segments.get(*i) {
        let trimmed = s.trim_start_matches([',', ' ']);
        if trimmed.len() != s.len() {
            out.push(' ');
            out.push_str(trimmed);
            *i += 1;
        }
    }
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Deletes spaces that precede closing punctuation ("word ," → "word,").
fn fix_punctuation_spacing(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '.' | ',' | '!' | '?' | ';' | ':') {
            while out.ends_with(' ') {
                out.pop();
            }
        }
        out.push(c);
    }
    out
}

/// Uppercases the first letter of the string and the first letter after
/// sentence-ending punctuation.
fn capitalize_sentences(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut capitalize_next = true;
    for c in input.chars() {
        if matches!(c, '.' | '!' | '?') {
            out.push(c);
            capitalize_next = true;
        } else if capitalize_next && c.is_alphanumeric() {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Appends a period unless the text already ends in sentence punctuation.
/// A trailing comma/semicolon/colon is repaired into a period instead.
fn ensure_terminal_punctuation(mut text: String) -> String {
    while text.ends_with([',', ';', ':', ' ']) {
        text.pop();
    }
    if text.is_empty() {
        return text;
    }
    if !text.ends_with(['.', '!', '?']) {
        text.push('.');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_stays_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t \n"), "");
    }

    #[test]
    fn test_filler_only_input_yields_empty_no_period() {
        assert_eq!(normalize("um uh hmm"), "");
        assert_eq!(normalize("you know, I mean"), "");
    }

    #[test]
    fn test_filler_with_punctuation_residue_yields_empty() {
        assert_eq!(normalize("Umm... uh"), "");
        assert_eq!(normalize("uh, um!"), "");
    }

    #[test]
    fn test_removes_fillers_case_insensitively() {
        assert_eq!(normalize("Um hello there"), "Hello there.");
        assert_eq!(normalize("so UH we shipped it"), "So we shipped it.");
    }

    #[test]
    fn test_whole_word_match_keeps_embedded_fillers() {
        // "umbrella" contains "um" but must survive.
        assert_eq!(normalize("the umbrella term"), "The umbrella term.");
        assert_eq!(normalize("a superb answer"), "A superb answer.");
    }

    #[test]
    fn test_removes_two_word_filler_phrases() {
        assert_eq!(normalize("it works you know under load"), "It works under load.");
        assert_eq!(normalize("I mean the cache is cold"), "The cache is cold.");
    }

    #[test]
    fn test_dangling_comma_after_filler_is_dropped() {
        assert_eq!(normalize("um, I used Redis"), "I used Redis.");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("too   many\n\nspaces"), "Too many spaces.");
    }

    #[test]
    fn test_fixes_space_before_punctuation() {
        assert_eq!(normalize("first , then second ."), "First, then second.");
    }

    #[test]
    fn test_capitalizes_after_sentence_punctuation() {
        assert_eq!(
            normalize("we cache reads. writes go to the primary! reads scale"),
            "We cache reads. Writes go to the primary! Reads scale."
        );
    }

    #[test]
    fn test_appends_period_when_missing() {
        assert_eq!(normalize("no terminal punctuation"), "No terminal punctuation.");
    }

    #[test]
    fn test_keeps_existing_terminal_punctuation() {
        assert_eq!(normalize("is that right?"), "Is that right?");
        assert_eq!(normalize("done!"), "Done!");
    }

    #[test]
    fn test_repairs_trailing_comma_into_period() {
        assert_eq!(normalize("it depends,"), "It depends.");
    }
}
