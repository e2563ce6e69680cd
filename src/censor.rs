//! Profanity filter for post bodies
//!
//! Whole space-separated words on the list are replaced with `****`,
//! compared case-insensitively. Punctuation attached to a word keeps it
//! from matching.

const BANNED_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

const REPLACEMENT: &str = "****";

pub fn clean_body(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            if BANNED_WORDS.contains(&word.to_lowercase().as_str()) {
                REPLACEMENT
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
