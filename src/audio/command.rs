// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Target extraction from a transcribed command

/// Phrases that introduce the object being asked for
const REQUEST_PHRASES: &[&str] = &[
    "where can i find",
    "where did i put",
    "where is",
    "where's",
    "where are",
    "help me find",
    "help me locate",
    "can you find",
    "can you locate",
    "could you find",
    "could you locate",
    "can you",
    "could you",
    "i'm looking for",
    "i am looking for",
    "looking for",
    "look for",
    "search for",
    "guide me to",
    "take me to",
    "show me",
    "i need",
    "i want",
    "find",
    "locate",
];

const FILLER_WORDS: &[&str] = &["please", "me", "my", "the", "a", "an", "some", "your"];

/// Pull the object name out of a spoken command.
///
/// Everything up to and including the last request phrase is dropped, so
/// "Hey, where is my coffee mug?" becomes `coffee mug`. Returns `None` when
/// nothing but request words remain.
pub fn extract_target_object(command: &str) -> Option<String> {
    let normalized: String = command
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '\'' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    let words: Vec<&str> = normalized.split_whitespace().collect();

    let start = REQUEST_PHRASES
        .iter()
        .filter_map(|phrase| last_phrase_end(&words, phrase))
        .max()
        .unwrap_or(0);

    let target: Vec<&str> = words[start..]
        .iter()
        .copied()
        .filter(|w| !FILLER_WORDS.contains(w))
        .collect();

    if target.is_empty() {
        None
    } else {
        Some(target.join(" "))
    }
}

/// Word index just past the last whole-word occurrence of `phrase`
fn last_phrase_end(words: &[&str], phrase: &str) -> Option<usize> {
    let phrase: Vec<&str> = phrase.split(' ').collect();
    if phrase.len() > words.len() {
        return None;
    }
    (0..=words.len() - phrase.len())
        .rev()
        .find(|&i| words[i..i + phrase.len()] == phrase[..])
        .map(|i| i + phrase.len())
}
