//! Editions, books and chapter comparisons, plus the wire structs they are
//! parsed from.
//!
//! Every payload goes through a private `*Wire` struct first and is then
//! validated into the public type, so a response that deserializes but makes
//! no sense (empty ids, verse "abc", a different chapter than requested) is a
//! [`ParseError`] instead of a half-filled value.

use std::collections::{BTreeMap, HashSet};

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::selection::FALLBACK_CHAPTER_BOUND;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(String),
    #[error("{kind} entry has an empty id")]
    EmptyId { kind: &'static str },
    #[error("duplicate {kind} id {id:?}")]
    DuplicateId { kind: &'static str, id: String },
    #[error("invalid verse number {0:?}")]
    InvalidVerseNumber(String),
    #[error("expected chapter {expected}, response was for chapter {actual}")]
    ChapterMismatch { expected: u32, actual: u32 },
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::Json(err.to_string())
    }
}

/// A text edition (translation) offered by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Edition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub abbreviation: String,
    pub language: String,
}

/// Number of chapters in a book, if the backend reported it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterCount {
    Known(u32),
    Unknown,
}

impl ChapterCount {
    fn from_wire(explicit: Option<u32>, listed: usize) -> Self {
        match explicit {
            Some(n) if n > 0 => ChapterCount::Known(n),
            Some(_) => ChapterCount::Unknown,
            None if listed > 0 => ChapterCount::Known(listed as u32),
            None => ChapterCount::Unknown,
        }
    }

    /// Upper bound for chapter navigation; unknown counts fall back to 50.
    pub fn bound(self) -> u32 {
        match self {
            ChapterCount::Known(n) => n,
            ChapterCount::Unknown => FALLBACK_CHAPTER_BOUND,
        }
    }
}

/// A book of the edition that supplied the book list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub chapter_count: ChapterCount,
}

#[derive(Deserialize)]
struct BookWire {
    id: String,
    name: String,
    #[serde(default)]
    abbreviation: String,
    #[serde(default)]
    chapters: Vec<IgnoredAny>,
    #[serde(default, alias = "chapterCount")]
    chapter_count: Option<u32>,
}

/// One verse across all requested editions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseRow {
    pub number: u32,
    pub texts: BTreeMap<String, String>,
}

impl VerseRow {
    pub fn text_for(&self, edition_id: &str) -> Option<&str> {
        self.texts.get(edition_id).map(String::as_str)
    }
}

/// A chapter rendered in several editions, as returned by `POST /api/compare`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonPayload {
    pub book_id: Option<String>,
    pub book_name: String,
    pub chapter: u32,
    pub verses: Vec<VerseRow>,
}

impl ComparisonPayload {
    /// Heading shown above the verses, e.g. "Genesis 1".
    pub fn heading(&self) -> String {
        format!("{} {}", self.book_name, self.chapter)
    }
}

#[derive(Deserialize)]
struct ComparisonWire {
    #[serde(default, alias = "bookId")]
    book_id: Option<String>,
    #[serde(alias = "bookName")]
    book_name: String,
    chapter: u32,
    verses: Vec<VerseWire>,
}

#[derive(Deserialize)]
struct VerseWire {
    #[serde(alias = "verseNumber")]
    verse: VerseNumberWire,
    #[serde(alias = "textsByEditionId")]
    texts: BTreeMap<String, String>,
}

/// The reference backend sends verse numbers as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum VerseNumberWire {
    Number(u64),
    Text(String),
}

impl VerseNumberWire {
    fn into_number(self) -> Result<u32, ParseError> {
        let parsed = match &self {
            VerseNumberWire::Number(n) => u32::try_from(*n).ok(),
            VerseNumberWire::Text(s) => s.trim().parse::<u32>().ok(),
        };
        match parsed {
            Some(n) if n >= 1 => Ok(n),
            _ => Err(ParseError::InvalidVerseNumber(match self {
                VerseNumberWire::Number(n) => n.to_string(),
                VerseNumberWire::Text(s) => s,
            })),
        }
    }
}

/// Request body for `POST /api/compare`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompareRequest {
    pub version_ids: Vec<String>,
    pub book_id: String,
    pub chapter: u32,
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

fn check_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ParseError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(ParseError::EmptyId { kind });
        }
        if !seen.insert(id) {
            return Err(ParseError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

pub fn parse_editions(body: &[u8]) -> Result<Vec<Edition>, ParseError> {
    let editions: Vec<Edition> = serde_json::from_slice(body)?;
    check_ids("edition", editions.iter().map(|e| e.id.as_str()))?;
    Ok(editions)
}

pub fn parse_books(body: &[u8]) -> Result<Vec<Book>, ParseError> {
    let wire: Vec<BookWire> = serde_json::from_slice(body)?;
    check_ids("book", wire.iter().map(|b| b.id.as_str()))?;
    Ok(wire
        .into_iter()
        .map(|b| Book {
            chapter_count: ChapterCount::from_wire(b.chapter_count, b.chapters.len()),
            id: b.id,
            name: b.name,
            abbreviation: b.abbreviation,
        })
        .collect())
}

/// Parse a comparison response and check it answers the chapter that was asked for.
pub fn parse_comparison(
    body: &[u8],
    expected_chapter: u32,
) -> Result<ComparisonPayload, ParseError> {
    let wire: ComparisonWire = serde_json::from_slice(body)?;
    if wire.chapter != expected_chapter {
        return Err(ParseError::ChapterMismatch {
            expected: expected_chapter,
            actual: wire.chapter,
        });
    }
    let verses = wire
        .verses
        .into_iter()
        .map(|v| {
            Ok(VerseRow {
                number: v.verse.into_number()?,
                texts: v.texts,
            })
        })
        .collect::<Result<Vec<_>, ParseError>>()?;
    Ok(ComparisonPayload {
        book_id: wire.book_id,
        book_name: wire.book_name,
        chapter: wire.chapter,
        verses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editions_keep_backend_order() {
        let body = br#"[
            {"id":"kjv","name":"King James","abbreviation":"KJV","language":"English"},
            {"id":"yor","abbreviation":"YOR","language":"Yoruba"}
        ]"#;
        let editions = parse_editions(body).unwrap();
        assert_eq!(editions.len(), 2);
        assert_eq!(editions[0].id, "kjv");
        assert_eq!(editions[0].name, "King James");
        assert_eq!(editions[1].name, "");
    }

    #[test]
    fn editions_reject_empty_and_duplicate_ids() {
        let empty = br#"[{"id":"","abbreviation":"X","language":"English"}]"#;
        assert_eq!(
            parse_editions(empty),
            Err(ParseError::EmptyId { kind: "edition" })
        );

        let dup = br#"[
            {"id":"kjv","abbreviation":"KJV","language":"English"},
            {"id":"kjv","abbreviation":"KJV","language":"English"}
        ]"#;
        assert!(matches!(
            parse_editions(dup),
            Err(ParseError::DuplicateId { .. })
        ));
    }

    #[test]
    fn edition_missing_field_is_json_error() {
        let body = br#"[{"id":"kjv","language":"English"}]"#;
        assert!(matches!(parse_editions(body), Err(ParseError::Json(_))));
    }

    #[test]
    fn book_count_from_chapter_list() {
        let body = br#"[{"id":"GEN","name":"Genesis","abbreviation":"Gen",
            "chapters":[{"id":"GEN.1","number":"1"},{"id":"GEN.2","number":"2"}]}]"#;
        let books = parse_books(body).unwrap();
        assert_eq!(books[0].chapter_count, ChapterCount::Known(2));
        assert_eq!(books[0].chapter_count.bound(), 2);
    }

    #[test]
    fn explicit_count_wins_over_list() {
        let body = br#"[{"id":"gen","name":"Genesis","chapterCount":50,"chapters":[{}]}]"#;
        let books = parse_books(body).unwrap();
        assert_eq!(books[0].chapter_count, ChapterCount::Known(50));
    }

    #[test]
    fn empty_chapter_list_is_unknown() {
        let body = br#"[{"id":"GEN","name":"Genesis","chapters":[]},
                        {"id":"EXO","name":"Exodus","chapter_count":0}]"#;
        let books = parse_books(body).unwrap();
        assert_eq!(books[0].chapter_count, ChapterCount::Unknown);
        assert_eq!(books[1].chapter_count, ChapterCount::Unknown);
        assert_eq!(books[0].chapter_count.bound(), FALLBACK_CHAPTER_BOUND);
    }

    #[test]
    fn comparison_with_string_verse_numbers() {
        let body = br#"{"book_id":"GEN","book_name":"Genesis","chapter":1,
            "verses":[{"verse":"1","texts":{"kjv":"In the beginning","niv":"In the beginning God"}},
                      {"verse":2,"texts":{"kjv":"And the earth"}}]}"#;
        let payload = parse_comparison(body, 1).unwrap();
        assert_eq!(payload.heading(), "Genesis 1");
        assert_eq!(payload.book_id.as_deref(), Some("GEN"));
        assert_eq!(payload.verses[0].number, 1);
        assert_eq!(payload.verses[1].number, 2);
        assert_eq!(payload.verses[1].text_for("niv"), None);
        assert_eq!(payload.verses[0].text_for("kjv"), Some("In the beginning"));
    }

    #[test]
    fn comparison_accepts_camel_case_names() {
        let body = br#"{"bookName":"Genesis","chapter":3,
            "verses":[{"verseNumber":1,"textsByEditionId":{"kjv":"Now the serpent"}}]}"#;
        let payload = parse_comparison(body, 3).unwrap();
        assert_eq!(payload.book_id, None);
        assert_eq!(payload.verses[0].text_for("kjv"), Some("Now the serpent"));
    }

    #[test]
    fn comparison_rejects_bad_verse_number() {
        let body = br#"{"book_name":"Genesis","chapter":1,
            "verses":[{"verse":"intro","texts":{}}]}"#;
        assert_eq!(
            parse_comparison(body, 1),
            Err(ParseError::InvalidVerseNumber("intro".into()))
        );

        let zero = br#"{"book_name":"Genesis","chapter":1,"verses":[{"verse":0,"texts":{}}]}"#;
        assert_eq!(
            parse_comparison(zero, 1),
            Err(ParseError::InvalidVerseNumber("0".into()))
        );
    }

    #[test]
    fn comparison_for_other_chapter_is_rejected() {
        let body = br#"{"book_name":"Genesis","chapter":2,"verses":[]}"#;
        assert_eq!(
            parse_comparison(body, 1),
            Err(ParseError::ChapterMismatch {
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn compare_request_uses_backend_field_names() {
        let req = CompareRequest {
            version_ids: vec!["kjv".into(), "niv".into()],
            book_id: "gen".into(),
            chapter: 1,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"version_ids":["kjv","niv"],"book_id":"gen","chapter":1})
        );
    }
}
