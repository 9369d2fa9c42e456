//! Parser for MovieLens 100k data files.
//!
//! This module handles parsing:
//! - u.data: userId \t itemId \t rating \t timestamp
//! - u.item: itemId | title | release date | video release date | IMDb URL | 19 genre flags
//!
//! Rust concepts you'll learn here:
//! - String parsing and splitting
//! - Error handling with `?` operator
//! - Converting between types (parsing strings to numbers)

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

const RATINGS_FILE: &str = "u.data";
const ITEMS_FILE: &str = "u.item";

/// Fields before the genre flags in u.item
const ITEM_INFO_FIELDS: usize = 5;

/// Helper function to read a file with ISO-8859-1 encoding (Latin-1)
///
/// MovieLens ships its files as ISO-8859-1, not UTF-8. Each byte maps
/// directly to the Unicode code point of the same value.
fn read_lines_latin1(path: &Path) -> Result<Vec<String>> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let content: String = bytes.iter().map(|&b| b as char).collect();

    Ok(content.lines().map(|s| s.to_string()).collect())
}

/// Take the next field of a split line, reporting which one was missing
fn next_field<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    file: &str,
    line: usize,
    name: &str,
) -> Result<&'a str> {
    parts.next().ok_or_else(|| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Missing {}", name),
    })
}

/// Parse a numeric field, keeping the file/line context on failure
fn parse_number<T>(value: &str, file: &str, line: usize, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Invalid {}: {}", name, e),
    })
}

/// Parse the u.data file
pub fn parse_ratings(path: &Path) -> Result<Vec<RatingEntry>> {
    let lines = read_lines_latin1(path)?;
    parse_rating_lines(&lines)
}

/// Parse rating lines: `userId \t itemId \t rating \t timestamp`
///
/// The timestamp is not needed by the recommender and is ignored.
pub fn parse_rating_lines(lines: &[String]) -> Result<Vec<RatingEntry>> {
    let mut ratings = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let mut parts = line_trimmed.split_whitespace();
        let user_id = next_field(&mut parts, RATINGS_FILE, line_no, "userId")?;
        let item_id = next_field(&mut parts, RATINGS_FILE, line_no, "itemId")?;
        let rating_value = next_field(&mut parts, RATINGS_FILE, line_no, "rating")?;

        let entry = RatingEntry {
            user_id: parse_number(user_id, RATINGS_FILE, line_no, "userId")?,
            item_id: parse_number(item_id, RATINGS_FILE, line_no, "itemId")?,
            rating: parse_number(rating_value, RATINGS_FILE, line_no, "rating")?,
        };
        if !entry.has_valid_rating() {
            return Err(DataLoadError::ParseError {
                file: RATINGS_FILE.to_string(),
                line: line_no,
                reason: format!(
                    "Rating {} outside {}-{}",
                    rating_value, MIN_RATING, MAX_RATING
                ),
            });
        }

        ratings.push(entry);
    }
    Ok(ratings)
}

/// Parse the u.item file
pub fn parse_items(path: &Path) -> Result<Vec<Item>> {
    let lines = read_lines_latin1(path)?;
    parse_item_lines(&lines)
}

/// Parse pipe-separated item lines
pub fn parse_item_lines(lines: &[String]) -> Result<Vec<Item>> {
    let expected = ITEM_INFO_FIELDS + Genre::ALL.len();
    let mut items = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line_trimmed.split('|').collect();
        if fields.len() < expected {
            return Err(DataLoadError::FieldCountMismatch {
                expected,
                found: fields.len(),
                line: line_no,
            });
        }

        let title = fields[1].to_string();
        let year = extract_year_from_title(&title).or_else(|| extract_year_from_date(fields[2]));

        items.push(Item {
            id: parse_number(fields[0], ITEMS_FILE, line_no, "itemId")?,
            title,
            year,
            genres: parse_genre_flags(&fields[ITEM_INFO_FIELDS..expected], line_no)?,
        });
    }
    Ok(items)
}

/// Extract year from an item title
///
/// Example: "Toy Story (1995)" -> Some(1995)
///          "Item Title" -> None
fn extract_year_from_title(title: &str) -> Option<u16> {
    let start = title.rfind('(')?;
    let end = title.rfind(')')?;
    if start < end {
        let year_str = &title[start + 1..end];
        if let Ok(year) = year_str.parse::<u16>() {
            return Some(year);
        }
    }
    None
}

/// Extract year from a release date like "01-Jan-1995"
fn extract_year_from_date(date: &str) -> Option<u16> {
    date.rsplit('-').next()?.trim().parse().ok()
}

/// Turn the 0/1 genre columns into a list of genres
fn parse_genre_flags(flags: &[&str], line: usize) -> Result<Vec<Genre>> {
    let mut genres = Vec::new();
    for (flag, genre) in flags.iter().zip(Genre::ALL) {
        match flag.trim() {
            "1" => genres.push(genre),
            "0" => {}
            other => {
                return Err(DataLoadError::ParseError {
                    file: ITEMS_FILE.to_string(),
                    line,
                    reason: format!("Invalid genre flag for {:?}: {:?}", genre, other),
                });
            }
        }
    }
    Ok(genres)
}
