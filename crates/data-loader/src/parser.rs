//! Parser for the TMDB 5000 CSV exports.
//!
//! Two files are read:
//! - tmdb_5000_movies.csv: id, title, overview, genres, keywords, ...
//! - tmdb_5000_credits.csv: movie_id, title, cast, crew
//!
//! `genres`, `keywords`, `cast` and `crew` are JSON arrays of objects carrying
//! a `name` (and `job` for crew). The two files are joined on the exact title.
//! Rows missing any required column are dropped; a JSON column that cannot be
//! decoded aborts the whole load.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use csv::StringRecord;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// One row of the movies export, structured columns still encoded
#[derive(Debug, Clone, Deserialize)]
pub struct MovieRow {
    #[serde(skip)]
    pub line: usize,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub genres: Option<String>,
    pub keywords: Option<String>,
}

/// One row of the credits export, structured columns still encoded
#[derive(Debug, Clone, Deserialize)]
pub struct CreditRow {
    #[serde(skip)]
    pub line: usize,
    pub movie_id: Option<String>,
    pub title: Option<String>,
    pub cast: Option<String>,
    pub crew: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NamedEntry {
    name: String,
}

/// Open a CSV file, reporting a missing file distinctly
fn open_csv(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(csv::Reader::from_path(path)?)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read every row of a CSV file into `T`, remembering the source line
fn read_rows<T, F>(path: &Path, mut set_line: F) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    F: FnMut(&mut T, usize),
{
    let file = file_label(path);
    let mut reader = open_csv(path)?;
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();

    let mut record = StringRecord::new();
    while reader.read_record(&mut record)? {
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        let mut row: T = record
            .deserialize(Some(&headers))
            .map_err(|e| DataLoadError::ParseError {
                file: file.clone(),
                line,
                reason: e.to_string(),
            })?;
        set_line(&mut row, line);
        rows.push(row);
    }
    Ok(rows)
}

/// Parse the movies export
pub fn parse_movies(path: &Path) -> Result<Vec<MovieRow>> {
    read_rows(path, |row: &mut MovieRow, line| row.line = line)
}

/// Parse the credits export
pub fn parse_credits(path: &Path) -> Result<Vec<CreditRow>> {
    read_rows(path, |row: &mut CreditRow, line| row.line = line)
}

/// Decode a JSON-encoded column, failing the load on malformed input
fn decode_field<T: DeserializeOwned>(
    raw: &str,
    file: &str,
    line: usize,
    field: &str,
) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| DataLoadError::MalformedField {
        file: file.to_string(),
        line,
        field: field.to_string(),
        reason: e.to_string(),
    })
}

/// Decode a `[{"name": ...}, ...]` column into plain names, keeping order
pub fn decode_names(raw: &str, file: &str, line: usize, field: &str) -> Result<Vec<String>> {
    let entries: Vec<NamedEntry> = decode_field(raw, file, line, field)?;
    Ok(entries.into_iter().map(|e| e.name).collect())
}

/// Decode the crew column
pub fn decode_crew(raw: &str, file: &str, line: usize) -> Result<Vec<CrewMember>> {
    decode_field(raw, file, line, "crew")
}

/// Join movie rows with credit rows on exact title.
///
/// Inner join semantics: movie rows keep their order, and every credits row
/// with the same title yields one output record. Rows with any required
/// column missing are dropped before their JSON columns are decoded.
pub fn join_records(
    movies: Vec<MovieRow>,
    credits: Vec<CreditRow>,
    movies_file: &str,
    credits_file: &str,
) -> Result<Vec<RawMovie>> {
    let mut credits_by_title: HashMap<String, Vec<CreditRow>> = HashMap::new();
    for credit in credits {
        if let Some(title) = credit.title.clone() {
            credits_by_title.entry(title).or_default().push(credit);
        }
    }

    let mut joined = Vec::with_capacity(movies.len());
    let mut dropped = 0usize;

    for movie in movies {
        let Some(title) = movie.title.as_deref() else {
            dropped += 1;
            continue;
        };
        let Some(matches) = credits_by_title.get(title) else {
            continue;
        };

        for credit in matches {
            let (Some(overview), Some(genres), Some(keywords), Some(movie_id), Some(cast), Some(crew)) = (
                movie.overview.as_deref(),
                movie.genres.as_deref(),
                movie.keywords.as_deref(),
                credit.movie_id.as_deref(),
                credit.cast.as_deref(),
                credit.crew.as_deref(),
            ) else {
                dropped += 1;
                continue;
            };

            let id = movie_id.trim().parse().map_err(|e| DataLoadError::ParseError {
                file: credits_file.to_string(),
                line: credit.line,
                reason: format!("Invalid movie_id: {}", e),
            })?;

            joined.push(RawMovie {
                id,
                title: title.to_string(),
                overview: overview.to_string(),
                genres: decode_names(genres, movies_file, movie.line, "genres")?,
                keywords: decode_names(keywords, movies_file, movie.line, "keywords")?,
                cast: decode_names(cast, credits_file, credit.line, "cast")?,
                crew: decode_crew(crew, credits_file, credit.line)?,
            });
        }
    }

    debug!("Dropped {} records with missing fields", dropped);
    Ok(joined)
}

/// Parse both exports in parallel and join them
pub fn load_raw_movies(movies_path: &Path, credits_path: &Path) -> Result<Vec<RawMovie>> {
    info!(
        "Loading TMDB exports from {:?} and {:?}",
        movies_path, credits_path
    );

    let (movies, credits) = rayon::join(
        || parse_movies(movies_path),
        || parse_credits(credits_path),
    );
    let movies = movies?;
    let credits = credits?;

    let joined = join_records(
        movies,
        credits,
        &file_label(movies_path),
        &file_label(credits_path),
    )?;
    info!("Joined {} movie records", joined.len());
    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie_row(line: usize, title: &str, overview: Option<&str>) -> MovieRow {
        MovieRow {
            line,
            title: Some(title.to_string()),
            overview: overview.map(str::to_string),
            genres: Some(r#"[{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}]"#.to_string()),
            keywords: Some(r#"[{"id": 1, "name": "dream"}]"#.to_string()),
        }
    }

    fn credit_row(line: usize, id: &str, title: &str) -> CreditRow {
        CreditRow {
            line,
            movie_id: Some(id.to_string()),
            title: Some(title.to_string()),
            cast: Some(r#"[{"name": "Leonardo DiCaprio", "order": 0}, {"name": "Joseph Gordon-Levitt", "order": 1}]"#.to_string()),
            crew: Some(r#"[{"name": "Hans Zimmer", "job": "Original Music Composer"}, {"name": "Christopher Nolan", "job": "Director"}]"#.to_string()),
        }
    }

    #[test]
    fn test_decode_names_keeps_order() {
        let names = decode_names(
            r#"[{"id": 1, "name": "b"}, {"id": 2, "name": "a"}]"#,
            "movies.csv",
            2,
            "genres",
        )
        .unwrap();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_malformed_field_is_fatal() {
        let result = decode_names("[{'name': 'Action'", "movies.csv", 7, "genres");
        assert!(matches!(
            result,
            Err(DataLoadError::MalformedField { line: 7, .. })
        ));
    }

    #[test]
    fn test_join_on_title() {
        let movies = vec![
            movie_row(2, "Inception", Some("A thief who steals secrets")),
            movie_row(3, "No Credits", Some("Nothing to join")),
        ];
        let credits = vec![credit_row(2, "27205", "Inception")];

        let joined = join_records(movies, credits, "movies.csv", "credits.csv").unwrap();
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].id, 27205);
        assert_eq!(joined[0].genres, vec!["Action", "Science Fiction"]);
        assert_eq!(joined[0].director(), Some("Christopher Nolan"));
    }

    #[test]
    fn test_missing_overview_is_dropped() {
        let movies = vec![movie_row(2, "Inception", None)];
        let credits = vec![credit_row(2, "27205", "Inception")];

        let joined = join_records(movies, credits, "movies.csv", "credits.csv").unwrap();
        assert!(joined.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let result = parse_movies(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(DataLoadError::FileNotFound { .. })));
    }
}
