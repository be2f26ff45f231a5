//! The book record and the rules an incoming payload must satisfy before it is stored.
//!
//! Wire and stored field names are the catalog's historical French keys (`titre`, `auteur`,
//! `annee`, ...). [`validate`] is the only way client input becomes a [`BookRecord`]: it checks
//! the rules in a fixed order, reports the first failure, and projects the payload onto
//! exactly the seven catalog fields.

use libris_core::document::{Document, Stored};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Stored and wire names of the book fields.
pub mod fields {
    pub const TITLE: &str = "titre";
    pub const AUTHOR: &str = "auteur";
    pub const YEAR: &str = "annee";
    pub const AVAILABLE: &str = "disponible";
    pub const GENRES: &str = "genres";
    pub const RATING: &str = "note";
    pub const STOCK: &str = "stock";

    /// Keys a client may never use to choose or overwrite an identifier.
    pub const IDENTIFIERS: [&str; 2] = ["_id", "id"];
}

/// Earliest publication year the catalog accepts.
pub const MIN_YEAR: i32 = 1800;

/// Highest rating a book can carry. The lowest is zero.
pub const MAX_RATING: f64 = 5.0;

/// A validated, normalized book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(rename = "titre")]
    pub title: String,
    #[serde(rename = "auteur")]
    pub author: String,
    #[serde(rename = "annee")]
    pub year: i32,
    #[serde(rename = "disponible")]
    pub available: bool,
    pub genres: Vec<String>,
    #[serde(rename = "note")]
    pub rating: f64,
    pub stock: i64,
}

impl Document for BookRecord {
    fn collection_name() -> &'static str {
        "livres"
    }
}

/// A persisted book: the record plus the identifier the store assigned.
pub type Book = Stored<BookRecord>;

/// Why a payload was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("`{0}` is required and must be a non-empty string")]
    MissingRequiredField(&'static str),
    #[error("`annee` must be an integer no earlier than 1800")]
    InvalidYear,
    #[error("`disponible` must be a boolean")]
    InvalidAvailability,
    #[error("`genres` must be an array of strings")]
    InvalidGenres,
    #[error("`note` must be a number between 0 and 5")]
    InvalidRating,
    #[error("`stock` must be a non-negative integer")]
    InvalidStock,
    #[error("`{0}` cannot be set by the client")]
    IdNotAllowed(&'static str),
}

impl ValidationError {
    /// Wire name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingRequiredField(field) | ValidationError::IdNotAllowed(field) => field,
            ValidationError::InvalidYear => fields::YEAR,
            ValidationError::InvalidAvailability => fields::AVAILABLE,
            ValidationError::InvalidGenres => fields::GENRES,
            ValidationError::InvalidRating => fields::RATING,
            ValidationError::InvalidStock => fields::STOCK,
        }
    }
}

/// Checks a candidate payload and returns the normalized record.
///
/// Rules are evaluated in order and the first failure wins:
///
/// 1. `titre` and `auteur` are non-empty strings
/// 2. `annee` is an integer, at least [`MIN_YEAR`]
/// 3. `disponible` is a boolean
/// 4. `genres` is an array of strings (possibly empty)
/// 5. `note` is a number in `[0, 5]`
/// 6. `stock` is a non-negative integer
/// 7. no `_id` or `id` key is present
///
/// A payload that is not a JSON object fails the first rule. Fields outside the seven above
/// are dropped.
///
/// # Errors
///
/// Returns the [`ValidationError`] of the first rule that fails.
pub fn validate(payload: &Value) -> Result<BookRecord, ValidationError> {
    let empty = Map::new();
    let object = payload.as_object().unwrap_or(&empty);

    let title = required_text(object, fields::TITLE)?;
    let author = required_text(object, fields::AUTHOR)?;

    let year = object
        .get(fields::YEAR)
        .and_then(integral)
        .and_then(|year| i32::try_from(year).ok())
        .filter(|year| *year >= MIN_YEAR)
        .ok_or(ValidationError::InvalidYear)?;

    let available = object
        .get(fields::AVAILABLE)
        .and_then(Value::as_bool)
        .ok_or(ValidationError::InvalidAvailability)?;

    let genres = object
        .get(fields::GENRES)
        .and_then(Value::as_array)
        .and_then(|genres| {
            genres
                .iter()
                .map(|genre| genre.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .ok_or(ValidationError::InvalidGenres)?;

    let rating = object
        .get(fields::RATING)
        .and_then(Value::as_f64)
        .filter(|rating| (0.0..=MAX_RATING).contains(rating))
        .ok_or(ValidationError::InvalidRating)?;

    let stock = object
        .get(fields::STOCK)
        .and_then(integral)
        .filter(|stock| *stock >= 0)
        .ok_or(ValidationError::InvalidStock)?;

    reject_identifier(payload)?;

    Ok(BookRecord { title, author, year, available, genres, rating, stock })
}

/// Refuses a payload carrying an identifier key.
///
/// # Errors
///
/// Returns [`ValidationError::IdNotAllowed`] naming the first identifier key found.
pub fn reject_identifier(payload: &Value) -> Result<(), ValidationError> {
    match fields::IDENTIFIERS
        .into_iter()
        .find(|key| payload.get(key).is_some())
    {
        Some(key) => Err(ValidationError::IdNotAllowed(key)),
        None => Ok(()),
    }
}

fn required_text(object: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    object
        .get(field)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or(ValidationError::MissingRequiredField(field))
}

/// Reads a JSON number with an integral value, accepting `3.0` as well as `3`.
fn integral(value: &Value) -> Option<i64> {
    // Past 2^53 an f64 no longer tells integers apart.
    const EXACT: f64 = 9_007_199_254_740_992.0;

    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|number| number.fract() == 0.0 && number.abs() <= EXACT)
            .map(|number| number as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dune() -> Value {
        json!({
            "titre": "Dune",
            "auteur": "Herbert",
            "annee": 1965,
            "disponible": true,
            "genres": ["sf", "classique"],
            "note": 4.8,
            "stock": 3,
        })
    }

    fn with(field: &str, value: Value) -> Value {
        let mut payload = dune();
        payload[field] = value;
        payload
    }

    fn without(field: &str) -> Value {
        let mut payload = dune();
        payload.as_object_mut().unwrap().remove(field);
        payload
    }

    #[test]
    fn accepts_a_complete_record() {
        let record = validate(&dune()).unwrap();

        assert_eq!(
            record,
            BookRecord {
                title: "Dune".into(),
                author: "Herbert".into(),
                year: 1965,
                available: true,
                genres: vec!["sf".into(), "classique".into()],
                rating: 4.8,
                stock: 3,
            }
        );
    }

    #[test]
    fn drops_unknown_fields() {
        let record = validate(&with("editeur", json!("Chilton"))).unwrap();
        let value = serde_json::to_value(&record).unwrap();

        assert!(value.get("editeur").is_none());
        assert_eq!(value.as_object().unwrap().len(), 7);
    }

    #[test]
    fn title_and_author_are_required() {
        assert_eq!(validate(&without("titre")), Err(ValidationError::MissingRequiredField("titre")));
        assert_eq!(validate(&with("auteur", json!(""))), Err(ValidationError::MissingRequiredField("auteur")));
        assert_eq!(validate(&with("titre", json!(42))), Err(ValidationError::MissingRequiredField("titre")));
    }

    #[test]
    fn non_object_payload_fails_first_rule() {
        assert_eq!(validate(&json!([1, 2])), Err(ValidationError::MissingRequiredField("titre")));
        assert_eq!(validate(&Value::Null), Err(ValidationError::MissingRequiredField("titre")));
    }

    #[test]
    fn year_must_be_an_integer_from_1800() {
        assert_eq!(validate(&with("annee", json!(1700))), Err(ValidationError::InvalidYear));
        assert_eq!(validate(&with("annee", json!("1965"))), Err(ValidationError::InvalidYear));
        assert_eq!(validate(&with("annee", json!(1965.5))), Err(ValidationError::InvalidYear));
        assert_eq!(validate(&with("annee", json!(1800))).unwrap().year, 1800);
        assert_eq!(validate(&with("annee", json!(1965.0))).unwrap().year, 1965);
    }

    #[test]
    fn availability_must_be_boolean() {
        assert_eq!(validate(&with("disponible", json!("true"))), Err(ValidationError::InvalidAvailability));
    }

    #[test]
    fn genres_must_be_strings() {
        assert_eq!(validate(&with("genres", json!("sf"))), Err(ValidationError::InvalidGenres));
        assert_eq!(validate(&with("genres", json!(["sf", 3]))), Err(ValidationError::InvalidGenres));
        assert!(validate(&with("genres", json!([]))).unwrap().genres.is_empty());
    }

    #[test]
    fn rating_is_bounded() {
        assert_eq!(validate(&with("note", json!(5.1))), Err(ValidationError::InvalidRating));
        assert_eq!(validate(&with("note", json!(-0.5))), Err(ValidationError::InvalidRating));
        assert_eq!(validate(&with("note", json!(0))).unwrap().rating, 0.0);
        assert_eq!(validate(&with("note", json!(5))).unwrap().rating, 5.0);
    }

    #[test]
    fn stock_is_a_non_negative_integer() {
        assert_eq!(validate(&with("stock", json!(-1))), Err(ValidationError::InvalidStock));
        assert_eq!(validate(&with("stock", json!(2.5))), Err(ValidationError::InvalidStock));
        assert_eq!(validate(&with("stock", json!(0))).unwrap().stock, 0);
    }

    #[test]
    fn identifiers_are_refused() {
        assert_eq!(validate(&with("_id", json!("abc"))), Err(ValidationError::IdNotAllowed("_id")));
        assert_eq!(validate(&with("id", json!(1))), Err(ValidationError::IdNotAllowed("id")));
    }

    #[test]
    fn first_failing_rule_wins() {
        let mut payload = with("annee", json!(1700));
        payload["note"] = json!(9);
        payload["_id"] = json!("abc");

        assert_eq!(validate(&payload), Err(ValidationError::InvalidYear));
    }

    #[test]
    fn errors_name_their_field() {
        assert_eq!(ValidationError::InvalidYear.field(), "annee");
        assert_eq!(ValidationError::MissingRequiredField("auteur").field(), "auteur");
        assert_eq!(ValidationError::IdNotAllowed("_id").field(), "_id");
    }

    #[test]
    fn record_serializes_with_wire_names() {
        let value = serde_json::to_value(validate(&dune()).unwrap()).unwrap();
        assert_eq!(value, dune());
    }
}
