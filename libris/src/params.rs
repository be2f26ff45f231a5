//! Listing parameters and their translation into a store query.

use libris_core::query::{Expr, Filter, Query, SortDirection};
use serde::Deserialize;

use crate::book::fields;

/// Optional parameters accepted when listing books, under their wire names.
///
/// Every parameter arrives as raw text. An empty value is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    #[serde(rename = "auteur")]
    pub author: Option<String>,
    #[serde(rename = "disponible")]
    pub available: Option<String>,
    pub genre: Option<String>,
    #[serde(rename = "minNote")]
    pub min_rating: Option<String>,
    #[serde(rename = "tri")]
    pub sort: Option<String>,
    #[serde(rename = "ordre")]
    pub order: Option<String>,
}

impl ListParams {
    /// Builds the filter and sort these parameters describe.
    ///
    /// - `auteur` keeps books by that exact author
    /// - `disponible` keeps available books when it is `"true"`, unavailable ones otherwise
    /// - `genre` keeps books listing that genre
    /// - `minNote` keeps books rated at least its leading number; text without one matches nothing
    /// - `tri` sorts on that field name as given, descending only when `ordre` is `"desc"`
    ///
    /// Clauses are combined with AND. Without any clause the query has no filter.
    pub fn to_query(&self) -> Query {
        let mut clauses: Vec<Expr> = Vec::new();

        if let Some(author) = present(&self.author) {
            clauses.push(Filter::eq(fields::AUTHOR, author));
        }
        if let Some(available) = present(&self.available) {
            clauses.push(Filter::eq(fields::AVAILABLE, available == "true"));
        }
        if let Some(genre) = present(&self.genre) {
            clauses.push(Filter::contains(fields::GENRES, genre));
        }
        if let Some(min_rating) = present(&self.min_rating) {
            clauses.push(Filter::gte(fields::RATING, parse_rating(min_rating)));
        }

        let mut builder = Query::builder();

        if !clauses.is_empty() {
            builder = builder.filter(Filter::and(clauses));
        }
        if let Some(field) = present(&self.sort) {
            let direction = match present(&self.order) {
                Some("desc") => SortDirection::Desc,
                _ => SortDirection::Asc,
            };
            builder = builder.sort(field, direction);
        }

        builder.build()
    }
}

/// Free-function form of [`ListParams::to_query`].
pub fn build_query(params: &ListParams) -> Query {
    params.to_query()
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Reads the rating bound the way JavaScript's `parseFloat` does: leading whitespace is
/// skipped, the longest numeric prefix is read and anything after it is ignored (`"3,5"` is 3).
/// Without a numeric prefix the bound is NaN, which no rating satisfies.
fn parse_rating(raw: &str) -> f64 {
    numeric_prefix(raw.trim_start())
        .parse()
        .unwrap_or(f64::NAN)
}

/// Longest leading slice of `text` forming a decimal number: an optional sign, then
/// `Infinity` or digits with an optional fraction and exponent.
fn numeric_prefix(text: &str) -> &str {
    const INFINITY: &str = "Infinity";

    let bytes = text.as_bytes();
    let digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    if text[end..].starts_with(INFINITY) {
        return &text[..end + INFINITY.len()];
    }

    let integer = digits(end);
    end += integer;

    let mut mantissa = integer;
    if bytes.get(end) == Some(&b'.') {
        let fraction = digits(end + 1);
        if integer + fraction > 0 {
            end += 1 + fraction;
            mantissa += fraction;
        }
    }

    if mantissa == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_digits = digits(exponent);
        if exponent_digits > 0 {
            end = exponent + exponent_digits;
        }
    }

    &text[..end]
}
