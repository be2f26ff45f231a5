//! Query translation from the libris query AST to MongoDB query syntax.

use bson::{Document, Bson, doc};

use libris_core::{
    query::{QueryVisitor, Expr, FieldOp, Sort, SortDirection},
    error::DocumentStoreError,
};

/// Translates query expressions into MongoDB filter documents.
///
/// The translation keeps the in-memory semantics: `Contains` only matches array elements,
/// and a NaN bound matches nothing (MongoDB itself orders NaN below every number).
pub(crate) struct MongoQueryTranslator;

impl MongoQueryTranslator {
    pub fn sort_document(sort: &Sort) -> Document {
        doc! {
            sort.field.clone(): match sort.direction {
                SortDirection::Asc => 1,
                SortDirection::Desc => -1,
            }
        }
    }
}

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        // MongoDB rejects an empty $and.
        if exprs.is_empty() {
            return Ok(doc! {});
        }

        Ok(doc! {
            "$and": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        if matches!(value, Bson::Double(number) if number.is_nan()) {
            return Ok(doc! { field: { "$in": [] } });
        }

        Ok(doc! {
            field: match op {
                FieldOp::Eq => doc! { "$eq": value },
                FieldOp::Gte => doc! { "$gte": value },
                FieldOp::Contains => doc! { "$elemMatch": { "$eq": value } },
            }
        })
    }
}
