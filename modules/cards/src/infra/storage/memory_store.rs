use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use parking_lot::RwLock;

use crate::domain::store::{DocumentStore, StoreError, WriteOutcome};

/// In-process `DocumentStore` with the MongoDB behaviour the card service relies on:
/// generated ObjectIds, unique `_id`, optional unique compound keys, an immutable
/// `_id`, and equality filters without string/number coercion.
#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<Vec<Document>>,
    unique_keys: Vec<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes that would give two documents the same values for `fields`.
    pub fn with_unique_index(mut self, fields: &[&str]) -> Self {
        self.unique_keys
            .push(fields.iter().map(|f| (*f).to_string()).collect());
        self
    }

    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    // Duplicate-key check against every document except the one at `skip`.
    fn check_unique(
        &self,
        docs: &[Document],
        candidate: &Document,
        skip: Option<usize>,
    ) -> Result<(), StoreError> {
        let others = docs
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != skip)
            .map(|(_, d)| d);

        for other in others {
            if let (Some(a), Some(b)) = (candidate.get("_id"), other.get("_id")) {
                if values_equal(a, b) {
                    return Err(duplicate_error("_id_", &[("_id", a)]));
                }
            }
            for fields in &self.unique_keys {
                let same = fields
                    .iter()
                    .all(|f| values_equal(field_or_null(candidate, f), field_or_null(other, f)));
                if same {
                    let key: Vec<(&str, &Bson)> = fields
                        .iter()
                        .map(|f| (f.as_str(), field_or_null(candidate, f)))
                        .collect();
                    return Err(duplicate_error(&index_name(fields), &key));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, doc: Document) -> Result<Bson, StoreError> {
        let id = doc
            .get("_id")
            .cloned()
            .unwrap_or_else(|| Bson::ObjectId(ObjectId::new()));
        let stored = with_id_first(&id, doc);

        let mut docs = self.docs.write();
        self.check_unique(&docs, &stored, None)?;
        docs.push(stored);
        Ok(id)
    }

    async fn find(&self, filter: Document) -> Result<Vec<Document>, StoreError> {
        let docs = self.docs.read();
        Ok(docs.iter().filter(|d| filter_matches(d, &filter)).cloned().collect())
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, StoreError> {
        let docs = self.docs.read();
        Ok(docs.iter().find(|d| filter_matches(d, &filter)).cloned())
    }

    async fn replace(&self, filter: Document, doc: Document) -> Result<WriteOutcome, StoreError> {
        let mut docs = self.docs.write();
        let Some(pos) = docs.iter().position(|d| filter_matches(d, &filter)) else {
            return Ok(WriteOutcome::default());
        };

        let id = docs[pos].get("_id").cloned().unwrap_or(Bson::Null);
        if let Some(new_id) = doc.get("_id") {
            if !values_equal(new_id, &id) {
                return Err(StoreError::backend(format!(
                    "After applying the update, the (immutable) field '_id' was found to have been altered to _id: {new_id}"
                )));
            }
        }

        let replacement = with_id_first(&id, doc);
        self.check_unique(&docs, &replacement, Some(pos))?;
        let modified = docs[pos] != replacement;
        if modified {
            docs[pos] = replacement;
        }
        Ok(WriteOutcome {
            matched: 1,
            modified: u64::from(modified),
        })
    }

    async fn update_fields(
        &self,
        filter: Document,
        fields: Document,
    ) -> Result<WriteOutcome, StoreError> {
        let mut docs = self.docs.write();
        let Some(pos) = docs.iter().position(|d| filter_matches(d, &filter)) else {
            return Ok(WriteOutcome::default());
        };

        if let (Some(new_id), Some(id)) = (fields.get("_id"), docs[pos].get("_id")) {
            if !values_equal(new_id, id) {
                return Err(StoreError::backend(
                    "Performing an update on the path '_id' would modify the immutable field '_id'",
                ));
            }
        }

        let mut updated = docs[pos].clone();
        for (key, value) in fields {
            updated.insert(key, value);
        }
        self.check_unique(&docs, &updated, Some(pos))?;
        let modified = docs[pos] != updated;
        if modified {
            docs[pos] = updated;
        }
        Ok(WriteOutcome {
            matched: 1,
            modified: u64::from(modified),
        })
    }

    async fn delete_one(&self, filter: Document) -> Result<u64, StoreError> {
        let mut docs = self.docs.write();
        match docs.iter().position(|d| filter_matches(d, &filter)) {
            Some(pos) => {
                docs.remove(pos);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_many(&self, filter: Document) -> Result<u64, StoreError> {
        let mut docs = self.docs.write();
        let before = docs.len();
        docs.retain(|d| !filter_matches(d, &filter));
        Ok((before - docs.len()) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

fn with_id_first(id: &Bson, doc: Document) -> Document {
    let mut out = Document::new();
    out.insert("_id", id.clone());
    for (key, value) in doc {
        if key != "_id" {
            out.insert(key, value);
        }
    }
    out
}

static NULL: Bson = Bson::Null;

fn field_or_null<'a>(doc: &'a Document, field: &str) -> &'a Bson {
    doc.get(field).unwrap_or(&NULL)
}

/// Top-level equality match. A `null` filter value also matches a missing field,
/// and a scalar matches any element of an array field.
fn filter_matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, expected)| match doc.get(key) {
        Some(Bson::Array(items)) if !matches!(expected, Bson::Array(_)) => {
            items.iter().any(|item| values_equal(item, expected))
        }
        Some(actual) => values_equal(actual, expected),
        None => matches!(expected, Bson::Null),
    })
}

// Numbers compare across int32/int64/double; everything else needs the same type.
// Integer pairs compare exactly, widening to f64 only when a double is involved.
fn values_equal(a: &Bson, b: &Bson) -> bool {
    match (a, b) {
        (Bson::Double(x), Bson::Double(y)) => x == y,
        (Bson::Double(x), other) | (other, Bson::Double(x)) => match as_integer(other) {
            Some(i) => *x == i as f64 && i128::from(i) == *x as i128,
            None => false,
        },
        _ => match (as_integer(a), as_integer(b)) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
    }
}

fn as_integer(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Int64(v) => Some(*v),
        _ => None,
    }
}

fn index_name(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| format!("{f}_1"))
        .collect::<Vec<_>>()
        .join("_")
}

fn duplicate_error(index: &str, key: &[(&str, &Bson)]) -> StoreError {
    let key = key
        .iter()
        .map(|(field, value)| format!("{field}: {value}"))
        .collect::<Vec<_>>()
        .join(", ");
    StoreError::duplicate_key(format!(
        "E11000 duplicate key error index: {index} dup key: {{ {key} }}"
    ))
}
