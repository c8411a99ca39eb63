use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// A stored document: a JSON object keyed by field name.
pub type Document = Map<String, Value>;

/// Primary key field present on every stored document.
pub const ID_FIELD: &str = "_id";

/// Field changes applied to a single document.
///
/// `set` replaces only the fields it names; `inc` adds to numeric fields,
/// treating a missing or non-numeric field as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    set: Document,
    inc: Vec<(String, f64)>,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    /// Partial replacement built from the fields of `document`. The id field is never rewritten.
    pub fn set(mut document: Document) -> Self {
        document.remove(ID_FIELD);
        Self {
            set: document,
            inc: Vec::new(),
        }
    }

    pub fn set_field(mut self, field: &str, value: impl Into<Value>) -> Self {
        if field != ID_FIELD {
            self.set.insert(field.to_string(), value.into());
        }
        self
    }

    pub fn inc(mut self, field: &str, amount: f64) -> Self {
        self.inc.push((field.to_string(), amount));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.inc.is_empty()
    }

    /// Applies the changes in place and reports whether the document changed.
    pub fn apply(&self, document: &mut Document) -> bool {
        let mut changed = false;

        for (field, value) in &self.set {
            if document.get(field) != Some(value) {
                document.insert(field.clone(), value.clone());
                changed = true;
            }
        }

        for (field, amount) in &self.inc {
            let current = document.get(field).and_then(Value::as_f64).unwrap_or(0.0);
            let next = number_value(current + amount);
            if document.get(field) != Some(&next) {
                document.insert(field.clone(), next);
                changed = true;
            }
        }

        changed
    }

    /// Document written when an upsert matches nothing: the id plus the updated fields only.
    pub fn to_upserted(&self, id: &str) -> Document {
        let mut document = Document::new();
        document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        self.apply(&mut document);
        document
    }
}

/// Integral results stay integers so stored totals read back the way they were written.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(String, Value),
    /// Missing fields count as not equal.
    Ne(String, Value),
    /// Literal, case-insensitive substring match on a string field.
    ContainsIgnoreCase(String, String),
}

impl Condition {
    fn matches(&self, document: &Document) -> bool {
        match self {
            Condition::Eq(field, value) => document.get(field) == Some(value),
            Condition::Ne(field, value) => document.get(field) != Some(value),
            Condition::ContainsIgnoreCase(field, needle) => document
                .get(field)
                .and_then(Value::as_str)
                .map(|haystack| haystack.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
        }
    }
}

/// Conjunction of conditions. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: &str) -> Self {
        Self::new().eq(ID_FIELD, id)
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Eq(field.to_string(), value.into()));
        self
    }

    pub fn ne(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Ne(field.to_string(), value.into()));
        self
    }

    pub fn contains_ignore_case(mut self, field: &str, needle: impl Into<String>) -> Self {
        self.conditions
            .push(Condition::ContainsIgnoreCase(field.to_string(), needle.into()));
        self
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.conditions.iter().all(|c| c.matches(document))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    pub field: String,
    pub descending: bool,
}

/// Filter, ordering and paging for a collection read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    pub filter: Filter,
    pub sort: Option<Sort>,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl FindQuery {
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn sort_desc(mut self, field: &str) -> Self {
        self.sort = Some(Sort {
            field: field.to_string(),
            descending: true,
        });
        self
    }

    pub fn sort_asc(mut self, field: &str) -> Self {
        self.sort = Some(Sort {
            field: field.to_string(),
            descending: false,
        });
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Evaluates the query over documents given in storage order.
    pub fn apply(&self, documents: impl IntoIterator<Item = Document>) -> Vec<Document> {
        let mut matched: Vec<Document> = documents
            .into_iter()
            .filter(|d| self.filter.matches(d))
            .collect();

        if let Some(sort) = &self.sort {
            matched.sort_by(|a, b| {
                let ordering = compare_values(a.get(&sort.field), b.get(&sort.field));
                if sort.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        let page = matched.into_iter().skip(self.skip);
        match self.limit {
            Some(limit) => page.take(limit).collect(),
            None => page.collect(),
        }
    }
}

/// Missing values sort lowest. Strings that parse as RFC 3339 timestamps compare chronologically.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (parse_timestamp(x), parse_timestamp(y)) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
