//! Vertex annotations for phylogenetic trees.
//!
//! Provides the [Annotations] struct, which stores annotation values per key
//! as a column parallel to the tree's vertex arena. Values captured by
//! [AnnotationValue] are `f64`, `i64`, and `String`.
//!
//! Annotations of a non-root vertex also describe its incoming edge; this is
//! how the `trunk` edge count travels through Newick and Nexus files.

use crate::model::VertexIndex;
use std::collections::BTreeMap;
use std::fmt;

// =#========================================================================#=
// ANNOTATIONS
// =#========================================================================$=
/// Vertex annotations for multiple keys.
///
/// Keys are kept sorted, so serialization is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    annotations: BTreeMap<String, Vec<Option<AnnotationValue>>>,
    num_vertices: usize,
}

impl Annotations {
    /// Creates empty [Annotations] for a tree with `num_vertices` vertices.
    ///
    /// Columns grow on demand, so the count may be a guess during parsing.
    pub fn new(num_vertices: usize) -> Self {
        Annotations {
            annotations: BTreeMap::new(),
            num_vertices,
        }
    }

    /// Returns `true` if no value has been stored.
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Returns an iterator over all annotation keys, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.annotations.keys().map(String::as_str)
    }

    /// Returns `true` if at least one vertex has a value for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.annotations.contains_key(key)
    }

    /// Returns a single annotation value for a vertex.
    ///
    /// # Returns
    /// `None` if the key is unknown or the vertex has no value for it.
    pub fn get(&self, key: &str, vertex_index: VertexIndex) -> Option<&AnnotationValue> {
        self.annotations
            .get(key)
            .and_then(|column| column.get(vertex_index))
            .and_then(Option::as_ref)
    }

    /// Returns all `(key, value)` pairs stored for a vertex, keys sorted.
    pub fn for_vertex(
        &self,
        vertex_index: VertexIndex,
    ) -> impl Iterator<Item = (&str, &AnnotationValue)> {
        self.annotations.iter().filter_map(move |(key, column)| {
            column
                .get(vertex_index)
                .and_then(Option::as_ref)
                .map(|value| (key.as_str(), value))
        })
    }

    /// Adds (or replaces) an annotation value for a vertex.
    pub fn add(&mut self, key: impl Into<String>, vertex_index: VertexIndex, value: AnnotationValue) {
        let num_vertices = self.num_vertices.max(vertex_index + 1);
        self.num_vertices = num_vertices;
        let column = self
            .annotations
            .entry(key.into())
            .or_insert_with(|| vec![None; num_vertices]);
        if column.len() <= vertex_index {
            column.resize(vertex_index + 1, None);
        }
        column[vertex_index] = Some(value);
    }
}

/// Equal if both hold the same values for the same vertices, however far
/// their columns have grown.
impl PartialEq for Annotations {
    fn eq(&self, other: &Self) -> bool {
        self.annotations.len() == other.annotations.len()
            && self
                .annotations
                .iter()
                .zip(&other.annotations)
                .all(|((key, column), (other_key, other_column))| {
                    let len = column.len().max(other_column.len());
                    key == other_key
                        && (0..len).all(|i| {
                            column.get(i).and_then(Option::as_ref)
                                == other_column.get(i).and_then(Option::as_ref)
                        })
                })
    }
}

// =#========================================================================#=
// ANNOTATION VALUE
// =#========================================================================€=
/// A parsed annotation value.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    /// For floating point values
    Float(f64),
    /// For integer values
    Int(i64),
    /// For strings (including unparsed `{...}` sets)
    String(String),
}

impl AnnotationValue {
    /// Interprets a raw annotation token: integer first, then float, else string.
    pub fn from_token(token: &str) -> Self {
        if let Ok(v) = token.parse::<i64>() {
            AnnotationValue::Int(v)
        } else if let Ok(v) = token.parse::<f64>() {
            AnnotationValue::Float(v)
        } else {
            AnnotationValue::String(token.to_string())
        }
    }

    /// Returns the value as `f64` if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AnnotationValue::Float(v) => Some(*v),
            AnnotationValue::Int(v) => Some(*v as f64),
            AnnotationValue::String(_) => None,
        }
    }

    /// Returns the value as a non-negative integer.
    ///
    /// Floats are accepted only if they are integral.
    pub fn as_count(&self) -> Option<u64> {
        match self {
            AnnotationValue::Int(v) => u64::try_from(*v).ok(),
            AnnotationValue::Float(v) if *v >= 0.0 && v.fract() == 0.0 && v.is_finite() => {
                Some(*v as u64)
            }
            _ => None,
        }
    }
}

impl fmt::Display for AnnotationValue {
    /// Floats always keep a decimal point or exponent (`4.0`, `1e-10`), so
    /// written values are read back as the same variant.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Float(v) => write!(f, "{v:?}"),
            AnnotationValue::Int(v) => write!(f, "{v}"),
            AnnotationValue::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for AnnotationValue {
    fn from(v: f64) -> Self {
        AnnotationValue::Float(v)
    }
}

impl From<i64> for AnnotationValue {
    fn from(v: i64) -> Self {
        AnnotationValue::Int(v)
    }
}

impl From<u64> for AnnotationValue {
    fn from(v: u64) -> Self {
        AnnotationValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<usize> for AnnotationValue {
    fn from(v: usize) -> Self {
        AnnotationValue::from(v as u64)
    }
}

impl From<String> for AnnotationValue {
    fn from(v: String) -> Self {
        AnnotationValue::String(v)
    }
}

impl From<&str> for AnnotationValue {
    fn from(v: &str) -> Self {
        AnnotationValue::String(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token_prefers_int_then_float() {
        assert_eq!(AnnotationValue::from_token("12"), AnnotationValue::Int(12));
        assert_eq!(AnnotationValue::from_token("1.5e2"), AnnotationValue::Float(150.0));
        assert_eq!(
            AnnotationValue::from_token("Hauraki"),
            AnnotationValue::String("Hauraki".to_string())
        );
    }

    #[test]
    fn test_as_count() {
        assert_eq!(AnnotationValue::Int(3).as_count(), Some(3));
        assert_eq!(AnnotationValue::Float(4.0).as_count(), Some(4));
        assert_eq!(AnnotationValue::Float(4.5).as_count(), None);
        assert_eq!(AnnotationValue::Int(-1).as_count(), None);
        assert_eq!(AnnotationValue::from("7").as_count(), None);
    }

    #[test]
    fn test_add_grows_columns() {
        let mut annotations = Annotations::new(2);
        annotations.add("height", 5, AnnotationValue::Float(1.25));
        annotations.add("height", 0, AnnotationValue::Float(3.0));

        assert_eq!(annotations.get("height", 5), Some(&AnnotationValue::Float(1.25)));
        assert_eq!(annotations.get("height", 0), Some(&AnnotationValue::Float(3.0)));
        assert_eq!(annotations.get("height", 3), None);
        assert_eq!(annotations.get("rate", 0), None);
        assert!(annotations.contains_key("height"));
    }

    #[test]
    fn test_for_vertex_is_sorted_by_key() {
        let mut annotations = Annotations::new(1);
        annotations.add("trunk", 0, AnnotationValue::Int(2));
        annotations.add("id", 0, AnnotationValue::Int(1));
        let keys: Vec<_> = annotations.for_vertex(0).map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["id", "trunk"]);
    }

    #[test]
    fn test_equality_ignores_column_capacity() {
        let mut small = Annotations::new(1);
        let mut large = Annotations::new(40);
        small.add("trunk", 0, AnnotationValue::Int(2));
        large.add("trunk", 0, AnnotationValue::Int(2));
        assert_eq!(small, large);

        large.add("trunk", 39, AnnotationValue::Int(0));
        assert_ne!(small, large);
    }
}
