//! Structs and logic to parse Newick strings.
//!
//! This module provides the [NewickParser] struct, which parses a single
//! rooted tree from a [ByteParser].

use crate::model::annotation::AnnotationValue;
use crate::model::tree_builder::{PhyloTreeBuilder, TreeBuilder};
use crate::model::vertex::BranchLength;
use crate::model::LabelResolver;
use crate::newick::defs::{
    ANNOTATION_KEY_DELIMITERS, ANNOTATION_VALUE_DELIMITERS, DEFAULT_NUM_VERTICES_GUESS,
    NEWICK_LABEL_DELIMITERS,
};
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::ParsingError;

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================$=
/// Parser (configuration) for rooted Newick trees with any number of
/// children per vertex.
///
/// Generic over [TreeBuilder] (construction). Uses a [LabelResolver] to
/// resolve leaf labels, e.g. as necessary when parsing a Nexus file with a
/// `TRANSLATE` command.
///
/// # Configuration
/// * [`with_annotations()`](Self::with_annotations)
///     - Configures the parser to parse vertex annotations
///       (e.g. `[&height=0.5,location="New Zealand"]`) instead of treating
///       them as comments.
/// * [`with_resolver(resolver)`](Self::with_resolver)
///
/// # Example
/// ```
/// use phylotrunk::newick::NewickParser;
/// use phylotrunk::parser::ByteParser;
///
/// let input = "((Apteryx_haastii:1.0,Apteryx_owenii:1.0)[&height=1.0]:0.5,Apteryx_australis:1.5)[&height=1.5];";
/// let mut byte_parser = ByteParser::for_str(input);
/// let mut newick_parser = NewickParser::new_defaults().with_annotations();
///
/// let tree = newick_parser.parse_str(&mut byte_parser).unwrap();
/// assert_eq!(tree.num_leaves(), 3);
/// ```
pub struct NewickParser<T: TreeBuilder> {
    num_vertices: usize,
    tree_builder: T,
    resolver: LabelResolver,
    parse_annotations: bool,
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl<T: TreeBuilder> NewickParser<T> {
    /// Creates a new [NewickParser] with the given tree builder
    /// and verbatim label resolver as default.
    pub fn new(tree_builder: T) -> Self {
        Self {
            num_vertices: DEFAULT_NUM_VERTICES_GUESS,
            tree_builder,
            resolver: LabelResolver::VerbatimLabels,
            parse_annotations: false,
        }
    }

    /// Replaces the resolver, e.g. with one configured from a TRANSLATE command.
    pub fn with_resolver(mut self, resolver: LabelResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replaces the resolver in place.
    pub(crate) fn set_resolver(&mut self, resolver: LabelResolver) -> &mut Self {
        self.resolver = resolver;
        self
    }

    /// Configures the parser to parse vertex annotations.
    pub fn with_annotations(mut self) -> Self {
        self.parse_annotations = true;
        self
    }

    /// Consumes the parser and returns the tree builder.
    pub fn into_builder(self) -> T {
        self.tree_builder
    }
}

impl NewickParser<PhyloTreeBuilder> {
    /// Creates a new [NewickParser] for [PhyloTree](crate::model::PhyloTree)
    /// with verbatim label resolution and annotations treated as comments.
    pub fn new_defaults() -> Self {
        Self::new(PhyloTreeBuilder::new())
    }
}

impl Default for NewickParser<PhyloTreeBuilder> {
    fn default() -> Self {
        Self::new_defaults()
    }
}

// ============================================================================
// API Parsing (pub)
// ============================================================================
impl<T: TreeBuilder> NewickParser<T> {
    /// Parses a single Newick tree from the given [ByteParser].
    ///
    /// # Arguments
    /// * `parser` - The byte parser positioned at the start of a Newick tree string
    ///
    /// # Returns
    /// * `Ok(T::Tree)` - The parsed phylogenetic tree
    /// * `Err(ParsingError)` - If the Newick format is invalid
    pub fn parse_str<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<T::Tree, ParsingError> {
        self.parse_str_and_name(parser, None)
    }

    /// Parses a single Newick tree and gives it the provided name.
    pub(crate) fn parse_str_and_name<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        tree_name: Option<String>,
    ) -> Result<T::Tree, ParsingError> {
        // Leading blocks such as the rooting comment `[&R]` carry no vertex data
        parser.skip_comment_and_whitespace()?;
        if parser.is_eof() {
            return Err(ParsingError::empty_input(parser));
        }

        self.tree_builder.init_next(self.num_vertices);
        if let Some(name) = tree_name {
            self.tree_builder.set_name(name);
        }

        let mut num_vertices = 0;
        self.parse_root(parser, &mut num_vertices)?;
        // Next tree is likely of similar size
        self.num_vertices = num_vertices;

        self.tree_builder
            .finish_tree()
            .ok_or_else(|| ParsingError::invalid_newick_string(parser, "No tree was built".to_string()))
    }
}

// ============================================================================
// Parsing
// ============================================================================
/// Label, annotations and branch length that may follow a vertex.
struct VertexSuffix {
    label: Option<String>,
    annotations: Vec<(String, AnnotationValue)>,
    branch_length: Option<BranchLength>,
}

impl<T: TreeBuilder> NewickParser<T> {
    /// Parses root of tree and adds it to tree:
    /// - `(children)[label][annotation][:branch_length][annotation];`
    ///   or `label[annotation][:branch_length];` for a single-vertex tree
    /// - Consumes the terminating semicolon
    fn parse_root<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        num_vertices: &mut usize,
    ) -> Result<(), ParsingError> {
        self.skip_to_token(parser)?;

        let children = if parser.peek_is(b'(') {
            self.parse_children(parser, num_vertices)?
        } else {
            Vec::new()
        };
        let is_leaf = children.is_empty();
        let suffix = self.parse_vertex_suffix(parser, is_leaf)?;

        self.skip_to_token(parser)?;
        if !parser.consume_if(b';') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected ';' at end of tree but found {:?}", next_char),
            ));
        }

        *num_vertices += 1;
        let root_index = self
            .tree_builder
            .add_root(children, suffix.branch_length, suffix.label);
        self.add_annotations(suffix.annotations, root_index);

        Ok(())
    }

    /// Parses a vertex (either internal vertex or leaf) and returns its index.
    fn parse_vertex<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        num_vertices: &mut usize,
    ) -> Result<T::VertexIdx, ParsingError> {
        self.skip_to_token(parser)?;

        let index = if parser.peek_is(b'(') {
            let children = self.parse_children(parser, num_vertices)?;
            let suffix = self.parse_vertex_suffix(parser, false)?;
            let index = self
                .tree_builder
                .add_internal(children, suffix.branch_length, suffix.label);
            self.add_annotations(suffix.annotations, index);
            index
        } else {
            let suffix = self.parse_vertex_suffix(parser, true)?;
            let index = self.tree_builder.add_leaf(suffix.branch_length, suffix.label);
            self.add_annotations(suffix.annotations, index);
            index
        };

        *num_vertices += 1;
        Ok(index)
    }

    /// Parses children list `(child{,child})` and returns their indices in order.
    /// Expects parser at opening `(`.
    fn parse_children<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        num_vertices: &mut usize,
    ) -> Result<Vec<T::VertexIdx>, ParsingError> {
        if !parser.consume_if(b'(') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected '(' before children but found {:?}", next_char),
            ));
        }

        let mut children = Vec::with_capacity(2);
        loop {
            children.push(self.parse_vertex(parser, num_vertices)?);

            self.skip_to_token(parser)?;
            match parser.next_byte() {
                Some(b',') => continue,
                Some(b')') => break,
                None => return Err(ParsingError::unexpected_eof(parser)),
                Some(other) => {
                    return Err(ParsingError::invalid_newick_string(
                        parser,
                        format!(
                            "Expected ',' or ')' after child but found {:?}",
                            char::from(other)
                        ),
                    ));
                }
            }
        }

        Ok(children)
    }

    /// Parses what may follow a vertex: label, annotation blocks and branch
    /// length. Annotations are accepted both before and after the length.
    fn parse_vertex_suffix<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        is_leaf: bool,
    ) -> Result<VertexSuffix, ParsingError> {
        self.skip_to_token(parser)?;
        let raw_label = match parser.peek() {
            Some(b'\'') => Some(parser.parse_quoted_label(b'\'')?),
            Some(b) if !NEWICK_LABEL_DELIMITERS.contains(&b) => {
                Some(parser.parse_unquoted_label(NEWICK_LABEL_DELIMITERS)?)
            }
            _ => None,
        };

        // Only leaf labels name taxa; internal labels are kept as written
        let label = match raw_label {
            Some(label) if is_leaf => Some(
                self.resolver
                    .resolve_label(&label)
                    .map_err(|e| ParsingError::unresolved_label(parser, e.to_string()))?,
            ),
            other => other,
        };

        let mut annotations = Vec::new();
        let mut branch_length = None;
        loop {
            self.skip_to_token(parser)?;
            if self.parse_annotations && parser.peek_is_sequence(b"[&") {
                annotations.extend(self.parse_annotations(parser)?);
            } else if branch_length.is_none() && parser.consume_if(b':') {
                branch_length = Some(self.parse_branch_length(parser)?);
            } else {
                break;
            }
        }

        Ok(VertexSuffix {
            label,
            annotations,
            branch_length,
        })
    }

    /// Parses a branch length value after the `:`.
    /// Supports scientific notation (e.g., `1.5e-10`).
    ///
    /// # Errors
    /// If the number is malformed, negative or not finite.
    fn parse_branch_length<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<BranchLength, ParsingError> {
        self.skip_to_token(parser)?;

        let mut branch_length_str = String::new();
        while let Some(b) = parser.peek() {
            if b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E') {
                branch_length_str.push(b as char);
                parser.next_byte();
            } else {
                break;
            }
        }

        let value: f64 = branch_length_str.parse().map_err(|_| {
            ParsingError::invalid_newick_string(
                parser,
                format!("Invalid branch length: {:?}", branch_length_str),
            )
        })?;
        BranchLength::try_new(value).ok_or_else(|| {
            ParsingError::invalid_newick_string(
                parser,
                format!("Branch length must be non-negative and finite, got {value}"),
            )
        })
    }

    /// Parses an annotation block `[&key=value,...]`.
    ///
    /// Values may be bare (parsed as integer, float or string), quoted with
    /// `"` or `'` (always string), or a `{...}` set (kept as raw string).
    fn parse_annotations<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<Vec<(String, AnnotationValue)>, ParsingError> {
        if !parser.consume_if_sequence(b"[&") {
            return Ok(Vec::new());
        }

        let mut annotations = Vec::new();
        loop {
            parser.skip_whitespace();
            let key = parser.parse_unquoted_label(ANNOTATION_KEY_DELIMITERS)?;
            if key.is_empty() {
                return Err(ParsingError::invalid_annotation(
                    parser,
                    "Empty annotation key".to_string(),
                ));
            }

            parser.skip_whitespace();
            if !parser.consume_if(b'=') {
                return Err(ParsingError::invalid_annotation(
                    parser,
                    format!("Expected '=' after annotation key '{key}'"),
                ));
            }
            parser.skip_whitespace();

            let value = self.parse_annotation_value(parser, &key)?;
            annotations.push((key, value));

            parser.skip_whitespace();
            match parser.next_byte() {
                Some(b',') => continue,
                Some(b']') => break,
                None => return Err(ParsingError::unclosed_comment(parser)),
                Some(other) => {
                    return Err(ParsingError::invalid_annotation(
                        parser,
                        format!("Expected ',' or ']' but found {:?}", char::from(other)),
                    ));
                }
            }
        }

        Ok(annotations)
    }

    fn parse_annotation_value<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        key: &str,
    ) -> Result<AnnotationValue, ParsingError> {
        match parser.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                Ok(AnnotationValue::String(parser.parse_quoted_label(quote)?))
            }
            Some(b'{') => {
                let mut raw = Vec::new();
                let mut depth = 0usize;
                loop {
                    let b = parser.next_byte().ok_or_else(|| ParsingError::unexpected_eof(parser))?;
                    raw.push(b);
                    match b {
                        b'{' => depth += 1,
                        b'}' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                Ok(AnnotationValue::String(String::from_utf8_lossy(&raw).into_owned()))
            }
            _ => {
                let raw = parser.parse_unquoted_label(ANNOTATION_VALUE_DELIMITERS)?;
                let token = raw.trim();
                if token.is_empty() {
                    return Err(ParsingError::invalid_annotation(
                        parser,
                        format!("Empty annotation value for key '{key}'"),
                    ));
                }
                Ok(AnnotationValue::from_token(token))
            }
        }
    }

    /// Skips whitespace and comments, but stops in front of an annotation
    /// block if annotations are parsed.
    fn skip_to_token<B: ByteSource>(&self, parser: &mut ByteParser<B>) -> Result<(), ParsingError> {
        loop {
            parser.skip_whitespace();
            if self.parse_annotations && parser.peek_is_sequence(b"[&") {
                return Ok(());
            }
            if !parser.skip_comment()? {
                return Ok(());
            }
        }
    }

    /// Passes parsed annotations on to the [TreeBuilder].
    fn add_annotations(&mut self, annotations: Vec<(String, AnnotationValue)>, vertex_index: T::VertexIdx) {
        for (key, value) in annotations {
            self.tree_builder.add_annotation(key, vertex_index, value);
        }
    }
}
