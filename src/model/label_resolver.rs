//! Label resolution for Nexus file and Newick tree parsing.
//!
//! Newick strings inside a Nexus TREES block usually reference taxa through
//! TRANSLATE keys or 1-based TAXA indices; [LabelResolver] maps them back
//! to full taxon labels.

use std::collections::HashMap;
use std::fmt;
use std::fmt::Display;

// =#========================================================================#=
// LABEL RESOLVER
// =#========================================================================€=
/// Resolves leaf labels in Newick strings during parsing.
///
/// - [`VerbatimLabels`](Self::VerbatimLabels): raw Newick files or NEXUS without TRANSLATE
/// - [`NexusLabels`](Self::NexusLabels): NEXUS with TRANSLATE command and/or TAXA block
#[derive(Debug, Clone, Default)]
pub enum LabelResolver {
    /// Labels are taken as they appear.
    #[default]
    VerbatimLabels,

    /// Resolves labels using the Nexus TRANSLATE map and TAXA block.
    ///
    /// Tries to resolve in order:
    /// 1. Key provided by TRANSLATE map
    ///    (e.g. "terny" -> "White-fronted tern")
    /// 2. Integer as 1-based index of label in TAXA block
    ///    (e.g. 12 -> "White-fronted tern")
    /// 3. Verbatim label, if it is a declared taxon or no taxa are declared
    NexusLabels {
        /// TRANSLATE key -> taxon label
        translation: HashMap<String, String>,
        /// Taxa in TAXA block order
        taxa: Vec<String>,
    },
}

impl LabelResolver {
    /// Creates a [`NexusLabels`](Self::NexusLabels) resolver.
    pub fn new_nexus_labels_resolver(translation: HashMap<String, String>, taxa: Vec<String>) -> Self {
        LabelResolver::NexusLabels { translation, taxa }
    }

    /// Resolves a parsed label string to its taxon label.
    ///
    /// # Errors
    /// [LabelResolvingError] if a Nexus label matches neither a TRANSLATE
    /// key, a TAXA index, nor a declared taxon.
    pub fn resolve_label(&self, parsed_label: &str) -> Result<String, LabelResolvingError> {
        match self {
            LabelResolver::VerbatimLabels => Ok(parsed_label.to_string()),

            LabelResolver::NexusLabels { translation, taxa } => {
                if let Some(label) = translation.get(parsed_label) {
                    return Ok(label.clone());
                }

                if let (Ok(nexus_index), false) = (parsed_label.parse::<usize>(), taxa.is_empty()) {
                    if nexus_index == 0 || nexus_index > taxa.len() {
                        return Err(LabelResolvingError(format!(
                            "Nexus label index {nexus_index} out of bounds \
                             (1-based indexing, max {})",
                            taxa.len()
                        )));
                    }
                    return Ok(taxa[nexus_index - 1].clone());
                }

                if taxa.is_empty() || taxa.iter().any(|t| t == parsed_label) {
                    return Ok(parsed_label.to_string());
                }

                Err(LabelResolvingError(format!(
                    "Could not resolve label '{parsed_label}'"
                )))
            }
        }
    }
}

// =#========================================================================#=
// LABEL RESOLVING ERROR
// =#========================================================================$=
/// Error returned when [`LabelResolver::resolve_label`] cannot resolve a label.
#[derive(Debug)]
pub struct LabelResolvingError(String);

impl Display for LabelResolvingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> LabelResolver {
        let translation = HashMap::from([("kaka".to_string(), "Nestor meridionalis".to_string())]);
        let taxa = vec!["Nestor meridionalis".to_string(), "Nestor notabilis".to_string()];
        LabelResolver::new_nexus_labels_resolver(translation, taxa)
    }

    #[test]
    fn test_resolve_translate_key_index_and_verbatim() {
        let resolver = resolver();
        assert_eq!(resolver.resolve_label("kaka").unwrap(), "Nestor meridionalis");
        assert_eq!(resolver.resolve_label("2").unwrap(), "Nestor notabilis");
        assert_eq!(resolver.resolve_label("Nestor notabilis").unwrap(), "Nestor notabilis");
    }

    #[test]
    fn test_resolve_unknown_fails() {
        let resolver = resolver();
        assert!(resolver.resolve_label("3").is_err());
        assert!(resolver.resolve_label("kea").is_err());
    }

    #[test]
    fn test_verbatim_passes_through() {
        assert_eq!(LabelResolver::VerbatimLabels.resolve_label("17").unwrap(), "17");
    }
}
