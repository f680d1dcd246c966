// Lexicon tables: static surface/normalized vocabularies.
//
// File format is two-column TSV, `surface<TAB>normalized`, one entry per
// line. Blank lines are skipped. Surface forms must be unique within a
// table; entry order is irrelevant to the grammar built from it.

use hashbrown::HashSet;
use norma_core::case::capitalize_first;
use norma_fst::Fst;

use crate::GrammarError;

/// An immutable surface/normalized mapping loaded from a delimited table.
///
/// The same table serves both directions: read as-is it maps surface to
/// normalized (verbalization), and [`invert`](Self::invert)ed it maps
/// normalized back to surface (classification).
#[derive(Debug, Clone)]
pub struct Lexicon {
    origin: String,
    entries: Vec<(String, String)>,
}

impl Lexicon {
    /// Load a lexicon from a TSV file on disk.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| GrammarError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_tsv(&path.display().to_string(), &data)
    }

    /// Parse a lexicon from in-memory TSV data (embedded tables).
    /// `origin` names the table in error messages.
    pub fn from_tsv(origin: &str, data: &str) -> Result<Self, GrammarError> {
        let mut entries = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for (index, raw) in data.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let Some((surface, normalized)) = line.split_once('\t') else {
                return Err(GrammarError::MalformedLine {
                    origin: origin.to_string(),
                    line: index + 1,
                });
            };
            if surface.is_empty() || normalized.is_empty() {
                return Err(GrammarError::MalformedLine {
                    origin: origin.to_string(),
                    line: index + 1,
                });
            }
            if !seen.insert(surface) {
                return Err(GrammarError::DuplicateSurface {
                    origin: origin.to_string(),
                    line: index + 1,
                    surface: surface.to_string(),
                });
            }
            entries.push((surface.to_string(), normalized.to_string()));
        }
        if entries.is_empty() {
            return Err(GrammarError::EmptyLexicon {
                origin: origin.to_string(),
            });
        }
        Ok(Self {
            origin: origin.to_string(),
            entries,
        })
    }

    /// Swap the surface and normalized columns.
    pub fn invert(&self) -> Lexicon {
        Lexicon {
            origin: self.origin.clone(),
            entries: self
                .entries
                .iter()
                .map(|(s, n)| (n.clone(), s.clone()))
                .collect(),
        }
    }

    /// Entry set with the first character of each surface form
    /// capitalized. Entries whose surface has no distinct capitalized
    /// form (symbols, digits) are dropped. Unioned with the base table
    /// when a grammar runs in case-sensitive mode.
    pub fn capitalized(&self) -> Lexicon {
        Lexicon {
            origin: self.origin.clone(),
            entries: self
                .entries
                .iter()
                .filter_map(|(s, n)| capitalize_first(s).map(|cap| (cap, n.clone())))
                .collect(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn surfaces(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(s, _)| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the table as a transducer: the union of one
    /// surface-to-normalized crossing per entry.
    pub fn fst(&self) -> Fst {
        Fst::union_all(self.entries.iter().map(|(s, n)| Fst::cross(s, n)))
    }
}
