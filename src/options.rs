//! XML-to-JSON converter for checkbox/dropdown definitions.
//!
//! Every locale document contributes one `{label: value}` mapping to the
//! output table. Entries are found with ElementTree-style path selectors
//! such as `checkboxes/checkbox` or `.//dropdown`.

use crate::config::ConvertConfig;
use crate::document::{Document, Element};
use crate::error::Error;
use crate::i18n::Locale;
use crate::table::LocaleTable;
use std::path::PathBuf;
use tracing::{info, warn};

/// A path expression relative to the document root.
///
/// Supported forms: `a/b` (exact path below the root), `.//a/b` (`b` under
/// an `a` anywhere) and `*` as a single-step wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSelector {
    anywhere: bool,
    steps: Vec<String>,
}

impl OptionSelector {
    pub fn parse(expression: &str) -> Result<Self, Error> {
        let invalid = |reason: &str| Error::InvalidSelector {
            selector: expression.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = expression.trim();
        let (anywhere, rest) = if let Some(rest) = trimmed.strip_prefix(".//") {
            (true, rest)
        } else if let Some(rest) = trimmed.strip_prefix("./") {
            (false, rest)
        } else if trimmed.starts_with('/') {
            return Err(invalid("absolute paths are not supported"));
        } else {
            (false, trimmed)
        };

        if rest.is_empty() {
            return Err(invalid("empty path"));
        }

        let steps = rest
            .split('/')
            .map(|step| match step {
                "" => Err(invalid("'//' is only supported as a leading './/'")),
                "." | ".." => Err(invalid("relative steps are not supported")),
                step if step.contains(['[', ']', '@', '(', ')']) => {
                    Err(invalid("predicates are not supported"))
                }
                step => Ok(step.to_string()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { anywhere, steps })
    }

    /// Parse a comma-separated selector list.
    pub fn parse_list(expressions: &str) -> Result<Vec<Self>, Error> {
        expressions
            .split(',')
            .filter(|expression| !expression.trim().is_empty())
            .map(Self::parse)
            .collect()
    }

    /// `path` holds the tag names from the root's child down to the candidate.
    fn matches(&self, path: &[&str]) -> bool {
        if path.len() < self.steps.len() || (!self.anywhere && path.len() != self.steps.len()) {
            return false;
        }
        let tail = &path[path.len() - self.steps.len()..];
        self.steps
            .iter()
            .zip(tail)
            .all(|(step, name)| step == "*" || step == name)
    }
}

/// Where the entries live and which children hold label and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractSpec {
    pub selectors: Vec<OptionSelector>,
    pub label_tag: String,
    pub value_tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertReport {
    pub locales: usize,
    pub entries: usize,
    pub output: PathBuf,
}

fn select<'a>(root: &'a Element, selectors: &[OptionSelector]) -> Vec<&'a Element> {
    let mut found = Vec::new();
    let mut path = Vec::new();
    walk(root, selectors, &mut path, &mut found);
    found
}

fn walk<'a>(
    element: &'a Element,
    selectors: &[OptionSelector],
    path: &mut Vec<&'a str>,
    found: &mut Vec<&'a Element>,
) {
    for child in element.child_elements() {
        path.push(child.name.as_str());
        let current: &[&str] = path;
        if selectors.iter().any(|selector| selector.matches(current)) {
            found.push(child);
        }
        walk(child, selectors, path, found);
        path.pop();
    }
}

/// Extract the label/value pair of every selected element, in document order.
///
/// Label and value texts are taken verbatim. A missing child is an error.
pub fn extract_entries(
    document: &Document,
    spec: &ExtractSpec,
    locale: Locale,
) -> Result<Vec<OptionEntry>, Error> {
    select(&document.root, &spec.selectors)
        .into_iter()
        .enumerate()
        .map(|(index, element)| -> Result<OptionEntry, Error> {
            let field = |tag: &str| {
                element
                    .child(tag)
                    .map(Element::text)
                    .ok_or_else(|| Error::MissingField {
                        locale: locale.code().to_string(),
                        element: element.name.clone(),
                        position: index + 1,
                        field: tag.to_string(),
                    })
            };
            Ok(OptionEntry {
                label: field(&spec.label_tag)?,
                value: field(&spec.value_tag)?,
            })
        })
        .collect()
}

/// Build the `{locale: {label: value}}` table from one document per locale.
pub fn convert(documents: &[(Locale, Document)], spec: &ExtractSpec) -> Result<LocaleTable, Error> {
    let locales: Vec<Locale> = documents.iter().map(|(locale, _)| *locale).collect();
    let mut table = LocaleTable::with_locales(&locales);

    for (locale, document) in documents {
        let entries = extract_entries(document, spec, *locale)?;
        info!("Extracted {} entries for {}", entries.len(), locale.name());
        for entry in entries {
            if table.insert(*locale, &entry.label, entry.value) {
                warn!(
                    "Duplicate label {:?} in {}: keeping the later value",
                    entry.label, locale
                );
            }
        }
    }

    Ok(table)
}

/// Read every locale document, convert them and write the JSON table.
pub fn run(config: &ConvertConfig) -> Result<ConvertReport, Error> {
    let documents = config
        .inputs
        .iter()
        .map(|(locale, path)| -> Result<(Locale, Document), Error> {
            Ok((*locale, Document::read(path)?))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let table = convert(&documents, &config.spec)?;
    table.write(&config.output)?;

    Ok(ConvertReport {
        locales: table.locales().len(),
        entries: table.total_entries(),
        output: config.output.clone(),
    })
}
