//! Field stripper: blank the text of selected elements and save a copy.

use crate::config::StripConfig;
use crate::document::{Document, Element};
use crate::error::Error;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// Tag names whose text gets blanked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tags.into_iter().map(Into::into).collect())
    }

    /// Parse a comma-separated list, ignoring blanks: `"value, additionals"`.
    pub fn parse(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty()),
        )
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripReport {
    pub stripped: usize,
    pub output: PathBuf,
}

/// Blank the text of every element below the root whose tag is in `tags`.
///
/// Returns how many elements were blanked.
pub fn strip_text(document: &mut Document, tags: &TagSet) -> usize {
    let mut stripped = 0;
    document.root.for_each_descendant_mut(&mut |element: &mut Element| {
        if tags.contains(&element.name) {
            element.set_text("");
            stripped += 1;
        }
    });
    stripped
}

fn same_file(input: &Path, output: &Path) -> bool {
    if input == output {
        return true;
    }
    match (input.canonicalize(), output.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Read the input document, strip it and write it to the output path.
pub fn run(config: &StripConfig) -> Result<StripReport, Error> {
    let mut document = Document::read(&config.input)?;
    if same_file(&config.input, &config.output) {
        return Err(Error::OverwriteInput(config.input.clone()));
    }

    let stripped = strip_text(&mut document, &config.tags);
    info!(
        "Blanked {} elements ({}) in {}",
        stripped,
        config.tags.iter().collect::<Vec<_>>().join(", "),
        config.input.display()
    );

    document.write(&config.output)?;

    Ok(StripReport {
        stripped,
        output: config.output.clone(),
    })
}
