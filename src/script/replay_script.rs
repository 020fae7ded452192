use std::fs;
use std::path::Path;

use saphyr::{LoadableYamlNode, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::script::Step;
use crate::script::yaml::{YamlMap, field, text, text_list};
use crate::tree::Section;

/// A list of initial sections and the mutation steps to run against them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayScript {
    sections: Vec<Section<String, String>>,
    steps: Vec<Step>,
}

impl ReplayScript {
    pub fn read(path: &Path) -> Result<Self, ScriptError> {
        debug!("Opening replay script: {}", path.display());
        let contents = fs::read_to_string(path).context(ReadSnafu {
            file_path: path.display().to_string(),
        })?;
        debug!("Successfully read replay script: {} bytes", contents.len());
        contents.as_str().try_into()
    }

    pub fn sections(&self) -> &[Section<String, String>] {
        &self.sections
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    fn parse_sections(top_level: &YamlMap) -> Result<Vec<Section<String, String>>, ScriptError> {
        let Some(sections) = field(top_level, "sections") else {
            return Ok(Vec::new());
        };
        if sections.is_null() {
            return Ok(Vec::new());
        }

        sections
            .as_sequence()
            .context(SectionsNotSequenceSnafu)?
            .iter()
            .enumerate()
            .map(|(index, section)| Self::parse_section(index, section))
            .collect()
    }

    fn parse_section(index: usize, section: &Yaml) -> Result<Section<String, String>, ScriptError> {
        let mapping = section.as_mapping().context(InvalidSectionSnafu { index })?;
        let title = field(mapping, "title")
            .and_then(text)
            .context(InvalidSectionSnafu { index })?;
        let items = match field(mapping, "items") {
            Some(items) => text_list(items).context(InvalidSectionSnafu { index })?,
            None => Vec::new(),
        };
        Ok(Section::with_items(title, items))
    }

    fn parse_steps(top_level: &YamlMap) -> Result<Vec<Step>, ScriptError> {
        let Some(steps) = field(top_level, "steps") else {
            return Ok(Vec::new());
        };
        if steps.is_null() {
            return Ok(Vec::new());
        }

        steps
            .as_sequence()
            .context(StepsNotSequenceSnafu)?
            .iter()
            .enumerate()
            .map(|(index, step)| Step::from_yaml(index, step))
            .collect()
    }
}

impl TryFrom<&str> for ReplayScript {
    type Error = ScriptError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents.first().context(MalformedScriptSnafu)?;
        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        let sections = Self::parse_sections(top_level)?;
        let steps = Self::parse_steps(top_level)?;
        debug!(
            "Parsed replay script with {} sections and {} steps",
            sections.len(),
            steps.len()
        );

        Ok(ReplayScript { sections, steps })
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ScriptError {
    #[snafu(display("Failed to read the replay script: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the replay script"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted replay script"))]
    MalformedScript,
    #[snafu(display("Top level of the replay script should be a map"))]
    TopLevelNotMap,
    #[snafu(display("'sections' should be a list"))]
    SectionsNotSequence,
    #[snafu(display("Section {} needs a 'title' and an optional list of 'items'", index))]
    InvalidSection { index: usize },
    #[snafu(display("'steps' should be a list"))]
    StepsNotSequence,
    #[snafu(display("Step {} should be a map with a single step name", index))]
    MalformedStep { index: usize },
    #[snafu(display("Step {} has unknown type '{}'", index, name))]
    UnknownStep { index: usize, name: String },
    #[snafu(display("Step {} ({}) is missing or has an invalid '{}'", index, step, field))]
    InvalidField {
        index: usize,
        step: String,
        field: &'static str,
    },
}
