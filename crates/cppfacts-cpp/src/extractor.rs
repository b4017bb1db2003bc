//! Runs the grammar and drivers over one document

use cppfacts::{ClassData, EnumData, PublishedEntity};
use cppfacts_parser_api::{FileFacts, ParserConfig, ParserError};
use log::debug;
use std::cell::RefCell;
use std::path::Path;

use crate::drivers::{ClassDriver, EnumDriver};
use crate::events::ParseEvent;
use crate::grammar::{ParseOutcome, ParserDriver};
use crate::lexical::floor_boundary;

const SNIPPET_LEN: usize = 60;

/// Extract every enum and class published while parsing `source`.
///
/// A fresh driver set is built for each call. Entities come back in
/// publication order.
pub fn extract(
    source: &str,
    file_path: &Path,
    config: &ParserConfig,
) -> Result<FileFacts, ParserError> {
    let published = RefCell::new(Vec::new());

    let mut enums = EnumDriver::new();
    enums.subscribe(|name: &str, data: &EnumData| {
        published
            .borrow_mut()
            .push(PublishedEntity::from_enum(name, data.clone()));
    });
    let mut classes = ClassDriver::new();
    classes.subscribe(|name: &str, data: &ClassData| {
        published
            .borrow_mut()
            .push(PublishedEntity::from_class(name, data.clone()));
    });

    let outcome = {
        let mut parser = ParserDriver::new();
        parser.subscribe(|event: &ParseEvent| enums.handle(event));
        parser.subscribe(|event: &ParseEvent| classes.handle(event));
        parser.parse(source)
    };

    if !outcome.success {
        return Err(syntax_error(source, file_path, &outcome));
    }

    let violations: Vec<String> = enums
        .take_violations()
        .into_iter()
        .chain(classes.take_violations())
        .map(|error| error.to_string())
        .collect();
    if config.strict_transitions && !violations.is_empty() {
        return Err(ParserError::InvalidTransition(
            file_path.to_path_buf(),
            violations.join("; "),
        ));
    }
    drop(enums);
    drop(classes);

    let mut facts = FileFacts::new(file_path.to_path_buf());
    facts.entities = published.into_inner();
    facts.violations = violations;
    debug!(
        "Extracted {} entities from {}",
        facts.entity_count(),
        file_path.display()
    );
    Ok(facts)
}

/// 1-based line and column of the byte offset where matching gave up
fn syntax_error(source: &str, file_path: &Path, outcome: &ParseOutcome) -> ParserError {
    let at = floor_boundary(source, outcome.failed_at.unwrap_or(outcome.consumed));
    let before = &source[..at];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    let snippet: String = source[at..]
        .lines()
        .next()
        .unwrap_or_default()
        .chars()
        .take(SNIPPET_LEN)
        .collect();
    ParserError::SyntaxError(file_path.to_path_buf(), line, column, snippet)
}
