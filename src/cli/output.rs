//! Formatting of query results for the terminal.

use std::collections::HashSet;
use std::io::{self, Write};

use crate::query::QueryEngine;

/// Which count a detailed listing was filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountKind {
    /// The listing came from a dependent-count query.
    Dependents,
    /// The listing came from a dependency-count query.
    Dependencies,
}

/// Compiler-generated identifiers such as `<>c__DisplayClass0_0`.
pub fn is_anonymous(name: &str) -> bool {
    name.starts_with('<')
}

/// Writes one name per line, sorted, without anonymous identifiers.
pub fn write_names<W: Write>(out: &mut W, names: &HashSet<String>) -> io::Result<()> {
    let mut visible: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|name| !is_anonymous(name))
        .collect();
    visible.sort_unstable();

    for name in visible {
        writeln!(out, "{}", name)?;
    }
    Ok(())
}

/// Writes each name with the count the query did not filter on.
///
/// Lines are ordered by the filtered count, then the other count, then
/// name. A dependent-count listing shows dependency counts and the other
/// way round.
pub fn write_detailed<W: Write>(
    out: &mut W,
    engine: &QueryEngine<'_>,
    names: &HashSet<String>,
    kind: CountKind,
) -> io::Result<()> {
    let mut rows: Vec<(usize, usize, &str)> = names
        .iter()
        .map(String::as_str)
        .filter(|name| !is_anonymous(name))
        .map(|name| {
            let dependents = engine.dependent_count(name);
            let dependencies = engine.dependency_count(name);
            match kind {
                CountKind::Dependents => (dependents, dependencies, name),
                CountKind::Dependencies => (dependencies, dependents, name),
            }
        })
        .collect();
    rows.sort_unstable();

    for (_, other, name) in rows {
        match kind {
            CountKind::Dependents => writeln!(out, "{} ({} dependencies)", name, other)?,
            CountKind::Dependencies => writeln!(out, "{} ({} dependents)", name, other)?,
        }
    }
    Ok(())
}

/// Writes each cycle on one line as `A -> B -> A`.
///
/// Anonymous identifiers are dropped from the path; a cycle made only of
/// anonymous types is skipped.
pub fn write_cycles<W: Write>(out: &mut W, cycles: &[Vec<String>]) -> io::Result<()> {
    for cycle in cycles {
        let visible: Vec<&str> = cycle
            .iter()
            .map(String::as_str)
            .filter(|name| !is_anonymous(name))
            .collect();
        if !visible.is_empty() {
            writeln!(out, "{}", visible.join(" -> "))?;
        }
    }
    Ok(())
}

/// Writes each strongly connected group on one line, comma separated.
pub fn write_components<W: Write>(out: &mut W, components: &[Vec<String>]) -> io::Result<()> {
    for component in components {
        let visible: Vec<&str> = component
            .iter()
            .map(String::as_str)
            .filter(|name| !is_anonymous(name))
            .collect();
        if !visible.is_empty() {
            writeln!(out, "{}", visible.join(", "))?;
        }
    }
    Ok(())
}
