//! Plain-text graph instance loader.
//!
//! Two formats are understood:
//!
//! - **Edge list**: a header line `n_nodes n_edges` followed by one `u v`
//!   pair per line.
//! - **DIMACS-like**: `c` comment lines, one `p <kind> n_nodes n_edges` line
//!   and `e u v` edge lines.

use super::{Graph, GraphBuilder};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a graph instance.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to read graph file: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("graph header (node count) not found")]
    MissingHeader,

    #[error("node {node} out of range for a graph with {node_count} nodes")]
    NodeOutOfRange { node: usize, node_count: usize },
}

/// Supported instance formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GraphFormat {
    /// `n m` header followed by `u v` lines.
    EdgeList,
    /// `c` / `p` / `e` prefixed lines.
    Dimacs,
}

impl GraphFormat {
    /// Picks the format from a file extension, falling back to content sniffing.
    pub fn detect(path: &Path, content: &str) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("graph") => GraphFormat::Dimacs,
            _ => Self::sniff(content),
        }
    }

    /// Looks at the first non-empty line.
    pub fn sniff(content: &str) -> Self {
        let first = content
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .and_then(|l| l.split_whitespace().next());
        match first {
            Some("c") | Some("p") | Some("e") => GraphFormat::Dimacs,
            _ => GraphFormat::EdgeList,
        }
    }
}

/// Reads a graph instance from disk.
pub fn read_graph(path: impl AsRef<Path>) -> Result<Graph, GraphError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let format = GraphFormat::detect(path, &content);
    parse_graph(&content, format)
}

/// Parses a graph instance from text.
pub fn parse_graph(content: &str, format: GraphFormat) -> Result<Graph, GraphError> {
    match format {
        GraphFormat::EdgeList => parse_edge_list(content),
        GraphFormat::Dimacs => parse_dimacs(content),
    }
}

fn parse_edge_list(content: &str) -> Result<Graph, GraphError> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let (line, header) = lines.next().ok_or(GraphError::MissingHeader)?;
    let (n_nodes, _n_edges) = parse_pair(header, line)?;

    let mut builder = GraphBuilder::new(n_nodes);
    for (line, text) in lines {
        let (u, v) = parse_pair(text, line)?;
        builder.add_edge(u, v)?;
    }
    Ok(builder.build())
}

fn parse_dimacs(content: &str) -> Result<Graph, GraphError> {
    let mut builder: Option<GraphBuilder> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        match tokens.first().copied() {
            None | Some("c") => continue,
            Some("p") => {
                if tokens.len() < 3 {
                    return Err(parse_error(line, "expected `p <kind> <nodes> <edges>`"));
                }
                let n_nodes = parse_number(tokens[tokens.len() - 2], line)?;
                builder = Some(GraphBuilder::new(n_nodes));
            }
            Some("e") => {
                let builder = builder.as_mut().ok_or(GraphError::MissingHeader)?;
                if tokens.len() < 3 {
                    return Err(parse_error(line, "expected `e <u> <v>`"));
                }
                let u = parse_number(tokens[tokens.len() - 2], line)?;
                let v = parse_number(tokens[tokens.len() - 1], line)?;
                builder.add_edge(u, v)?;
            }
            Some(other) => {
                return Err(parse_error(line, format!("unknown line prefix `{other}`")));
            }
        }
    }

    builder.map(GraphBuilder::build).ok_or(GraphError::MissingHeader)
}

fn parse_pair(text: &str, line: usize) -> Result<(usize, usize), GraphError> {
    let mut tokens = text.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(a), Some(b), None) => Ok((parse_number(a, line)?, parse_number(b, line)?)),
        _ => Err(parse_error(line, "expected two integers")),
    }
}

fn parse_number(token: &str, line: usize) -> Result<usize, GraphError> {
    token
        .parse()
        .map_err(|_| parse_error(line, format!("`{token}` is not a node id")))
}

fn parse_error(line: usize, message: impl Into<String>) -> GraphError {
    GraphError::Parse {
        line,
        message: message.into(),
    }
}
