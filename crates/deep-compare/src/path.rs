//! Navigation paths from the comparison root to a sub-value.

use std::fmt;

use crate::render::{self, ColorBackend, PlainBackend};

/// One accessor step in a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathNode {
    /// Short type name of the root `want` value, `None` when it is absent.
    Root(Option<String>),
    Index(usize),
    /// Rendered map key.
    Key(String),
    Field(&'static str),
    /// 1-based receive count in a queue.
    ChannelPosition(usize),
}

impl PathNode {
    fn render(&self, backend: &dyn ColorBackend) -> String {
        match self {
            PathNode::Root(Some(ty)) => format!("({ty})"),
            PathNode::Root(None) => render::placeholder(backend, "nil"),
            PathNode::Index(i) => format!("[{i}]"),
            PathNode::Key(key) => format!("[{key}]"),
            PathNode::Field(name) => format!(".{name}"),
            PathNode::ChannelPosition(i) => format!("[<-{i}]"),
        }
    }
}

/// Root-to-leaf sequence of accessors identifying a comparison site.
///
/// The comparator pushes a node when it descends and pops it on the way back
/// up, so the path of a recorded mismatch is a snapshot of the walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<PathNode>);

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(type_name: Option<String>) -> Self {
        Self(vec![PathNode::Root(type_name)])
    }

    pub fn nodes(&self) -> &[PathNode] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn leaf(&self) -> Option<&PathNode> {
        self.0.last()
    }

    pub(crate) fn push(&mut self, node: PathNode) {
        self.0.push(node);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }

    /// Append `node` to a copy of this path.
    pub fn join(&self, node: PathNode) -> Self {
        let mut path = self.clone();
        path.push(node);
        path
    }

    pub fn render(&self, backend: &dyn ColorBackend) -> String {
        self.0.iter().map(|node| node.render(backend)).collect()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&PlainBackend))
    }
}

impl FromIterator<PathNode> for Path {
    fn from_iter<I: IntoIterator<Item = PathNode>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::AnsiBackend;

    #[test]
    fn test_path_display() {
        let path: Path = [
            PathNode::Root(Some("Book".to_string())),
            PathNode::Field("Authors"),
            PathNode::Index(0),
            PathNode::Field("FirstName"),
        ]
        .into_iter()
        .collect();
        assert_eq!(path.to_string(), "(Book).Authors[0].FirstName");
        assert_eq!(path.len(), 4);
        assert_eq!(path.leaf(), Some(&PathNode::Field("FirstName")));
    }

    #[test]
    fn test_key_and_channel_nodes() {
        let path = Path::root(Some("HashMap<i32, String>".into())).join(PathNode::Key("2".into()));
        assert_eq!(path.to_string(), "(HashMap<i32, String>)[2]");

        let path = Path::root(Some("Chan".into())).join(PathNode::ChannelPosition(1));
        assert_eq!(path.to_string(), "(Chan)[<-1]");
    }

    #[test]
    fn test_nil_root() {
        let path = Path::root(None);
        assert_eq!(path.to_string(), "<nil>");
        assert_eq!(path.render(&AnsiBackend), "<\x1b[95mnil\x1b[0m>");
    }

    #[test]
    fn test_push_pop() {
        let mut path = Path::root(Some("T".into()));
        path.push(PathNode::Index(3));
        assert_eq!(path.to_string(), "(T)[3]");
        path.pop();
        assert_eq!(path.to_string(), "(T)");
    }
}
