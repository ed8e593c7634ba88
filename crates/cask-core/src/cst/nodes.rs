//! Type aliases and utilities for CST nodes
//!
//! These types are built on top of Rowan's generic tree types, parameterized
//! with our DockerLanguage.

use super::{DockerLanguage, DockerSyntaxKind};

/// A node in the concrete syntax tree
pub type DockerSyntaxNode = rowan::SyntaxNode<DockerLanguage>;

/// A leaf token in the concrete syntax tree
pub type DockerSyntaxToken = rowan::SyntaxToken<DockerLanguage>;

/// Either a node or a token in the CST
pub type DockerSyntaxElement = rowan::SyntaxElement<DockerLanguage>;

pub use rowan::{NodeOrToken, TextRange, TextSize};

/// Extension trait for DockerSyntaxNode with lookup helpers
pub trait DockerSyntaxNodeExt {
    /// Find the first child node of a specific kind
    fn child_of_kind(&self, kind: DockerSyntaxKind) -> Option<DockerSyntaxNode>;

    /// Find all child nodes of a specific kind
    fn children_of_kind(&self, kind: DockerSyntaxKind) -> Vec<DockerSyntaxNode>;

    /// Find the first direct child token of a specific kind
    fn token_of_kind(&self, kind: DockerSyntaxKind) -> Option<DockerSyntaxToken>;

    /// Byte offset where this node starts
    fn start(&self) -> usize;

    /// Byte offset one past the end of this node
    fn end(&self) -> usize;
}

impl DockerSyntaxNodeExt for DockerSyntaxNode {
    fn child_of_kind(&self, kind: DockerSyntaxKind) -> Option<DockerSyntaxNode> {
        self.children().find(|child| child.kind() == kind)
    }

    fn children_of_kind(&self, kind: DockerSyntaxKind) -> Vec<DockerSyntaxNode> {
        self.children()
            .filter(|child| child.kind() == kind)
            .collect()
    }

    fn token_of_kind(&self, kind: DockerSyntaxKind) -> Option<DockerSyntaxToken> {
        self.children_with_tokens()
            .filter_map(|element| element.into_token())
            .find(|token| token.kind() == kind)
    }

    fn start(&self) -> usize {
        u32::from(self.text_range().start()) as usize
    }

    fn end(&self) -> usize {
        u32::from(self.text_range().end()) as usize
    }
}

/// Byte range helpers for tokens
pub trait DockerSyntaxTokenExt {
    fn start(&self) -> usize;
    fn end(&self) -> usize;
}

impl DockerSyntaxTokenExt for DockerSyntaxToken {
    fn start(&self) -> usize {
        u32::from(self.text_range().start()) as usize
    }

    fn end(&self) -> usize {
        u32::from(self.text_range().end()) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowan::GreenNodeBuilder;

    fn build_test_tree() -> DockerSyntaxNode {
        let mut builder = GreenNodeBuilder::new();

        builder.start_node(DockerSyntaxKind::Workdir.into());
        builder.token(DockerSyntaxKind::Keyword.into(), "WORKDIR");
        builder.token(DockerSyntaxKind::Whitespace.into(), " ");
        builder.start_node(DockerSyntaxKind::Argument.into());
        builder.token(DockerSyntaxKind::Word.into(), "/app");
        builder.finish_node();
        builder.finish_node();

        DockerSyntaxNode::new_root(builder.finish())
    }

    #[test]
    fn test_token_extraction() {
        let tree = build_test_tree();
        let keyword = tree.token_of_kind(DockerSyntaxKind::Keyword).unwrap();
        assert_eq!(keyword.text(), "WORKDIR");
        assert_eq!((keyword.start(), keyword.end()), (0, 7));
    }

    #[test]
    fn test_child_lookup_and_offsets() {
        let tree = build_test_tree();
        let argument = tree.child_of_kind(DockerSyntaxKind::Argument).unwrap();
        assert_eq!(argument.start(), 8);
        assert_eq!(argument.end(), 12);
        assert!(tree.child_of_kind(DockerSyntaxKind::Flag).is_none());
        assert_eq!(tree.children_of_kind(DockerSyntaxKind::Argument).len(), 1);
    }

    #[test]
    fn test_text_reconstruction() {
        let tree = build_test_tree();
        assert_eq!(tree.text().to_string(), "WORKDIR /app");
    }
}
