//! Thin wrapper over rowan's green-tree builder

use rowan::{Checkpoint, GreenNodeBuilder};

use super::{CstToken, DockerSyntaxKind, DockerSyntaxNode};

/// Builder for constructing the CST from a token stream
pub struct CstBuilder {
    builder: GreenNodeBuilder<'static>,
}

impl CstBuilder {
    pub fn new() -> Self {
        Self {
            builder: GreenNodeBuilder::new(),
        }
    }

    pub fn start_node(&mut self, kind: DockerSyntaxKind) {
        self.builder.start_node(kind.into());
    }

    pub fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub fn checkpoint(&self) -> Checkpoint {
        self.builder.checkpoint()
    }

    /// Wrap everything added since `checkpoint` in a node of `kind`
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: DockerSyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    pub fn token(&mut self, kind: DockerSyntaxKind, text: &str) {
        self.builder.token(kind.into(), text);
    }

    pub fn add_token(&mut self, token: &CstToken) {
        self.token(token.kind, &token.text);
    }

    pub fn finish(self) -> DockerSyntaxNode {
        DockerSyntaxNode::new_root(self.builder.finish())
    }
}

impl Default for CstBuilder {
    fn default() -> Self {
        Self::new()
    }
}
