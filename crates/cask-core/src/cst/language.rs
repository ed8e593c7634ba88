//! Rowan language implementation for build scripts
//!
//! This module implements the `rowan::Language` trait, which connects
//! our DockerSyntaxKind enum to Rowan's generic CST infrastructure.

use rowan::Language;

use super::DockerSyntaxKind;

/// Language implementation for Dockerfile-style build scripts
///
/// This is a zero-sized type that implements `rowan::Language` to provide
/// the connection between our syntax kinds and Rowan's generic tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DockerLanguage;

impl Language for DockerLanguage {
    type Kind = DockerSyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        match raw.0 {
            // Trivia
            0 => DockerSyntaxKind::Whitespace,
            1 => DockerSyntaxKind::Newline,
            2 => DockerSyntaxKind::Comment,
            3 => DockerSyntaxKind::LineContinuation,

            // Tokens
            10 => DockerSyntaxKind::Word,
            11 => DockerSyntaxKind::Keyword,
            12 => DockerSyntaxKind::DoubleQuoted,
            13 => DockerSyntaxKind::SingleQuoted,
            14 => DockerSyntaxKind::Variable,
            15 => DockerSyntaxKind::BracedVariable,
            16 => DockerSyntaxKind::LBracket,
            17 => DockerSyntaxKind::RBracket,
            18 => DockerSyntaxKind::Comma,
            19 => DockerSyntaxKind::Equals,
            20 => DockerSyntaxKind::HeredocMarker,
            21 => DockerSyntaxKind::HeredocLine,
            22 => DockerSyntaxKind::HeredocEnd,
            23 => DockerSyntaxKind::FlagName,
            90 => DockerSyntaxKind::Error,
            99 => DockerSyntaxKind::Eof,

            // Nodes
            100 => DockerSyntaxKind::Document,
            101 => DockerSyntaxKind::Stage,
            110 => DockerSyntaxKind::From,
            111 => DockerSyntaxKind::Run,
            112 => DockerSyntaxKind::Cmd,
            113 => DockerSyntaxKind::Entrypoint,
            114 => DockerSyntaxKind::Copy,
            115 => DockerSyntaxKind::Add,
            116 => DockerSyntaxKind::Arg,
            117 => DockerSyntaxKind::Env,
            118 => DockerSyntaxKind::Label,
            119 => DockerSyntaxKind::Expose,
            120 => DockerSyntaxKind::Volume,
            121 => DockerSyntaxKind::Shell,
            122 => DockerSyntaxKind::Workdir,
            123 => DockerSyntaxKind::User,
            124 => DockerSyntaxKind::StopSignal,
            125 => DockerSyntaxKind::OnBuild,
            126 => DockerSyntaxKind::Healthcheck,
            127 => DockerSyntaxKind::Maintainer,
            130 => DockerSyntaxKind::Flag,
            131 => DockerSyntaxKind::Argument,
            133 => DockerSyntaxKind::JsonArray,
            134 => DockerSyntaxKind::ShellForm,
            135 => DockerSyntaxKind::Heredoc,
            136 => DockerSyntaxKind::KeyValue,
            137 => DockerSyntaxKind::Port,
            138 => DockerSyntaxKind::StageAlias,
            139 => DockerSyntaxKind::HealthcheckNone,

            _ => DockerSyntaxKind::Error,
        }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_kind_round_trip() {
        for kind in [
            DockerSyntaxKind::Whitespace,
            DockerSyntaxKind::LineContinuation,
            DockerSyntaxKind::HeredocEnd,
            DockerSyntaxKind::Stage,
            DockerSyntaxKind::Maintainer,
            DockerSyntaxKind::HealthcheckNone,
        ] {
            let raw = DockerLanguage::kind_to_raw(kind);
            assert_eq!(DockerLanguage::kind_from_raw(raw), kind);
        }
    }

    #[test]
    fn test_unknown_raw_kind_is_error() {
        assert_eq!(
            DockerLanguage::kind_from_raw(rowan::SyntaxKind(4242)),
            DockerSyntaxKind::Error
        );
    }
}
