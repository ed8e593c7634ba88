//! Document root and build stages

use serde::{Deserialize, Serialize};

use super::instruction::{Arg, From};
use super::{Id, Instruction, Markers, Space};
use crate::directives::Directives;

/// Root of a parsed build script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    /// ARG instructions declared before the first FROM
    pub global_args: Vec<Arg>,
    pub stages: Vec<Stage>,
    /// Whitespace and comments after the last instruction
    pub eof: Space,
}

/// A FROM and the instructions that follow it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub from: From,
    pub instructions: Vec<Instruction>,
}

impl Stage {
    pub fn new(from: From, instructions: Vec<Instruction>) -> Self {
        Self {
            id: Id::random(),
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            from,
            instructions,
        }
    }

    /// Alias given by `AS name`
    pub fn name(&self) -> Option<String> {
        self.from.alias_name()
    }

    pub fn with_from(&self, from: From) -> Self {
        Self {
            from,
            ..self.clone()
        }
    }

    pub fn with_instructions(&self, instructions: Vec<Instruction>) -> Self {
        Self {
            instructions,
            ..self.clone()
        }
    }
}

impl Document {
    pub fn global_args(&self) -> &[Arg] {
        &self.global_args
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Stage named `name`; stage names are case-insensitive
    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|stage| {
            stage
                .name()
                .is_some_and(|alias| alias.eq_ignore_ascii_case(name))
        })
    }

    /// Stage by alias or by zero-based index
    pub fn find_stage(&self, reference: &str) -> Option<(usize, &Stage)> {
        if let Some(position) = self.stages.iter().position(|stage| {
            stage
                .name()
                .is_some_and(|alias| alias.eq_ignore_ascii_case(reference))
        }) {
            return Some((position, &self.stages[position]));
        }
        let index: usize = reference.parse().ok()?;
        self.stages.get(index).map(|stage| (index, stage))
    }

    /// Parser directives from the leading comments of the document
    pub fn directives(&self) -> Directives {
        let leading = self
            .global_args
            .first()
            .map(|arg| &arg.prefix)
            .or_else(|| self.stages.first().map(|stage| &stage.from.prefix))
            .unwrap_or(&self.eof);
        Directives::scan(&leading.to_string())
    }

    /// Copy with the stage at `index` replaced; out-of-range indexes leave
    /// the stages untouched
    pub fn with_stage(&self, index: usize, stage: Stage) -> Self {
        let mut stages = self.stages.clone();
        if let Some(slot) = stages.get_mut(index) {
            *slot = stage;
        }
        Self {
            stages,
            ..self.clone()
        }
    }

    pub fn with_stages(&self, stages: Vec<Stage>) -> Self {
        Self {
            stages,
            ..self.clone()
        }
    }

    /// Print the tree back to source text
    pub fn print(&self) -> String {
        crate::printer::print_document(self)
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.print())
    }
}
