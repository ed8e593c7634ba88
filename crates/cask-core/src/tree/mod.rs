//! Typed, lossless model of a build script
//!
//! Every node carries an [`Id`], the [`Space`] that precedes it and a
//! [`Markers`] slot for tool metadata. Nodes are plain values: an edit builds
//! a replacement node (see the `with_*` helpers) and leaves the original
//! untouched.

mod argument;
mod command;
mod document;
mod instruction;
mod markers;
mod port;
mod space;

pub use argument::{Argument, ArgumentContent, EnvironmentVariable, Literal, QuoteStyle};
pub use command::{AdditionalHeredoc, CommandForm, ExecArgument, ExecForm, Heredoc, ShellForm};
pub use document::{Document, Stage};
pub use instruction::{
    Add, Arg, Cmd, Copy, Entrypoint, Env, Expose, Flag, From, Healthcheck, HealthcheckBody,
    Instruction, KeyValuePair, Label, Maintainer, OnBuild, PathList, Run, Shell, StageAlias,
    StopSignal, TransferForm, User, Volume, Workdir, find_flag,
};
pub use markers::{Id, Marker, Markers};
pub use port::{Port, Protocol};
pub use space::{Comment, Space};
