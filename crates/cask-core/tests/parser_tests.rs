//! Typed-tree model tests
//!
//! These check what the builders put into the tree, not just that it prints
//! back. Outlines are compared with inline snapshots.

use cask_core::tree::{
    Argument, ArgumentContent, CommandForm, Flag, HealthcheckBody, Instruction, KeyValuePair,
    PathList, Protocol, TransferForm, find_flag,
};
use cask_core::{CaskError, Document, ParseErrorKind, parse};
use insta::assert_snapshot;

fn outline(document: &Document) -> String {
    let mut lines = Vec::new();
    for arg in document.global_args() {
        lines.push(format!("ARG {}", pairs(&arg.pairs)));
    }
    for (index, stage) in document.stages().iter().enumerate() {
        let from = &stage.from;
        let mut reference = from.image.value();
        if let Some(tag) = &from.tag {
            reference.push(':');
            reference.push_str(&tag.value());
        }
        if let Some(digest) = &from.digest {
            reference.push('@');
            reference.push_str(&digest.value());
        }
        let name = stage.name().unwrap_or_else(|| "-".to_string());
        lines.push(format!("stage {index} {name}: {reference}"));
        for instruction in &stage.instructions {
            lines.push(format!("  {}", describe(instruction)));
        }
    }
    lines.join("\n")
}

fn describe(instruction: &Instruction) -> String {
    match instruction {
        Instruction::Run(run) => format!("RUN{} {}", flags(&run.flags), command(&run.command)),
        Instruction::Cmd(cmd) => format!("CMD {}", command(&cmd.command)),
        Instruction::Copy(copy) => format!("COPY{} {}", flags(&copy.flags), transfer(&copy.form)),
        Instruction::Env(env) => format!("ENV {}", pairs(&env.pairs)),
        Instruction::Expose(expose) => {
            let ports: Vec<&str> = expose.ports.iter().map(|port| port.text.as_str()).collect();
            format!("EXPOSE {}", ports.join(" "))
        }
        Instruction::User(user) => match &user.group {
            Some(group) => format!("USER {} group={}", user.user.value(), group.value()),
            None => format!("USER {}", user.user.value()),
        },
        Instruction::Healthcheck(healthcheck) if healthcheck.is_disabled() => {
            "HEALTHCHECK none".to_string()
        }
        other => other.name().to_string(),
    }
}

fn flags(flags: &[Flag]) -> String {
    flags
        .iter()
        .map(|flag| match &flag.value {
            Some(value) => format!(" --{}={}", flag.name, value.value()),
            None => format!(" --{}", flag.name),
        })
        .collect()
}

fn command(form: &CommandForm) -> String {
    match form {
        CommandForm::Shell(shell) => format!("shell {:?}", shell.text),
        CommandForm::Exec(exec) => format!("exec {:?}", exec.values()),
        CommandForm::Heredoc(heredoc) => format!("heredoc {} {:?}", heredoc.name(), heredoc.body()),
    }
}

fn transfer(form: &TransferForm) -> String {
    match form {
        TransferForm::Paths { paths } => {
            let values: Vec<String> = paths.iter().map(Argument::value).collect();
            format!("paths {values:?}")
        }
        TransferForm::Exec(exec) => format!("exec {:?}", exec.values()),
        TransferForm::Heredoc(heredoc) => format!(
            "heredoc {} {:?} -> {}",
            heredoc.name(),
            heredoc.body(),
            heredoc
                .destination
                .as_ref()
                .map(Argument::value)
                .unwrap_or_default()
        ),
    }
}

fn pairs(pairs: &[KeyValuePair]) -> String {
    pairs
        .iter()
        .map(|pair| {
            let mut text = pair.key.value();
            if pair.equals {
                text.push('=');
            }
            if let Some(value) = &pair.value {
                text.push_str(&value.value());
            }
            text
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_error_kind(source: &str) -> ParseErrorKind {
    match parse(source) {
        Err(CaskError::Parse(error)) => error.kind,
        other => panic!("expected a parse error for {source:?}, got {other:?}"),
    }
}

#[test]
fn test_multi_stage_outline() {
    let document = parse(
        "ARG VERSION=3.18\nFROM alpine:${VERSION} AS base\nRUN --mount=type=cache,target=/var/cache/apk apk add curl\nENV APP_HOME=/app PATH=$APP_HOME/bin:$PATH\nEXPOSE 80/tcp 8000-9000/udp\nUSER app:staff\nCMD [\"curl\", \"--version\"]\n\nFROM base\nCOPY --from=base <<EOF /etc/motd\nhello\nEOF\nHEALTHCHECK NONE\n",
    )
    .unwrap();

    assert_snapshot!(outline(&document), @r#"
    ARG VERSION=3.18
    stage 0 base: alpine:${VERSION}
      RUN --mount=type=cache,target=/var/cache/apk shell "apk add curl"
      ENV APP_HOME=/app PATH=$APP_HOME/bin:$PATH
      EXPOSE 80/tcp 8000-9000/udp
      USER app group=staff
      CMD exec ["curl", "--version"]
    stage 1 -: base
      COPY --from=base heredoc EOF "hello\n" -> /etc/motd
      HEALTHCHECK none
    "#);
}

#[test]
fn test_forms_outline() {
    let document = parse(
        "FROM scratch\nCOPY a b c/\nCOPY [\"x y\", \"/z\"]\nRUN <<EOT\nset -e\nmake\nEOT\nRUN [ -f a ] && b\nCMD echo \\\n  done\n",
    )
    .unwrap();

    assert_snapshot!(outline(&document), @r#"
    stage 0 -: scratch
      COPY paths ["a", "b", "c/"]
      COPY exec ["x y", "/z"]
      RUN heredoc EOT "set -e\nmake\n"
      RUN shell "[ -f a ] && b"
      CMD shell "echo \\\n  done"
    "#);
}

#[test]
fn test_comment_attaches_to_next_instruction() {
    let document = parse("FROM a\nCOPY a b # note\nRUN x\n").unwrap();
    let instructions = &document.stages[0].instructions;

    let Instruction::Copy(copy) = &instructions[0] else {
        panic!("expected COPY, got {:?}", instructions[0]);
    };
    assert_eq!(copy.form.destination().as_deref(), Some("b"));

    let prefix = instructions[1].prefix();
    assert_eq!(prefix.comments.len(), 1);
    assert_eq!(prefix.comments[0].prefix, " ");
    assert_eq!(prefix.comments[0].text, "# note");
    assert_eq!(prefix.whitespace, "\n");
}

#[test]
fn test_trailing_comment_of_last_instruction_goes_to_eof() {
    let document = parse("FROM a\nRUN x # done\n# bye\n").unwrap();
    assert_eq!(document.eof.comments.len(), 2);
    assert_eq!(document.eof.comments[1].text, "# bye");
    assert_eq!(document.eof.whitespace, "\n");
}

#[test]
fn test_flag_value_stops_at_whitespace() {
    let document = parse("FROM a\nRUN --mount=type=bind dest\n").unwrap();
    let Instruction::Run(run) = &document.stages[0].instructions[0] else {
        panic!("expected RUN");
    };
    let mount = find_flag(&run.flags, "mount").unwrap();
    assert_eq!(mount.value.as_ref().map(Argument::value).as_deref(), Some("type=bind"));
    match &run.command {
        CommandForm::Shell(shell) => {
            assert_eq!(shell.text, "dest");
            assert_eq!(shell.prefix.whitespace, " ");
        }
        other => panic!("expected shell form, got {other:?}"),
    }
}

#[test]
fn test_bare_and_empty_flags() {
    let document = parse("FROM a\nRUN --bare --empty= true\n").unwrap();
    let Instruction::Run(run) = &document.stages[0].instructions[0] else {
        panic!("expected RUN");
    };
    assert!(find_flag(&run.flags, "bare").unwrap().value.is_none());
    assert!(find_flag(&run.flags, "empty").unwrap().value.as_ref().unwrap().is_empty());
}

#[test]
fn test_exec_form_bracket_spacing() {
    let spaced = parse("FROM a\nSHELL [ \"a\", \"b\" ]\n").unwrap();
    let tight = parse("FROM a\nSHELL [\"a\",\"b\"]\n").unwrap();

    let exec_of = |document: &Document| match &document.stages[0].instructions[0] {
        Instruction::Shell(shell) => match &shell.command {
            CommandForm::Exec(exec) => exec.clone(),
            other => panic!("expected exec form, got {other:?}"),
        },
        other => panic!("expected SHELL, got {other:?}"),
    };

    let spaced = exec_of(&spaced);
    let tight = exec_of(&tight);
    assert_eq!(spaced.values(), tight.values());
    assert_eq!(spaced.values(), vec!["a", "b"]);
    assert_eq!(spaced.elements[0].literal.prefix.whitespace, " ");
    assert_eq!(spaced.closing.whitespace, " ");
    assert!(tight.elements[1].literal.prefix.is_empty());
    assert!(tight.closing.is_empty());
}

#[test]
fn test_port_specifications() {
    let document = parse("FROM a\nEXPOSE 8000-9000/udp ${PORT} 53/SCTP\n").unwrap();
    let Instruction::Expose(expose) = &document.stages[0].instructions[0] else {
        panic!("expected EXPOSE");
    };

    let range = &expose.ports[0];
    assert_eq!((range.start, range.end), (Some(8000), Some(9000)));
    assert_eq!(range.protocol, Protocol::Udp);

    let variable = &expose.ports[1];
    assert_eq!(variable.text, "${PORT}");
    assert_eq!((variable.start, variable.end), (None, None));
    assert_eq!(variable.protocol, Protocol::Tcp);

    assert_eq!(expose.ports[2].protocol, Protocol::Sctp);
}

#[test]
fn test_image_reference_split() {
    let document = parse(
        "FROM alpine:3.18\nFROM alpine@sha256:abcd\nFROM 'alpine:3.18'\nFROM ${BASE}:latest AS final\n",
    )
    .unwrap();
    let stages = document.stages();

    assert_eq!(stages[0].from.image.value(), "alpine");
    assert_eq!(stages[0].from.tag.as_ref().map(Argument::value).as_deref(), Some("3.18"));
    assert!(stages[0].from.digest.is_none());

    assert_eq!(stages[1].from.image.value(), "alpine");
    assert!(stages[1].from.tag.is_none());
    assert_eq!(
        stages[1].from.digest.as_ref().map(Argument::value).as_deref(),
        Some("sha256:abcd")
    );

    assert_eq!(stages[2].from.image.value(), "alpine:3.18");
    assert!(stages[2].from.tag.is_none());
    assert!(stages[2].from.digest.is_none());

    assert!(stages[3].from.image.has_variables());
    assert_eq!(stages[3].from.tag.as_ref().map(Argument::value).as_deref(), Some("latest"));
    assert_eq!(stages[3].name().as_deref(), Some("final"));
}

#[test]
fn test_user_group_split() {
    let document = parse("FROM a\nUSER app:app\nUSER app\n").unwrap();
    let users: Vec<_> = document.stages[0]
        .instructions
        .iter()
        .map(|instruction| match instruction {
            Instruction::User(user) => (user.user.value(), user.group.as_ref().map(Argument::value)),
            other => panic!("expected USER, got {other:?}"),
        })
        .collect();
    assert_eq!(
        users,
        vec![
            ("app".to_string(), Some("app".to_string())),
            ("app".to_string(), None)
        ]
    );
}

#[test]
fn test_env_forms() {
    let document = parse("FROM a\nENV PATH /usr/bin:$PATH\nENV A=1 B=\"two words\"\n").unwrap();
    let instructions = &document.stages[0].instructions;

    let Instruction::Env(legacy) = &instructions[0] else {
        panic!("expected ENV");
    };
    assert_eq!(legacy.pairs.len(), 1);
    assert!(!legacy.pairs[0].equals);
    assert_eq!(legacy.pairs[0].key.value(), "PATH");
    assert_eq!(
        legacy.pairs[0].value.as_ref().map(Argument::value).as_deref(),
        Some("/usr/bin:$PATH")
    );

    let Instruction::Env(modern) = &instructions[1] else {
        panic!("expected ENV");
    };
    assert_eq!(modern.pairs.len(), 2);
    assert!(modern.pairs.iter().all(|pair| pair.equals));
    assert_eq!(
        modern.pairs[1].value.as_ref().map(Argument::value).as_deref(),
        Some("two words")
    );
}

#[test]
fn test_variables_and_quotes_in_arguments() {
    let document = parse("FROM a\nWORKDIR /opt/${APP}\nVOLUME [\"/data\"]\n").unwrap();
    let Instruction::Workdir(workdir) = &document.stages[0].instructions[0] else {
        panic!("expected WORKDIR");
    };
    match &workdir.path.contents[1] {
        ArgumentContent::EnvironmentVariable(variable) => {
            assert_eq!(variable.name, "APP");
            assert!(variable.braced);
        }
        other => panic!("expected a variable, got {other:?}"),
    }

    let Instruction::Volume(volume) = &document.stages[0].instructions[1] else {
        panic!("expected VOLUME");
    };
    assert!(matches!(&volume.paths, PathList::Exec(exec) if exec.values() == vec!["/data"]));
}

#[test]
fn test_heredocs_sharing_a_line() {
    let document = parse("FROM a\nCOPY <<A <<\"B\" /dst/\nalpha\nA\nbeta\nB\nRUN true\n").unwrap();
    let Instruction::Copy(copy) = &document.stages[0].instructions[0] else {
        panic!("expected COPY");
    };
    let TransferForm::Heredoc(heredoc) = &copy.form else {
        panic!("expected a heredoc");
    };
    assert_eq!(heredoc.name(), "A");
    assert_eq!(heredoc.body(), "alpha\n");
    assert_eq!(heredoc.additional.len(), 1);
    assert_eq!(heredoc.additional[0].name(), "B");
    assert_eq!(heredoc.additional[0].prefix.whitespace, " ");
    assert_eq!(heredoc.additional[0].body(), "beta\n");
    assert!(heredoc.is_terminated());
    assert_eq!(
        heredoc.destination.as_ref().map(Argument::value).as_deref(),
        Some("/dst/")
    );
    assert!(matches!(
        document.stages[0].instructions[1],
        Instruction::Run(_)
    ));
}

#[test]
fn test_healthcheck_and_onbuild() {
    let document = parse(
        "FROM a\nHEALTHCHECK --interval=30s CMD curl -f http://localhost/\nHEALTHCHECK  NONE\nONBUILD RUN make\n",
    )
    .unwrap();
    let instructions = &document.stages[0].instructions;

    let Instruction::Healthcheck(check) = &instructions[0] else {
        panic!("expected HEALTHCHECK");
    };
    assert_eq!(
        find_flag(&check.flags, "interval")
            .and_then(|flag| flag.value.as_ref())
            .map(Argument::value)
            .as_deref(),
        Some("30s")
    );
    match &check.body {
        Some(HealthcheckBody::Cmd(cmd)) => {
            assert_eq!(cmd.keyword, "CMD");
            assert!(matches!(&cmd.command, CommandForm::Shell(shell) if shell.text == "curl -f http://localhost/"));
        }
        other => panic!("expected CMD body, got {other:?}"),
    }

    let Instruction::Healthcheck(disabled) = &instructions[1] else {
        panic!("expected HEALTHCHECK");
    };
    match &disabled.body {
        Some(HealthcheckBody::Disabled { prefix, keyword }) => {
            assert_eq!(prefix.whitespace, "  ");
            assert_eq!(keyword, "NONE");
        }
        other => panic!("expected NONE body, got {other:?}"),
    }

    let Instruction::OnBuild(onbuild) = &instructions[2] else {
        panic!("expected ONBUILD");
    };
    assert_eq!(onbuild.instruction.name(), "RUN");
    assert_eq!(onbuild.instruction.prefix().whitespace, " ");
}

#[test]
fn test_keyword_casing_is_preserved() {
    let document = parse("from alpine As base\nrun true\n").unwrap();
    assert_eq!(document.stages[0].from.keyword, "from");
    assert_eq!(document.stages[0].from.alias.as_ref().unwrap().keyword, "As");
    assert_eq!(document.stages[0].instructions[0].keyword(), "run");
    assert_eq!(document.stages[0].instructions[0].name(), "RUN");
}

#[test]
fn test_document_lookups() {
    let document = parse(
        "# syntax=docker/dockerfile:1\nARG V=1\nFROM a AS Build\nFROM b\n",
    )
    .unwrap();
    assert_eq!(
        document.directives().syntax.as_deref(),
        Some("docker/dockerfile:1")
    );
    assert_eq!(document.global_args().len(), 1);
    assert!(document.stage("build").is_some());
    assert!(document.stage("missing").is_none());
    assert_eq!(document.find_stage("1").map(|(index, _)| index), Some(1));
    assert_eq!(document.find_stage("BUILD").map(|(index, _)| index), Some(0));
}

#[test]
fn test_node_ids_are_distinct() {
    let document = parse("FROM a\nRUN b\nRUN c\n").unwrap();
    let instructions = &document.stages[0].instructions;
    assert_ne!(instructions[0].id(), instructions[1].id());
    assert_ne!(document.id, document.stages[0].id);
}

#[test]
fn test_tree_serializes_to_json() {
    let document = parse("FROM a\nRUN b\n").unwrap();
    let value = serde_json::to_value(&document).unwrap();
    assert_eq!(value["stages"][0]["instructions"][0]["kind"], "Run");
    assert_eq!(value["stages"][0]["instructions"][0]["command"]["form"], "Shell");

    let restored: Document = serde_json::from_value(value).unwrap();
    assert_eq!(restored, document);
}

#[test]
fn test_grammar_rejections() {
    assert_eq!(parse_error_kind("RUN x\n"), ParseErrorKind::ExpectedFrom);
    assert_eq!(parse_error_kind("FROM a\nFETCH x\n"), ParseErrorKind::UnknownInstruction);
    assert_eq!(parse_error_kind("FROM a AS b c\n"), ParseErrorKind::TrailingContent);
    assert_eq!(parse_error_kind("FROM a\nHEALTHCHECK NONE x\n"), ParseErrorKind::TrailingContent);
    assert_eq!(parse_error_kind("FROM a\nONBUILD\n"), ParseErrorKind::MissingInstruction);
    assert_eq!(parse_error_kind("FROM a\n\"quoted\"\n"), ParseErrorKind::UnexpectedToken);
}

#[test]
fn test_parse_error_position() {
    let Err(CaskError::Parse(error)) = parse("FROM a\n\n  FETCH x\n") else {
        panic!("expected a parse error");
    };
    assert_eq!((error.line, error.column), (3, 3));
    assert!(error.to_string().contains("FETCH"));
}
