//! Edit-and-print tests
//!
//! An edited tree must print with only the edited span changed; everything
//! around it keeps its original spacing and comments.

use cask_core::tree::{
    Argument, CommandForm, ExecForm, Instruction, KeyValuePair, Marker, Markers, Space,
};
use cask_core::{Document, parse, print_instruction};

fn edit_instruction(
    document: &Document,
    stage: usize,
    index: usize,
    edit: impl FnOnce(&Instruction) -> Instruction,
) -> Document {
    let target = &document.stages[stage];
    let mut instructions = target.instructions.clone();
    instructions[index] = edit(&instructions[index]);
    document.with_stage(stage, target.with_instructions(instructions))
}

#[test]
fn test_retag_keeps_surroundings() {
    let source = "# base\nFROM  alpine:3.18   AS base # pinned\nRUN apk add curl\n";
    let document = parse(source).unwrap();
    let stage = &document.stages[0];
    let edited = document.with_stage(0, stage.with_from(stage.from.with_tag("3.19")));

    assert_eq!(
        edited.print(),
        "# base\nFROM  alpine:3.19   AS base # pinned\nRUN apk add curl\n"
    );
    assert_eq!(edited.stages[0].from.id, stage.from.id);
    assert_eq!(document.print(), source);
}

#[test]
fn test_tag_added_and_replaced_by_digest() {
    let document = parse("FROM alpine AS a\nFROM debian:12 AS b\n").unwrap();

    let first = &document.stages[0];
    let edited = document.with_stage(0, first.with_from(first.from.with_tag("3.19")));
    assert_eq!(edited.print(), "FROM alpine:3.19 AS a\nFROM debian:12 AS b\n");

    let second = &edited.stages[1];
    let edited = edited.with_stage(1, second.with_from(second.from.with_digest("sha256:feed")));
    assert_eq!(
        edited.print(),
        "FROM alpine:3.19 AS a\nFROM debian@sha256:feed AS b\n"
    );
}

#[test]
fn test_quoted_reference_is_edited_inside_its_quotes() {
    let document = parse("FROM 'alpine:3.18' AS a\nFROM \"debian\"\n").unwrap();

    let first = &document.stages[0];
    let edited = document.with_stage(0, first.with_from(first.from.with_tag("3.19")));
    assert_eq!(edited.print(), "FROM 'alpine:3.19' AS a\nFROM \"debian\"\n");

    let second = &edited.stages[1];
    let edited = edited.with_stage(1, second.with_from(second.from.with_digest("sha256:feed")));
    assert_eq!(
        edited.print(),
        "FROM 'alpine:3.19' AS a\nFROM \"debian@sha256:feed\"\n"
    );

    let first = &edited.stages[0];
    let edited = edited.with_stage(0, first.with_from(first.from.with_digest("sha256:beef")));
    assert_eq!(
        edited.print(),
        "FROM 'alpine@sha256:beef' AS a\nFROM \"debian@sha256:feed\"\n"
    );
}

#[test]
fn test_out_of_range_stage_is_ignored() {
    let document = parse("FROM a\n").unwrap();
    let stage = document.stages[0].clone();
    assert_eq!(document.with_stage(5, stage).print(), "FROM a\n");
}

#[test]
fn test_user_group_edits() {
    let document = parse("FROM a\nUSER app\nUSER app:wheel\n").unwrap();

    let edited = edit_instruction(&document, 0, 0, |instruction| match instruction {
        Instruction::User(user) => Instruction::User(user.with_group("staff")),
        other => other.clone(),
    });
    let edited = edit_instruction(&edited, 0, 1, |instruction| match instruction {
        Instruction::User(user) => Instruction::User(user.without_group()),
        other => other.clone(),
    });

    assert_eq!(edited.print(), "FROM a\nUSER app:staff\nUSER app\n");
}

#[test]
fn test_shell_form_replaced_by_exec_form() {
    let document = parse("FROM a\n# start\nCMD   echo hi # trailing\n").unwrap();
    let edited = edit_instruction(&document, 0, 0, |instruction| match instruction {
        Instruction::Cmd(cmd) => {
            let mut cmd = cmd.clone();
            let exec = ExecForm::from_values(["echo", "hi"]).with_prefix(cmd.command.prefix().clone());
            cmd.command = CommandForm::Exec(exec);
            Instruction::Cmd(cmd)
        }
        other => other.clone(),
    });

    assert_eq!(
        edited.print(),
        "FROM a\n# start\nCMD   [\"echo\", \"hi\"] # trailing\n"
    );
}

#[test]
fn test_exec_values_are_escaped() {
    let document = parse("FROM a\nCMD echo hi\n").unwrap();
    let edited = edit_instruction(&document, 0, 0, |instruction| match instruction {
        Instruction::Cmd(cmd) => {
            let mut cmd = cmd.clone();
            let exec = ExecForm::from_values(["sh", "-c", r#"echo "hi" \ done"#])
                .with_prefix(cmd.command.prefix().clone());
            cmd.command = CommandForm::Exec(exec);
            Instruction::Cmd(cmd)
        }
        other => other.clone(),
    });

    let printed = edited.print();
    assert_eq!(
        printed,
        "FROM a\nCMD [\"sh\", \"-c\", \"echo \\\"hi\\\" \\\\ done\"]\n"
    );

    let reparsed = parse(&printed).unwrap();
    match &reparsed.stages[0].instructions[0] {
        Instruction::Cmd(cmd) => match &cmd.command {
            CommandForm::Exec(exec) => {
                assert_eq!(exec.values(), vec!["sh", "-c", r#"echo \"hi\" \\ done"#]);
            }
            other => panic!("expected exec form, got {other:?}"),
        },
        other => panic!("expected CMD, got {other:?}"),
    }
}

#[test]
fn test_exec_element_edit_keeps_spacing() {
    let document = parse("FROM a\nENTRYPOINT [ \"/bin/app\" ,\"--serve\" ]\n").unwrap();
    let edited = edit_instruction(&document, 0, 0, |instruction| match instruction {
        Instruction::Entrypoint(entrypoint) => {
            let mut entrypoint = entrypoint.clone();
            if let CommandForm::Exec(exec) = &mut entrypoint.command {
                exec.elements[1].literal.text = "--debug".to_string();
            }
            Instruction::Entrypoint(entrypoint)
        }
        other => other.clone(),
    });

    assert_eq!(
        edited.print(),
        "FROM a\nENTRYPOINT [ \"/bin/app\" ,\"--debug\" ]\n"
    );
}

#[test]
fn test_appended_env_pair() {
    let document = parse("FROM a\nENV A=1\n").unwrap();
    let edited = edit_instruction(&document, 0, 0, |instruction| match instruction {
        Instruction::Env(env) => {
            let mut env = env.clone();
            env.pairs.push(KeyValuePair::new("B", Argument::text("2")));
            Instruction::Env(env)
        }
        other => other.clone(),
    });

    assert_eq!(edited.print(), "FROM a\nENV A=1 B=2\n");
}

#[test]
fn test_inserted_instruction_uses_its_own_prefix() {
    let document = parse("FROM a\nRUN one\n").unwrap();
    let stage = &document.stages[0];
    let mut instructions = stage.instructions.clone();
    let copy = instructions[0].clone().with_prefix(Space::build("\n\n"));
    instructions.push(copy);

    let edited = document.with_stage(0, stage.with_instructions(instructions));
    assert_eq!(edited.print(), "FROM a\nRUN one\n\nRUN one\n");
}

#[test]
fn test_markers_do_not_print() {
    let document = parse("FROM a\nRUN one\n").unwrap();
    let edited = edit_instruction(&document, 0, 0, |instruction| {
        instruction.clone().with_markers(Markers::EMPTY.add(Marker::new(
            "search-result",
            serde_json::json!({"rule": "pin-packages"}),
        )))
    });

    let marked = &edited.stages[0].instructions[0];
    assert!(marked.markers().find("search-result").is_some());
    assert_eq!(edited.print(), document.print());
    assert_eq!(print_instruction(marked), "\nRUN one");
}
