use std::io;
use std::sync::Arc;

use interactor_core::{
    Context, DiagnosticSink, Diagnostics, DiagnosticsTarget, Engine, EngineConfig, ErrorCollection,
    Errorable, Filter, Inputs, Interaction, MemorySink, Plain, ReturningInteraction, Schema, Step,
    Unit, WriterSink,
};

struct Shout;

impl Unit for Shout {
    fn filters(&self) -> Schema {
        Schema::new().filter(Filter::string("word"))
    }
}

impl Interaction for Shout {
    type Output = String;

    fn execute(&mut self, ctx: &mut Context<'_>) -> Step<String> {
        let word = ctx.inputs().string("word").unwrap_or_default().to_string();
        if word.is_empty() {
            ctx.add_error("word", "can't be blank");
        }
        ctx.return_if_errors()?;
        Ok(word.to_uppercase())
    }
}

struct Announce;

impl Unit for Announce {
    fn filters(&self) -> Schema {
        Schema::new().filter(Filter::string("word"))
    }
}

impl Interaction for Announce {
    type Output = String;

    fn execute(&mut self, ctx: &mut Context<'_>) -> Step<String> {
        let inputs = ctx.inputs().forward();
        let shouted = ctx.compose(Plain(Shout), inputs)?;
        Ok(format!("{shouted}!"))
    }
}

fn memory_engine() -> (Engine, MemorySink) {
    let sink = MemorySink::new();
    (Engine::with_sink(sink.clone()), sink)
}

#[test]
fn success_writes_two_lines() {
    let (engine, sink) = memory_engine();
    let outcome = engine
        .run(Shout, Inputs::new().with("word", "hi"))
        .unwrap();
    assert_eq!(outcome.into_result().as_deref(), Some("HI"));

    let lines = sink.lines();
    assert_eq!(lines.len(), 2, "{lines:#?}");
    assert!(lines[0].starts_with("Executing interaction Shout (id#"));
    assert!(lines[0].ends_with(" ↳ inputs: {word: \"hi\"}"));
    assert!(lines[1].starts_with(" ↳ outcome: succeeded (id#"));
}

#[test]
fn failure_writes_error_details() {
    let (engine, sink) = memory_engine();
    engine.run(Shout, Inputs::new().with("word", "")).unwrap();

    let lines = sink.lines();
    assert_eq!(lines.len(), 3, "{lines:#?}");
    assert!(lines[1].starts_with(" ↳ outcome: failed (id#"));
    assert!(lines[2].starts_with(r#" ↳ errors: {"word":[{"error":"can't be blank"}]} (id#"#));
}

#[test]
fn lines_of_one_invocation_share_a_marker() {
    let (engine, sink) = memory_engine();
    engine.run(Shout, Inputs::new().with("word", "")).unwrap();

    let lines = sink.lines();
    let marker = |line: &str| line.split("(id#").nth(1).map(|rest| rest[..8].to_string());
    assert!(marker(&lines[0]).is_some());
    assert_eq!(marker(&lines[0]), marker(&lines[1]));
    assert_eq!(marker(&lines[1]), marker(&lines[2]));
}

#[test]
fn invalid_inputs_are_reported() {
    let (engine, sink) = memory_engine();
    engine.run(Shout, Inputs::new().with("word", 3)).unwrap();

    let lines = sink.lines();
    assert_eq!(lines.len(), 3, "{lines:#?}");
    assert!(lines[0].ends_with(" ↳ inputs: {}"));
    assert!(lines[2].contains(r#""type":"string""#));
}

#[test]
fn nested_invocations_are_indented() {
    let (engine, sink) = memory_engine();
    let outcome = engine
        .run(Announce, Inputs::new().with("word", "go"))
        .unwrap();
    assert_eq!(outcome.into_result().as_deref(), Some("GO!"));

    let lines = sink.lines();
    assert_eq!(lines.len(), 4, "{lines:#?}");
    assert!(lines[0].starts_with("Executing interaction Announce"));
    assert!(!lines[0].contains("called from"));
    assert!(lines[1].starts_with("  Executing interaction Shout"));
    assert!(lines[1].contains(" ↳ called from Announce ↳ inputs: "));
    assert!(lines[2].starts_with("   ↳ outcome: succeeded"));
    assert!(lines[3].starts_with(" ↳ outcome: succeeded"));
}

#[test]
fn indent_width_is_configurable() {
    let sink = MemorySink::new();
    let engine = Engine::with_diagnostics(
        Diagnostics::new(Arc::new(sink.clone())).with_indent_width(4),
    );
    engine
        .run(Announce, Inputs::new().with("word", "go"))
        .unwrap();

    assert!(sink.lines()[1].starts_with("    Executing interaction Shout"));
}

#[test]
fn long_inputs_are_truncated() {
    let sink = MemorySink::new();
    let engine = Engine::with_diagnostics(
        Diagnostics::new(Arc::new(sink.clone())).with_max_inputs_len(Some(12)),
    );
    engine
        .run(Shout, Inputs::new().with("word", "a".repeat(200)))
        .unwrap();

    let before = &sink.lines()[0];
    assert!(before.contains("... [inputs truncated] ..."));
    assert!(!before.contains(&"a".repeat(50)));
}

struct BrokenSink;

impl DiagnosticSink for BrokenSink {
    fn write_line(&self, _line: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }
}

#[test]
fn failing_sink_does_not_change_results() {
    let engine = Engine::with_sink(BrokenSink);

    let outcome = engine
        .run(Announce, Inputs::new().with("word", "go"))
        .unwrap();
    assert_eq!(outcome.into_result().as_deref(), Some("GO!"));

    let outcome = engine.run(Shout, Inputs::new().with("word", "")).unwrap();
    assert_eq!(outcome.errors().on("word"), vec!["can't be blank"]);
}

#[derive(Debug, Default)]
struct Note {
    errors: ErrorCollection,
}

impl Errorable for Note {
    fn errors(&self) -> &ErrorCollection {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut ErrorCollection {
        &mut self.errors
    }
}

struct FlagNote;

impl Unit for FlagNote {
    fn filters(&self) -> Schema {
        Schema::new()
            .filter(Filter::record::<Note>("note"))
            .filter(Filter::integer("count"))
    }
}

impl ReturningInteraction for FlagNote {
    type Record = Note;
    const RETURNING: Option<&'static str> = Some("note");

    fn execute_returning(&mut self, ctx: &mut Context<'_>, _note: &mut Note) -> Step {
        ctx.add_error("base", "flagged");
        Ok(())
    }
}

#[test]
fn returning_unit_reports_record_errors() {
    let (engine, sink) = memory_engine();
    let mut note = Note::default();
    note.errors.add("count", "was already checked");

    engine
        .run_returning(
            FlagNote,
            Inputs::new().with("count", 3).with_record("note", &mut note),
        )
        .unwrap();

    let lines = sink.lines();
    assert_eq!(lines.len(), 3, "{lines:#?}");
    assert!(lines[0].ends_with(" ↳ inputs: {count: 3, note: <Note>}"));
    assert!(lines[2].contains(r#""base":[{"error":"flagged"}]"#));
    assert!(lines[2].contains(r#""count":[{"error":"was already checked"}]"#));
}

#[test]
fn writer_sink_writes_to_file() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let engine = Engine::with_sink(WriterSink::new(file.reopen().unwrap()));

    engine.run(Shout, Inputs::new().with("word", "")).unwrap();

    let written = std::fs::read_to_string(file.path()).unwrap();
    assert_eq!(written.lines().count(), 3);
    assert!(written.starts_with("Executing interaction Shout"));
}

#[test]
fn engine_from_config_with_diagnostics_off() {
    let config = EngineConfig {
        diagnostics: DiagnosticsTarget::Off,
        ..EngineConfig::default()
    };
    let engine = Engine::from_config(&config);

    let outcome = engine.run(Shout, Inputs::new().with("word", "ok")).unwrap();
    assert_eq!(outcome.into_result().as_deref(), Some("OK"));
}
