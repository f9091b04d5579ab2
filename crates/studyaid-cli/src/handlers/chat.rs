//! Interactive chat handler.
//!
//! A blocking readline thread feeds lines to the async loop, which also
//! receives session events. Submissions run as spawned tasks so `/clear`
//! and speech commands stay responsive while the backend is working.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::mpsc as std_mpsc;
use std::thread;

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use studyaid_core::{
    ChatSession, Grade, Message, MessageId, Role, SessionEvent, SpeakOutcome, SubmitOutcome,
    UNSUPPORTED_NOTICE, Voice, VoiceSelection,
};
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

use crate::bootstrap::CliContext;
use crate::chat_commands::{HELP, ReplCommand, VoiceArg};
use crate::presentation::{
    assistant_ordinal, format_message, format_picks, format_voice_list, notice, status,
};

const PROMPT: &str = "> ";

/// What the readline thread saw.
enum Input {
    Line(String),
    Interrupted,
    Closed,
}

#[derive(PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// View-side state: the controls that live outside the transcript.
struct ChatView {
    session: Arc<ChatSession>,
    grade: Grade,
    show_checks: bool,
    /// Voices as last listed by `/voices`, so `/voice N` matches what was shown.
    listed_voices: Vec<Voice>,
    rendered: RenderLog,
}

/// Something to print after the transcript changed.
#[derive(Debug, PartialEq)]
enum Render<'a> {
    Cleared,
    Entry(&'a Message),
}

/// Which transcript entries have been printed, and in what form.
///
/// Only ids in the latest snapshot are remembered, so the sets stay as
/// small as the transcript.
#[derive(Default)]
struct RenderLog {
    /// Entries already printed in their final form.
    printed: HashSet<MessageId>,
    /// Pending entries whose placeholder was printed.
    placeholders: HashSet<MessageId>,
}

impl RenderLog {
    /// What still needs printing for `messages`.
    fn changes<'a>(&mut self, messages: &'a [Message]) -> Vec<Render<'a>> {
        if messages.is_empty() {
            let had_output = !self.printed.is_empty() || !self.placeholders.is_empty();
            self.printed.clear();
            self.placeholders.clear();
            return if had_output {
                vec![Render::Cleared]
            } else {
                Vec::new()
            };
        }

        let current: HashSet<MessageId> = messages.iter().map(Message::id).collect();
        self.printed.retain(|id| current.contains(id));
        self.placeholders.retain(|id| current.contains(id));

        let mut changes = Vec::new();
        for message in messages {
            let id = message.id();
            if self.printed.contains(&id) {
                continue;
            }
            if message.is_pending() {
                if self.placeholders.insert(id) {
                    changes.push(Render::Entry(message));
                }
                continue;
            }
            self.placeholders.remove(&id);
            self.printed.insert(id);
            changes.push(Render::Entry(message));
        }
        changes
    }
}

pub async fn execute(ctx: &CliContext) -> Result<()> {
    let (session, mut events) = ctx.session();
    let mut view = ChatView {
        session: Arc::new(session),
        grade: ctx.settings.effective_grade(),
        show_checks: ctx.settings.show_checks.unwrap_or(false),
        listed_voices: Vec::new(),
        rendered: RenderLog::default(),
    };

    println!(
        "studyaid: simplifying at grade {} via {}",
        view.grade,
        ctx.settings.effective_endpoint()
    );
    if !view.session.speech().is_supported() {
        println!("{}", status("Read-aloud is unavailable on this system."));
    }
    println!("{}", status("Type /help for commands."));

    let (lines_tx, mut lines) = unbounded_channel();
    let (ack_tx, ack_rx) = std_mpsc::channel();
    spawn_reader(lines_tx, ack_rx);

    loop {
        tokio::select! {
            input = lines.recv() => {
                let flow = match input {
                    Some(Input::Line(line)) => view.handle_line(&line),
                    Some(Input::Interrupted) => {
                        view.session.speech().stop();
                        println!("{}", status("Use /quit or Ctrl-D to exit."));
                        Flow::Continue
                    }
                    Some(Input::Closed) | None => Flow::Quit,
                };
                if flow == Flow::Quit || ack_tx.send(()).is_err() {
                    break;
                }
            }
            Some(event) = events.recv() => view.render_event(event),
        }
    }

    view.session.speech().stop();
    Ok(())
}

/// Run rustyline on its own thread. It prompts again only after an ack.
fn spawn_reader(lines: UnboundedSender<Input>, ack: std_mpsc::Receiver<()>) {
    thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                tracing::warn!(error = %e, "Could not open the terminal for line editing");
                let _ = lines.send(Input::Closed);
                return;
            }
        };
        loop {
            let input = match editor.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(line.as_str());
                    }
                    Input::Line(line)
                }
                Err(ReadlineError::Interrupted) => Input::Interrupted,
                Err(ReadlineError::Eof) => Input::Closed,
                Err(e) => {
                    tracing::warn!(error = %e, "Readline failed");
                    Input::Closed
                }
            };
            let closed = matches!(input, Input::Closed);
            if lines.send(input).is_err() || closed || ack.recv().is_err() {
                break;
            }
        }
    });
}

impl ChatView {
    fn handle_line(&mut self, line: &str) -> Flow {
        match ReplCommand::parse(line) {
            ReplCommand::Empty => {}
            ReplCommand::Text(text) => self.submit(text),
            ReplCommand::Grade(grade) => {
                self.grade = grade;
                println!("{}", status(&format!("Grade set to {grade}.")));
            }
            ReplCommand::Clear => self.session.clear(),
            ReplCommand::ToggleChecks => {
                self.show_checks = !self.show_checks;
                let state = if self.show_checks { "shown" } else { "hidden" };
                println!("{}", status(&format!("Fact checks {state}.")));
            }
            ReplCommand::Voices => self.list_voices(),
            ReplCommand::Voice(arg) => self.choose_voice(arg),
            ReplCommand::Preview => {
                if let SpeakOutcome::Failed(reason) = self.session.speech().preview(self.grade) {
                    println!("{}", notice(&format!("Could not start speech: {reason}")));
                }
            }
            ReplCommand::Speak(ordinal) => self.toggle_speech(ordinal),
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Quit => return Flow::Quit,
            ReplCommand::Invalid(usage) => println!("{}", notice(&usage)),
            ReplCommand::Unknown(name) => {
                let hint = format!("Unknown command /{name}; try /help.");
                println!("{}", notice(&hint));
            }
        }
        Flow::Continue
    }

    fn submit(&self, text: String) {
        let session = Arc::clone(&self.session);
        let grade = self.grade;
        // submit_text sets the input and claims the in-flight slot under one lock.
        tokio::spawn(async move {
            if session.submit_text(text, grade).await == SubmitOutcome::Ignored {
                let hint = "Still simplifying the previous text; send this again when it is done.";
                println!("{}", notice(hint));
            }
        });
    }

    fn list_voices(&mut self) {
        let speech = self.session.speech();
        if !speech.is_supported() {
            println!("{}", notice(UNSUPPORTED_NOTICE));
            return;
        }
        self.listed_voices = speech.voices();
        let selection = speech.selection();
        println!("{}", format_voice_list(&self.listed_voices, &selection));
        println!("{}", format_picks(&self.listed_voices, &selection));
    }

    fn choose_voice(&mut self, arg: VoiceArg) {
        let speech = self.session.speech();
        let selection = match arg {
            VoiceArg::Auto => VoiceSelection::Auto,
            VoiceArg::Index(n) => {
                if self.listed_voices.is_empty() {
                    self.listed_voices = speech.voices();
                }
                let Some(voice) = self.listed_voices.get(n - 1) else {
                    let hint = format!("There is no voice {n}; see /voices.");
                    println!("{}", notice(&hint));
                    return;
                };
                VoiceSelection::Manual(voice.id.clone())
            }
            VoiceArg::Id(id) => {
                if !speech.voices().iter().any(|v| v.id == id) {
                    println!(
                        "{}",
                        notice(&format!("Voice '{id}' not found; choosing automatically."))
                    );
                }
                VoiceSelection::Manual(id)
            }
        };
        speech.set_selection(selection);

        let current = speech
            .selected_voice(self.grade)
            .map_or_else(|| "engine default".to_string(), |v| v.name);
        let line = format!("Voice for grade {}: {current}", self.grade);
        println!("{}", status(&line));
    }

    fn toggle_speech(&self, ordinal: Option<usize>) {
        let target = match ordinal {
            None => self.session.latest_assistant(),
            Some(n) => self
                .session
                .snapshot()
                .iter()
                .filter(|m| m.role() == Role::Assistant)
                .nth(n - 1)
                .map(Message::id),
        };
        let Some(id) = target else {
            println!("{}", notice("No reply to read yet."));
            return;
        };
        match self.session.speak_message(id) {
            None => println!("{}", notice("That reply is still being simplified.")),
            Some(SpeakOutcome::Failed(reason)) => {
                println!("{}", notice(&format!("Could not start speech: {reason}")));
            }
            Some(_) => {}
        }
    }

    fn render_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::TranscriptChanged => self.render_transcript(),
            SessionEvent::SpeakingChanged(Some(id)) => {
                let messages = self.session.snapshot();
                let label = assistant_ordinal(&messages, id)
                    .map_or_else(|| "reply".to_string(), |n| format!("reply {n}"));
                println!("{}", status(&format!("Reading {label} aloud...")));
            }
            SessionEvent::SpeakingChanged(None) => println!("{}", status("Speech stopped.")),
            SessionEvent::Notice(text) => println!("{}", notice(&text)),
        }
    }

    /// Print whatever changed since the last render.
    fn render_transcript(&mut self) {
        let messages = self.session.snapshot();
        for change in self.rendered.changes(&messages) {
            match change {
                Render::Cleared => println!("{}", status("Conversation cleared.")),
                Render::Entry(message) if message.is_pending() => {
                    println!("{}", format_message(message, None, self.show_checks));
                }
                Render::Entry(message) => {
                    let ordinal = assistant_ordinal(&messages, message.id());
                    println!("{}", format_message(message, ordinal, self.show_checks));
                }
            }
        }
    }
}
