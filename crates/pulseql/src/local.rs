use std::borrow::Cow;
use std::io::{self, Stdout};
use std::path::Path;

use anyhow::Result;
use nu_ansi_term::{Color, Style};
use pulseql_core::dictionary::vocabulary;
use pulseql_core::executor::QueryExecutor;
use pulseql_core::session::{InteractiveSession, SessionState};
use reedline::{
    ColumnarMenu, DefaultHinter, KeyCode, KeyModifiers, MenuBuilder, Prompt, PromptEditMode,
    PromptHistorySearch, PromptHistorySearchStatus, Reedline, ReedlineEvent, ReedlineMenu, Signal,
    Vi, default_vi_insert_keybindings, default_vi_normal_keybindings,
};
use tracing::debug;

use crate::highlighter::{KeywordCompleter, SQLHighlighter};

const COMPLETION_MENU: &str = "completion_menu";

struct ConsolePrompt;

impl Prompt for ConsolePrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed(">>>")
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _edit_mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed(" ")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!("({prefix}search: {}) ", history_search.term))
    }
}

/// Interactive console over the terminal.
pub struct LocalShell {
    session: InteractiveSession<Stdout>,
    editor: Reedline,
}

impl LocalShell {
    pub fn open(db_path: &Path, executor: QueryExecutor, auto_complete: bool) -> Result<Self> {
        let words = vocabulary(executor.dictionary());
        let session = InteractiveSession::open(db_path, executor, io::stdout())?;
        Ok(LocalShell {
            session,
            editor: build_editor(words, auto_complete),
        })
    }

    pub fn run(mut self) -> Result<()> {
        self.session.write_banner()?;

        loop {
            match self.editor.read_line(&ConsolePrompt)? {
                Signal::Success(line) => {
                    if self.session.handle_line(&line)? == SessionState::Terminated {
                        break;
                    }
                }
                Signal::CtrlC => debug!("interrupted input discarded"),
                Signal::CtrlD => {
                    self.session.close()?;
                    break;
                }
            }
        }

        Ok(())
    }
}

fn build_editor(vocabulary: Vec<String>, auto_complete: bool) -> Reedline {
    let mut insert_keybindings = default_vi_insert_keybindings();
    insert_keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu(COMPLETION_MENU.to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );
    let completion_menu = ColumnarMenu::default().with_name(COMPLETION_MENU);

    Reedline::create()
        .with_highlighter(Box::new(SQLHighlighter::new(&vocabulary)))
        .with_hinter(Box::new(
            DefaultHinter::default().with_style(Style::new().dimmed().italic().fg(Color::DarkGray)),
        ))
        .with_completer(Box::new(KeywordCompleter::new(vocabulary)))
        .with_quick_completions(auto_complete)
        .with_partial_completions(true)
        .with_menu(ReedlineMenu::EngineCompleter(Box::new(completion_menu)))
        .with_edit_mode(Box::new(Vi::new(
            insert_keybindings,
            default_vi_normal_keybindings(),
        )))
}
