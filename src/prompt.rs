//! Interactive prompts on the terminal
//!
//! Menus list their choices by number and re-ask until the answer is one of
//! them; Tab completes a partly typed choice. End of input, `quit` and
//! Ctrl-C all end the session.

use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio_util::sync::CancellationToken;

const QUIT: &str = "quit";

/// Choices of the active menu, offered as completions
#[derive(Default)]
struct Choices {
    items: Vec<String>,
}

impl Choices {
    fn matching(&self, prefix: &str) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| item.starts_with(prefix))
            .cloned()
            .collect()
    }
}

impl Completer for Choices {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        Ok((0, self.matching(&line[..pos])))
    }
}

impl Hinter for Choices {
    type Hint = String;
}

impl Highlighter for Choices {}

impl Validator for Choices {}

impl Helper for Choices {}

/// An answer to a menu
#[derive(Debug, PartialEq, Eq)]
enum Selection<'a> {
    Chosen(&'a str),
    Quit,
    Invalid,
}

/// Match an answer by 1-based number or by exact name
fn select_from<'a>(answer: &str, choices: &[&'a str]) -> Selection<'a> {
    let answer = answer.trim();
    if answer == QUIT {
        return Selection::Quit;
    }

    let chosen = match answer.parse::<usize>() {
        Ok(number) => number.checked_sub(1).and_then(|i| choices.get(i)),
        Err(_) => choices.iter().find(|choice| **choice == answer),
    };
    chosen.map_or(Selection::Invalid, |choice| Selection::Chosen(*choice))
}

/// Line editor with menu completion, bound to the shutdown token
pub struct Prompt {
    editor: Editor<Choices, DefaultHistory>,
    cancel: CancellationToken,
}

impl Prompt {
    pub fn new(cancel: CancellationToken) -> rustyline::Result<Self> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(Choices::default()));
        Ok(Self { editor, cancel })
    }

    /// Ask until the answer names one of `choices`. `None` ends the session.
    pub fn select<'a>(
        &mut self,
        title: &str,
        choices: &[&'a str],
    ) -> rustyline::Result<Option<&'a str>> {
        println!("{}:", title);
        for (i, choice) in choices.iter().enumerate() {
            println!("  {:>2}) {}", i + 1, choice);
        }
        self.offer(choices);

        loop {
            let Some(answer) = self.read("> ")? else {
                return Ok(None);
            };
            match select_from(&answer, choices) {
                Selection::Chosen(choice) => return Ok(Some(choice)),
                Selection::Quit => return Ok(None),
                Selection::Invalid => println!(
                    "'{}' is not listed, enter its number or name (Tab completes)",
                    answer.trim()
                ),
            }
        }
    }

    /// Free text answer. `None` ends the session.
    pub fn text(&mut self, label: &str) -> rustyline::Result<Option<String>> {
        self.offer(&[]);

        let Some(answer) = self.read(&format!("{}: ", label))? else {
            return Ok(None);
        };
        if answer.trim() == QUIT {
            return Ok(None);
        }
        self.editor.add_history_entry(answer.as_str())?;
        Ok(Some(answer))
    }

    fn offer(&mut self, choices: &[&str]) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.items = choices.iter().map(|choice| choice.to_string()).collect();
        }
    }

    fn read(&mut self, prompt: &str) -> rustyline::Result<Option<String>> {
        if self.cancel.is_cancelled() {
            return Ok(None);
        }

        // The terminal is in raw mode while reading, so Ctrl-C arrives here
        match tokio::task::block_in_place(|| self.editor.readline(prompt)) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) => {
                self.cancel.cancel();
                Ok(None)
            }
            Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
