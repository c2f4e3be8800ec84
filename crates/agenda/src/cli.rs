//! Interactive contact list
//!
//! A REPL standing in for the list and form screens: commands drive the
//! list presenter and the form controller.

use std::borrow::Cow;
use std::sync::Arc;

use agenda_contacts::{Contact, EmailLabel, PhoneLabel};
use agenda_core::{ContactForm, FormController, FormOutcome, ListPresenter};
use nu_ansi_term::{Color, Style};
use reedline::{
    ColumnarMenu, Completer, DefaultHinter, EditCommand, Emacs, KeyCode, KeyModifiers,
    Keybindings, MenuBuilder, Prompt, PromptEditMode, PromptHistorySearch, Reedline, ReedlineEvent,
    ReedlineMenu, Signal, Suggestion,
};
use tracing::info;

/// Name of the completion menu opened by '/' and Tab
const COMMAND_MENU: &str = "command_menu";

/// Available commands for autocomplete display
const COMMANDS: &[(&str, &str)] = &[
    ("/list", "Refresh and show all contacts"),
    ("/show", "Show one contact: /show <id>"),
    ("/new", "Create a contact"),
    ("/edit", "Edit a contact: /edit <id>"),
    ("/delete", "Delete a contact: /delete <id>"),
    ("/help", "Show help"),
    ("/exit", "Quit"),
];

/// Command completer for reedline
#[derive(Clone)]
pub struct CommandCompleter {
    commands: Vec<(&'static str, &'static str)>,
}

impl CommandCompleter {
    pub fn new() -> Self {
        Self {
            commands: COMMANDS.to_vec(),
        }
    }
}

impl Default for CommandCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for CommandCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        if !line.starts_with('/') {
            return Vec::new();
        }

        self.commands
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(line))
            .map(|(cmd, desc)| Suggestion {
                value: cmd.to_string(),
                description: Some(desc.to_string()),
                extra: None,
                span: reedline::Span::new(0, pos),
                append_whitespace: true,
                style: None,
            })
            .collect()
    }
}

/// Prompt with colored styling
struct ColoredPrompt {
    text: String,
    style: Style,
}

impl ColoredPrompt {
    fn command() -> Self {
        Self {
            text: "agenda> ".to_string(),
            style: Color::Cyan.bold(),
        }
    }

    /// Prompt for one form field, showing its current value
    fn field(label: &str, current: &str) -> Self {
        let text = if current.is_empty() {
            format!("  {}: ", label)
        } else {
            format!("  {} [{}]: ", label, current)
        };
        Self {
            text,
            style: Color::Yellow.normal(),
        }
    }
}

impl Prompt for ColoredPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Owned(self.style.paint(&self.text).to_string())
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_history_search_indicator(
        &self,
        _history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        Cow::Borrowed("")
    }
}

/// Handles the REPL works with
pub struct App {
    pub presenter: Arc<ListPresenter>,
    pub form: FormController,
}

/// What the loop does after a command
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// A parsed REPL command
#[derive(Debug, PartialEq, Eq)]
enum Command {
    List,
    Show(i64),
    New,
    Edit(i64),
    Delete(i64),
    Help,
    Exit,
    Invalid(String),
}

/// Parse one input line; `None` for input that is not a command
fn parse_command(input: &str) -> Option<Command> {
    let mut parts = input.split_whitespace();
    let head = parts.next()?.to_lowercase();
    if !head.starts_with('/') {
        return None;
    }

    let id = parts.next().map(|s| s.parse::<i64>());
    let needs_id = |make: fn(i64) -> Command| match id {
        Some(Ok(id)) => make(id),
        Some(Err(_)) => Command::Invalid(format!("{}: id must be a number", head)),
        None => Command::Invalid(format!("{}: missing id", head)),
    };

    let command = match head.as_str() {
        "/list" | "/ls" => Command::List,
        "/show" => needs_id(Command::Show),
        "/new" | "/add" => Command::New,
        "/edit" => needs_id(Command::Edit),
        "/delete" | "/rm" => needs_id(Command::Delete),
        "/help" | "/?" => Command::Help,
        "/exit" | "/quit" | "/q" => Command::Exit,
        _ => Command::Invalid(format!("unknown command: {}", head)),
    };
    Some(command)
}

/// Run the interactive contact list
pub async fn run_cli(app: App) -> anyhow::Result<()> {
    info!("Starting interactive mode");

    print_welcome();

    let menu = Box::new(
        ColumnarMenu::default()
            .with_name(COMMAND_MENU)
            .with_columns(1)
            .with_column_width(Some(40))
            .with_only_buffer_difference(false),
    );

    let hinter = DefaultHinter::default().with_style(Style::new().dimmed());

    let mut line_editor = Reedline::create()
        .with_completer(Box::new(CommandCompleter::new()))
        .with_menu(ReedlineMenu::EngineCompleter(menu))
        .with_hinter(Box::new(hinter))
        .with_edit_mode(Box::new(Emacs::new(command_keybindings())));

    // Form fields take free text, so '/' must stay a plain character there
    let mut field_editor =
        Reedline::create().with_edit_mode(Box::new(Emacs::new(default_keybindings())));

    let prompt = ColoredPrompt::command();

    // Initial load, like opening the list screen
    match app.presenter.refresh().await {
        Ok(contacts) => print_contacts(&contacts),
        Err(e) => eprintln!("\nCould not load contacts: {}\n", e),
    }

    loop {
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }

                let Some(command) = parse_command(input) else {
                    eprintln!("\nCommands start with '/'. Type /help for the list.\n");
                    continue;
                };

                if handle_command(&app, &mut field_editor, command).await? == Flow::Exit {
                    break;
                }
            }
            Ok(Signal::CtrlC) => {
                println!("^C");
                continue;
            }
            Ok(Signal::CtrlD) => break,
            Err(err) => {
                eprintln!("\nError: {}\n", err);
                break;
            }
        }
    }

    println!("\nBye!\n");
    Ok(())
}

async fn handle_command(
    app: &App,
    editor: &mut Reedline,
    command: Command,
) -> anyhow::Result<Flow> {
    match command {
        Command::List => match app.presenter.refresh().await {
            Ok(contacts) => print_contacts(&contacts),
            Err(e) => eprintln!("\nCould not load contacts: {}\n", e),
        },
        Command::Show(id) => match app.presenter.find(id).await {
            Some(contact) => print_contact(&contact),
            None => eprintln!("\nNo contact {} in the list. Try /list.\n", id),
        },
        Command::New => edit_and_submit(app, editor, ContactForm::new()).await?,
        Command::Edit(id) => match app.form.load(id).await {
            Ok(form) => edit_and_submit(app, editor, form).await?,
            Err(e) => eprintln!("\nCould not load contact {}: {}\n", id, e),
        },
        Command::Delete(id) => {
            let name = app
                .presenter
                .find(id)
                .await
                .map(|c| c.display_name())
                .unwrap_or_else(|| format!("#{}", id));
            if confirm(editor, &format!("Delete {}?", name))? {
                match app.presenter.remove(id).await {
                    Ok(()) => {
                        println!("\nContact deleted.\n");
                        print_contacts(&app.presenter.contacts().await);
                    }
                    Err(e) => eprintln!("\nCould not delete contact: {}\n", e),
                }
            }
        }
        Command::Help => print_help(),
        Command::Exit => return Ok(Flow::Exit),
        Command::Invalid(message) => {
            eprintln!("\n{}. Type /help for the list of commands.\n", message)
        }
    }
    Ok(Flow::Continue)
}

/// What the form does after a submit
#[derive(Debug, PartialEq, Eq)]
enum FormStep {
    /// Back to the list
    Close,
    /// Reopen the form with the values already entered
    Retry,
}

/// A saved contact closes the form; a failed save reopens it only if the user asks
fn after_submit(
    outcome: FormOutcome,
    retry: impl FnOnce() -> anyhow::Result<bool>,
) -> anyhow::Result<FormStep> {
    match outcome {
        FormOutcome::Saved => Ok(FormStep::Close),
        FormOutcome::Failed if retry()? => Ok(FormStep::Retry),
        FormOutcome::Failed => Ok(FormStep::Close),
    }
}

/// Fill the form field by field and submit it.
///
/// A failed save keeps the entered values and offers another attempt.
async fn edit_and_submit(
    app: &App,
    editor: &mut Reedline,
    mut form: ContactForm,
) -> anyhow::Result<()> {
    loop {
        let Some(filled) = fill_form(editor, form.clone())? else {
            println!("\nCancelled.\n");
            return Ok(());
        };
        form = filled;

        let outcome = app.form.submit(&form).await;
        match outcome {
            FormOutcome::Saved => {
                println!("\nContact saved.\n");
                print_contacts(&app.presenter.contacts().await);
            }
            FormOutcome::Failed => eprintln!("\nError saving contact.\n"),
        }

        let step = after_submit(outcome, || confirm(editor, "Edit and try again?"))?;
        if step == FormStep::Close {
            return Ok(());
        }
    }
}

/// Prompt for every field. `None` when the user cancels with Ctrl-C/Ctrl-D.
fn fill_form(editor: &mut Reedline, mut form: ContactForm) -> anyhow::Result<Option<ContactForm>> {
    let title = match form.editing {
        Some(id) => format!("Editing contact #{}", id),
        None => "New contact".to_string(),
    };
    println!("\n{}", Color::Green.bold().paint(title));
    println!("{}", Style::new().dimmed().paint("  (Enter keeps the value, '-' clears it)"));

    for (label, field) in [
        ("Name", &mut form.name),
        ("Last name", &mut form.last_name),
        ("Company", &mut form.company),
        ("Address", &mut form.address),
        ("City", &mut form.city),
        ("State", &mut form.state),
        ("Phone", &mut form.phone),
    ] {
        if !ask_into(editor, label, field)? {
            return Ok(None);
        }
    }
    if !form.phone.trim().is_empty() {
        match ask_label(editor, "Phone label", form.phone_label, &PhoneLabel::ALL)? {
            Some(label) => form.phone_label = label,
            None => return Ok(None),
        }
    }

    if !ask_into(editor, "Email", &mut form.email)? {
        return Ok(None);
    }
    if !form.email.trim().is_empty() {
        match ask_label(editor, "Email label", form.email_label, &EmailLabel::ALL)? {
            Some(label) => form.email_label = label,
            None => return Ok(None),
        }
    }

    let mut picture = form.profile_picture.clone().unwrap_or_default();
    if !ask_into(editor, "Picture URI", &mut picture)? {
        return Ok(None);
    }
    form.profile_picture = (!picture.is_empty()).then_some(picture);

    Ok(Some(form))
}

/// Read one field into `value`; `false` when the user cancels
fn ask_into(editor: &mut Reedline, label: &str, value: &mut String) -> anyhow::Result<bool> {
    match ask(editor, label, value)? {
        Some(answer) => {
            *value = answer;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Read one field; empty input keeps `current`, `-` clears it
fn ask(editor: &mut Reedline, label: &str, current: &str) -> anyhow::Result<Option<String>> {
    let prompt = ColoredPrompt::field(label, current);
    match editor.read_line(&prompt)? {
        Signal::Success(line) => Ok(Some(resolve_field(&line, current))),
        Signal::CtrlC | Signal::CtrlD => Ok(None),
    }
}

fn resolve_field(input: &str, current: &str) -> String {
    match input.trim() {
        "" => current.to_string(),
        "-" => String::new(),
        value => value.to_string(),
    }
}

/// Pick a label from its fixed set by name, re-asking on unknown names
fn ask_label<L>(
    editor: &mut Reedline,
    label: &str,
    current: L,
    all: &[L],
) -> anyhow::Result<Option<L>>
where
    L: Copy + std::fmt::Display + std::str::FromStr,
{
    let choices = all.iter().map(|l| l.to_string()).collect::<Vec<_>>().join("/");
    let prompt_label = format!("{} ({})", label, choices);
    loop {
        let Some(value) = ask(editor, &prompt_label, &current.to_string())? else {
            return Ok(None);
        };
        match value.parse::<L>() {
            Ok(parsed) => return Ok(Some(parsed)),
            Err(_) => eprintln!("  Choose one of: {}", choices),
        }
    }
}

fn confirm(editor: &mut Reedline, question: &str) -> anyhow::Result<bool> {
    let prompt = ColoredPrompt::field(&format!("{} (y/N)", question), "");
    match editor.read_line(&prompt)? {
        Signal::Success(line) => Ok(is_yes(&line)),
        Signal::CtrlC | Signal::CtrlD => Ok(false),
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "si" | "sí"
    )
}

/// Default keybindings for reedline, shared by the command line and field prompts
fn default_keybindings() -> Keybindings {
    let mut keybindings = Keybindings::new();
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Enter, ReedlineEvent::Submit);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Esc, ReedlineEvent::Esc);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Char('c'), ReedlineEvent::CtrlC);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Char('d'), ReedlineEvent::CtrlD);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Up, ReedlineEvent::Up);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Down, ReedlineEvent::Down);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Left, ReedlineEvent::Left);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Right, ReedlineEvent::Right);
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Backspace,
        ReedlineEvent::Edit(vec![EditCommand::Backspace]),
    );
    keybindings
}

/// Command line keybindings: '/' types itself and opens the command menu
fn command_keybindings() -> Keybindings {
    let mut keybindings = default_keybindings();
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu(COMMAND_MENU.to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Char('/'),
        ReedlineEvent::Multiple(vec![
            ReedlineEvent::Edit(vec![EditCommand::InsertChar('/')]),
            ReedlineEvent::Menu(COMMAND_MENU.to_string()),
        ]),
    );
    keybindings
}

fn print_welcome() {
    println!();
    println!("{}", Color::Cyan.bold().paint("agenda - contacts"));
    println!("Type /help for commands, Ctrl-D to quit.");
    println!();
}

fn print_help() {
    println!();
    println!("Commands:");
    for (cmd, desc) in COMMANDS {
        println!("  {:<10} {}", cmd, desc);
    }
    println!();
}

fn print_contacts(contacts: &[Contact]) {
    println!();
    if contacts.is_empty() {
        println!("  (no contacts)");
        println!();
        return;
    }

    let header = format!("  {:>5}  {:<28} {:<18} {}", "ID", "NAME", "PHONE", "EMAIL");
    println!("{}", Style::new().bold().paint(header));
    for contact in contacts {
        let phone = contact.phones.first().map(|p| p.number.as_str()).unwrap_or("");
        let email = contact.emails.first().map(|e| e.email.as_str()).unwrap_or("");
        println!(
            "  {:>5}  {:<28} {:<18} {}",
            contact.id,
            contact.display_name(),
            phone,
            email
        );
    }
    println!();
}

fn print_contact(contact: &Contact) {
    println!();
    let title = format!("#{} {}", contact.id, contact.display_name());
    println!("{}", Color::Green.bold().paint(title));
    let rows = [
        ("Company", contact.company.as_str()),
        ("Address", contact.address.as_str()),
        ("City", contact.city.as_str()),
        ("State", contact.state.as_str()),
        ("Picture", contact.profile_picture.as_deref().unwrap_or("")),
    ];
    for (label, value) in rows {
        if !value.is_empty() {
            println!("  {:<8} {}", label, value);
        }
    }
    for phone in &contact.phones {
        println!("  {:<8} {} ({})", "Phone", phone.number, phone.label);
    }
    for email in &contact.emails {
        println!("  {:<8} {} ({})", "Email", email.email, email.label);
    }
    println!();
}
