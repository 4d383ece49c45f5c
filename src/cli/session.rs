//! `playsync session`: interactive session loop.
//!
//! ```text
//! stdin lines ──┐
//! file watch  ──┼──► select! ──► Session ──► fan-out / compile
//! outcomes    ──┘
//! ```
//!
//! Everything runs on one task; the only concurrent work is the compile
//! request spawned by the orchestrator.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use url::Url;

use super::common::load_registry;
use crate::compile::{HttpCompilationService, Trigger};
use crate::config::PlaysyncConfig;
use crate::core::{OptionField, OptionValue};
use crate::editor::TerminalEditor;
use crate::persist::{AddressBar, RememberStore};
use crate::sync::{Session, SessionError, SessionParts};

/// Quiet period before a burst of file events is handled.
const DEBOUNCE: Duration = Duration::from_millis(50);

const HELP: &str = "\
commands:
  set <field> <value>   change an option (language, target, mode, branch)
  branch <id|none>      select a branch
  reset                 reset options to defaults
  code <file>           load code from a file and compile it
  lint                  compile the current code
  show                  print the current state
  url                   print the shareable url
  help                  show this help
  quit                  end the session";

// ============================================================================
// Commands
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set(OptionValue),
    Branch(Option<String>),
    Reset,
    Code(PathBuf),
    Lint,
    Show,
    Url,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line; blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let command = match (head, rest.as_slice()) {
            ("set", [field, value]) => {
                let field: OptionField = field.parse()?;
                Self::Set(OptionValue::parse(field, value)?)
            }
            ("branch", [id]) => {
                let OptionValue::Branch(id) = OptionValue::parse(OptionField::Branch, id)? else {
                    bail!("invalid branch `{id}`");
                };
                Self::Branch(id)
            }
            ("reset", []) => Self::Reset,
            ("code", [path]) => Self::Code(PathBuf::from(path)),
            ("lint", []) => Self::Lint,
            ("show", []) => Self::Show,
            ("url", []) => Self::Url,
            ("help" | "?", []) => Self::Help,
            ("quit" | "exit", []) => Self::Quit,
            _ => bail!("cannot parse `{}`, try `help`", line.trim()),
        };
        Ok(Some(command))
    }
}

// ============================================================================
// Session loop
// ============================================================================

pub async fn run_session(
    config: &PlaysyncConfig,
    url: Option<&str>,
    watch: Option<&Path>,
) -> Result<()> {
    let mut session = start_session(config, url).await?;
    crate::log!("session"; "ready, {} branches, type `help` for commands", session.registry().len());

    let (_watcher, mut watch_rx) = match watch {
        Some(path) => {
            let (watcher, rx) = watch_file(path)?;
            // Compile once so the first result is on screen
            process_file(&mut session, path);
            (Some(watcher), Some(rx))
        }
        None => (None, None),
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            biased;

            Some(outcome) = session.next_outcome() => session.complete(outcome),

            Some(()) = recv_watch(&mut watch_rx) => {
                tokio::time::sleep(DEBOUNCE).await;
                if let Some(rx) = watch_rx.as_mut() {
                    while rx.try_recv().is_ok() {}
                }
                if let Some(path) = watch {
                    process_file(&mut session, path);
                }
            }

            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                crate::logger::status_detach();
                match Command::parse(&line) {
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) => execute(&mut session, command),
                    Ok(None) => {}
                    Err(err) => crate::log!("error"; "{}", err),
                }
            }
        }
    }

    Ok(())
}

async fn start_session(config: &PlaysyncConfig, url: Option<&str>) -> Result<Session> {
    let registry = match load_registry(config).await {
        Ok(registry) => registry,
        Err(err) => {
            crate::log!("error"; "{:#}", err);
            Default::default()
        }
    };

    let mut address_bar =
        AddressBar::from_config(&config.share).context("invalid `share.base_url`")?;
    if let Some(url) = url {
        let parsed = Url::parse(url).with_context(|| format!("invalid url `{url}`"))?;
        address_bar = address_bar.with_current(parsed);
    }

    let service =
        HttpCompilationService::from_config(&config.service).context("invalid `service.url`")?;

    Ok(Session::start(SessionParts {
        defaults: config.defaults.clone(),
        registry,
        url: Box::new(address_bar),
        store: Box::new(RememberStore::new(&config.store.path)),
        service: Arc::new(service),
        editor: Arc::new(TerminalEditor),
    }))
}

fn execute(session: &mut Session, command: Command) {
    match command {
        Command::Set(value) => report(session.set_option(value)),
        Command::Branch(id) => report(session.select_branch(id.as_deref())),
        Command::Reset => report(Ok::<_, SessionError>(session.reset_options())),
        Command::Code(path) => process_file(session, &path),
        Command::Lint => {
            let code = session.state().code.clone();
            report_trigger(session.process(code));
        }
        Command::Show => show(session),
        Command::Url => match session.share_url() {
            Some(url) => println!("{url}"),
            None => crate::log!("session"; "no url yet"),
        },
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}

fn report<E: std::fmt::Display>(changed: std::result::Result<Vec<OptionField>, E>) {
    match changed {
        Ok(fields) if fields.is_empty() => crate::log!("session"; "unchanged"),
        Ok(fields) => {
            let names: Vec<_> = fields.iter().map(|f| f.key()).collect();
            crate::log!("session"; "changed: {}", names.join(", "));
        }
        Err(err) => crate::log!("error"; "{}", err),
    }
}

fn report_trigger(trigger: Trigger) {
    match trigger {
        Trigger::Issued => crate::debug!("compile"; "compiling"),
        Trigger::EmptyInput => crate::log!("compile"; "nothing to compile"),
        Trigger::InFlight => crate::log!("compile"; "busy, try again when the result is in"),
    }
}

fn process_file(session: &mut Session, path: &Path) {
    match std::fs::read_to_string(path) {
        Ok(code) => report_trigger(session.process(code)),
        Err(err) => crate::log!("error"; "cannot read `{}`: {}", path.display(), err),
    }
}

fn show(session: &Session) {
    let state = session.state();
    let branch = state
        .branch
        .as_ref()
        .map_or_else(|| "none".to_string(), |b| b.display_name());

    println!("language  {}", state.options.language.display_name());
    match state.options.target.editor_mode() {
        "" => println!("target    {}", state.options.target.display_name()),
        mode => println!("target    {} ({mode})", state.options.target.display_name()),
    }
    println!("mode      {}", state.options.mode.as_str());
    println!("branch    {branch}");
    println!("code      {} lines", state.code.lines().count());
    println!("compiles  {}", session.issued());
    if state.loading {
        println!("result    compiling...");
    } else if let Some(result) = &state.result {
        println!(
            "result    {} ({} errors, {} warnings)",
            if result.success { "ok" } else { "failed" },
            result.errors.len(),
            result.warnings.len()
        );
    }
}

// ============================================================================
// File watching
// ============================================================================

/// Watch `path`; every relevant event sends one `()`.
fn watch_file(path: &Path) -> Result<(RecommendedWatcher, mpsc::UnboundedReceiver<()>)> {
    let (tx, rx) = mpsc::unbounded_channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        match res {
            Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                let _ = tx.send(());
            }
            Ok(_) => {}
            Err(err) => crate::log!("watch"; "notify error: {}", err),
        }
    })
    .context("failed to create file watcher")?;

    watcher
        .watch(path, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch `{}`", path.display()))?;
    crate::debug!("watch"; "watching {}", path.display());

    Ok((watcher, rx))
}

/// Next watch event; pends forever without a watcher.
async fn recv_watch(rx: &mut Option<mpsc::UnboundedReceiver<()>>) -> Option<()> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
