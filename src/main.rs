mod actor;
mod analysis;
mod config;
mod constants;
mod credentials;
mod mail;
mod notification;
mod oauth2;
mod ui;

use anyhow::{Context, Result};
use std::env;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::analysis::{
    AnalysisCommand, AnalysisContext, AnalysisEvent, AnalysisKind, SymblClient, WaitStrategy,
    spawn_analysis_actor,
};
use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::mail::{Mailbox, MessageItem, parse_message};
use crate::notification::Alerts;
use crate::oauth2::{AppCredentials, TokenProvider};
use crate::ui::{Panes, present, render_subject};

fn setup_logging() {
    use std::fs::OpenOptions;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mailsense=debug"));

    // Try to create a log file in the config directory
    let log_file = Config::config_dir()
        .ok()
        .and_then(|dir| std::fs::create_dir_all(&dir).ok().map(|_| dir))
        .map(|dir| dir.join("mailsense.log"))
        .and_then(|path| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .ok()
        });

    if let Some(file) = log_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        // Fallback to stderr if file logging fails
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_usage() {
    eprintln!(
        r#"mailsense - Analyze an email with the Symbl API

Usage: mailsense <command> [args]

Commands:
    sentiment [FILE|-]      Topics with sentiment for a message
    action-items [FILE|-]   Action items in a message
    questions [FILE|-]      Questions asked in a message
    all [FILE|-]            Run all three analyses
    text <CONTENT>          Sentiment analysis of the given text
    setup                   Store API credentials
    creds                   Show credential storage status
    help                    Show this help message

FILE ending in .eml is parsed as an email; anything else, or stdin
(no FILE or -), is analyzed as plain text.

Configuration file: ~/.config/mailsense/config.toml
"#
    );
}

/// Load the message the pane operates on
async fn load_message(arg: Option<&str>) -> Result<MessageItem> {
    match arg {
        None | Some("-") => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read message from stdin")?;
            Ok(MessageItem::from_text(text))
        }
        Some(path) => {
            let path = Path::new(path);
            let raw = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;

            let is_eml = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("eml"));
            if is_eml {
                parse_message(&raw).with_context(|| format!("Failed to parse {}", path.display()))
            } else {
                Ok(MessageItem::from_text(String::from_utf8_lossy(&raw)))
            }
        }
    }
}

/// Words after `text` form the content, so unquoted input is not truncated
fn text_argument(words: &[String]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Resolve how requests are authorized: stored token first, then app credentials
fn token_provider(config: &Config, store: &CredentialStore) -> Result<TokenProvider> {
    if let Some(token) = store.get_token() {
        return Ok(TokenProvider::Static(token));
    }

    if let Some(app_id) = config.auth.app_id.as_deref() {
        let secret = store.get_app_secret(app_id)?;
        return Ok(TokenProvider::App(AppCredentials::new(
            &config.api.base_url,
            app_id,
            &secret,
        )));
    }

    anyhow::bail!(
        "No API credentials found.\n\
         Run 'mailsense setup', or set MAILSENSE_TOKEN:\n  \
         export MAILSENSE_TOKEN='your-access-token'"
    )
}

fn build_context(config: &Config, item: MessageItem) -> Result<AnalysisContext> {
    let store = CredentialStore::new();
    let tokens = token_provider(config, &store)?;

    let client = SymblClient::new(
        &config.api.base_url,
        config.api.request_timeout_secs.map(Duration::from_secs),
    )
    .context("Failed to create HTTP client")?;

    let panes = Panes::new();
    if let Some(subject) = item.subject.as_deref() {
        panes.current_email.set(render_subject(subject));
    }

    Ok(AnalysisContext {
        client,
        tokens: Arc::new(tokens),
        mailbox: Mailbox::new(item),
        panes,
        alerts: Alerts::new(config.alerts.desktop),
        wait: WaitStrategy::from_config(&config.poll),
    })
}

/// Send the commands, wait for every chain to report back, then print the panes
async fn run_commands(
    config: &Config,
    ctx: AnalysisContext,
    commands: Vec<AnalysisCommand>,
) -> Result<bool> {
    let panes = ctx.panes.clone();
    let alerts = ctx.alerts.clone();
    let mut handle = spawn_analysis_actor(ctx);

    let pending = commands.len();
    for command in commands {
        handle
            .cmd_tx
            .send(command)
            .await
            .context("Analysis actor stopped unexpectedly")?;
    }

    let mut ok = true;
    for _ in 0..pending {
        let Some(event) = handle.event_rx.recv().await else {
            break;
        };
        let kind = event.kind();
        match event {
            AnalysisEvent::Rendered { .. } => tracing::debug!("{} finished", kind),
            AnalysisEvent::Failed { error, .. } => {
                tracing::debug!("{} failed: {}", kind, error);
                ok = false;
            }
            AnalysisEvent::HostReadFailed { .. } => {
                eprintln!("Could not read the message body for {}.", kind);
                ok = false;
            }
        }
    }
    let _ = handle.cmd_tx.send(AnalysisCommand::Shutdown).await;

    for pane in panes.all() {
        if !pane.is_empty() {
            println!("{}\n", present(pane, &config.output).trim_end());
        }
    }

    for alert in alerts.raised() {
        eprintln!("Error: {}", alert);
    }

    Ok(ok)
}

async fn run_setup() -> Result<()> {
    use std::io::{self, Write};

    println!("Mailsense Setup");
    println!("===============\n");

    let store = CredentialStore::new();

    print!("Access token (leave blank to use app credentials): ");
    io::stdout().flush()?;
    let token = read_secret()?;
    println!();

    if !token.is_empty() {
        store.set_token(&token)?;
        println!("Access token stored.");
        return Ok(());
    }

    print!("App ID: ");
    io::stdout().flush()?;
    let mut app_id = String::new();
    io::stdin().read_line(&mut app_id)?;
    let app_id = app_id.trim().to_string();
    if app_id.is_empty() {
        anyhow::bail!("An access token or an app ID is required");
    }

    print!("App secret: ");
    io::stdout().flush()?;
    let secret = read_secret()?;
    println!();
    if secret.is_empty() {
        anyhow::bail!("App secret must not be empty");
    }

    store.set_app_secret(&app_id, &secret)?;

    let mut config = Config::load()?;
    config.auth.app_id = Some(app_id);
    config.ensure_dirs()?;
    config.save()?;
    println!("Configuration saved to {}", Config::config_path()?.display());

    println!("\nSetup complete! Run 'mailsense help' to get started.");
    Ok(())
}

fn read_secret() -> Result<String> {
    use std::io;

    // Disable echo
    let _guard = DisableEcho::new()?;

    let mut secret = String::new();
    io::stdin().read_line(&mut secret)?;
    Ok(secret.trim().to_string())
}

struct DisableEcho {
    #[cfg(unix)]
    original: libc::termios,
}

impl DisableEcho {
    #[cfg(unix)]
    fn new() -> Result<Self> {
        use std::mem::MaybeUninit;
        use std::os::unix::io::AsRawFd;

        let fd = std::io::stdin().as_raw_fd();
        let mut termios = MaybeUninit::<libc::termios>::uninit();

        unsafe {
            if libc::tcgetattr(fd, termios.as_mut_ptr()) != 0 {
                anyhow::bail!("Failed to get terminal attributes");
            }
            let original = termios.assume_init();
            let mut new = original;
            new.c_lflag &= !libc::ECHO;
            if libc::tcsetattr(fd, libc::TCSANOW, &new) != 0 {
                anyhow::bail!("Failed to set terminal attributes");
            }
            Ok(Self { original })
        }
    }

    #[cfg(not(unix))]
    fn new() -> Result<Self> {
        Ok(Self {})
    }
}

#[cfg(unix)]
impl Drop for DisableEcho {
    fn drop(&mut self) {
        use std::os::unix::io::AsRawFd;
        let fd = std::io::stdin().as_raw_fd();
        unsafe {
            libc::tcsetattr(fd, libc::TCSANOW, &self.original);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str());
    let arg = args.get(2).map(|s| s.as_str());

    let (item, commands) = match command {
        None | Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            return Ok(());
        }
        Some("setup") => return run_setup().await,
        Some("creds") => {
            print!("{}", CredentialStore::new().debug_info());
            return Ok(());
        }
        Some("text") => {
            let Some(text) = text_argument(&args[2..]) else {
                eprintln!("Usage: mailsense text <CONTENT>");
                std::process::exit(1);
            };
            (
                MessageItem::default(),
                vec![AnalysisCommand::SubmitText { text }],
            )
        }
        Some("all") => (
            load_message(arg).await?,
            AnalysisKind::ALL
                .iter()
                .map(|&kind| AnalysisCommand::Run { kind })
                .collect::<Vec<_>>(),
        ),
        Some(cmd) => match cmd.parse::<AnalysisKind>() {
            Ok(kind) => (
                load_message(arg).await?,
                vec![AnalysisCommand::Run { kind }],
            ),
            Err(e) => {
                eprintln!("{}", e);
                print_usage();
                std::process::exit(1);
            }
        },
    };

    setup_logging();

    let config = Config::load()?;
    config.ensure_dirs()?;

    let ctx = build_context(&config, item)?;
    if !run_commands(&config, ctx, commands).await? {
        std::process::exit(1);
    }

    Ok(())
}
