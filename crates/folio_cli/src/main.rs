//! `folio` command line entry point.
//!
//! # Responsibility
//! - Render the portfolio page from a site data file.
//! - Validate data files and replay a contact submission for smoke checks.
//!
//! # Invariants
//! - File logging starts only when a log directory is configured.
//! - Every failure exits with status 1 and a single-line message on stderr.

use clap::{Parser, Subcommand};
use folio_core::{
    default_log_level, init_logging, load_site, render_to_string, ContactError, ContactField,
    LoggingError, ManualClock, NotificationBus, PageLayout, PageSession, SectionKind, SiteDocument,
    SiteError, SubmitEvent, SubmitOutcome, UnavailableWatchers,
};
use log::info;
use std::cell::Cell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

#[derive(Parser, Debug)]
#[command(name = "folio", version, about = "Single-page portfolio renderer")]
struct Cli {
    #[arg(long, global = true, help = "Log level (trace|debug|info|warn|error)")]
    log_level: Option<String>,
    #[arg(
        long,
        global = true,
        env = "FOLIO_LOG_DIR",
        help = "Absolute directory for rolling log files"
    )]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the page to HTML.
    Render {
        #[arg(long)]
        data: PathBuf,
        #[arg(long, help = "Output file; stdout when omitted")]
        out: Option<PathBuf>,
    },
    /// Validate a site data file and summarize its sections.
    Check {
        #[arg(long)]
        data: PathBuf,
    },
    /// Replay one contact form submission and its notification lifecycle.
    Submit {
        #[arg(long)]
        data: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
    },
}

#[derive(Debug)]
enum CliError {
    Logging(LoggingError),
    Site(SiteError),
    Contact(ContactError),
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "{err}"),
            Self::Site(err) => write!(f, "{err}"),
            Self::Contact(err) => write!(f, "{err}"),
            Self::Write { path, source } => {
                write!(f, "failed to write `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            Self::Site(err) => Some(err),
            Self::Contact(err) => Some(err),
            Self::Write { source, .. } => Some(source),
        }
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<SiteError> for CliError {
    fn from(value: SiteError) -> Self {
        Self::Site(value)
    }
}

impl From<ContactError> for CliError {
    fn from(value: ContactError) -> Self {
        Self::Contact(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());
        init_logging(&level, log_dir)?;
    }

    match cli.command {
        Commands::Render { data, out } => render(&data, out.as_deref()),
        Commands::Check { data } => check(&data),
        Commands::Submit {
            data,
            name,
            email,
            subject,
            message,
        } => submit(&data, [name, email, subject, message]),
    }
}

fn render(data: &Path, out: Option<&Path>) -> Result<(), CliError> {
    let document = load_site(data)?;
    let html = render_to_string(&document);
    match out {
        Some(path) => {
            std::fs::write(path, &html).map_err(|source| CliError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            info!(
                "event=render_write module=cli status=ok path={} bytes={}",
                path.display(),
                html.len()
            );
        }
        None => println!("{html}"),
    }
    Ok(())
}

fn check(data: &Path) -> Result<(), CliError> {
    let document = load_site(data)?;
    let layout = PageLayout::from_data(&document.data);
    for section in SectionKind::ALL {
        let targets = layout
            .container(section)
            .map(|container| container.reveal_targets().count())
            .unwrap_or_default();
        println!("{:<10} #{:<12} targets={}", section.as_str(), section.anchor(), targets);
    }
    println!("ok: {}", summary(&document));
    Ok(())
}

fn summary(document: &SiteDocument) -> String {
    let data = &document.data;
    format!(
        "{} projects, {} diplomas, {} skills, {} languages, {} social links",
        data.projects.len(),
        data.diplomas.len(),
        data.skills.technical.len(),
        data.skills.languages.len(),
        data.contact.social.len()
    )
}

fn submit(data: &Path, values: [String; 4]) -> Result<(), CliError> {
    let document = load_site(data)?;
    let clock = ManualClock::new();
    let bus = NotificationBus::new(Rc::new(clock.clone()), document.options.notification_ttl_ms);
    let changes = Rc::new(Cell::new(0_usize));
    let seen = Rc::clone(&changes);
    let _subscription = bus.subscribe(move || {
        seen.set(seen.get() + 1);
        Ok(())
    });

    let layout = PageLayout::from_data(&document.data);
    let mut session = PageSession::mount(
        &layout,
        document.options.reveal_behavior(),
        &mut UnavailableWatchers,
        bus.clone(),
        document.data.contact.acknowledgment_or_default(),
    );
    for (field, value) in ContactField::ALL.into_iter().zip(values) {
        session.contact_mut().on_field_change(field, value);
    }

    let mut event = SubmitEvent::new();
    match session.submit_contact(&mut event)? {
        SubmitOutcome::Sent(receipt) => {
            for entry in bus.entries() {
                println!("notification {}: {} / {}", entry.id, entry.title, entry.description);
            }
            clock.advance(bus.ttl_ms());
            let removed = bus.poll();
            println!(
                "sent: id={} removed_after_ms={} removed={} listener_calls={}",
                receipt.id,
                bus.ttl_ms(),
                removed,
                changes.get()
            );
        }
        SubmitOutcome::Rejected(violations) => {
            let missing: Vec<&str> = violations
                .missing
                .iter()
                .map(|field| field.as_str())
                .collect();
            println!(
                "rejected: missing=[{}] invalid_email={}",
                missing.join(","),
                violations.invalid_email
            );
        }
    }
    session.shutdown();
    Ok(())
}
