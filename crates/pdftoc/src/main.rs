use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pdftoc_core::footer::{Footer, DEFAULT_CONTACT, DEFAULT_ORGANIZATION};

use crate::prelude::{eprintln, *};

mod error;
mod inspect;
mod prelude;
mod toc;

/// The predicate held, or the operation completed.
pub const EXIT_TRUE: u8 = 0;
/// The invocation was malformed.
pub const EXIT_USAGE: u8 = 1;
/// The predicate did not hold.
pub const EXIT_FALSE: u8 = 2;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Rebuild the clickable table of contents of a generated PDF report, or check its first page.\n\n\
                  Exit codes: 0 success or true, 1 usage error, 2 false."
)]
pub struct App {
    /// One of: toc, page_empty, text_in_page
    pub function: String,

    /// Path to the PDF file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Text to look for on the first page (text_in_page)
    #[arg(short, long)]
    pub text: Option<String>,

    /// Print the table-of-contents report as JSON (toc)
    #[arg(long)]
    pub json: bool,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Organization named in the footer copyright line
    #[clap(long, env = "PDFTOC_ORGANIZATION", default_value = DEFAULT_ORGANIZATION)]
    organization: String,

    /// Contact address printed in the footer
    #[clap(long, env = "PDFTOC_CONTACT", default_value = DEFAULT_CONTACT)]
    contact: String,

    /// Whether to display additional information.
    #[clap(short, long, env = "PDFTOC_VERBOSE")]
    verbose: bool,
}

/// A validated request.
#[derive(Debug, PartialEq, Eq)]
pub enum Invocation {
    Toc { file: PathBuf, json: bool },
    PageEmpty { file: PathBuf },
    TextInPage { file: PathBuf, text: String },
}

impl App {
    /// Check the arguments in the order the usage errors are reported: the
    /// file first, then the function, then the function's own options.
    pub fn invocation(&self) -> std::result::Result<Invocation, Error> {
        let file = self.file.clone().ok_or(Error::MissingFile)?;

        match self.function.as_str() {
            "toc" => Ok(Invocation::Toc {
                file,
                json: self.json,
            }),
            "page_empty" => Ok(Invocation::PageEmpty { file }),
            "text_in_page" => {
                let text = self.text.clone().ok_or(Error::MissingText)?;
                Ok(Invocation::TextInPage { file, text })
            }
            other => Err(Error::UnknownFunction(other.to_string())),
        }
    }

    pub fn footer(&self) -> Footer {
        Footer::current(&self.global.organization, &self.global.contact)
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn predicate(holds: bool) -> ExitCode {
    ExitCode::from(if holds { EXIT_TRUE } else { EXIT_FALSE })
}

fn run(app: App) -> Result<ExitCode> {
    let invocation = match app.invocation() {
        Ok(invocation) => invocation,
        Err(err) => {
            eprintln!("{}", err);
            return Ok(ExitCode::from(EXIT_USAGE));
        }
    };

    match invocation {
        Invocation::Toc { file, json } => {
            crate::toc::run(&file, json, &app.footer())?;
            Ok(ExitCode::from(EXIT_TRUE))
        }
        Invocation::PageEmpty { file } => Ok(predicate(crate::inspect::page_empty(&file)?)),
        Invocation::TextInPage { file, text } => {
            Ok(predicate(crate::inspect::text_in_page(&file, &text)?))
        }
    }
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let app = match App::try_parse() {
        Ok(app) => app,
        Err(err) => {
            // --help and --version are reported through the same path.
            let code = if err.use_stderr() { EXIT_USAGE } else { EXIT_TRUE };
            err.print()?;
            return Ok(ExitCode::from(code));
        }
    };

    init_logging(app.global.verbose);

    run(app)
}
