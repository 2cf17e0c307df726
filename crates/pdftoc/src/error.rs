/// Invocation problems. Each maps to the usage exit code.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("<file> is required")]
    MissingFile,

    #[error("Text is required for this option")]
    MissingText,

    #[error("Unknown func \"{0}\". Options are: toc, page_empty, text_in_page")]
    UnknownFunction(String),
}
