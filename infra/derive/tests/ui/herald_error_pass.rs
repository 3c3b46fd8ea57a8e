use herald_derive::herald_error;
use std::borrow::Cow;

#[herald_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn open() -> Result<(), DemoError> {
    Err(std::io::Error::other("disk gone")).context("Opening demo file")
}

fn main() {
    let err = open().unwrap_err();
    assert_eq!(err.as_label(), "io");
    assert_eq!(err.to_string(), "IO error (Opening demo file): disk gone");

    let internal: DemoError = "boom".into();
    assert_eq!(internal.as_label(), "internal");
}
