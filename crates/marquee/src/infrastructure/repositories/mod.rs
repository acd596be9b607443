pub mod memory;
pub mod movie;
pub mod user;

use mongodb::error::{Error, ErrorKind, WriteFailure};

const DUPLICATE_KEY: i32 = 11000;

/// Field behind the unique index a duplicate key error tripped over.
fn duplicate_key_field(err: &Error) -> Option<String> {
    let message = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY => &e.message,
        ErrorKind::Command(e) if e.code == DUPLICATE_KEY => &e.message,
        _ => return None,
    };

    index_field(message)
}

// "E11000 duplicate key error collection: test.users index: email_1 dup key: ..."
fn index_field(message: &str) -> Option<String> {
    let index = message.split("index: ").nth(1)?.split_whitespace().next()?;

    Some(index.trim_end_matches("_1").to_string())
}
