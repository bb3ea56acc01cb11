mod parse;
mod profile;

use thiserror::Error;

pub(crate) use profile::ProfileV1;

#[derive(Error, Debug)]
pub enum Error {
    #[error("empty axis name in {0} section")]
    EmptyName(&'static str),
    #[error("axis {name} defined twice in {section} section")]
    DuplicateName { section: &'static str, name: String },
    #[error("axis {axis}: {reason}")]
    InvalidParam { axis: String, reason: String },
}
