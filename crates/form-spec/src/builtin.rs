//! Form definitions shipped with the crate.

use crate::error::SpecError;
use crate::spec::form::FormSpec;

const PROPOSAL: &str = include_str!("../forms/proposal.json");
const DETAILED: &str = include_str!("../forms/detailed.json");

/// Four-page proposal brief.
pub fn proposal() -> Result<FormSpec, SpecError> {
    FormSpec::from_json(PROPOSAL)
}

/// Seven-page proposal brief with scope and timeline pages.
pub fn detailed() -> Result<FormSpec, SpecError> {
    FormSpec::from_json(DETAILED)
}

pub fn names() -> &'static [&'static str] {
    &["proposal", "detailed"]
}

pub fn by_name(name: &str) -> Result<FormSpec, SpecError> {
    match name {
        "proposal" => proposal(),
        "detailed" => detailed(),
        other => Err(SpecError::UnknownForm(other.to_string())),
    }
}
