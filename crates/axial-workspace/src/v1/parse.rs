use std::collections::BTreeSet;

use axial_core::AxisParams;

use super::profile::ProfileV1;
use super::Error;
use crate::profile::Profile;

impl ProfileV1 {
    pub(crate) fn into_profile(self) -> Result<Profile, Error> {
        Ok(Profile {
            local: parse_section("local", self.local)?,
            embedded: parse_section("embedded", self.embedded)?,
        })
    }

    pub(crate) fn from_profile(profile: &Profile) -> Self {
        Self {
            version: 1,
            local: profile.local.iter().cloned().collect(),
            embedded: profile.embedded.iter().cloned().collect(),
        }
    }
}

fn parse_section(
    section: &'static str,
    axes: impl IntoIterator<Item = (String, AxisParams)>,
) -> Result<Vec<(String, AxisParams)>, Error> {
    let mut seen = BTreeSet::new();
    axes.into_iter()
        .map(|(name, params)| {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(Error::EmptyName(section));
            }
            if !seen.insert(name.clone()) {
                return Err(Error::DuplicateName { section, name });
            }
            validate(&name, &params)?;
            Ok((name, params))
        })
        .collect()
}

fn validate(name: &str, params: &AxisParams) -> Result<(), Error> {
    let invalid = |reason: &str| {
        Err(Error::InvalidParam {
            axis: name.to_string(),
            reason: reason.to_string(),
        })
    };

    match params {
        AxisParams::Controller(p) => {
            if !(0.0..1.0).contains(&p.deadzone) {
                return invalid("deadzone must be in [0, 1)");
            }
            if !(p.curvature > 0.0) || !p.curvature.is_finite() {
                return invalid("curvature must be positive");
            }
            if !p.sensitivity.is_finite() {
                return invalid("sensitivity must be finite");
            }
            if let Some([low, high]) = p.recenter {
                if !(low < high) {
                    return invalid("recenter range must be increasing");
                }
            }
        }
        AxisParams::Key(p) => {
            for (field, value) in [
                ("sensitivity", p.sensitivity),
                ("gravity", p.gravity),
                ("momentum", p.momentum),
            ] {
                if !(value >= 0.0) || !value.is_finite() {
                    return invalid(&format!("{field} must be a non-negative number"));
                }
            }
        }
        AxisParams::Mouse(p) => {
            if !(-1.0..=1.0).contains(&p.center) {
                return invalid("center must be in [-1, 1]");
            }
            if !(0.0..=1.0).contains(&p.range) {
                return invalid("range must be in [0, 1]");
            }
        }
        AxisParams::Chain(p) => {
            if p.first.as_deref() == Some(name) || p.second.as_deref() == Some(name) {
                return invalid("chain axis cannot reference itself");
            }
        }
        AxisParams::Custom(p) => {
            if p.expression.trim().is_empty() {
                return invalid("expression is empty");
            }
        }
    }
    Ok(())
}
