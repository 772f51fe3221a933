//! The ten-axis brain configuration.
//!
//! Every axis is an integer on a closed 0-100 scale where 0 is extremely low
//! and 100 extremely high. Values are validated on construction and on
//! deserialization, so a `BrainParameters` in hand is always range-valid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Upper bound shared by every axis
pub const PARAMETER_MAX: u8 = 100;

/// Neurochemical and structural brain configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawBrainParameters")]
pub struct BrainParameters {
    pub dopamine: u8,
    pub serotonin: u8,
    pub acetylcholine: u8,
    pub gaba: u8,
    pub glutamate: u8,
    pub synaptic_plasticity: u8,
    pub receptor_sensitivity: u8,
    pub pfc_amygdala_connectivity: u8,
    pub cortisol: u8,
    pub oxytocin: u8,
}

/// Unchecked wire form, validated into `BrainParameters`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBrainParameters {
    dopamine: i64,
    serotonin: i64,
    acetylcholine: i64,
    gaba: i64,
    glutamate: i64,
    synaptic_plasticity: i64,
    receptor_sensitivity: i64,
    pfc_amygdala_connectivity: i64,
    cortisol: i64,
    oxytocin: i64,
}

impl TryFrom<RawBrainParameters> for BrainParameters {
    type Error = Error;

    fn try_from(raw: RawBrainParameters) -> Result<Self> {
        Ok(Self {
            dopamine: check(Parameter::Dopamine, raw.dopamine)?,
            serotonin: check(Parameter::Serotonin, raw.serotonin)?,
            acetylcholine: check(Parameter::Acetylcholine, raw.acetylcholine)?,
            gaba: check(Parameter::Gaba, raw.gaba)?,
            glutamate: check(Parameter::Glutamate, raw.glutamate)?,
            synaptic_plasticity: check(Parameter::SynapticPlasticity, raw.synaptic_plasticity)?,
            receptor_sensitivity: check(Parameter::ReceptorSensitivity, raw.receptor_sensitivity)?,
            pfc_amygdala_connectivity: check(
                Parameter::PfcAmygdalaConnectivity,
                raw.pfc_amygdala_connectivity,
            )?,
            cortisol: check(Parameter::Cortisol, raw.cortisol)?,
            oxytocin: check(Parameter::Oxytocin, raw.oxytocin)?,
        })
    }
}

fn check(parameter: Parameter, value: i64) -> Result<u8> {
    if (0..=PARAMETER_MAX as i64).contains(&value) {
        Ok(value as u8)
    } else {
        Err(Error::InvalidParameter {
            name: parameter.key(),
            value,
        })
    }
}

impl BrainParameters {
    /// Every axis at the same level, clamped to 100
    pub fn uniform(level: u8) -> Self {
        let value = level.min(PARAMETER_MAX);
        Self {
            dopamine: value,
            serotonin: value,
            acetylcholine: value,
            gaba: value,
            glutamate: value,
            synaptic_plasticity: value,
            receptor_sensitivity: value,
            pfc_amygdala_connectivity: value,
            cortisol: value,
            oxytocin: value,
        }
    }

    /// Read a single axis
    pub fn get(&self, parameter: Parameter) -> u8 {
        match parameter {
            Parameter::Dopamine => self.dopamine,
            Parameter::Serotonin => self.serotonin,
            Parameter::Acetylcholine => self.acetylcholine,
            Parameter::Gaba => self.gaba,
            Parameter::Glutamate => self.glutamate,
            Parameter::SynapticPlasticity => self.synaptic_plasticity,
            Parameter::ReceptorSensitivity => self.receptor_sensitivity,
            Parameter::PfcAmygdalaConnectivity => self.pfc_amygdala_connectivity,
            Parameter::Cortisol => self.cortisol,
            Parameter::Oxytocin => self.oxytocin,
        }
    }

    /// Copy with one axis changed
    pub fn with(mut self, parameter: Parameter, value: u8) -> Result<Self> {
        let value = check(parameter, value as i64)?;
        let slot = match parameter {
            Parameter::Dopamine => &mut self.dopamine,
            Parameter::Serotonin => &mut self.serotonin,
            Parameter::Acetylcholine => &mut self.acetylcholine,
            Parameter::Gaba => &mut self.gaba,
            Parameter::Glutamate => &mut self.glutamate,
            Parameter::SynapticPlasticity => &mut self.synaptic_plasticity,
            Parameter::ReceptorSensitivity => &mut self.receptor_sensitivity,
            Parameter::PfcAmygdalaConnectivity => &mut self.pfc_amygdala_connectivity,
            Parameter::Cortisol => &mut self.cortisol,
            Parameter::Oxytocin => &mut self.oxytocin,
        };
        *slot = value;
        Ok(self)
    }

    /// Iterate `(axis, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Parameter, u8)> + '_ {
        Parameter::ALL.iter().map(move |p| (*p, self.get(*p)))
    }
}

impl Default for BrainParameters {
    fn default() -> Self {
        Self::uniform(50)
    }
}

/// One axis of the brain configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parameter {
    Dopamine,
    Serotonin,
    Acetylcholine,
    Gaba,
    Glutamate,
    SynapticPlasticity,
    ReceptorSensitivity,
    PfcAmygdalaConnectivity,
    Cortisol,
    Oxytocin,
}

impl Parameter {
    pub const ALL: [Parameter; 10] = [
        Parameter::Dopamine,
        Parameter::Serotonin,
        Parameter::Acetylcholine,
        Parameter::Gaba,
        Parameter::Glutamate,
        Parameter::SynapticPlasticity,
        Parameter::ReceptorSensitivity,
        Parameter::PfcAmygdalaConnectivity,
        Parameter::Cortisol,
        Parameter::Oxytocin,
    ];

    /// Wire key, matching the serialized field name
    pub fn key(&self) -> &'static str {
        match self {
            Parameter::Dopamine => "dopamine",
            Parameter::Serotonin => "serotonin",
            Parameter::Acetylcholine => "acetylcholine",
            Parameter::Gaba => "gaba",
            Parameter::Glutamate => "glutamate",
            Parameter::SynapticPlasticity => "synapticPlasticity",
            Parameter::ReceptorSensitivity => "receptorSensitivity",
            Parameter::PfcAmygdalaConnectivity => "pfcAmygdalaConnectivity",
            Parameter::Cortisol => "cortisol",
            Parameter::Oxytocin => "oxytocin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Parameter::Dopamine => "Baseline Dopamine",
            Parameter::Serotonin => "Baseline Serotonin",
            Parameter::Acetylcholine => "Baseline Acetylcholine",
            Parameter::Gaba => "Baseline GABA",
            Parameter::Glutamate => "Baseline Glutamate",
            Parameter::SynapticPlasticity => "Synaptic Plasticity",
            Parameter::ReceptorSensitivity => "Receptor Sensitivity",
            Parameter::PfcAmygdalaConnectivity => "PFC-Amygdala Connectivity",
            Parameter::Cortisol => "Baseline Cortisol",
            Parameter::Oxytocin => "Baseline Oxytocin",
        }
    }

    /// Fixed semantic gloss given to the model alongside the value
    pub fn gloss(&self) -> &'static str {
        match self {
            Parameter::Dopamine => "Motivation, reward, focus",
            Parameter::Serotonin => "Mood, impulsivity, anxiety regulation",
            Parameter::Acetylcholine => "Learning, memory, attention",
            Parameter::Gaba => "Inhibitory, calming, anxiety reduction",
            Parameter::Glutamate => "Excitatory, learning, neural activation",
            Parameter::SynapticPlasticity => "Ability to learn and form new memories",
            Parameter::ReceptorSensitivity => {
                "How strongly neurons react to neurotransmitters"
            }
            Parameter::PfcAmygdalaConnectivity => {
                "Top-down control of emotion and impulses"
            }
            Parameter::Cortisol => "Stress hormone, alertness",
            Parameter::Oxytocin => "Social bonding, trust, empathy",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Parameter {
    type Err = Error;

    /// Accepts the wire key in any case, with or without separators
    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Parameter::ALL
            .iter()
            .copied()
            .find(|p| p.key().to_ascii_lowercase() == wanted)
            .ok_or_else(|| Error::UnknownParameter(s.to_string()))
    }
}
