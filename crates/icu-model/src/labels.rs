//! Label channels produced for each admission.

use serde::{Deserialize, Serialize};

use crate::ids::PatientId;

/// One label value; `None` marks an unknown entry.
pub type Label = Option<f64>;

/// Target channels, in output column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelChannel {
    Mortality,
    CircFailure,
    RespFailure,
    UrineRate,
    UrineBinary,
    Phenotype,
    RemainingLos,
}

impl LabelChannel {
    pub const ALL: [LabelChannel; 7] = [
        Self::Mortality,
        Self::CircFailure,
        Self::RespFailure,
        Self::UrineRate,
        Self::UrineBinary,
        Self::Phenotype,
        Self::RemainingLos,
    ];

    /// Column name in the label tables.
    pub fn column_name(self) -> &'static str {
        match self {
            Self::Mortality => "Mortality_At24Hours",
            Self::CircFailure => "Dynamic_CircFailure_12Hours",
            Self::RespFailure => "Dynamic_RespFailure_12Hours",
            Self::UrineRate => "Dynamic_UrineOutput_2Hours_Reg",
            Self::UrineBinary => "Dynamic_UrineOutput_2Hours_Binary",
            Self::Phenotype => "Phenotyping_APACHEGroup",
            Self::RemainingLos => "Remaining_LOS_Reg",
        }
    }
}

/// All label channels for one admission, each of length `stay_len`.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientLabels {
    pub patient_id: PatientId,
    pub mortality: Vec<Label>,
    pub circ_failure: Vec<Label>,
    pub resp_failure: Vec<Label>,
    pub urine_rate: Vec<Label>,
    pub urine_binary: Vec<Label>,
    pub phenotype: Vec<Label>,
    pub remaining_los: Vec<Label>,
}

impl PatientLabels {
    pub fn stay_len(&self) -> usize {
        self.remaining_los.len()
    }

    pub fn channel(&self, channel: LabelChannel) -> &[Label] {
        match channel {
            LabelChannel::Mortality => &self.mortality,
            LabelChannel::CircFailure => &self.circ_failure,
            LabelChannel::RespFailure => &self.resp_failure,
            LabelChannel::UrineRate => &self.urine_rate,
            LabelChannel::UrineBinary => &self.urine_binary,
            LabelChannel::Phenotype => &self.phenotype,
            LabelChannel::RemainingLos => &self.remaining_los,
        }
    }

    /// Iterate channels in output column order.
    pub fn channels(&self) -> impl Iterator<Item = (LabelChannel, &[Label])> {
        LabelChannel::ALL
            .into_iter()
            .map(move |channel| (channel, self.channel(channel)))
    }
}
