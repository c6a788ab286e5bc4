//! Core shared types: reviewers, decisions and judgments

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::{SharedError, SharedResult};

/// Identity of the human reviewer making keep/pass decisions.
///
/// Reviewer names end up in blob names (`{reviewer}_state.json`), so they
/// must be non-empty and free of path separators.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReviewerId(String);

impl ReviewerId {
    pub fn new(name: impl Into<String>) -> SharedResult<Self> {
        let name = name.into();
        let trimmed = name.trim();
        let invalid = trimmed.is_empty()
            || trimmed.contains(['/', '\\'])
            || trimmed == "."
            || trimmed == ".."
            || trimmed.chars().any(char::is_control);
        if invalid {
            return Err(SharedError::InvalidReviewer { name });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReviewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ReviewerId {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ReviewerId {
    type Error = SharedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReviewerId> for String {
    fn from(value: ReviewerId) -> Self {
        value.0
    }
}

/// The binary judgment a reviewer makes on a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Keep,
    Pass,
}

impl Decision {
    pub const ALL: [Decision; 2] = [Decision::Keep, Decision::Pass];

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Keep => "Keep",
            Decision::Pass => "Pass",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Keep" => Ok(Decision::Keep),
            "Pass" => Ok(Decision::Pass),
            other => Err(SharedError::InvalidDecision {
                value: other.to_string(),
            }),
        }
    }
}

/// Value of a row's identifier column.
///
/// Always held as text. State files written by older tools may carry
/// numeric identifiers, which are accepted and converted on read.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RowId(String);

impl RowId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for RowId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RowId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => RowId(text),
            RawId::Number(number) => RowId(number.to_string()),
        })
    }
}

/// One recorded decision: `[id, decision, reviewer]` on the wire
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "JudgmentTuple", into = "JudgmentTuple")]
pub struct Judgment {
    pub row_id: RowId,
    pub decision: Decision,
    pub reviewer: ReviewerId,
}

type JudgmentTuple = (RowId, Decision, ReviewerId);

impl From<JudgmentTuple> for Judgment {
    fn from((row_id, decision, reviewer): JudgmentTuple) -> Self {
        Self {
            row_id,
            decision,
            reviewer,
        }
    }
}

impl From<Judgment> for JudgmentTuple {
    fn from(judgment: Judgment) -> Self {
        (judgment.row_id, judgment.decision, judgment.reviewer)
    }
}

/// Per-reviewer progress: next row to show and every judgment so far.
///
/// Field order is fixed so the serialized form is byte-stable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeState {
    pub row_index: usize,
    pub responses: Vec<Judgment>,
}

impl ResumeState {
    pub fn new(row_index: usize, responses: Vec<Judgment>) -> Self {
        Self {
            row_index,
            responses,
        }
    }
}

/// The fixed set of reviewers and dataset names a deployment offers
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Roster {
    reviewers: Vec<ReviewerId>,
    datasets: Vec<String>,
}

impl Roster {
    pub const DEFAULT_REVIEWERS: [&'static str; 3] = ["Alberto", "Julien", "Emilie"];
    pub const DEFAULT_DATASETS: [&'static str; 2] = ["quanti.csv", "quali.csv"];

    pub fn new<R, D>(reviewers: R, datasets: D) -> SharedResult<Self>
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        let reviewers = reviewers
            .into_iter()
            .map(|name| ReviewerId::new(name.as_ref()))
            .collect::<SharedResult<Vec<_>>>()?;
        let datasets: Vec<String> = datasets
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        if reviewers.is_empty() {
            return Err(SharedError::InvalidConfig {
                field: "reviewers".to_string(),
                value: String::new(),
            });
        }
        if datasets.is_empty() {
            return Err(SharedError::InvalidConfig {
                field: "datasets".to_string(),
                value: String::new(),
            });
        }

        Ok(Self {
            reviewers,
            datasets,
        })
    }

    pub fn reviewers(&self) -> &[ReviewerId] {
        &self.reviewers
    }

    pub fn datasets(&self) -> &[String] {
        &self.datasets
    }

    /// Resolve a reviewer name against the roster
    pub fn reviewer(&self, name: &str) -> SharedResult<ReviewerId> {
        self.reviewers
            .iter()
            .find(|reviewer| reviewer.as_str() == name.trim())
            .cloned()
            .ok_or_else(|| SharedError::UnknownReviewer {
                name: name.to_string(),
            })
    }

    /// Resolve a dataset name against the roster
    pub fn dataset(&self, name: &str) -> SharedResult<&str> {
        self.datasets
            .iter()
            .find(|dataset| dataset.as_str() == name.trim())
            .map(String::as_str)
            .ok_or_else(|| SharedError::UnknownDataset {
                name: name.to_string(),
            })
    }

    pub fn default_dataset(&self) -> &str {
        &self.datasets[0]
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            reviewers: Self::DEFAULT_REVIEWERS
                .iter()
                .map(|name| ReviewerId(name.to_string()))
                .collect(),
            datasets: Self::DEFAULT_DATASETS
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}
