//! The jaster task catalogue and its two dispatch tables.
//!
//! The task set is closed: both registries are plain `match` tables over
//! [`Task`], so adding a benchmark forces both tables to be revisited at
//! compile time and no string-keyed lookup can drift out of sync.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::format::FormatCheck;
use crate::score::Metric;

/// Every benchmark task the evaluation harness knows how to score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    Chabsa,
    #[serde(rename = "commonsensemoralja")]
    CommonsenseMoralJa,
    Jamp,
    Janli,
    #[serde(rename = "JBLiMP")]
    Jblimp,
    Jcola,
    Jcommonsenseqa,
    Jemhopqa,
    Jmmlu,
    Jnli,
    Jsem,
    Jsick,
    Jsquad,
    Jsts,
    Mawps,
    Mgsm,
    Mmlu,
    Niilc,
    WikiCoreference,
    WikiDependency,
    WikiNer,
    WikiPas,
    WikiReading,
}

impl Task {
    /// Every task, in canonical-name order. Handy for iterating the
    /// catalogue in tests and table exports.
    pub const ALL: [Task; 23] = [
        Task::Chabsa,
        Task::CommonsenseMoralJa,
        Task::Jamp,
        Task::Janli,
        Task::Jblimp,
        Task::Jcola,
        Task::Jcommonsenseqa,
        Task::Jemhopqa,
        Task::Jmmlu,
        Task::Jnli,
        Task::Jsem,
        Task::Jsick,
        Task::Jsquad,
        Task::Jsts,
        Task::Mawps,
        Task::Mgsm,
        Task::Mmlu,
        Task::Niilc,
        Task::WikiCoreference,
        Task::WikiDependency,
        Task::WikiNer,
        Task::WikiPas,
        Task::WikiReading,
    ];

    /// Canonical dataset name as it appears in run configs and the
    /// leaderboard table.
    pub fn name(&self) -> &'static str {
        match self {
            Task::Chabsa => "chabsa",
            Task::CommonsenseMoralJa => "commonsensemoralja",
            Task::Jamp => "jamp",
            Task::Janli => "janli",
            Task::Jblimp => "JBLiMP",
            Task::Jcola => "jcola",
            Task::Jcommonsenseqa => "jcommonsenseqa",
            Task::Jemhopqa => "jemhopqa",
            Task::Jmmlu => "jmmlu",
            Task::Jnli => "jnli",
            Task::Jsem => "jsem",
            Task::Jsick => "jsick",
            Task::Jsquad => "jsquad",
            Task::Jsts => "jsts",
            Task::Mawps => "mawps",
            Task::Mgsm => "mgsm",
            Task::Mmlu => "mmlu",
            Task::Niilc => "niilc",
            Task::WikiCoreference => "wiki_coreference",
            Task::WikiDependency => "wiki_dependency",
            Task::WikiNer => "wiki_ner",
            Task::WikiPas => "wiki_pas",
            Task::WikiReading => "wiki_reading",
        }
    }

    /// The scoring registry: which metric grades this task.
    pub fn metric(&self) -> Metric {
        match self {
            Task::CommonsenseMoralJa
            | Task::Jamp
            | Task::Janli
            | Task::Jblimp
            | Task::Jcola
            | Task::Jcommonsenseqa
            | Task::Jmmlu
            | Task::Jnli
            | Task::Jsem
            | Task::Jsick
            | Task::Mawps
            | Task::Mgsm
            | Task::Mmlu => Metric::ExactMatch,

            Task::Jemhopqa | Task::Jsquad | Task::Niilc | Task::WikiReading => Metric::CharF1,

            Task::Chabsa
            | Task::WikiCoreference
            | Task::WikiDependency
            | Task::WikiNer
            | Task::WikiPas => Metric::SetF1,

            Task::Jsts => Metric::Pearson,
        }
    }

    /// The controllability registry: which output grammar this task
    /// enforces, if the task has a controllability entry at all.
    ///
    /// `Some(FormatCheck::Unconstrained)` means the task is in the registry
    /// with an explicit no-op check; `None` means the task has no entry
    /// (currently only `jsts`, whose numeric answer is graded by
    /// correlation rather than surface form).
    pub fn format_check(&self) -> Option<FormatCheck> {
        match self {
            Task::Mawps | Task::Mgsm => Some(FormatCheck::AllDigits),
            Task::Jmmlu | Task::Mmlu => Some(FormatCheck::ChoiceAbcd),
            Task::Jblimp => Some(FormatCheck::ChoiceAb),
            Task::Jcommonsenseqa => Some(FormatCheck::ZeroToFour),
            Task::Jcola | Task::CommonsenseMoralJa => Some(FormatCheck::ZeroOrOne),
            Task::Janli => Some(FormatCheck::Entailment2),
            Task::Jnli | Task::Jsick | Task::Jamp => Some(FormatCheck::Entailment3),
            Task::Jsem => Some(FormatCheck::JsemLabel),
            Task::WikiNer => Some(FormatCheck::WikiNer),
            Task::WikiDependency => Some(FormatCheck::WikiDependency),
            Task::Chabsa => Some(FormatCheck::Chabsa),

            Task::Jemhopqa
            | Task::Jsquad
            | Task::Niilc
            | Task::WikiReading
            | Task::WikiPas
            | Task::WikiCoreference => Some(FormatCheck::Unconstrained),

            Task::Jsts => None,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Task {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Task::ALL
            .iter()
            .copied()
            .find(|task| task.name() == s)
            .ok_or_else(|| RegistryError::UnknownTask(s.to_string()))
    }
}
