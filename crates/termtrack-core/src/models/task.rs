use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{TermtrackError, TermtrackResult};

/// How a task measures progress.
///
/// Serialized untagged, so a milestone task reads
/// `{"milestones": 4, "completed": 1}` and a discrete one
/// `{"completed": false}`. The milestone variant is listed first since
/// its field set is the wider of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskKind {
    Milestone { milestones: u32, completed: u32 },
    Discrete { completed: bool },
}

impl Default for TaskKind {
    fn default() -> Self {
        TaskKind::Discrete { completed: false }
    }
}

/// A unit of work within a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Project members assigned to this task.
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(flatten)]
    pub kind: TaskKind,
}

/// A completion value parsed from a request: a done flag for discrete
/// tasks or a reached-milestone count for milestone tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Done(bool),
    Progress(u32),
}

impl FromStr for Completion {
    type Err = TermtrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(done) = s.parse::<bool>() {
            return Ok(Completion::Done(done));
        }
        match s.parse::<u32>() {
            Ok(count) => Ok(Completion::Progress(count)),
            Err(_) => Err(TermtrackError::Validation {
                message: format!("invalid completion value: {s}"),
            }),
        }
    }
}

impl Task {
    pub fn discrete(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
            members: Vec::new(),
            kind: TaskKind::Discrete { completed: false },
        }
    }

    pub fn milestone(name: impl Into<String>, description: Option<String>, milestones: u32) -> Self {
        Self {
            name: name.into(),
            description,
            members: Vec::new(),
            kind: TaskKind::Milestone {
                milestones,
                completed: 0,
            },
        }
    }

    pub fn is_member(&self, username: &str) -> bool {
        self.members.iter().any(|m| m == username)
    }

    /// Assigns the given project members to this task. Returns `false`
    /// if any of them was already assigned; the rest are still added.
    pub fn add_members<I>(&mut self, usernames: I) -> bool
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut all_added = true;
        for username in usernames {
            let username = username.into();
            if self.members.contains(&username) {
                all_added = false;
            } else {
                self.members.push(username);
            }
        }
        all_added
    }

    /// Unassigns the given users. Returns `false` if any of them was not
    /// assigned; the rest are still removed.
    pub fn remove_members<I>(&mut self, usernames: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut all_removed = true;
        for username in usernames {
            let username = username.as_ref();
            match self.members.iter().position(|m| m == username) {
                Some(index) => {
                    self.members.remove(index);
                }
                None => all_removed = false,
            }
        }
        all_removed
    }

    /// Applies a completion value of the matching kind.
    pub fn set_completion(&mut self, completion: Completion) -> TermtrackResult<()> {
        match (&mut self.kind, completion) {
            (TaskKind::Discrete { completed }, Completion::Done(done)) => {
                *completed = done;
                Ok(())
            }
            (TaskKind::Milestone { milestones, completed }, Completion::Progress(count)) => {
                if count > *milestones {
                    return Err(TermtrackError::Validation {
                        message: "Completion cannot exceed the milestone count".to_string(),
                    });
                }
                *completed = count;
                Ok(())
            }
            _ => Err(TermtrackError::Validation {
                message: "Completion value does not match the task type".to_string(),
            }),
        }
    }

    /// Progress as a whole percentage, rounded down. A discrete task is
    /// either 0 or 100; a milestone task with zero milestones is 0.
    pub fn percentage(&self) -> u32 {
        match self.kind {
            TaskKind::Discrete { completed } => {
                if completed {
                    100
                } else {
                    0
                }
            }
            TaskKind::Milestone {
                milestones,
                completed,
            } => {
                if milestones == 0 {
                    0
                } else {
                    completed * 100 / milestones
                }
            }
        }
    }
}
