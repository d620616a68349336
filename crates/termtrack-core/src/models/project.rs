use serde::{Deserialize, Serialize};

use crate::models::task::Task;

/// A tracked project: an owner, its membership and a list of tasks.
///
/// Task names are unique within a project. Moderators are managed as a
/// separate list and membership of it does not imply membership of
/// `members`; callers that want that guarantee add to both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub owner: String,
    #[serde(default)]
    pub moderators: Vec<String>,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Project {
    /// Creates an empty project. The owner always starts as a member.
    pub fn new(name: impl Into<String>, description: Option<String>, owner: impl Into<String>) -> Self {
        let owner = owner.into();
        Self {
            name: name.into(),
            description,
            owner: owner.clone(),
            moderators: Vec::new(),
            members: vec![owner],
            tasks: Vec::new(),
        }
    }

    pub fn is_owner(&self, username: &str) -> bool {
        self.owner == username
    }

    pub fn is_member(&self, username: &str) -> bool {
        self.members.iter().any(|m| m == username)
    }

    pub fn is_moderator(&self, username: &str) -> bool {
        self.moderators.iter().any(|m| m == username)
    }

    /// Adds users to the member list. Returns `false` if any of them was
    /// already a member; the rest are still added.
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

    /// Removes users from the member list. Returns `false` if any of
    /// them was not a member; the rest are still removed.
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

    /// Grants moderator standing. Same aggregate semantics as
    /// [`Project::add_members`].
    pub fn add_moderators<I>(&mut self, usernames: I) -> bool
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut all_added = true;
        for username in usernames {
            let username = username.into();
            if self.moderators.contains(&username) {
                all_added = false;
            } else {
                self.moderators.push(username);
            }
        }
        all_added
    }

    /// Revokes moderator standing. Same aggregate semantics as
    /// [`Project::remove_members`].
    pub fn remove_moderators<I>(&mut self, usernames: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut all_removed = true;
        for username in usernames {
            let username = username.as_ref();
            match self.moderators.iter().position(|m| m == username) {
                Some(index) => {
                    self.moderators.remove(index);
                }
                None => all_removed = false,
            }
        }
        all_removed
    }

    /// Appends a task, refusing duplicates by name.
    pub fn add_task(&mut self, task: Task) -> bool {
        if self.task(&task.name).is_some() {
            return false;
        }
        self.tasks.push(task);
        true
    }

    /// Removes tasks by name. Returns `false` if any name was unknown;
    /// the rest are still removed.
    pub fn remove_tasks<I>(&mut self, names: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut all_removed = true;
        for name in names {
            let name = name.as_ref();
            match self.tasks.iter().position(|t| t.name == name) {
                Some(index) => {
                    self.tasks.remove(index);
                }
                None => all_removed = false,
            }
        }
        all_removed
    }

    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name == name)
    }

    pub fn task_mut(&mut self, name: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.name == name)
    }

    /// Overall progress as the mean of task percentages, rounded down.
    /// A project without tasks is at 0.
    pub fn progress(&self) -> u32 {
        if self.tasks.is_empty() {
            return 0;
        }
        let total: u32 = self.tasks.iter().map(Task::percentage).sum();
        total / self.tasks.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::Completion;

    fn project() -> Project {
        Project::new("orbit", Some("satellite tracker".to_string()), "ada")
    }

    #[test]
    fn the_owner_starts_as_a_member() {
        let project = project();
        assert!(project.is_owner("ada"));
        assert!(project.is_member("ada"));
        assert!(!project.is_moderator("ada"));
    }

    #[test]
    fn duplicate_members_are_reported_but_the_rest_are_kept() {
        let mut project = project();
        assert!(project.add_members(["grace", "linus"]));
        assert!(!project.add_members(["grace", "dennis"]));
        assert_eq!(project.members, vec!["ada", "grace", "linus", "dennis"]);
    }

    #[test]
    fn removing_an_unknown_member_is_reported() {
        let mut project = project();
        project.add_members(["grace"]);
        assert!(!project.remove_members(["linus", "grace"]));
        assert_eq!(project.members, vec!["ada"]);
    }

    #[test]
    fn moderator_lists_follow_the_same_rules() {
        let mut project = project();
        assert!(project.add_moderators(["grace"]));
        assert!(!project.add_moderators(["grace"]));
        assert!(project.remove_moderators(["grace"]));
        assert!(!project.remove_moderators(["grace"]));
    }

    #[test]
    fn task_names_are_unique() {
        let mut project = project();
        assert!(project.add_task(Task::discrete("deploy", None)));
        assert!(!project.add_task(Task::discrete("deploy", None)));
        assert_eq!(project.tasks.len(), 1);

        assert!(!project.remove_tasks(["deploy", "missing"]));
        assert!(project.tasks.is_empty());
    }

    #[test]
    fn progress_averages_task_percentages() {
        let mut project = project();
        assert_eq!(project.progress(), 0);

        let mut done = Task::discrete("done", None);
        done.set_completion(Completion::Done(true)).unwrap();
        project.add_task(done);
        project.add_task(Task::milestone("half", None, 2));
        project
            .task_mut("half")
            .unwrap()
            .set_completion(Completion::Progress(1))
            .unwrap();

        // (100 + 50) / 2
        assert_eq!(project.progress(), 75);
    }
}
