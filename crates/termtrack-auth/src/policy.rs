//! Authorization policy — pure predicates over an acting user and the
//! project being touched.
//!
//! Handlers own the error responses; these functions only answer
//! yes or no. Admins pass every check.

use termtrack_core::models::project::Project;
use termtrack_core::models::task::Task;
use termtrack_core::models::user::UserAccount;

/// Reading a project and its tasks: members and admins.
pub fn can_view_project(actor: &UserAccount, project: &Project) -> bool {
    project.is_member(&actor.username) || actor.is_admin()
}

/// Changing the project itself (description, tasks, deletion):
/// the owner and admins.
pub fn can_modify_project(actor: &UserAccount, project: &Project) -> bool {
    project.is_owner(&actor.username) || actor.is_admin()
}

/// Adding and removing members, on the project or on its tasks:
/// the owner, moderators and admins.
pub fn can_manage_membership(actor: &UserAccount, project: &Project) -> bool {
    project.is_owner(&actor.username) || project.is_moderator(&actor.username) || actor.is_admin()
}

/// Granting and revoking moderator standing: the owner and admins.
pub fn can_manage_moderators(actor: &UserAccount, project: &Project) -> bool {
    project.is_owner(&actor.username) || actor.is_admin()
}

/// Updating a task's completion: the owner, moderators, users assigned
/// to that task, and admins.
pub fn can_modify_task_completion(actor: &UserAccount, project: &Project, task: &Task) -> bool {
    project.is_owner(&actor.username)
        || project.is_moderator(&actor.username)
        || task.is_member(&actor.username)
        || actor.is_admin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use termtrack_core::models::user::{Power, User};

    fn user(username: &str, power: Power) -> UserAccount {
        let mut account = UserAccount::new(
            User {
                username: username.to_string(),
                full_name: username.to_string(),
                profile_picture: None,
            },
            "hash".to_string(),
        );
        account.power = power;
        account
    }

    fn project() -> Project {
        let mut project = Project::new("orbit", None, "owner");
        project.add_members(["moderator", "member", "assignee"]);
        project.add_moderators(["moderator"]);
        let mut task = Task::discrete("deploy", None);
        task.add_members(["assignee"]);
        project.add_task(task);
        project
    }

    #[test]
    fn view_requires_membership_or_admin() {
        let project = project();
        assert!(can_view_project(&user("member", Power::User), &project));
        assert!(can_view_project(&user("owner", Power::User), &project));
        assert!(can_view_project(&user("outsider", Power::Admin), &project));
        assert!(!can_view_project(&user("outsider", Power::User), &project));
    }

    #[test]
    fn only_owner_and_admin_modify_the_project() {
        let project = project();
        assert!(can_modify_project(&user("owner", Power::User), &project));
        assert!(can_modify_project(&user("outsider", Power::Admin), &project));
        assert!(!can_modify_project(&user("moderator", Power::User), &project));
        assert!(!can_modify_project(&user("member", Power::User), &project));
    }

    #[test]
    fn moderators_manage_membership_but_not_moderators() {
        let project = project();
        let moderator = user("moderator", Power::User);
        assert!(can_manage_membership(&moderator, &project));
        assert!(!can_manage_moderators(&moderator, &project));

        let owner = user("owner", Power::User);
        assert!(can_manage_membership(&owner, &project));
        assert!(can_manage_moderators(&owner, &project));

        let member = user("member", Power::User);
        assert!(!can_manage_membership(&member, &project));
    }

    #[test]
    fn task_assignees_may_update_completion() {
        let project = project();
        let task = project.task("deploy").unwrap();

        assert!(can_modify_task_completion(
            &user("assignee", Power::User),
            &project,
            task
        ));
        assert!(can_modify_task_completion(
            &user("moderator", Power::User),
            &project,
            task
        ));
        assert!(can_modify_task_completion(
            &user("owner", Power::User),
            &project,
            task
        ));
        assert!(can_modify_task_completion(
            &user("outsider", Power::Admin),
            &project,
            task
        ));
        assert!(!can_modify_task_completion(
            &user("member", Power::User),
            &project,
            task
        ));
    }
}
