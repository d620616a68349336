//! The interactive prompt loop
//!
//! Commands are dispatched off whitespace-split words. Every handler
//! returns `Result<()>`; the loop renders errors and keeps going, so
//! no server answer can take the session down.

use reqwest::StatusCode;
use std::path::PathBuf;

use termtrack_core::models::task::Task;
use termtrack_core::models::user::User;

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::poller::UpdatePoller;
use crate::session::{self, Session};
use crate::{help, input, output};

/// `detail` strings the server uses for a token it no longer accepts.
/// Any other 401 is a domain answer (wrong password, not an admin)
/// and is rendered as-is.
const EXPIRY_DETAILS: [&str; 2] = ["Invalid session token", "Session token has expired"];

pub struct Repl {
    api: ApiClient,
    data_dir: PathBuf,
    session: Option<Session>,
    poller: Option<UpdatePoller>,
}

impl Repl {
    pub fn new(api: ApiClient, data_dir: PathBuf) -> Self {
        Self {
            api,
            data_dir,
            session: None,
            poller: None,
        }
    }

    /// Restore the stored session if the server still accepts its
    /// token. Nothing here is fatal: a dead token or an unreachable
    /// server both leave the prompt in the logged-out state.
    pub fn startup(&mut self) {
        let Some(stored) = session::load(&self.data_dir) else {
            output::warning(
                "You are not logged in. To use the app, please use 'login' to login with an existing account, or 'register' to create a new account",
            );
            return;
        };

        match self.api.check_token(&stored.token) {
            Ok(true) => {
                output::success("You are logged in");
                self.start_poller(&stored);
                self.session = Some(stored);
            }
            Ok(false) => {
                output::warning("Session has expired, please login again to use the app");
            }
            Err(err) => output::error(&err.to_string()),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            let prompt = match &self.session {
                Some(session) => format!("[{}] >> ", session.username),
                None => "[guest] >> ".to_string(),
            };

            let line = match input::read_line(&prompt) {
                Ok(line) => line,
                // closed stdin is an exit, not an error
                Err(ClientError::Io(err)) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
                    break;
                }
                Err(err) => {
                    self.stop_poller();
                    return Err(err);
                }
            };
            let words: Vec<&str> = line.split_whitespace().collect();
            if words.is_empty() {
                continue;
            }
            if words[0] == "exit" {
                break;
            }

            if let Err(err) = self.dispatch(&words) {
                self.render_error(err);
            }
        }

        self.stop_poller();
        Ok(())
    }

    fn dispatch(&mut self, words: &[&str]) -> Result<()> {
        match words {
            &["help"] => {
                help::print_overview();
                Ok(())
            }
            &["help", command] => {
                help::print_command(command);
                Ok(())
            }
            &["register"] => self.register(),
            &["login"] => self.login(None),
            &["login", username] => self.login(Some(username)),
            &["logout"] => self.logout(),
            &["whoami"] => self.whoami(),
            &["users", fragment] => self.search_users(fragment),
            &["user", username] => self.show_user(username),
            &["edit-user"] => self.edit_user(None),
            &["edit-user", username] => self.edit_user(Some(username)),
            &["delete-user"] => self.delete_user(None),
            &["delete-user", username] => self.delete_user(Some(username)),
            &["promote", username] => self.promote(username),
            &["projects"] => self.list_projects(),
            &["project", name] => self.show_project(name),
            &["create-project"] => self.create_project(),
            &["edit-project", name] => self.edit_project(name),
            &["delete-project", name] => self.delete_project(name),
            &["member", "add", project, username] => self.add_member(project, username),
            &["member", "remove", project, username] => self.remove_member(project, username),
            &["moderator", "add", project, username] => self.add_moderator(project, username),
            &["moderator", "remove", project, username] => self.remove_moderator(project, username),
            &["task", "add", project] => self.add_task(project),
            &["task", "edit", project, task] => self.edit_task(project, task),
            &["task", "remove", project, task] => self.remove_task(project, task),
            &["task", "done", project, task] => self.set_completion(project, task, "true"),
            &["task", "done", project, task, value] => self.set_completion(project, task, value),
            &["task", "progress", project, task, value] => self.set_completion(project, task, value),
            &["task", "member", "add", project, task, username] => {
                self.assign_task_member(project, task, username)
            }
            &["task", "member", "remove", project, task, username] => {
                self.unassign_task_member(project, task, username)
            }
            &["updates"] => self.show_updates(),
            _ => {
                output::error("Bad command. Try 'help' to see all available commands");
                Ok(())
            }
        }
    }

    // ----
    // Account commands
    // ----

    fn register(&mut self) -> Result<()> {
        let username = input::read_line("Enter username: ")?;
        let full_name = input::read_line("Enter full name: ")?;
        let password = input::read_password("Enter password: ")?;

        let profile = User {
            username: username.clone(),
            full_name,
            profile_picture: None,
        };
        let token = self.api.register(&profile, &password)?;
        self.install_session(Session { token, username })?;
        output::success("User created successfully");
        Ok(())
    }

    fn login(&mut self, username: Option<&str>) -> Result<()> {
        let username = match username {
            Some(username) => username.to_string(),
            None => input::read_line("Username: ")?,
        };
        let password = input::read_password("Password: ")?;

        let token = self.api.login(&username, &password)?;
        self.install_session(Session { token, username })?;
        output::success("Login successful");
        Ok(())
    }

    fn logout(&mut self) -> Result<()> {
        self.require_session()?;
        self.stop_poller();
        session::clear(&self.data_dir)?;
        self.session = None;
        output::success("Logged out");
        Ok(())
    }

    fn whoami(&mut self) -> Result<()> {
        let session = self.require_session()?;
        let hello = self.api.hello(&session.token)?;
        output::info(&hello.response);
        if hello.admin {
            println!("  You are an admin");
        }
        Ok(())
    }

    fn search_users(&mut self, fragment: &str) -> Result<()> {
        let session = self.require_session()?;
        let names = self.api.search_users(&session.token, fragment)?;
        if names.is_empty() {
            output::warning("Could not find anyone with that username");
            return Ok(());
        }

        output::header("Search results");
        for name in names {
            println!("  {name}");
        }
        println!();
        Ok(())
    }

    fn show_user(&mut self, username: &str) -> Result<()> {
        let session = self.require_session()?;
        let profile = self.api.get_user(&session.token, username)?;

        output::header(&format!("{}'s details", profile.username));
        println!("  Username:  {}", profile.username);
        println!("  Full name: {}", profile.full_name);
        println!();
        Ok(())
    }

    fn edit_user(&mut self, username: Option<&str>) -> Result<()> {
        let session = self.require_session()?;
        let username = username.unwrap_or(&session.username).to_string();
        let token = session.token.clone();

        let mut profile = self.api.get_user(&token, &username)?;
        let full_name = input::read_line(&format!("Full name [{}]: ", profile.full_name))?;
        if full_name.is_empty() {
            output::info("Nothing was changed");
            return Ok(());
        }

        profile.full_name = full_name;
        let detail = self.api.update_user(&token, &profile)?;
        output::success(&detail);
        Ok(())
    }

    fn delete_user(&mut self, username: Option<&str>) -> Result<()> {
        let session = self.require_session()?.clone();
        let username = username.unwrap_or(&session.username).to_string();
        let password = input::read_password("Password: ")?;

        let detail = self.api.delete_user(&session.token, &username, &password)?;
        output::success(&detail);

        if username == session.username {
            self.stop_poller();
            session::clear(&self.data_dir)?;
            self.session = None;
        }
        Ok(())
    }

    fn promote(&mut self, username: &str) -> Result<()> {
        let session = self.require_session()?;
        let detail = self.api.promote(&session.token, username)?;
        output::success(&detail);
        Ok(())
    }

    // ----
    // Project commands
    // ----

    fn list_projects(&mut self) -> Result<()> {
        let session = self.require_session()?;
        let projects = self.api.all_projects(&session.token)?;
        if projects.is_empty() {
            output::info("You are not a member of any project yet");
            return Ok(());
        }

        output::header("Projects");
        for (name, percent) in projects {
            println!("  {name}: {percent}%");
        }
        println!();
        Ok(())
    }

    fn show_project(&mut self, name: &str) -> Result<()> {
        let session = self.require_session()?;
        let project = self.api.get_project(&session.token, name)?;

        output::header(&project.name);
        if let Some(description) = &project.description {
            println!("  {description}");
        }
        println!("  Owner:      {}", project.owner);
        println!("  Moderators: {}", join_or_dash(&project.moderators));
        println!("  Members:    {}", join_or_dash(&project.members));

        if project.tasks.is_empty() {
            println!("  No tasks yet");
        } else {
            output::subheader("Tasks:");
            for task in &project.tasks {
                let assignees = if task.members.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", task.members.join(", "))
                };
                println!("  [{:>3}%] {}{}", task.percentage(), task.name, assignees);
                if let Some(description) = &task.description {
                    println!("         {description}");
                }
            }
        }
        println!();
        Ok(())
    }

    fn create_project(&mut self) -> Result<()> {
        let session = self.require_session()?;
        let token = session.token.clone();

        let name = input::read_line("Project name: ")?;
        let description = input::read_optional("Description: ")?;

        let detail = self
            .api
            .create_project(&token, &name, description.as_deref())?;
        output::success(&detail);
        Ok(())
    }

    fn edit_project(&mut self, name: &str) -> Result<()> {
        let session = self.require_session()?;
        let token = session.token.clone();

        let project = self.api.get_project(&token, name)?;
        let current = project.description.as_deref().unwrap_or("-");
        let description = input::read_line(&format!("Description [{current}]: "))?;
        if description.is_empty() {
            output::info("Nothing was changed");
            return Ok(());
        }

        let detail = self.api.update_project(&token, name, Some(&description))?;
        output::success(&detail);
        Ok(())
    }

    fn delete_project(&mut self, name: &str) -> Result<()> {
        let session = self.require_session()?;
        let detail = self.api.delete_project(&session.token, name)?;
        output::success(&detail);
        Ok(())
    }

    fn add_member(&mut self, project: &str, username: &str) -> Result<()> {
        let session = self.require_session()?;
        let detail = self.api.add_member(&session.token, project, username)?;
        output::success(&detail);
        Ok(())
    }

    fn remove_member(&mut self, project: &str, username: &str) -> Result<()> {
        let session = self.require_session()?;
        let detail = self.api.remove_member(&session.token, project, username)?;
        output::success(&detail);
        Ok(())
    }

    fn add_moderator(&mut self, project: &str, username: &str) -> Result<()> {
        let session = self.require_session()?;
        let detail = self.api.add_moderator(&session.token, project, username)?;
        output::success(&detail);
        Ok(())
    }

    fn remove_moderator(&mut self, project: &str, username: &str) -> Result<()> {
        let session = self.require_session()?;
        let detail = self.api.remove_moderator(&session.token, project, username)?;
        output::success(&detail);
        Ok(())
    }

    // ----
    // Task commands
    // ----

    fn add_task(&mut self, project: &str) -> Result<()> {
        let session = self.require_session()?;
        let token = session.token.clone();

        let name = input::read_line("Task name: ")?;
        let description = input::read_optional("Description: ")?;
        let milestones =
            input::read_line("Milestones (leave empty for a plain done/not-done task): ")?;

        let task = if milestones.is_empty() {
            Task::discrete(name, description)
        } else {
            let count: u32 = milestones
                .parse()
                .map_err(|_| ClientError::invalid("milestones", "expected a number"))?;
            Task::milestone(name, description, count)
        };

        let detail = self.api.add_task(&token, project, &task)?;
        output::success(&detail);
        Ok(())
    }

    fn edit_task(&mut self, project: &str, task_name: &str) -> Result<()> {
        let session = self.require_session()?;
        let token = session.token.clone();

        let project_data = self.api.get_project(&token, project)?;
        let Some(current) = project_data.task(task_name) else {
            output::error("Task not found");
            return Ok(());
        };

        let shown = current.description.as_deref().unwrap_or("-");
        let description = input::read_line(&format!("Description [{shown}]: "))?;
        if description.is_empty() {
            output::info("Nothing was changed");
            return Ok(());
        }

        let mut updated = current.clone();
        updated.description = Some(description);
        let detail = self.api.update_task(&token, project, task_name, &updated)?;
        output::success(&detail);
        Ok(())
    }

    fn remove_task(&mut self, project: &str, task_name: &str) -> Result<()> {
        let session = self.require_session()?;
        let detail = self.api.delete_task(&session.token, project, task_name)?;
        output::success(&detail);
        Ok(())
    }

    fn set_completion(&mut self, project: &str, task_name: &str, value: &str) -> Result<()> {
        let session = self.require_session()?;
        let detail = self
            .api
            .set_completion(&session.token, project, task_name, value)?;
        output::success(&detail);
        Ok(())
    }

    fn assign_task_member(&mut self, project: &str, task_name: &str, username: &str) -> Result<()> {
        let session = self.require_session()?;
        let detail = self
            .api
            .assign_task_member(&session.token, project, task_name, username)?;
        output::success(&detail);
        Ok(())
    }

    fn unassign_task_member(
        &mut self,
        project: &str,
        task_name: &str,
        username: &str,
    ) -> Result<()> {
        let session = self.require_session()?;
        let detail = self
            .api
            .unassign_task_member(&session.token, project, task_name, username)?;
        output::success(&detail);
        Ok(())
    }

    fn show_updates(&mut self) -> Result<()> {
        let session = self.require_session()?;
        let updated = self.api.project_updates(&session.token)?;
        if updated.is_empty() {
            output::info("No project updates");
            return Ok(());
        }
        for name in updated {
            output::warning(&format!("Project '{name}' has been updated"));
        }
        Ok(())
    }

    // ----
    // Session plumbing
    // ----

    fn require_session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(ClientError::NotLoggedIn)
    }

    fn install_session(&mut self, session: Session) -> Result<()> {
        session::save(&self.data_dir, &session)?;
        self.stop_poller();
        self.start_poller(&session);
        self.session = Some(session);
        Ok(())
    }

    fn start_poller(&mut self, session: &Session) {
        self.poller = Some(UpdatePoller::start(&self.api, session.token.clone()));
    }

    fn stop_poller(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
    }

    fn render_error(&mut self, err: ClientError) {
        if let ClientError::Api { status, ref detail } = err
            && status == StatusCode::UNAUTHORIZED
            && EXPIRY_DETAILS.contains(&detail.as_str())
        {
            output::warning("Session has expired, please login again to use the app");
            self.stop_poller();
            self.session = None;
            return;
        }
        output::error(&err.to_string());
    }
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}
