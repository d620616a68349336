//! The command manual

use colored::Colorize;

use crate::output;

struct Command {
    name: &'static str,
    syntax: &'static str,
    description: &'static str,
}

const MANUAL: &[Command] = &[
    Command {
        name: "help",
        syntax: "help [command]",
        description: "show every command, or details for one of them",
    },
    Command {
        name: "register",
        syntax: "register",
        description: "create a new account",
    },
    Command {
        name: "login",
        syntax: "login [username]",
        description: "login with an already existing account",
    },
    Command {
        name: "logout",
        syntax: "logout",
        description: "disconnect from your current account",
    },
    Command {
        name: "whoami",
        syntax: "whoami",
        description: "show who you are logged in as",
    },
    Command {
        name: "users",
        syntax: "users <fragment>",
        description: "search users by username",
    },
    Command {
        name: "user",
        syntax: "user <username>",
        description: "show a user's profile",
    },
    Command {
        name: "edit-user",
        syntax: "edit-user [username]",
        description: "edit your account details; admins can edit anyone's",
    },
    Command {
        name: "delete-user",
        syntax: "delete-user [username]",
        description: "delete your account; admins can delete anyone's",
    },
    Command {
        name: "promote",
        syntax: "promote <username>",
        description: "promote a user to admin; admins only",
    },
    Command {
        name: "projects",
        syntax: "projects",
        description: "list your projects with their progress",
    },
    Command {
        name: "project",
        syntax: "project <name>",
        description: "show a project's members, moderators and tasks",
    },
    Command {
        name: "create-project",
        syntax: "create-project",
        description: "create a new project",
    },
    Command {
        name: "edit-project",
        syntax: "edit-project <name>",
        description: "edit a project's description",
    },
    Command {
        name: "delete-project",
        syntax: "delete-project <name>",
        description: "delete a project; owner or admin",
    },
    Command {
        name: "member",
        syntax: "member add|remove <project> <username>",
        description: "manage a project's members",
    },
    Command {
        name: "moderator",
        syntax: "moderator add|remove <project> <username>",
        description: "manage a project's moderators; owner or admin",
    },
    Command {
        name: "task",
        syntax: "task add <project> | task edit|remove <project> <task> | task done <project> <task> [true|false] | task progress <project> <task> <count> | task member add|remove <project> <task> <username>",
        description: "manage a project's tasks, their assignees and their completion",
    },
    Command {
        name: "updates",
        syntax: "updates",
        description: "list projects that changed since you last checked",
    },
    Command {
        name: "exit",
        syntax: "exit",
        description: "exit the app",
    },
];

/// Print every command with a one-line description.
pub fn print_overview() {
    output::header("Commands");
    for command in MANUAL {
        println!("  {} : {}", command.name.bold(), command.description);
    }
    println!();
}

/// Print syntax and description for a single command.
pub fn print_command(name: &str) {
    match MANUAL.iter().find(|command| command.name == name) {
        Some(command) => {
            println!("\n  {}", command.syntax.bold());
            println!("  {}\n", command.description);
        }
        None => output::error("No such command available. Try 'help' to see all available commands"),
    }
}
