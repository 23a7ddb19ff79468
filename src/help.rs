// ❓ Built-in help text

use std::io::{self, Write};

pub struct Topic {
    pub name: &'static str,
    pub summary: &'static str,
}

/// Alphabetical, the way the command list prints
pub const TOPICS: &[Topic] = &[
    Topic {
        name: "EOF",
        summary: "Handles the End Of File signal to exit the program.",
    },
    Topic {
        name: "all",
        summary: "Prints string representation of all instances.",
    },
    Topic {
        name: "count",
        summary: "Prints the number of instances of a class.",
    },
    Topic {
        name: "create",
        summary: "Creates a new instance.",
    },
    Topic {
        name: "destroy",
        summary: "Deletes an instance based on the class name and id.",
    },
    Topic {
        name: "help",
        summary: "To get help on a command, type help <topic>.",
    },
    Topic {
        name: "quit",
        summary: "Quit command to exit the program.",
    },
    Topic {
        name: "show",
        summary: "Prints the string representation of an instance.",
    },
    Topic {
        name: "update",
        summary: "Updates an instance based on the class name and id.",
    },
];

pub fn find(name: &str) -> Option<&'static Topic> {
    TOPICS.iter().find(|topic| topic.name == name)
}

/// `help` with no topic lists the commands; with one, prints its text
pub fn write_help(topic: &str, out: &mut dyn Write) -> io::Result<()> {
    let topic = topic.split_whitespace().next().unwrap_or("");

    if topic.is_empty() {
        let header = "Documented commands (type help <topic>):";
        let names: Vec<&str> = TOPICS.iter().map(|t| t.name).collect();
        writeln!(out)?;
        writeln!(out, "{header}")?;
        writeln!(out, "{}", "=".repeat(header.len()))?;
        writeln!(out, "{}", names.join("  "))?;
        return writeln!(out);
    }

    match find(topic) {
        Some(entry) => writeln!(out, "{}", entry.summary),
        None => writeln!(out, "*** No help on {topic}"),
    }
}
