//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the study companion.

use crate::types::AgentKind;
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    pub fn banner(&self) {
        let title = "ADHD Study Companion";
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        if self.colored {
            println!(
                "\n   {} {}",
                title.bright_cyan().bold(),
                version.dimmed()
            );
            println!(
                "   {}\n",
                "Encouragement when you're stuck, simple explanations when you're curious."
                    .dimmed()
            );
        } else {
            println!("\n   {} {}", title, version);
            println!("   Encouragement when you're stuck, simple explanations when you're curious.\n");
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print the input prompt without a trailing newline
    pub fn prompt(&self, username: &str) {
        if self.colored {
            print!("{} ", format!("{}>", username).bright_white().bold());
        } else {
            print!("{}> ", username);
        }
        io::stdout().flush().ok();
    }

    /// Print an agent reply labelled with the agent that produced it
    pub fn reply(&self, agent: Option<AgentKind>, text: &str) {
        let label = match agent {
            Some(kind) => format!("{} Agent", kind.display_name()),
            None => "Error".to_string(),
        };

        if !self.colored {
            println!("[{}] {}\n", label, text);
            return;
        }

        match agent {
            Some(AgentKind::Motivation) => println!("{} {}\n", label.magenta().bold(), text),
            Some(AgentKind::Teaching) => println!("{} {}\n", label.cyan().bold(), text),
            None => println!("{} {}\n", label.red().bold(), text.red()),
        }
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }
}
