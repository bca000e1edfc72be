// src/exec/shell.rs

//! Heuristic deciding whether a command string must be interpreted by a shell
//! rather than spawned directly from an argument vector.

/// Characters that typically require a shell to interpret.
const SHELL_SPECIAL_CHARS: &[char] = &[
    '|', '&', ';', '<', '>', '(', ')', '$', '`', '\\', '"', '\'', '*', '?', '[', ']', '#', '~',
    '=', '%',
];

/// Decide whether `command` needs a shell.
///
/// This is a conservative syntactic check, not a parser: anything that looks
/// like it could involve pipes, redirection, globbing, quoting, or variable
/// expansion is sent to the shell. Forcing shell mode or requesting extra
/// environment variables makes every command shell-executed.
pub fn needs_shell(command: &str, force_shell: bool, has_env_overrides: bool) -> bool {
    if force_shell {
        return true;
    }

    // Shell-side expansion is needed for the extra variables to be visible.
    if has_env_overrides {
        return true;
    }

    if command.contains("&&") || command.contains("||") {
        return true;
    }

    command.contains(SHELL_SPECIAL_CHARS)
}

/// The platform command interpreter and its "run this string" flag.
pub fn platform_shell() -> (&'static str, &'static str) {
    if cfg!(windows) { ("cmd", "/C") } else { ("sh", "-c") }
}
