//! Logged-in sessions, as reported by `w -h`.

use std::process::Command;
use tm_core::state::UserSession;
use tm_core::{Result, TaskError};

/// Parse headerless `w` output.
///
/// Columns: USER TTY FROM LOGIN@ IDLE JCPU PCPU WHAT. Lines with fewer than
/// five fields are skipped; WHAT keeps its inner spaces.
pub fn parse_w_output(output: &str) -> Vec<UserSession> {
    output
        .lines()
        .filter_map(|line| {
            let parts = split_fields(line, 8);
            if parts.len() < 5 {
                return None;
            }
            let what = parts.get(7).or_else(|| parts.get(6)).copied().unwrap_or("");
            Some(UserSession {
                user:       parts[0].to_string(),
                terminal:   parts[1].to_string(),
                from:       parts[2].to_string(),
                login_time: parts[3].to_string(),
                idle:       parts[4].to_string(),
                what:       what.to_string(),
            })
        })
        .collect()
}

/// Split on runs of whitespace into at most `max` fields; the last field
/// keeps the remainder of the line.
fn split_fields(line: &str, max: usize) -> Vec<&str> {
    let mut fields = Vec::with_capacity(max);
    let mut rest = line.trim_start();
    while !rest.is_empty() {
        if fields.len() + 1 == max {
            fields.push(rest.trim_end());
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                fields.push(&rest[..end]);
                rest = rest[end..].trim_start();
            }
            None => {
                fields.push(rest);
                break;
            }
        }
    }
    fields
}

/// Run `w -h` and parse its output.
pub fn list_sessions() -> Result<Vec<UserSession>> {
    let output = Command::new("w")
        .arg("-h")
        .output()
        .map_err(|e| TaskError::System(format!("cannot run 'w': {e}")))?;

    if !output.status.success() {
        return Err(TaskError::System(format!("'w -h' exited with {}", output.status)));
    }
    Ok(parse_w_output(&String::from_utf8_lossy(&output.stdout)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sessions_with_spaced_command() {
        let out = "\
alice    tty2     tty2             09:12    3:02m  1:10   0.05s /usr/lib/gnome-session --session=ubuntu
bob      pts/1    10.0.0.7         10:41    0.00s  0.08s  0.00s vim notes.txt
";
        let sessions = parse_w_output(out);
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].user, "alice");
        assert_eq!(sessions[0].idle, "3:02m");
        assert_eq!(sessions[0].what, "/usr/lib/gnome-session --session=ubuntu");
        assert_eq!(sessions[1].from, "10.0.0.7");
        assert_eq!(sessions[1].login_time, "10:41");
        assert_eq!(sessions[1].what, "vim notes.txt");
    }

    #[test]
    fn seven_fields_use_the_last_as_what() {
        let sessions = parse_w_output("carol pts/2 - 11:00 1.00s 0.01s -bash\n");
        assert_eq!(sessions[0].what, "-bash");
    }

    #[test]
    fn short_and_blank_lines_are_skipped() {
        assert!(parse_w_output("\n   \nroot tty1 -\n").is_empty());
    }

    #[test]
    fn five_fields_leave_what_empty() {
        let sessions = parse_w_output("dave pts/3 host 12:00 5:00\n");
        assert_eq!(sessions[0].what, "");
    }
}
