//! `git` executable invocation for network transport

use std::path::Path;
use std::process::Command;

use crate::{Error, Result};

/// Run `git` with `args`, optionally inside `dir` (`git -C <dir>`).
///
/// Returns trimmed stdout. A non-zero exit becomes [`Error::Command`]
/// carrying the trimmed stderr.
pub(crate) fn run_git(dir: Option<&Path>, args: &[&str]) -> Result<String> {
    let mut command = Command::new("git");
    if let Some(dir) = dir {
        command.arg("-C").arg(dir);
    }
    command.args(args);

    tracing::debug!(args = ?args, "running git");
    let output = command.output().map_err(Error::Spawn)?;

    if !output.status.success() {
        return Err(Error::Command {
            command: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Check whether the `git` executable is available.
pub fn is_installed() -> bool {
    run_git(None, &["--version"]).is_ok()
}

/// Clone `url` into `dest`.
pub fn clone(url: &str, dest: &Path) -> Result<()> {
    let dest = dest.to_string_lossy();
    run_git(None, &["clone", url, dest.as_ref()])?;
    Ok(())
}

/// Verify that `url` is a reachable repository.
///
/// The error carries git's own explanation when there is one.
pub fn check_remote(url: &str) -> Result<()> {
    match run_git(None, &["ls-remote", "--exit-code", url]) {
        Ok(_) => Ok(()),
        Err(Error::Command { command, stderr }) if stderr.is_empty() => Err(Error::Command {
            command,
            stderr: "repository not found or not accessible".into(),
        }),
        Err(e) => Err(e),
    }
}

/// Loose syntactic check that `url` looks like a git remote.
///
/// Accepts `https://`, `http://`, `ssh://`, `git://` and `file://` URLs
/// plus scp-style `user@host:path`. Bare local paths are not URLs.
pub fn is_valid_repo_url(url: &str) -> bool {
    if let Some(rest) = ["https://", "http://", "ssh://", "git://"]
        .iter()
        .find_map(|scheme| url.strip_prefix(scheme))
    {
        return rest.contains('/');
    }
    if let Some(rest) = url.strip_prefix("file://") {
        return !rest.is_empty();
    }
    is_scp_style(url)
}

fn is_scp_style(url: &str) -> bool {
    let Some((user_host, path)) = url.split_once(':') else {
        return false;
    };
    let Some((user, host)) = user_host.split_once('@') else {
        return false;
    };
    !user.is_empty()
        && !host.is_empty()
        && !path.is_empty()
        && !user_host.contains('/')
        && !user_host.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://github.com/me/claude-config.git", true)]
    #[case("http://example.com/me/repo", true)]
    #[case("ssh://git@github.com/me/repo.git", true)]
    #[case("git@github.com:me/repo.git", true)]
    #[case("deploy@build.example.org:configs/claude.git", true)]
    #[case("file:///srv/git/claude.git", true)]
    #[case("git://example.com/me/repo.git", true)]
    #[case("file://", false)]
    #[case("@host:path", false)]
    #[case("user@host:", false)]
    #[case("https://github.com", false)]
    #[case("git@github.com", false)]
    #[case("/tmp/local/repo", false)]
    #[case("", false)]
    fn repo_url_validity(#[case] url: &str, #[case] expected: bool) {
        assert_eq!(is_valid_repo_url(url), expected);
    }
}
