//! Detection of platform-specific content in pushed scripts and docs

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use ccsync_fs::NormalizedPath;

use crate::platform::{Platform, is_platform_variant, variant_name};

/// Extensions whose content is scanned.
const SCANNED_EXTENSIONS: &[&str] = &["md", "sh", "ps1", "bat", "cmd"];

static UNIX_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"#!/bin/(?:ba)?sh",
        r"#!/usr/bin/env\s+(?:ba)?sh",
        r"\bgrep\s+",
        r"\bsed\s+",
        r"\bawk\s+",
        r"\bchmod\s+",
        r"\bchown\s+",
        r"\$HOME\b",
        r"\$USER\b",
        r"/usr/(?:local/)?bin/",
    ])
});

static WINDOWS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)\bpowershell\b",
        r"(?i)\bpwsh\b",
        r"(?i)\bcmd\s*/c\b",
        r"(?i)\bGet-\w+",
        r"(?i)\bSet-\w+",
        r"(?i)\bNew-\w+",
        r"(?i)\bRemove-\w+",
        r"%USERPROFILE%",
        r"%APPDATA%",
        r"%LOCALAPPDATA%",
        r"(?i)\.exe\b",
    ])
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

/// A file with platform-specific content and no variant for the other
/// platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformWarning {
    /// Repository-relative path of the file
    pub file: NormalizedPath,
    /// Platform whose syntax was detected
    pub platform: Platform,
    /// The text that matched
    pub matched: String,
    /// Name of the variant that would silence the warning
    pub suggested: String,
}

/// Find the first platform-specific construct in `content`.
///
/// Unix constructs are checked before Windows ones.
pub fn detect_platform_content(content: &str) -> Option<(Platform, String)> {
    let scan = |platform: Platform, patterns: &[Regex]| {
        patterns
            .iter()
            .find_map(|re| re.find(content))
            .map(|m| (platform, m.as_str().to_string()))
    };

    scan(Platform::Unix, &UNIX_PATTERNS).or_else(|| scan(Platform::Windows, &WINDOWS_PATTERNS))
}

/// Check the repository files `files` (relative to `repo_dir`) for
/// platform-specific content lacking a variant for the other platform.
///
/// Unreadable files are skipped.
pub fn check_platform_variants(repo_dir: &Path, files: &[NormalizedPath]) -> Vec<PlatformWarning> {
    let present: HashSet<&str> = files.iter().map(NormalizedPath::as_str).collect();

    files
        .iter()
        .filter(|rel| is_scanned(rel) && !is_platform_variant(rel.as_str()))
        .filter_map(|rel| {
            let bytes = fs::read(rel.under(repo_dir)).ok()?;
            let content = String::from_utf8_lossy(&bytes);
            let (platform, matched) = detect_platform_content(&content)?;

            let suggested = variant_name(rel.as_str(), platform.other());
            if present.contains(suggested.as_str()) {
                return None;
            }

            Some(PlatformWarning {
                file: rel.clone(),
                platform,
                matched,
                suggested,
            })
        })
        .collect()
}

fn is_scanned(rel: &NormalizedPath) -> bool {
    rel.extension()
        .map(str::to_lowercase)
        .is_some_and(|ext| SCANNED_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("#!/bin/bash\necho hi", Platform::Unix, "#!/bin/bash")]
    #[case("run `grep -r foo`", Platform::Unix, "grep ")]
    #[case("cd $HOME/work", Platform::Unix, "$HOME")]
    #[case("Run PowerShell as admin", Platform::Windows, "PowerShell")]
    #[case("Get-ChildItem .", Platform::Windows, "Get-ChildItem")]
    #[case("copy to %APPDATA%", Platform::Windows, "%APPDATA%")]
    #[case("start tool.exe", Platform::Windows, ".exe")]
    fn test_detect(#[case] content: &str, #[case] platform: Platform, #[case] matched: &str) {
        assert_eq!(
            detect_platform_content(content),
            Some((platform, matched.to_string()))
        );
    }

    #[test]
    fn test_portable_content() {
        assert_eq!(detect_platform_content("# Notes\nJust text."), None);
    }

    #[test]
    fn test_unix_checked_first() {
        let (platform, _) = detect_platform_content("pwsh then chmod +x run").unwrap();
        assert_eq!(platform, Platform::Unix);
    }

    #[test]
    fn test_check_platform_variants() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("commands")).unwrap();
        std::fs::write(root.join("commands/deploy.md"), "chmod +x deploy.sh").unwrap();
        std::fs::write(root.join("commands/build.md"), "powershell build").unwrap();
        std::fs::write(root.join("commands/build.unix.md"), "make").unwrap();
        std::fs::write(root.join("commands/ok.md"), "portable").unwrap();
        std::fs::write(root.join("data.json"), "chmod +x").unwrap();

        let files: Vec<NormalizedPath> = [
            "commands/deploy.md",
            "commands/build.md",
            "commands/build.unix.md",
            "commands/ok.md",
            "data.json",
        ]
        .into_iter()
        .map(NormalizedPath::from)
        .collect();

        let warnings = check_platform_variants(root, &files);

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].file.as_str(), "commands/deploy.md");
        assert_eq!(warnings[0].platform, Platform::Unix);
        assert_eq!(warnings[0].matched, "chmod ");
        assert_eq!(warnings[0].suggested, "commands/deploy.windows.md");
    }
}
