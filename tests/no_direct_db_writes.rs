// tests/no_direct_db_writes.rs
// Fails if SQLite is touched outside the store backend.
// Everything else must go through EntityStore so the id index stays in sync.

use std::fs;
use std::path::{Path, PathBuf};

fn collect_rs_files(dir: &Path, files: &mut Vec<PathBuf>) {
    if let Ok(entries) = fs::read_dir(dir) {
        for e in entries.flatten() {
            let p = e.path();
            if p.is_dir() {
                collect_rs_files(&p, files);
            } else if p.extension().map(|s| s == "rs").unwrap_or(false) {
                files.push(p);
            }
        }
    }
}

fn normalized(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn is_whitelisted(path: &Path) -> bool {
    let p = normalized(path);
    p.contains("/workspace/store/sqlite.rs") ||
    // Only converts rusqlite::Error into WorkspaceError
    p.ends_with("/workspace/error.rs")
}

fn src_files() -> Vec<PathBuf> {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let src_dir = Path::new(manifest_dir).join("src");
    let mut files = Vec::new();
    collect_rs_files(&src_dir, &mut files);
    files
}

#[test]
fn no_direct_db_access_outside_store() {
    let bad_patterns = [
        "rusqlite::",
        "Connection::open",
        ".execute(",
        ".execute_batch(",
        ".prepare(",
    ];

    let mut offenders: Vec<(String, String)> = Vec::new();

    for file in src_files() {
        if is_whitelisted(&file) {
            continue;
        }
        let content = match fs::read_to_string(&file) {
            Ok(c) => c,
            Err(_) => continue,
        };
        for pat in &bad_patterns {
            if content.contains(pat) {
                offenders.push((normalized(&file), pat.to_string()));
            }
        }
    }

    if !offenders.is_empty() {
        let mut msg = String::from("Direct SQLite access found outside the store backend:\n");
        for (file, pat) in offenders {
            msg.push_str(&format!("  {} contains pattern '{}': use EntityStore instead\n", file, pat));
        }
        panic!("{}", msg);
    }
}

#[test]
fn mailbox_key_has_a_single_owner() {
    let offenders: Vec<String> = src_files()
        .into_iter()
        .filter(|f| !normalized(f).ends_with("/workspace/transfer.rs"))
        .filter(|f| {
            fs::read_to_string(f)
                .map(|c| c.contains("\"transferring-cell\""))
                .unwrap_or(false)
        })
        .map(|f| normalized(&f))
        .collect();
    assert!(
        offenders.is_empty(),
        "mailbox key spelled out outside transfer.rs: {:?}",
        offenders
    );
}

#[test]
fn source_files_start_with_their_path() {
    let manifest_dir = normalized(Path::new(env!("CARGO_MANIFEST_DIR")));
    let mut missing = Vec::new();
    for file in src_files() {
        let path = normalized(&file);
        let relative = path.trim_start_matches(&manifest_dir).trim_start_matches('/');
        let first_line = fs::read_to_string(&file)
            .ok()
            .and_then(|c| c.lines().next().map(str::to_string))
            .unwrap_or_default();
        if first_line != format!("// {}", relative) {
            missing.push(relative.to_string());
        }
    }
    assert!(missing.is_empty(), "files without a path header: {:?}", missing);
}
