use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

/// Search `roots` in order for a file named `file_name`, descending into
/// subdirectories depth-first. The first match wins; later roots are not
/// visited once one is found.
///
/// Roots that do not exist and subtrees that cannot be read are skipped.
/// Enumeration order within a directory follows the filesystem, so ties
/// inside a single root are not deterministic across platforms.
pub fn find_module(roots: &[PathBuf], file_name: &str) -> Option<PathBuf> {
    roots.iter().find_map(|root| search_root(root, file_name))
}

fn search_root(root: &Path, file_name: &str) -> Option<PathBuf> {
    // Installation trees are not repositories: no ignore-file or hidden
    // filtering, and symlinks are not followed.
    let mut builder = WalkBuilder::new(root);
    builder.standard_filters(false);
    builder.follow_links(false);

    for dent in builder.build() {
        let dent = match dent {
            Ok(d) => d,
            Err(_) => continue,
        };
        if !dent.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        if dent.file_name() == file_name {
            return Some(dent.path().to_path_buf());
        }
    }
    None
}
